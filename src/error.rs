//! Error types for loading trip data and resolving filter selections.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failure while turning one or more city sources into a [`crate::Dataset`].
///
/// Any of these aborts the current load attempt as a whole; the interactive
/// session reports it and goes back to collecting filters.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("unknown city: {0}")]
    UnknownCity(String),

    #[error("unknown month: {0}")]
    UnknownMonth(String),

    #[error("unknown weekday: {0}")]
    UnknownWeekday(String),

    #[error("failed to open {path}: {source}", path = .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed data for {city}: {source}")]
    Csv {
        city: String,
        #[source]
        source: csv::Error,
    },

    #[error("{city}: required column \"{column}\" is missing")]
    MissingColumn { city: String, column: &'static str },

    #[error("{city}: unparsable {column} \"{value}\" on row {row}")]
    BadTimestamp {
        city: String,
        row: usize,
        column: &'static str,
        value: String,
    },
}

/// A filter axis given on the command line could not be resolved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    #[error("no {axis} selected")]
    Empty { axis: &'static str },

    #[error("unknown {axis}: {value}")]
    Unknown { axis: &'static str, value: String },
}

//! bikeshare_rs
//!
//! An interactive explorer for municipal bike-share trip records. Pairs with
//! the `bikeshare` CLI.
//!
//! ### Features
//! - Select one or more cities, months and weekdays; rows from several cities
//!   are merged even when their columns differ
//! - Most frequent travel times, popular stations and routes
//! - Total and mean trip duration
//! - Rider breakdown by user type, gender and birth year, where available
//! - A resumable, sortable pager over the raw rows
//!
//! ### Example
//! ```no_run
//! use bikeshare_rs::{Config, CsvSource, FilterSelection, Report};
//!
//! let config = Config::default();
//! let source = CsvSource::from_config(&config);
//! let selection = FilterSelection::from_lists(&config, "chicago", "jan,feb", "monday")?;
//! let data = bikeshare_rs::dataset::load(&source, &selection)?;
//! let locale = bikeshare_rs::format::map_locale("en");
//! println!("{}", Report::Time.render(&data, locale));
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod dataset;
pub mod error;
pub mod filters;
pub mod format;
pub mod models;
pub mod pager;
pub mod prompt;
pub mod report;
pub mod session;
pub mod stats;
pub mod storage;
pub mod table;

pub use config::Config;
pub use dataset::{Dataset, TripFilter};
pub use error::{LoadError, SelectionError};
pub use models::{FilterSelection, TripRecord};
pub use prompt::{Answer, Prompter};
pub use report::Report;
pub use session::Session;
pub use storage::{CsvSource, InMemorySource, TripSource};

//! Trip sources: where the per-city rows come from.
//!
//! [`CsvSource`] reads the published CSV files from disk; [`InMemorySource`]
//! holds CSV text directly and is handy for tests and demos. Both share
//! [`read_table`], which checks the header once and records which optional
//! columns the city provides.

use crate::config::Config;
use crate::error::LoadError;
use crate::models::{CityColumns, RawTrip};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::PathBuf;

/// Columns every city file must carry.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    "Start Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
];

/// Rows of a single city plus its column capabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct CityTable {
    pub columns: CityColumns,
    pub rows: Vec<RawTrip>,
}

/// Anything that can hand out the raw rows for a logical city name.
pub trait TripSource {
    fn read_city(&self, city: &str) -> Result<CityTable, LoadError>;
}

/// Parse one city's CSV text.
pub fn read_table<R: Read>(city: &str, reader: R) -> Result<CityTable, LoadError> {
    let csv_err = |source| LoadError::Csv {
        city: city.to_string(),
        source,
    };
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let headers = rdr.headers().map_err(csv_err)?.clone();
    let has = |name: &str| headers.iter().any(|h| h == name);

    if let Some(missing) = REQUIRED_COLUMNS.into_iter().find(|c| !has(*c)) {
        return Err(LoadError::MissingColumn {
            city: city.to_string(),
            column: missing,
        });
    }
    let columns = CityColumns {
        city: city.to_string(),
        has_end_time: has("End Time"),
        has_gender: has("Gender"),
        has_birth_year: has("Birth Year"),
    };

    let rows = rdr
        .deserialize::<RawTrip>()
        .collect::<Result<Vec<_>, _>>()
        .map_err(csv_err)?;
    Ok(CityTable { columns, rows })
}

/// Reads `<data_dir>/<file>` for each configured city.
#[derive(Debug, Clone)]
pub struct CsvSource {
    files: Vec<(String, PathBuf)>,
}

impl CsvSource {
    pub fn from_config(config: &Config) -> Self {
        let files = config
            .cities
            .iter()
            .filter_map(|c| Some((c.name.clone(), config.city_path(&c.name)?)))
            .collect();
        Self { files }
    }
}

impl TripSource for CsvSource {
    fn read_city(&self, city: &str) -> Result<CityTable, LoadError> {
        let path = self
            .files
            .iter()
            .find(|(name, _)| name == city)
            .map(|(_, p)| p)
            .ok_or_else(|| LoadError::UnknownCity(city.to_string()))?;
        let file = File::open(path).map_err(|source| LoadError::Io {
            path: path.clone(),
            source,
        })?;
        read_table(city, BufReader::new(file))
    }
}

/// CSV text held in memory, keyed by city name.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    tables: Vec<(String, String)>,
}

impl InMemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_city(mut self, city: &str, csv_text: &str) -> Self {
        self.tables.push((city.to_string(), csv_text.to_string()));
        self
    }
}

impl TripSource for InMemorySource {
    fn read_city(&self, city: &str) -> Result<CityTable, LoadError> {
        let (_, text) = self
            .tables
            .iter()
            .find(|(name, _)| name == city)
            .ok_or_else(|| LoadError::UnknownCity(city.to_string()))?;
        read_table(city, text.as_bytes())
    }
}

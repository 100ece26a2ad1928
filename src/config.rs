//! Runtime configuration: where the city files live and which values each
//! filter axis offers.
//!
//! The defaults cover the three bundled cities and the first half of the year,
//! which is all the published trip files contain. A JSON file can override any
//! field:
//!
//! ```json
//! {
//!   "data_dir": "/srv/bikeshare",
//!   "cities": [{ "name": "chicago", "file": "chicago.csv" }],
//!   "page_size": 10
//! }
//! ```

use crate::models::{month_number, parse_weekday};
use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A logical city name and the CSV file holding its trips.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityFile {
    pub name: String,
    pub file: String,
}

impl CityFile {
    fn new(name: &str, file: &str) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory the city files are resolved against.
    pub data_dir: PathBuf,
    /// Offered cities, in prompt order.
    pub cities: Vec<CityFile>,
    /// Offered month abbreviations (`jan`..`dec`).
    pub months: Vec<String>,
    /// Offered weekday names (`sunday`..`saturday`).
    pub weekdays: Vec<String>,
    /// Raw rows revealed per pager step.
    pub page_size: usize,
    /// Locale tag for count formatting (`en`, `de`, ...).
    pub locale: String,
    /// Clear the terminal between menu transitions. Decided by the binary.
    #[serde(skip)]
    pub clear_screen: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            cities: vec![
                CityFile::new("chicago", "chicago.csv"),
                CityFile::new("new york city", "new_york_city.csv"),
                CityFile::new("washington", "washington.csv"),
            ],
            months: ["jan", "feb", "mar", "apr", "may", "jun"]
                .into_iter()
                .map(String::from)
                .collect(),
            weekdays: [
                "sunday",
                "monday",
                "tuesday",
                "wednesday",
                "thursday",
                "friday",
                "saturday",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            page_size: 5,
            locale: "en".into(),
            clear_screen: false,
        }
    }
}

impl Config {
    /// Load a configuration from a JSON file; absent fields keep their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let cfg: Config = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    /// Check that every axis is non-empty and only names known months/weekdays.
    pub fn validate(&self) -> Result<()> {
        if self.cities.is_empty() {
            bail!("config must list at least one city");
        }
        if self.months.is_empty() {
            bail!("config must list at least one month");
        }
        if self.weekdays.is_empty() {
            bail!("config must list at least one weekday");
        }
        if self.page_size == 0 {
            bail!("page_size must be greater than zero");
        }
        for c in &self.cities {
            if c.name.trim().is_empty() || c.name != c.name.to_lowercase() {
                bail!("city names must be non-empty and lowercase: {:?}", c.name);
            }
        }
        for m in &self.months {
            if month_number(m).is_none() {
                bail!("unknown month abbreviation in config: {m}");
            }
        }
        for d in &self.weekdays {
            if parse_weekday(d).is_none() {
                bail!("unknown weekday in config: {d}");
            }
        }
        Ok(())
    }

    pub fn city_names(&self) -> Vec<&str> {
        self.cities.iter().map(|c| c.name.as_str()).collect()
    }

    /// Full path of the file backing `city`, if the city is configured.
    pub fn city_path(&self, city: &str) -> Option<PathBuf> {
        self.cities
            .iter()
            .find(|c| c.name == city)
            .map(|c| self.data_dir.join(&c.file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_are_valid() {
        let cfg = Config::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.city_names(), vec!["chicago", "new york city", "washington"]);
        assert_eq!(cfg.months.len(), 6);
        assert_eq!(cfg.weekdays.len(), 7);
        assert_eq!(cfg.page_size, 5);
    }

    #[test]
    fn json_overrides_keep_missing_fields() {
        let dir = tempdir().unwrap();
        let p = dir.path().join("cfg.json");
        fs::write(&p, r#"{ "data_dir": "/data", "page_size": 3 }"#).unwrap();
        let cfg = Config::from_json_file(&p).unwrap();
        assert_eq!(cfg.page_size, 3);
        assert_eq!(cfg.data_dir, PathBuf::from("/data"));
        assert_eq!(cfg.cities.len(), 3);
        assert_eq!(
            cfg.city_path("washington"),
            Some(PathBuf::from("/data/washington.csv"))
        );
        assert_eq!(cfg.city_path("boston"), None);
    }

    #[test]
    fn validate_rejects_unknown_enumerations() {
        let mut cfg = Config::default();
        cfg.months.push("smarch".into());
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.weekdays = vec!["funday".into()];
        assert!(cfg.validate().is_err());

        let mut cfg = Config::default();
        cfg.page_size = 0;
        assert!(cfg.validate().is_err());
    }
}

use crate::error::LoadError;
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const WEEKDAYS: [(&str, Weekday); 7] = [
    ("sunday", Weekday::Sun),
    ("monday", Weekday::Mon),
    ("tuesday", Weekday::Tue),
    ("wednesday", Weekday::Wed),
    ("thursday", Weekday::Thu),
    ("friday", Weekday::Fri),
    ("saturday", Weekday::Sat),
];

const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
];

/// Calendar month number (1..=12) for an abbreviation such as `"jan"`.
pub fn month_number(abbrev: &str) -> Option<u32> {
    MONTHS
        .iter()
        .position(|m| *m == abbrev)
        .map(|i| i as u32 + 1)
}

/// Lowercase abbreviation for a month number; `None` outside 1..=12.
pub fn month_abbrev(month: u32) -> Option<&'static str> {
    MONTHS.get((month as usize).checked_sub(1)?).copied()
}

pub fn parse_weekday(name: &str) -> Option<Weekday> {
    WEEKDAYS.iter().find(|(n, _)| *n == name).map(|(_, d)| *d)
}

pub fn weekday_name(day: Weekday) -> &'static str {
    WEEKDAYS[day.num_days_from_sunday() as usize].0
}

/// Parse a start/end time cell. Accepts the formats the published trip files use.
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(s, f).ok())
}

/// One row exactly as a city file provides it.
///
/// Optional columns deserialize to `None` both when the header is absent and
/// when a cell is blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawTrip {
    #[serde(rename = "Start Time")]
    pub start_time: String,
    #[serde(rename = "End Time", default)]
    pub end_time: Option<String>,
    #[serde(rename = "Trip Duration")]
    pub trip_duration: f64,
    #[serde(rename = "Start Station")]
    pub start_station: String,
    #[serde(rename = "End Station")]
    pub end_station: String,
    #[serde(rename = "User Type", default)]
    pub user_type: Option<String>,
    #[serde(rename = "Gender", default)]
    pub gender: Option<String>,
    #[serde(rename = "Birth Year", default)]
    pub birth_year: Option<f64>,
}

/// Which optional columns a city's source carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CityColumns {
    pub city: String,
    pub has_end_time: bool,
    pub has_gender: bool,
    pub has_birth_year: bool,
}

/// One bike-share trip with its derived calendar fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRecord {
    pub city: String,
    pub start_time: NaiveDateTime,
    pub end_time: Option<NaiveDateTime>,
    /// Seconds.
    pub trip_duration: f64,
    pub start_station: String,
    pub end_station: String,
    pub user_type: Option<String>,
    pub gender: Option<String>,
    pub birth_year: Option<i32>,
    pub month: u32,
    pub weekday: Weekday,
    pub start_hour: u32,
}

impl TripRecord {
    /// Parse timestamps and derive month, weekday and start hour.
    ///
    /// `row` is the 1-based data row used in error messages.
    pub fn from_raw(city: &str, row: usize, raw: RawTrip) -> Result<Self, LoadError> {
        let bad = |column: &'static str, value: &str| LoadError::BadTimestamp {
            city: city.to_string(),
            row,
            column,
            value: value.to_string(),
        };
        let start_time =
            parse_timestamp(&raw.start_time).ok_or_else(|| bad("Start Time", &raw.start_time))?;
        let end_time = match raw.end_time.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) => Some(parse_timestamp(s).ok_or_else(|| bad("End Time", s))?),
        };
        let gender = raw
            .gender
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty());
        let user_type = raw
            .user_type
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let birth_year = raw
            .birth_year
            .filter(|y| y.is_finite())
            .map(|y| y.trunc() as i32);

        Ok(Self {
            city: city.to_string(),
            month: start_time.month(),
            weekday: start_time.weekday(),
            start_hour: start_time.hour(),
            start_time,
            end_time,
            trip_duration: raw.trip_duration,
            start_station: raw.start_station,
            end_station: raw.end_station,
            user_type,
            gender,
            birth_year,
        })
    }

    /// `"<start station> - <end station>"`.
    pub fn route(&self) -> String {
        format!("{} - {}", self.start_station, self.end_station)
    }
}

/// The confirmed (cities, months, weekdays) triple for one session iteration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSelection {
    pub cities: Vec<String>,
    pub months: Vec<String>,
    pub days: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(start: &str) -> RawTrip {
        RawTrip {
            start_time: start.into(),
            end_time: Some("2017-01-02 08:20:00".into()),
            trip_duration: 900.0,
            start_station: "A".into(),
            end_station: "B".into(),
            user_type: Some("Subscriber".into()),
            gender: Some(" ".into()),
            birth_year: Some(1985.0),
        }
    }

    #[test]
    fn month_and_weekday_tables() {
        assert_eq!(month_number("jan"), Some(1));
        assert_eq!(month_number("jun"), Some(6));
        assert_eq!(month_number("Jan"), None);
        assert_eq!(month_abbrev(12), Some("dec"));
        assert_eq!(month_abbrev(0), None);
        assert_eq!(parse_weekday("monday"), Some(Weekday::Mon));
        assert_eq!(weekday_name(Weekday::Sun), "sunday");
    }

    #[test]
    fn derives_calendar_fields() {
        // 2017-01-02 was a Monday.
        let t = TripRecord::from_raw("chicago", 1, raw("2017-01-02 08:05:00")).unwrap();
        assert_eq!(t.month, 1);
        assert_eq!(t.weekday, Weekday::Mon);
        assert_eq!(t.start_hour, 8);
        assert_eq!(t.birth_year, Some(1985));
        assert_eq!(t.gender, None);
        assert!(t.end_time.is_some());
        assert_eq!(t.route(), "A - B");
    }

    #[test]
    fn rejects_unparsable_start_time() {
        let err = TripRecord::from_raw("chicago", 7, raw("yesterday")).unwrap_err();
        match err {
            LoadError::BadTimestamp { row, column, .. } => {
                assert_eq!(row, 7);
                assert_eq!(column, "Start Time");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}

//! Loading and filtering trips.
//!
//! [`load`] reads every selected city from a [`TripSource`], derives the
//! calendar fields, and keeps the records whose month is one of the selected
//! months and whose weekday is one of the selected weekdays. Each axis is a
//! union; the two axes are intersected.

use crate::error::LoadError;
use crate::models::{CityColumns, FilterSelection, TripRecord, month_number, parse_weekday};
use crate::storage::TripSource;
use chrono::Weekday;
use log::{debug, info};
use std::collections::BTreeSet;

/// Month/weekday predicate resolved from a [`FilterSelection`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TripFilter {
    months: BTreeSet<u32>,
    weekdays: BTreeSet<u32>,
}

impl TripFilter {
    pub fn from_selection(selection: &FilterSelection) -> Result<Self, LoadError> {
        let months = selection
            .months
            .iter()
            .map(|m| month_number(m).ok_or_else(|| LoadError::UnknownMonth(m.clone())))
            .collect::<Result<BTreeSet<_>, _>>()?;
        let weekdays = selection
            .days
            .iter()
            .map(|d| {
                parse_weekday(d)
                    .map(|w| w.num_days_from_sunday())
                    .ok_or_else(|| LoadError::UnknownWeekday(d.clone()))
            })
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self { months, weekdays })
    }

    pub fn matches(&self, trip: &TripRecord) -> bool {
        self.months.contains(&trip.month)
            && self.weekdays.contains(&trip.weekday.num_days_from_sunday())
    }
}

/// The trips currently in scope, plus what each contributing city can offer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Dataset {
    records: Vec<TripRecord>,
    cities: Vec<CityColumns>,
}

impl Dataset {
    pub fn new(records: Vec<TripRecord>, cities: Vec<CityColumns>) -> Self {
        Self { records, cities }
    }

    pub fn records(&self) -> &[TripRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn cities(&self) -> &[CityColumns] {
        &self.cities
    }

    /// True if at least one contributing city has a Gender column.
    pub fn has_gender(&self) -> bool {
        self.cities.iter().any(|c| c.has_gender)
    }

    /// True if at least one contributing city has a Birth Year column.
    pub fn has_birth_year(&self) -> bool {
        self.cities.iter().any(|c| c.has_birth_year)
    }

    pub fn cities_without_gender(&self) -> Vec<&str> {
        self.cities
            .iter()
            .filter(|c| !c.has_gender)
            .map(|c| c.city.as_str())
            .collect()
    }

    pub fn cities_without_birth_year(&self) -> Vec<&str> {
        self.cities
            .iter()
            .filter(|c| !c.has_birth_year)
            .map(|c| c.city.as_str())
            .collect()
    }

    /// Records matching `filter`, in their current order.
    pub fn filtered(&self, filter: &TripFilter) -> Dataset {
        Dataset {
            records: self
                .records
                .iter()
                .filter(|t| filter.matches(t))
                .cloned()
                .collect(),
            cities: self.cities.clone(),
        }
    }
}

/// Read, merge and filter the selected cities.
///
/// A city named twice is read once. Any unparsable timestamp rejects the
/// whole load.
pub fn load<S: TripSource + ?Sized>(
    source: &S,
    selection: &FilterSelection,
) -> Result<Dataset, LoadError> {
    let filter = TripFilter::from_selection(selection)?;

    let mut seen = BTreeSet::new();
    let mut records = Vec::new();
    let mut cities = Vec::new();
    for city in &selection.cities {
        if !seen.insert(city.as_str()) {
            debug!("skipping repeated city {city}");
            continue;
        }
        let table = source.read_city(city)?;
        info!("read {} rows for {}", table.rows.len(), city);
        records.reserve(table.rows.len());
        for (i, raw) in table.rows.into_iter().enumerate() {
            records.push(TripRecord::from_raw(city, i + 1, raw)?);
        }
        cities.push(table.columns);
    }

    let all = Dataset::new(records, cities);
    let kept = all.filtered(&filter);
    info!("kept {} of {} rows after filtering", kept.len(), all.len());
    Ok(kept)
}

/// Weekday for a `num_days_from_sunday` value.
pub(crate) fn weekday_from_sunday_index(i: u32) -> Weekday {
    match i % 7 {
        0 => Weekday::Sun,
        1 => Weekday::Mon,
        2 => Weekday::Tue,
        3 => Weekday::Wed,
        4 => Weekday::Thu,
        5 => Weekday::Fri,
        _ => Weekday::Sat,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySource;

    const CHICAGO: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
0,2017-01-02 08:05:00,2017-01-02 08:20:00,900,A,B,Subscriber,Male,1985.0
1,2017-01-03 12:00:00,2017-01-03 12:30:00,1800,B,A,Customer,,
2,2017-02-06 09:00:00,2017-02-06 09:10:00,600,A,C,Subscriber,Female,1978.0
";

    const WASHINGTON: &str = "\
,Start Time,End Time,Trip Duration,Start Station,End Station,User Type
0,2017-01-02 07:00:00,2017-01-02 07:20:00,1200,L,J,Registered
";

    fn selection(cities: &[&str], months: &[&str], days: &[&str]) -> FilterSelection {
        let v = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect();
        FilterSelection {
            cities: v(cities),
            months: v(months),
            days: v(days),
        }
    }

    fn source() -> InMemorySource {
        InMemorySource::new()
            .with_city("chicago", CHICAGO)
            .with_city("washington", WASHINGTON)
    }

    #[test]
    fn filters_by_month_and_weekday() {
        let ds = load(&source(), &selection(&["chicago"], &["jan"], &["monday"])).unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.records()[0].start_station, "A");
        assert_eq!(ds.records()[0].weekday, Weekday::Mon);
    }

    #[test]
    fn merges_heterogeneous_cities() {
        let ds = load(
            &source(),
            &selection(&["chicago", "washington"], &["jan", "feb"], &["monday"]),
        )
        .unwrap();
        assert_eq!(ds.len(), 3);
        assert!(ds.has_gender());
        assert_eq!(ds.cities_without_gender(), vec!["washington"]);
        let wash = ds.records().iter().find(|t| t.city == "washington").unwrap();
        assert_eq!(wash.gender, None);
        assert_eq!(wash.birth_year, None);
    }

    #[test]
    fn repeated_city_is_read_once() {
        let ds = load(
            &source(),
            &selection(&["chicago", "chicago"], &["jan"], &["monday"]),
        )
        .unwrap();
        assert_eq!(ds.len(), 1);
        assert_eq!(ds.cities().len(), 1);
    }

    #[test]
    fn unknown_tokens_are_errors() {
        let err = load(&source(), &selection(&["boston"], &["jan"], &["monday"])).unwrap_err();
        assert!(matches!(err, LoadError::UnknownCity(_)));
        let err = load(&source(), &selection(&["chicago"], &["smarch"], &["monday"])).unwrap_err();
        assert!(matches!(err, LoadError::UnknownMonth(_)));
        let err = load(&source(), &selection(&["chicago"], &["jan"], &["funday"])).unwrap_err();
        assert!(matches!(err, LoadError::UnknownWeekday(_)));
    }

    #[test]
    fn sunday_index_round_trips() {
        for i in 0..7 {
            assert_eq!(weekday_from_sunday_index(i).num_days_from_sunday(), i);
        }
    }
}

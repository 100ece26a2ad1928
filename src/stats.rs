use crate::dataset::{Dataset, weekday_from_sunday_index};
use chrono::Weekday;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Most frequent travel times.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimeStats {
    pub month: u32,
    pub weekday: Weekday,
    pub hour: u32,
}

/// Most popular stations and route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StationStats {
    pub start_station: String,
    pub end_station: String,
    /// `"<start> - <end>"`.
    pub route: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DurationStats {
    pub trips: usize,
    pub total_seconds: f64,
    pub mean_seconds: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BirthYearStats {
    pub earliest: i32,
    pub latest: i32,
    pub most_common: i32,
}

/// Rider breakdown. `None` means no contributing city has the column, or
/// every value in scope is blank.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserStats {
    pub user_types: Vec<(String, usize)>,
    pub genders: Option<Vec<(String, usize)>>,
    pub birth_years: Option<BirthYearStats>,
    pub cities_without_gender: Vec<String>,
    pub cities_without_birth_year: Vec<String>,
}

/// Most frequent value. Ties go to the smallest value in natural order.
pub fn mode<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Option<T> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut best: Option<(T, usize)> = None;
    for (v, c) in counts {
        // strictly greater: BTreeMap order keeps the smallest among equals
        if best.as_ref().is_none_or(|(_, bc)| c > *bc) {
            best = Some((v, c));
        }
    }
    best.map(|(v, _)| v)
}

/// Frequency table, most frequent first; ties in natural order.
pub fn value_counts<T: Ord, I: IntoIterator<Item = T>>(values: I) -> Vec<(T, usize)> {
    let mut counts: BTreeMap<T, usize> = BTreeMap::new();
    for v in values {
        *counts.entry(v).or_default() += 1;
    }
    let mut out: Vec<(T, usize)> = counts.into_iter().collect();
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

pub fn time_stats(ds: &Dataset) -> Option<TimeStats> {
    let trips = ds.records();
    Some(TimeStats {
        month: mode(trips.iter().map(|t| t.month))?,
        weekday: weekday_from_sunday_index(mode(
            trips.iter().map(|t| t.weekday.num_days_from_sunday()),
        )?),
        hour: mode(trips.iter().map(|t| t.start_hour))?,
    })
}

pub fn station_stats(ds: &Dataset) -> Option<StationStats> {
    let trips = ds.records();
    Some(StationStats {
        start_station: mode(trips.iter().map(|t| t.start_station.as_str()))?.to_string(),
        end_station: mode(trips.iter().map(|t| t.end_station.as_str()))?.to_string(),
        route: mode(trips.iter().map(|t| t.route()))?,
    })
}

pub fn duration_stats(ds: &Dataset) -> Option<DurationStats> {
    if ds.is_empty() {
        return None;
    }
    let total: f64 = ds.records().iter().map(|t| t.trip_duration).sum();
    Some(DurationStats {
        trips: ds.len(),
        total_seconds: total,
        mean_seconds: total / ds.len() as f64,
    })
}

pub fn user_stats(ds: &Dataset) -> Option<UserStats> {
    if ds.is_empty() {
        return None;
    }
    let trips = ds.records();
    let user_types = value_counts(trips.iter().filter_map(|t| t.user_type.as_deref()))
        .into_iter()
        .map(|(k, c)| (k.to_string(), c))
        .collect();

    let genders = if ds.has_gender() {
        let table: Vec<(String, usize)> =
            value_counts(trips.iter().filter_map(|t| t.gender.as_deref()))
                .into_iter()
                .map(|(k, c)| (k.to_string(), c))
                .collect();
        (!table.is_empty()).then_some(table)
    } else {
        None
    };

    let birth_years = if ds.has_birth_year() {
        let years: Vec<i32> = trips.iter().filter_map(|t| t.birth_year).collect();
        match (years.iter().min(), years.iter().max(), mode(years.iter().copied())) {
            (Some(&earliest), Some(&latest), Some(most_common)) => Some(BirthYearStats {
                earliest,
                latest,
                most_common,
            }),
            _ => None,
        }
    } else {
        None
    };

    Some(UserStats {
        user_types,
        genders,
        birth_years,
        cities_without_gender: ds
            .cities_without_gender()
            .into_iter()
            .map(String::from)
            .collect(),
        cities_without_birth_year: ds
            .cities_without_birth_year()
            .into_iter()
            .map(String::from)
            .collect(),
    })
}

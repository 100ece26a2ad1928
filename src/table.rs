//! Fixed-width text rendering of raw trip rows.

use crate::dataset::Dataset;
use crate::models::TripRecord;

const HEADERS: [&str; 9] = [
    "",
    "Start Time",
    "End Time",
    "Trip Duration",
    "Start Station",
    "End Station",
    "User Type",
    "Gender",
    "Birth Year",
];

/// Rendered in place of a missing value.
pub const MISSING: &str = "NaN";

const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn cells(index: usize, t: &TripRecord) -> [String; 9] {
    let duration = if t.trip_duration.fract() == 0.0 {
        format!("{:.0}", t.trip_duration)
    } else {
        t.trip_duration.to_string()
    };
    let opt = |v: Option<String>| v.unwrap_or_else(|| MISSING.to_string());
    [
        index.to_string(),
        t.start_time.format(TIME_FORMAT).to_string(),
        opt(t.end_time.map(|e| e.format(TIME_FORMAT).to_string())),
        duration,
        t.start_station.clone(),
        t.end_station.clone(),
        opt(t.user_type.clone()),
        opt(t.gender.clone()),
        opt(t.birth_year.map(|y| y.to_string())),
    ]
}

/// Render the records at `indices` (dataset positions) under a header row.
/// Columns are as wide as their widest cell; nothing is cut.
pub fn render_rows(ds: &Dataset, indices: &[usize]) -> String {
    let rows: Vec<[String; 9]> = indices
        .iter()
        .filter_map(|&i| ds.records().get(i).map(|t| cells(i, t)))
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (w, c) in widths.iter_mut().zip(row) {
            *w = (*w).max(c.chars().count());
        }
    }

    let line = |cols: &[String]| {
        cols.iter()
            .zip(widths)
            .enumerate()
            .map(|(i, (c, w))| {
                // index column left-aligned, everything else right-aligned
                if i == 0 {
                    format!("{c:<w$}")
                } else {
                    format!("{c:>w$}")
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = line(&HEADERS.map(String::from)[..]);
    for row in &rows {
        out.push('\n');
        out.push_str(&line(&row[..]));
    }
    out
}

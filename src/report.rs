//! Human-readable rendering of the four statistics reports.

use crate::dataset::Dataset;
use crate::format::{
    format_count, format_mean_duration, format_total_duration, title_case,
};
use crate::models::{month_abbrev, weekday_name};
use crate::stats::{self, UserStats};
use num_format::Locale;
use std::fmt::{self, Write};

/// Printed instead of any statistic when the filters match no trips.
pub const NO_DATA: &str = "No data available for the selected filters.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Report {
    Time,
    Station,
    Duration,
    User,
}

impl Report {
    pub const ALL: [Report; 4] = [Report::Time, Report::Station, Report::Duration, Report::User];

    pub fn heading(&self) -> &'static str {
        match self {
            Report::Time => "Displaying the stats on the most frequent travel times.",
            Report::Station => "Calculating the most popular stations and trip...",
            Report::Duration => "Calculating trip duration...",
            Report::User => "Calculating user stats...",
        }
    }

    /// Heading, a blank line, then the report body (or [`NO_DATA`]).
    pub fn render(&self, ds: &Dataset, locale: &Locale) -> String {
        let body = if ds.is_empty() {
            NO_DATA.to_string()
        } else {
            match self {
                Report::Time => render_time(ds),
                Report::Station => render_station(ds),
                Report::Duration => render_duration(ds),
                Report::User => render_user(ds, locale),
            }
        };
        format!("{}\n\n{}", self.heading(), body)
    }
}

fn render_time(ds: &Dataset) -> String {
    let Some(s) = stats::time_stats(ds) else {
        return NO_DATA.to_string();
    };
    let month = month_abbrev(s.month).map(title_case).unwrap_or_else(|| s.month.to_string());
    format!(
        "The month with the most trips is: {}.\n\
         The most common day of the week is: {}.\n\
         The most common start hour is: {}.",
        month,
        title_case(weekday_name(s.weekday)),
        s.hour
    )
}

fn render_station(ds: &Dataset) -> String {
    let Some(s) = stats::station_stats(ds) else {
        return NO_DATA.to_string();
    };
    format!(
        "The most common start station is: {}\n\
         The most common end station is: {}\n\
         The most common start-end combination is: {}",
        s.start_station, s.end_station, s.route
    )
}

fn render_duration(ds: &Dataset) -> String {
    let Some(s) = stats::duration_stats(ds) else {
        return NO_DATA.to_string();
    };
    format!(
        "The total travel time is: {}.\nThe mean travel time is: {}.",
        format_total_duration(s.total_seconds.max(0.0).floor() as u64),
        format_mean_duration(s.mean_seconds)
    )
}

fn render_user(ds: &Dataset, locale: &Locale) -> String {
    let Some(stats) = stats::user_stats(ds) else {
        return NO_DATA.to_string();
    };
    UserReport {
        stats: &stats,
        locale,
    }
    .to_string()
    .trim_end()
    .to_string()
}

/// Body of the user stats report.
struct UserReport<'a> {
    stats: &'a UserStats,
    locale: &'a Locale,
}

impl fmt::Display for UserReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = self.stats;
        writeln!(f, "User types:")?;
        write_table(f, &s.user_types, self.locale)?;

        writeln!(f)?;
        match &s.genders {
            Some(table) => {
                writeln!(f, "Gender distribution:")?;
                write_table(f, table, self.locale)?;
                missing_for_cities(f, "gender", &s.cities_without_gender)?;
            }
            None if s.cities_without_gender.is_empty() => {
                writeln!(f, "No gender data for the selected trips.")?;
            }
            None => missing_for_cities(f, "gender", &s.cities_without_gender)?,
        }

        writeln!(f)?;
        match &s.birth_years {
            Some(b) => {
                writeln!(f, "The oldest rider was born in: {}", b.earliest)?;
                writeln!(f, "The youngest rider was born in: {}", b.latest)?;
                writeln!(f, "The most common birth year amongst riders is: {}", b.most_common)?;
                missing_for_cities(f, "birth year", &s.cities_without_birth_year)?;
            }
            None if s.cities_without_birth_year.is_empty() => {
                writeln!(f, "No birth year data for the selected trips.")?;
            }
            None => missing_for_cities(f, "birth year", &s.cities_without_birth_year)?,
        }
        Ok(())
    }
}

fn missing_for_cities<W: fmt::Write>(out: &mut W, what: &str, cities: &[String]) -> fmt::Result {
    for city in cities {
        writeln!(out, "No {what} data for {}.", title_case(city))?;
    }
    Ok(())
}

fn write_table<W: fmt::Write>(out: &mut W, rows: &[(String, usize)], locale: &Locale) -> fmt::Result {
    let width = rows.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    for (k, c) in rows {
        writeln!(out, "  {:<width$}  {}", k, format_count(*c, locale))?;
    }
    Ok(())
}

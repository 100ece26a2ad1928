//! Gathering a [`FilterSelection`], interactively or from command-line lists.

use crate::config::Config;
use crate::error::SelectionError;
use crate::format::title_case;
use crate::models::FilterSelection;
use crate::prompt::{Answer, Prompter};
use log::debug;
use std::io::{self, BufRead, Write};

const CITY_PROMPT: &str = "Which city / cities would you like to analyse? \
Please use commas to list multiple.";
const MONTH_PROMPT: &str = "\nWhich months would you like to filter data from? \
Once again, please use commas to list multiple.";
const DAY_PROMPT: &str = "\nWhich days would you like to filter data from? \
Please use commas to list multiple days.";

/// Split a `,`/`;` separated list, dropping empty items.
pub fn parse_list(s: &str) -> Vec<String> {
    s.split([',', ';'])
        .map(|x| x.trim().to_lowercase())
        .filter(|x| !x.is_empty())
        .collect()
}

fn resolve_axis(
    axis: &'static str,
    list: &str,
    allowed: &[String],
) -> Result<Vec<String>, SelectionError> {
    let items = parse_list(list);
    if items.is_empty() {
        return Err(SelectionError::Empty { axis });
    }
    if items.iter().any(|i| i == "all") {
        return Ok(allowed.to_vec());
    }
    for i in &items {
        if !allowed.contains(i) {
            return Err(SelectionError::Unknown {
                axis,
                value: i.clone(),
            });
        }
    }
    Ok(items)
}

impl FilterSelection {
    /// Build a selection from separated lists; `all` picks every configured value.
    pub fn from_lists(
        config: &Config,
        cities: &str,
        months: &str,
        days: &str,
    ) -> Result<Self, SelectionError> {
        let city_names: Vec<String> = config.cities.iter().map(|c| c.name.clone()).collect();
        Ok(Self {
            cities: resolve_axis("city", cities, &city_names)?,
            months: resolve_axis("month", months, &config.months)?,
            days: resolve_axis("day", days, &config.weekdays)?,
        })
    }

    /// Multi-line, title-cased description used in the confirmation prompt.
    pub fn summary(&self) -> String {
        let join = |xs: &[String]| {
            xs.iter()
                .map(|x| title_case(x))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            " City/Cities: {}\n Month/Months: {}\n Day/Days: {}",
            join(&self.cities),
            join(&self.months),
            join(&self.days)
        )
    }
}

fn options<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| title_case(v.as_ref()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Ask for cities, months and days, then confirm. Declining starts over.
///
/// Returns `None` when the user escapes.
pub fn collect_filters<R: BufRead, W: Write>(
    config: &Config,
    prompter: &mut Prompter<R, W>,
) -> io::Result<Option<FilterSelection>> {
    let city_names = config.city_names();
    writeln!(prompter.output(), "Type end at any time if you would like to exit.\n")?;
    loop {
        let text = format!("{CITY_PROMPT}\n[{}]\n>", options(&city_names));
        let Answer::Value(cities) = prompter.ask(&text, &city_names, true)? else {
            return Ok(None);
        };
        let text = format!("{MONTH_PROMPT}\n[{}]\n>", options(&config.months));
        let Answer::Value(months) = prompter.ask(&text, &config.months, true)? else {
            return Ok(None);
        };
        let text = format!("{DAY_PROMPT}\n[{}]\n>", options(&config.weekdays));
        let Answer::Value(days) = prompter.ask(&text, &config.weekdays, true)? else {
            return Ok(None);
        };

        let selection = FilterSelection {
            cities,
            months,
            days,
        };
        let question = format!(
            "\nPlease confirm the filters you have chosen.\n\n{}",
            selection.summary()
        );
        match prompter.confirm(&question)? {
            Some(true) => {
                writeln!(prompter.output(), "{}", "-".repeat(40))?;
                debug!("confirmed filters {:?}", selection);
                return Ok(Some(selection));
            }
            Some(false) => writeln!(prompter.output(), "\nLet's try that again.\n")?,
            None => return Ok(None),
        }
    }
}

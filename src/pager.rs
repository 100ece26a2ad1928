//! Resumable, page-at-a-time display of raw trip rows.
//!
//! A fresh pass (cursor at 0) offers a one-time sort of the whole dataset
//! before paging. When rows were already shown, the user may pick up where
//! they stopped, in the same order, or start over.

use crate::dataset::Dataset;
use crate::models::TripRecord;
use crate::prompt::Prompter;
use crate::report::NO_DATA;
use crate::table::render_rows;
use log::{debug, info};
use std::cmp::Ordering;
use std::io::{self, BufRead, Write};

const RESUME_PROMPT: &str = "\nWould you like to continue from where you stopped last time?";
const SORT_PROMPT: &str = "\nHow would you like to sort the way the data is displayed? \
Hit Enter to view unsorted.\n\n \
[st] Start Time\n [et] End Time\n [td] Trip Duration\n [ss] Start Station\n [es] End Station\n\n>";
const DIRECTION_PROMPT: &str =
    "\nWould you like it to be sorted ascending or descending?\n [a] Ascending\n [d] Descending\n\n>";
const CONTINUE_PROMPT: &str = "Do you want to keep printing raw data?";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::StartTime,
        SortKey::EndTime,
        SortKey::TripDuration,
        SortKey::StartStation,
        SortKey::EndStation,
    ];

    /// Two-letter code typed at the sort prompt.
    pub fn code(&self) -> &'static str {
        match self {
            SortKey::StartTime => "st",
            SortKey::EndTime => "et",
            SortKey::TripDuration => "td",
            SortKey::StartStation => "ss",
            SortKey::EndStation => "es",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.code() == code)
    }

    fn compare(&self, a: &TripRecord, b: &TripRecord) -> Ordering {
        match self {
            SortKey::StartTime => a.start_time.cmp(&b.start_time),
            // missing end times sort first
            SortKey::EndTime => a.end_time.cmp(&b.end_time),
            SortKey::TripDuration => a.trip_duration.total_cmp(&b.trip_duration),
            SortKey::StartStation => a.start_station.cmp(&b.start_station),
            SortKey::EndStation => a.end_station.cmp(&b.end_station),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Dataset positions in display order. The sort is stable in both directions.
pub fn sorted_view(ds: &Dataset, sort: Option<(SortKey, SortOrder)>) -> Vec<usize> {
    let mut view: Vec<usize> = (0..ds.len()).collect();
    if let Some((key, order)) = sort {
        let trips = ds.records();
        view.sort_by(|&a, &b| {
            let o = key.compare(&trips[a], &trips[b]);
            match order {
                SortOrder::Ascending => o,
                SortOrder::Descending => o.reverse(),
            }
        });
    }
    view
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    AskResume,
    AskSort,
    AskDirection(SortKey),
    Paging,
}

/// Scroll cursor plus the display order it indexes into.
#[derive(Debug, Clone, Default)]
pub struct RawDataPager {
    cursor: usize,
    view: Vec<usize>,
}

impl RawDataPager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rows already revealed in the current dataset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Run one pager visit. Returns the new cursor, or `None` if the user escaped.
    pub fn show<R: BufRead, W: Write>(
        &mut self,
        ds: &Dataset,
        prompter: &mut Prompter<R, W>,
        page_size: usize,
    ) -> io::Result<Option<usize>> {
        writeln!(prompter.output(), "\nTime to view some raw data!")?;
        if ds.is_empty() {
            writeln!(prompter.output(), "{NO_DATA}")?;
            self.cursor = 0;
            return Ok(Some(0));
        }
        if self.view.len() != ds.len() {
            self.view = sorted_view(ds, None);
            self.cursor = 0;
        }

        let mut step = if self.cursor > 0 {
            Step::AskResume
        } else {
            Step::AskSort
        };
        loop {
            debug!("pager step {:?} at cursor {}", step, self.cursor);
            step = match step {
                Step::AskResume => match prompter.confirm(RESUME_PROMPT)? {
                    None => return Ok(None),
                    Some(true) => Step::Paging,
                    Some(false) => {
                        self.cursor = 0;
                        Step::AskSort
                    }
                },
                Step::AskSort => {
                    let mut codes: Vec<&str> = SortKey::ALL.iter().map(|k| k.code()).collect();
                    codes.push("");
                    match prompter.ask_one(SORT_PROMPT, &codes)? {
                        None => return Ok(None),
                        Some(code) => match SortKey::from_code(&code) {
                            Some(key) => Step::AskDirection(key),
                            None => {
                                self.view = sorted_view(ds, None);
                                Step::Paging
                            }
                        },
                    }
                }
                Step::AskDirection(key) => {
                    let order = match prompter.ask_one(DIRECTION_PROMPT, &["a", "d"])?.as_deref() {
                        None => return Ok(None),
                        Some("d") => SortOrder::Descending,
                        Some(_) => SortOrder::Ascending,
                    };
                    info!("sorting {} rows by {:?} {:?}", ds.len(), key, order);
                    self.view = sorted_view(ds, Some((key, order)));
                    Step::Paging
                }
                Step::Paging => return self.page(ds, prompter, page_size),
            };
        }
    }

    fn page<R: BufRead, W: Write>(
        &mut self,
        ds: &Dataset,
        prompter: &mut Prompter<R, W>,
        page_size: usize,
    ) -> io::Result<Option<usize>> {
        let page_size = page_size.max(1);
        loop {
            if self.cursor >= self.view.len() {
                writeln!(prompter.output(), "\nThere are no more rows to display.")?;
                return Ok(Some(self.cursor));
            }
            let end = (self.cursor + page_size).min(self.view.len());
            let text = render_rows(ds, &self.view[self.cursor..end]);
            writeln!(prompter.output(), "\n{text}\n")?;
            self.cursor = end;
            match prompter.confirm(CONTINUE_PROMPT)? {
                Some(true) => continue,
                Some(false) => return Ok(Some(self.cursor)),
                None => return Ok(None),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RawTrip;

    /// Twelve trips; station `S<i>` and duration `1000 - i` for row `i`.
    fn dataset() -> Dataset {
        let records = (0..12)
            .map(|i| {
                TripRecord::from_raw(
                    "chicago",
                    i + 1,
                    RawTrip {
                        start_time: format!("2017-01-02 {:02}:00:00", i),
                        end_time: None,
                        trip_duration: 1000.0 - i as f64,
                        start_station: format!("S{i:02}"),
                        end_station: "E".into(),
                        user_type: Some("Subscriber".into()),
                        gender: None,
                        birth_year: None,
                    },
                )
                .unwrap()
            })
            .collect();
        Dataset::new(records, vec![])
    }

    fn run(pager: &mut RawDataPager, ds: &Dataset, input: &str) -> (Option<usize>, String) {
        let mut p = Prompter::new(input.as_bytes(), Vec::new());
        let got = pager.show(ds, &mut p, 5).unwrap();
        (got, String::from_utf8(p.into_output()).unwrap())
    }

    #[test]
    fn pages_until_the_end() {
        let ds = dataset();
        let mut pager = RawDataPager::new();
        let (got, out) = run(&mut pager, &ds, "\ny\ny\nn\n");
        assert_eq!(got, Some(12));
        assert!(out.contains("S00") && out.contains("S04"));
        assert!(out.contains("S10") && out.contains("S11"));
        assert_eq!(out.matches(CONTINUE_PROMPT).count(), 3);
    }

    #[test]
    fn cursor_advances_a_page_per_visit() {
        let ds = dataset();
        let mut pager = RawDataPager::new();

        let (got, out) = run(&mut pager, &ds, "\nn\n");
        assert_eq!(got, Some(5));
        assert!(out.contains("S04") && !out.contains("S05"));

        let (got, out) = run(&mut pager, &ds, "y\nn\n");
        assert_eq!(got, Some(10));
        assert!(out.contains("S05") && out.contains("S09"));
        assert!(!out.contains("S04") && !out.contains("S10"));

        let (got, out) = run(&mut pager, &ds, "y\nn\n");
        assert_eq!(got, Some(12));
        assert!(out.contains("S10") && out.contains("S11"));
        assert!(!out.contains("S09"));

        let (got, out) = run(&mut pager, &ds, "y\n");
        assert_eq!(got, Some(12));
        assert!(out.contains("There are no more rows to display."));
        assert_eq!(pager.cursor(), 12);
    }

    #[test]
    fn stop_remembers_cursor_and_resume_continues() {
        let ds = dataset();
        let mut pager = RawDataPager::new();
        let (got, _) = run(&mut pager, &ds, "\ny\nn\n");
        assert_eq!(got, Some(10));
        assert_eq!(pager.cursor(), 10);

        let (got, out) = run(&mut pager, &ds, "y\nn\n");
        assert_eq!(got, Some(12));
        assert!(!out.contains("How would you like to sort"));
        assert!(out.contains("S10"));
        assert!(!out.contains("S00"));
    }

    #[test]
    fn declining_resume_starts_over_with_sort_prompt() {
        let ds = dataset();
        let mut pager = RawDataPager::new();
        run(&mut pager, &ds, "\ny\nn\n");
        let (got, out) = run(&mut pager, &ds, "n\n\nn\n");
        assert_eq!(got, Some(5));
        assert!(out.contains("How would you like to sort"));
        assert!(out.contains("S00"));
    }

    #[test]
    fn duration_sort_is_kept_on_resume() {
        let ds = dataset();
        let mut pager = RawDataPager::new();
        // ascending duration == reverse row order
        let (_, out) = run(&mut pager, &ds, "td\na\nn\n");
        assert!(out.contains("S11") && out.contains("S07"));
        assert!(!out.contains("S06"));
        let (_, out) = run(&mut pager, &ds, "y\nn\n");
        assert!(out.contains("S06") && out.contains("S02"));
    }

    #[test]
    fn stable_sort_keeps_ties_in_dataset_order() {
        let ds = dataset();
        let asc = sorted_view(&ds, Some((SortKey::EndStation, SortOrder::Ascending)));
        let desc = sorted_view(&ds, Some((SortKey::EndStation, SortOrder::Descending)));
        assert_eq!(asc, (0..12).collect::<Vec<_>>());
        assert_eq!(desc, asc);
    }

    #[test]
    fn empty_dataset_shows_notice() {
        let mut pager = RawDataPager::new();
        let (got, out) = run(&mut pager, &Dataset::default(), "");
        assert_eq!(got, Some(0));
        assert!(out.contains(NO_DATA));
    }

    #[test]
    fn escape_while_paging() {
        let ds = dataset();
        let mut pager = RawDataPager::new();
        assert_eq!(run(&mut pager, &ds, "st\nend\n").0, None);
    }
}

//! The interactive loop: collect filters, load, serve the menu, maybe restart.

use crate::config::Config;
use crate::dataset::{self, Dataset};
use crate::filters::collect_filters;
use crate::format::{format_count, map_locale};
use crate::models::FilterSelection;
use crate::pager::RawDataPager;
use crate::prompt::Prompter;
use crate::report::Report;
use crate::storage::TripSource;
use anyhow::Result;
use console::Term;
use log::{debug, warn};
use std::io::{BufRead, Write};
use std::time::Instant;

const MENU_PROMPT: &str = "\nPlease select the information you would like.\n\n \
[ts] Time Stats\n [ss] Station Stats\n [tds] Trip Duration Stats\n \
[us] User Stats\n [rd] Display Raw Data\n [r] Restart\n\n>";
const MENU_KEYS: [&str; 6] = ["ts", "ss", "tds", "us", "rd", "r"];

fn separator() -> String {
    "-".repeat(40)
}

/// One selectable menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Report(Report),
    RawData,
    Restart,
}

impl MenuChoice {
    pub fn from_key(key: &str) -> Option<Self> {
        Some(match key {
            "ts" => MenuChoice::Report(Report::Time),
            "ss" => MenuChoice::Report(Report::Station),
            "tds" => MenuChoice::Report(Report::Duration),
            "us" => MenuChoice::Report(Report::User),
            "rd" => MenuChoice::RawData,
            "r" => MenuChoice::Restart,
            _ => return None,
        })
    }
}

struct Loaded {
    selection: FilterSelection,
    dataset: Dataset,
    pager: RawDataPager,
}

enum State {
    CollectingFilters,
    Loaded(Box<Loaded>),
    Restart,
    Terminated,
}

/// Drives one interactive run over `prompter`.
pub struct Session<'a, S: ?Sized, R, W> {
    config: &'a Config,
    source: &'a S,
    prompter: Prompter<R, W>,
}

impl<'a, S, R, W> Session<'a, S, R, W>
where
    S: TripSource + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(config: &'a Config, source: &'a S, prompter: Prompter<R, W>) -> Self {
        Self {
            config,
            source,
            prompter,
        }
    }

    /// Give back the writer, e.g. to inspect captured output.
    pub fn into_output(self) -> W {
        self.prompter.into_output()
    }

    /// Run until the user declines to restart or escapes.
    pub fn run(&mut self) -> Result<()> {
        let mut state = State::CollectingFilters;
        loop {
            state = match state {
                State::CollectingFilters => self.collect_and_load()?,
                State::Loaded(loaded) => self.menu(loaded)?,
                State::Restart => match self.prompter.confirm("\nWould you like to restart?")? {
                    Some(true) => State::CollectingFilters,
                    _ => State::Terminated,
                },
                State::Terminated => {
                    debug!("session terminated");
                    return Ok(());
                }
            };
        }
    }

    /// Clears the controlling terminal, never the prompter's writer.
    fn clear(&mut self) -> Result<()> {
        if self.config.clear_screen {
            self.prompter.output().flush()?;
            Term::stdout().clear_screen()?;
        }
        Ok(())
    }

    fn collect_and_load(&mut self) -> Result<State> {
        self.clear()?;
        let Some(selection) = collect_filters(self.config, &mut self.prompter)? else {
            return Ok(State::Terminated);
        };

        writeln!(self.prompter.output(), "\nLoading data...")?;
        let started = Instant::now();
        match dataset::load(self.source, &selection) {
            Ok(dataset) => {
                let out = self.prompter.output();
                writeln!(
                    out,
                    "{} trips match your filters.",
                    format_count(dataset.len(), map_locale(&self.config.locale))
                )?;
                writeln!(out, "\nThis took {:.6} seconds.", started.elapsed().as_secs_f64())?;
                writeln!(out, "{}", separator())?;
                Ok(State::Loaded(Box::new(Loaded {
                    selection,
                    dataset,
                    pager: RawDataPager::new(),
                })))
            }
            Err(e) => {
                warn!("load failed for {:?}: {e}", selection.cities);
                writeln!(self.prompter.output(), "Could not load data: {e}\n")?;
                Ok(State::CollectingFilters)
            }
        }
    }

    fn menu(&mut self, mut loaded: Box<Loaded>) -> Result<State> {
        let Some(key) = self.prompter.ask_one(MENU_PROMPT, &MENU_KEYS)? else {
            return Ok(State::Terminated);
        };
        self.clear()?;
        let Some(choice) = MenuChoice::from_key(&key) else {
            return Ok(State::Loaded(loaded));
        };
        debug!("menu choice {:?} for {:?}", choice, loaded.selection);

        match choice {
            MenuChoice::Report(report) => {
                let started = Instant::now();
                let text = report.render(&loaded.dataset, map_locale(&self.config.locale));
                let out = self.prompter.output();
                writeln!(out, "\n{text}")?;
                writeln!(out, "\nThis took {:.6} seconds.", started.elapsed().as_secs_f64())?;
                writeln!(out, "{}", separator())?;
            }
            MenuChoice::RawData => {
                let Loaded { dataset, pager, .. } = &mut *loaded;
                if pager
                    .show(dataset, &mut self.prompter, self.config.page_size)?
                    .is_none()
                {
                    return Ok(State::Terminated);
                }
            }
            MenuChoice::Restart => return Ok(State::Restart),
        }
        Ok(State::Loaded(loaded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::InMemorySource;

    const CHICAGO: &str = "\
Start Time,End Time,Trip Duration,Start Station,End Station,User Type,Gender,Birth Year
2017-01-02 08:05:00,2017-01-02 08:20:00,900,A,B,Subscriber,Male,1985
2017-01-09 08:30:00,2017-01-09 08:40:00,600,A,C,Customer,Female,1990
";

    fn run(source: &InMemorySource, input: &str) -> String {
        let cfg = Config::default();
        let prompter = Prompter::new(input.as_bytes(), Vec::new());
        let mut session = Session::new(&cfg, source, prompter);
        session.run().unwrap();
        String::from_utf8(session.into_output()).unwrap()
    }

    #[test]
    fn menu_keys_map_to_choices() {
        for key in MENU_KEYS {
            assert!(MenuChoice::from_key(key).is_some());
        }
        assert_eq!(MenuChoice::from_key("x"), None);
    }

    #[test]
    fn report_then_restart_declined() {
        let src = InMemorySource::new().with_city("chicago", CHICAGO);
        let out = run(&src, "chicago\njan\nmonday\ny\ntds\nr\nn\n");
        assert!(out.contains("2 trips match your filters."));
        assert!(out.contains("The total travel time is: 0d 0h 25m 0s."));
        assert!(out.contains("The mean travel time is: 12m 30s."));
        assert!(out.contains("Would you like to restart?"));
    }

    #[test]
    fn load_error_returns_to_filters() {
        let src = InMemorySource::new()
            .with_city("chicago", "Start Time,Trip Duration,Start Station,End Station,User Type\nnot a date,1,A,B,C\n");
        let out = run(&src, "chicago\njan\nmonday\ny\nend\n");
        assert!(out.contains("Could not load data:"));
        assert!(out.contains("Start Time"));
        assert_eq!(out.matches("Which city / cities").count(), 2);
    }

    #[test]
    fn restart_collects_fresh_filters() {
        let src = InMemorySource::new().with_city("chicago", CHICAGO);
        let out = run(&src, "chicago\njan\nmonday\ny\nr\ny\nchicago\nfeb\nmonday\ny\nts\nend\n");
        assert!(out.contains("0 trips match your filters."));
        assert!(out.contains(crate::report::NO_DATA));
    }

    #[test]
    fn clearing_never_writes_escapes_into_the_transcript() {
        let src = InMemorySource::new().with_city("chicago", CHICAGO);
        assert!(!Config::default().clear_screen);
        assert!(!run(&src, "end\n").contains('\x1b'));

        let cfg = Config {
            clear_screen: true,
            ..Config::default()
        };
        let input = "chicago\njan\nmonday\ny\nts\nend\n";
        let mut session = Session::new(&cfg, &src, Prompter::new(input.as_bytes(), Vec::new()));
        session.run().unwrap();
        let out = String::from_utf8(session.into_output()).unwrap();
        assert!(out.contains("The most common start hour is: 8."));
        assert!(!out.contains('\x1b'));
    }
}

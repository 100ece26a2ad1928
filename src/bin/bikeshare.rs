use anyhow::{Context, Result};
use bikeshare_rs::format::map_locale;
use bikeshare_rs::pager::{SortKey, SortOrder, sorted_view};
use bikeshare_rs::report::NO_DATA;
use bikeshare_rs::{Config, CsvSource, FilterSelection, Prompter, Report, Session};
use bikeshare_rs::{dataset, table};
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::io::{self, IsTerminal};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "bikeshare",
    version,
    about = "Explore bike-share trips: filter by city, month & weekday, then browse stats and raw rows"
)]
struct Cli {
    /// Directory holding the city CSV files (default: current directory).
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
    /// JSON config overriding cities, months, weekdays or page size.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Locale for counts (e.g., en or de).
    #[arg(long, global = true)]
    locale: Option<String>,
    #[command(subcommand)]
    cmd: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive session (default). Type `end` at any prompt to quit.
    Explore(ExploreArgs),
    /// Print statistics reports for a filter selection.
    Stats(StatsArgs),
    /// Print the first raw rows for a filter selection.
    Head(HeadArgs),
}

#[derive(Args, Debug, Default)]
struct ExploreArgs {
    /// Never clear the terminal between menus.
    #[arg(long, default_value_t = false)]
    no_clear: bool,
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Cities separated by comma or semicolon, or `all` (e.g., "chicago,washington")
    #[arg(short, long)]
    cities: String,
    /// Month abbreviations separated by comma or semicolon, or `all` (e.g., jan,feb)
    #[arg(short, long)]
    months: String,
    /// Weekday names separated by comma or semicolon, or `all` (e.g., monday)
    #[arg(short, long)]
    days: String,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ReportKind {
    Time,
    Station,
    Duration,
    User,
    All,
}

#[derive(Args, Debug)]
struct StatsArgs {
    #[command(flatten)]
    filters: FilterArgs,
    /// Reports to print; repeatable. Defaults to all four.
    #[arg(long, value_enum)]
    report: Vec<ReportKind>,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SortArg {
    StartTime,
    EndTime,
    TripDuration,
    StartStation,
    EndStation,
}

impl From<SortArg> for SortKey {
    fn from(s: SortArg) -> Self {
        match s {
            SortArg::StartTime => SortKey::StartTime,
            SortArg::EndTime => SortKey::EndTime,
            SortArg::TripDuration => SortKey::TripDuration,
            SortArg::StartStation => SortKey::StartStation,
            SortArg::EndStation => SortKey::EndStation,
        }
    }
}

#[derive(Args, Debug)]
struct HeadArgs {
    #[command(flatten)]
    filters: FilterArgs,
    /// Number of rows to print.
    #[arg(short = 'n', long, default_value_t = 5)]
    rows: usize,
    /// Sort before printing.
    #[arg(long, value_enum)]
    sort: Option<SortArg>,
    /// Sort descending instead of ascending.
    #[arg(long, default_value_t = false)]
    descending: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = build_config(&cli)?;
    match cli.cmd {
        None => cmd_explore(config, ExploreArgs::default()),
        Some(Command::Explore(args)) => cmd_explore(config, args),
        Some(Command::Stats(args)) => cmd_stats(&config, args),
        Some(Command::Head(args)) => cmd_head(&config, args),
    }
}

fn build_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)?,
        None => Config::default(),
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(locale) = &cli.locale {
        config.locale = locale.clone();
    }
    config.validate().context("invalid configuration")?;
    Ok(config)
}

fn load(config: &Config, filters: &FilterArgs) -> Result<dataset::Dataset> {
    let selection =
        FilterSelection::from_lists(config, &filters.cities, &filters.months, &filters.days)?;
    let source = CsvSource::from_config(config);
    dataset::load(&source, &selection).context("load trip data")
}

fn cmd_explore(mut config: Config, args: ExploreArgs) -> Result<()> {
    config.clear_screen = !args.no_clear && io::stdout().is_terminal();
    let source = CsvSource::from_config(&config);
    let prompter = Prompter::new(io::stdin().lock(), io::stdout().lock());
    Session::new(&config, &source, prompter).run()
}

fn cmd_stats(config: &Config, args: StatsArgs) -> Result<()> {
    let data = load(config, &args.filters)?;
    let reports: Vec<Report> = if args.report.is_empty() || args.report.contains(&ReportKind::All) {
        Report::ALL.to_vec()
    } else {
        args.report
            .iter()
            .filter_map(|k| match k {
                ReportKind::Time => Some(Report::Time),
                ReportKind::Station => Some(Report::Station),
                ReportKind::Duration => Some(Report::Duration),
                ReportKind::User => Some(Report::User),
                ReportKind::All => None,
            })
            .collect()
    };
    let locale = map_locale(&config.locale);
    for r in reports {
        println!("{}\n{}", r.render(&data, locale), "-".repeat(40));
    }
    Ok(())
}

fn cmd_head(config: &Config, args: HeadArgs) -> Result<()> {
    let data = load(config, &args.filters)?;
    if data.is_empty() {
        println!("{NO_DATA}");
        return Ok(());
    }
    let order = if args.descending {
        SortOrder::Descending
    } else {
        SortOrder::Ascending
    };
    let view = sorted_view(&data, args.sort.map(|s| (SortKey::from(s), order)));
    let n = args.rows.min(view.len());
    println!("{}", table::render_rows(&data, &view[..n]));
    Ok(())
}

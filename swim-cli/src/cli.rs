use std::path::PathBuf;
use std::process;

use chrono::{Datelike, Duration, NaiveDate};
use getopts::Options;
use swim_parser::matchers::MarkerPolicy;
use swim_parser::Config;

pub struct Args {
    /// Extracted document; stdin when absent.
    pub input: Option<PathBuf>,
    pub json: bool,
    pub grouped: bool,
    pub registry: Option<PathBuf>,
    pub config: Config,
    pub buffer: Duration,
    pub name: String,
}

fn opts() -> Options {
    let mut opts = Options::new();
    opts.optflag(
        "h",
        "help",
        concat!("Print the help output of ", env!("CARGO_PKG_NAME")),
    );
    opts.optflag(
        "j",
        "json",
        "Print events as JSON instead of iCalendar",
    );
    opts.optflag(
        "g",
        "grouped",
        "Input is a schedule grouped by date and child instead of extracted PDF content",
    );
    opts.optopt(
        "r",
        "registry",
        "Team and location registry as JSON [Default: built-in, or $SWIM_REGISTRY]",
        "FILE",
    );
    opts.optopt(
        "m",
        "month",
        "Month assumed when a table names none [Default: 2026-02]",
        "YYYY-MM",
    );
    opts.optflag(
        "s",
        "strict-markers",
        "Require AM/PM on both ends of a time range",
    );
    opts.optopt(
        "b",
        "buffer",
        "Minutes added before and after each practice in iCalendar output [Default: 0]",
        "MINUTES",
    );
    opts.optopt(
        "n",
        "name",
        "Calendar name [Default: Swim Practice]",
        "NAME",
    );
    opts
}

fn usage(opts: &Options) -> String {
    opts.usage(&opts.short_usage("swim-schedule"))
}

pub fn parse(args: Vec<String>) -> Args {
    let opts = opts();

    match try_parse(&opts, args) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{}", usage(&opts));
            process::exit(0);
        }
        Err(err) => {
            eprintln!("{err}");
            process::exit(1);
        }
    }
}

/// `Ok(None)` when help was requested.
fn try_parse(opts: &Options, args: Vec<String>) -> Result<Option<Args>, String> {
    let matches = opts.parse(args).map_err(|fail| fail.to_string())?;

    if matches.opt_present("help") {
        return Ok(None);
    }

    let mut config = Config::default();

    if let Some(month) = matches.opt_str("month") {
        let first = NaiveDate::parse_from_str(&format!("{month}-01"), "%Y-%m-%d")
            .map_err(|err| format!("Provided value for option 'month' is invalid: {err}"))?;
        config.fallback_year = first.year();
        config.fallback_month = first.month();
    }

    if matches.opt_present("strict-markers") {
        config.markers = MarkerPolicy::Both;
    }

    let buffer = matches
        .opt_get_default("buffer", 0i64)
        .map_err(|err| format!("Provided value for option 'buffer' is invalid: {err}"))?;
    let buffer = Duration::try_minutes(buffer)
        .ok_or_else(|| "Provided value for option 'buffer' is out of range".to_string())?;

    if matches.free.len() > 1 {
        return Err(format!("Expected at most one input file\n\n{}", usage(opts)));
    }

    Ok(Some(Args {
        input: matches.free.first().map(PathBuf::from),
        json: matches.opt_present("json"),
        grouped: matches.opt_present("grouped"),
        registry: matches.opt_str("registry").map(PathBuf::from),
        config,
        buffer,
        name: matches
            .opt_str("name")
            .unwrap_or_else(|| "Swim Practice".to_string()),
    }))
}

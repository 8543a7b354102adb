use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::matchers::{MarkerPolicy, Strategies};
use crate::{normalize, order, Error, Event, Registry};

pub type Cell = Option<String>;
pub type Row = Vec<Cell>;
pub type Table = Vec<Row>;

type DateMap = BTreeMap<usize, NaiveDate>;

const DAY_NAMES: [&str; 7] = [
    "monday",
    "tuesday",
    "wednesday",
    "thursday",
    "friday",
    "saturday",
    "sunday",
];

/// Raw page content handed over by the PDF extraction step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub tables: Vec<Table>,
    /// One entry per page.
    #[serde(default)]
    pub text: Vec<String>,
}

impl Document {
    fn has_tables(&self) -> bool {
        self.tables.iter().any(|table| !table.is_empty())
    }

    fn has_text(&self) -> bool {
        self.text.iter().any(|page| !page.trim().is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Used when a table caption names no month.
    pub fallback_year: i32,
    pub fallback_month: u32,
    pub markers: MarkerPolicy,
    /// Day-number cells needed before a row counts as a date row. Rows with
    /// fewer cells than this need every cell.
    pub min_date_cells: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            fallback_year: 2026,
            fallback_month: 2,
            markers: MarkerPolicy::Shared,
            min_date_cells: 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Month {
    year: i32,
    month: u32,
}

impl Month {
    fn days(self) -> u32 {
        let (year, month) = if self.month == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };

        NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.pred_opt())
            .map_or(0, |last| last.day())
    }

    fn date(self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }
}

/// Where the table's month begins and ends across its date rows.
///
/// A drop in day numbers marks a month boundary. Before the first boundary
/// of the first date row the days belong to the previous month, and so does
/// the whole first row when the next date row starts lower. After a boundary
/// in any later row, everything belongs to the next month.
#[derive(Debug, Default)]
struct MonthSpan {
    started: bool,
    ended: bool,
    last: Option<u32>,
}

impl MonthSpan {
    fn keep<'a>(
        &mut self,
        days: &'a [(usize, u32)],
        next_first: Option<u32>,
    ) -> &'a [(usize, u32)] {
        let first = !std::mem::replace(&mut self.started, true);
        if self.ended {
            return &[];
        }

        let wrap = days
            .windows(2)
            .position(|pair| pair[1].1 < pair[0].1)
            .map(|idx| idx + 1);
        let start = days.first().map(|&(_, day)| day);
        let restarts = |before: Option<u32>, after: Option<u32>| {
            before.zip(after).is_some_and(|(before, after)| after < before)
        };

        let kept: &[(usize, u32)] = if first {
            match wrap {
                Some(at) => &days[at..],
                None if restarts(start, next_first) => &[],
                None => days,
            }
        } else if restarts(self.last, start) {
            self.ended = true;
            &[]
        } else if let Some(at) = wrap {
            self.ended = true;
            &days[..at]
        } else {
            days
        };

        if let Some(&(_, day)) = kept.last() {
            self.last = Some(day);
        }

        kept
    }
}

/// The schedule extraction engine.
///
/// Holds only read-only configuration, so one instance can serve any number
/// of documents, including concurrently.
#[derive(Clone)]
pub struct Extractor {
    registry: Registry,
    config: Config,
    strategies: Strategies,
}

impl Extractor {
    pub fn new(registry: Registry, config: Config) -> Self {
        Extractor {
            registry,
            config,
            strategies: Strategies::default(),
        }
    }

    pub fn with_strategies(mut self, strategies: Strategies) -> Self {
        self.strategies = strategies;
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn strategies(&self) -> &Strategies {
        &self.strategies
    }

    /// Extracts the ordered practice list from one document.
    ///
    /// Tables are tried first; page text is only parsed when the tables
    /// yield nothing. A document with neither is an upstream failure.
    pub fn extract(&self, document: &Document) -> Result<Vec<Event>, Error> {
        if !document.has_tables() && !document.has_text() {
            return Err(Error::NoContent);
        }

        let mut events = self.parse_tables(&document.tables);

        if events.is_empty() && document.has_text() {
            debug!("tables yielded no practices, falling back to page text");
            events = self.parse_text(&document.text.join("\n"));
        }

        Ok(order::finalize(events))
    }

    pub fn parse_tables(&self, tables: &[Table]) -> Vec<Event> {
        tables
            .iter()
            .enumerate()
            .flat_map(|(idx, table)| {
                let events = self.parse_table(table);
                trace!(table = idx, events = events.len(), "parsed table");
                events
            })
            .collect()
    }

    /// Walks one calendar grid. Unrecognizable tables yield nothing.
    pub fn parse_table(&self, table: &Table) -> Vec<Event> {
        if table.len() < 3 {
            debug!(rows = table.len(), "table too small, skipping");
            return Vec::new();
        }

        let Some(header) = table.iter().position(is_header_row) else {
            debug!(rows = table.len(), "no day-name header, skipping table");
            return Vec::new();
        };

        let month = table[..=header]
            .iter()
            .flatten()
            .flatten()
            .find_map(|cell| month_year(cell))
            .unwrap_or(Month {
                year: self.config.fallback_year,
                month: self.config.fallback_month,
            });

        let rows = &table[header + 1..];
        let day_rows: Vec<Option<Vec<(usize, u32)>>> =
            rows.iter().map(|row| self.day_cells(row, month)).collect();

        let mut events = Vec::new();
        let mut span = MonthSpan::default();
        let mut active: Option<DateMap> = None;

        for (idx, row) in rows.iter().enumerate() {
            let next_first = day_rows[idx + 1..]
                .iter()
                .flatten()
                .next()
                .and_then(|days| days.first())
                .map(|&(_, day)| day);

            let own: Option<DateMap> = day_rows[idx].as_ref().map(|days| {
                span.keep(days, next_first)
                    .iter()
                    .filter_map(|&(col, day)| Some((col, month.date(day)?)))
                    .collect()
            });

            for (col, cell) in row.iter().enumerate() {
                let Some(text) = cell else {
                    continue;
                };

                let own_date = own.as_ref().and_then(|dates| dates.get(&col));

                // A day number that fell outside the month leaves its cell
                // without a date.
                let date = if own.is_some() && leads_with_day(text) {
                    own_date
                } else {
                    own_date.or_else(|| active.as_ref().and_then(|dates| dates.get(&col)))
                }
                .copied();

                for line in text.lines() {
                    let line = normalize::normalize(line);
                    if line.is_empty() || normalize::is_day_number(&line) {
                        continue;
                    }

                    let Some(practice) = self.parse_line(&line) else {
                        continue;
                    };

                    let Some(date) = date else {
                        debug!(column = col, line, "practice in a column without a date");
                        continue;
                    };

                    events.push(practice.into_event(date));
                }
            }

            if own.is_some() {
                active = own;
            }
        }

        events
    }

    /// Columns and day numbers of a date row, or `None` for any other row.
    /// Numbers past the end of the month are left out.
    fn day_cells(&self, row: &Row, month: Month) -> Option<Vec<(usize, u32)>> {
        let last_day = month.days();

        let days: Vec<(usize, u32)> = row
            .iter()
            .enumerate()
            .filter_map(|(col, cell)| {
                let first_line = cell.as_deref()?.lines().next()?;
                let day = normalize::day_number(first_line)?;
                (1..=last_day).contains(&day).then_some((col, day))
            })
            .collect();

        let needed = self.config.min_date_cells.min(row.len()).max(1);
        (days.len() >= needed).then_some(days)
    }

    /// Legacy path for PDFs without usable tables.
    ///
    /// A line carrying a date sets the current date, and every line is also
    /// offered to the line parser. Practices before the first date are
    /// dropped.
    pub fn parse_text(&self, text: &str) -> Vec<Event> {
        let mut context = Month {
            year: self.config.fallback_year,
            month: self.config.fallback_month,
        };
        let mut current: Option<NaiveDate> = None;
        let mut events = Vec::new();

        for line in text.lines() {
            let line = normalize::normalize(line);
            if line.is_empty() {
                continue;
            }

            if let Some(month) = month_year(&line) {
                context = month;
            }

            let practice = self.parse_line(&line);

            // On a practice line, "Jun 2" or "Junior 2" is the team.
            let is_team = |tail: &str| practice.is_some() && self.starts_with_team(tail);
            if let Some(date) = line_date(&line, context.year, is_team) {
                trace!(%date, "text date");
                current = Some(date);
            }

            let Some(practice) = practice else {
                continue;
            };

            match current {
                Some(date) => events.push(practice.into_event(date)),
                None => debug!(line, "practice before any date"),
            }
        }

        events
    }

    fn starts_with_team(&self, text: &str) -> bool {
        let compact = normalize::compact(text).to_ascii_uppercase();
        self.registry
            .teams()
            .iter()
            .any(|team| compact.starts_with(&team.spelling))
    }
}

fn is_header_row(row: &Row) -> bool {
    row.iter().flatten().any(|cell| {
        let compact = normalize::compact(cell).to_ascii_lowercase();
        DAY_NAMES.iter().any(|day| compact.contains(day))
    })
}

fn leads_with_day(text: &str) -> bool {
    text.lines().next().and_then(normalize::day_number).is_some()
}

fn month_number(name: &str) -> Option<u32> {
    let prefix = name.get(..3)?.to_ascii_uppercase();
    let month = match prefix.as_str() {
        "JAN" => 1,
        "FEB" => 2,
        "MAR" => 3,
        "APR" => 4,
        "MAY" => 5,
        "JUN" => 6,
        "JUL" => 7,
        "AUG" => 8,
        "SEP" => 9,
        "OCT" => 10,
        "NOV" => 11,
        "DEC" => 12,
        _ => return None,
    };
    Some(month)
}

/// Textual month followed by a 4-digit year, e.g. a caption like
/// `"February 2026 Practice Schedule"`.
fn month_year(text: &str) -> Option<Month> {
    let pattern = regex!(
        r"(JAN(?:UARY)?|FEB(?:RUARY)?|MAR(?:CH)?|APR(?:IL)?|MAY|JUNE?|JULY?|AUG(?:UST)?|SEP(?:T(?:EMBER)?)?|OCT(?:OBER)?|NOV(?:EMBER)?|DEC(?:EMBER)?)[^A-Z0-9]{0,2}(20\d{2})"
    );

    let compact = normalize::compact(text).to_ascii_uppercase();
    let caps = pattern.captures(&compact)?;

    Some(Month {
        year: caps[2].parse().ok()?,
        month: month_number(&caps[1])?,
    })
}

/// A calendar date on a free-text line.
///
/// Textual candidates are skipped when `is_team` accepts the rest of the
/// line from where the candidate starts.
fn line_date(
    line: &str,
    default_year: i32,
    is_team: impl Fn(&str) -> bool,
) -> Option<NaiveDate> {
    let numeric = regex!(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2}|\d{4})\b");
    let textual = regex!(
        r"(?i)\b(jan|feb|mar|apr|may|jun|jul|aug|sep|oct|nov|dec)[a-z]*\.?\s+(\d{1,2})(?:st|nd|rd|th)?\b(?:,?\s*(\d{4})\b)?"
    );

    if let Some(caps) = numeric.captures(line) {
        let month = caps[1].parse().ok()?;
        let day = caps[2].parse().ok()?;
        let mut year: i32 = caps[3].parse().ok()?;
        if year < 100 {
            year += 2000;
        }
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    let caps = textual
        .captures_iter(line)
        .find(|caps| !is_team(&line[caps.get(0).map_or(0, |m| m.start())..]))?;
    let month = month_number(&caps[1])?;
    let day = caps[2].parse().ok()?;
    let year = match caps.get(3) {
        Some(year) => year.as_str().parse().ok()?,
        None => default_year,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

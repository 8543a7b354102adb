use std::{fmt, ops::Not};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::matchers::{self, MarkerPolicy, TimeRange};
use crate::normalize;

const DATE_DISPLAY: &str = "%b %-d, %Y";
const DATE_PARSE: &str = "%b %d, %Y";

/// A tracked swimmer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Child {
    Nastya,
    Liza,
    Sonya,
}

impl Child {
    pub const ALL: [Child; 3] = [Child::Nastya, Child::Liza, Child::Sonya];

    pub fn name(self) -> &'static str {
        match self {
            Child::Nastya => "Nastya",
            Child::Liza => "Liza",
            Child::Sonya => "Sonya",
        }
    }

    /// Case-insensitive lookup by display name.
    pub fn from_name(name: &str) -> Option<Child> {
        let name = name.trim();
        Child::ALL
            .into_iter()
            .find(|child| child.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Child {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub code: String,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub child: Child,
    pub team: String,
    /// `"{MonthAbbrev} {day}, {year}"` once resolved.
    pub date: String,
    /// `"6:00 PM - 7:30 PM"` once resolved.
    pub time: String,
    pub location: Location,
    pub title: String,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub double_session: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Schedule {
    pub name: String,
    pub events: Vec<Event>,
}

impl Event {
    pub fn new(
        child: Child,
        team: String,
        date: String,
        time: String,
        location: Location,
        double_session: bool,
    ) -> Self {
        let mut title = format!("{child} @ {} {time}", location.code);
        if double_session {
            title.push_str(" (double)");
        }

        Event {
            child,
            team,
            date,
            time,
            location,
            title,
            double_session,
        }
    }

    pub fn resolved(
        child: Child,
        team: String,
        date: NaiveDate,
        time: TimeRange,
        location: Location,
    ) -> Self {
        Event::new(
            child,
            team,
            format_date(date),
            time.to_string(),
            location,
            false,
        )
    }

    pub fn day(&self) -> Option<NaiveDate> {
        parse_date(&self.date)
    }

    pub fn time_range(&self) -> Option<TimeRange> {
        let compact = normalize::compact(&self.time).to_ascii_uppercase();
        matchers::time(&compact, MarkerPolicy::Shared)
    }

    /// Wall-clock start and end of the practice. A range that ends before it
    /// starts is taken to cross midnight.
    pub fn start_end(&self) -> Option<(NaiveDateTime, NaiveDateTime)> {
        let day = self.day()?;
        let range = self.time_range()?;

        let start = day.and_time(range.start);
        let mut end = day.and_time(range.end);
        if end < start {
            end += Duration::try_days(1)?;
        }

        Some((start, end))
    }
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_DISPLAY).to_string()
}

pub fn parse_date(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), DATE_PARSE).ok()
}

//! Independent recognizers for team, time range and location.
//!
//! Each matcher takes compacted, upper-cased text and answers with a match
//! or `None`. They are bundled in [`Strategies`] so a heuristic can be
//! replaced without touching the table walker.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::{Child, Location, Registry};

pub type TeamFn = fn(&Registry, &str) -> Option<TeamMatch>;
pub type TimeFn = fn(&str, MarkerPolicy) -> Option<TimeRange>;
pub type LocationFn = for<'r, 's> fn(&'r Registry, &'s str) -> Option<&'r Location>;

#[derive(Clone, Copy)]
pub struct Strategies {
    pub team: TeamFn,
    pub time: TimeFn,
    pub location: LocationFn,
}

impl Default for Strategies {
    fn default() -> Self {
        Strategies {
            team,
            time,
            location,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamMatch {
    pub child: Child,
    /// Canonical team code of the child.
    pub team: String,
    /// Byte offset just past the matched spelling.
    pub end: usize,
}

/// How many AM/PM markers a time range must carry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    /// One marker is enough and is shared by the other end.
    #[default]
    Shared,
    /// Both ends must be marked.
    Both,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: NaiveTime,
    pub end: NaiveTime,
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {}",
            self.start.format("%-I:%M %p"),
            self.end.format("%-I:%M %p")
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

impl Meridiem {
    fn parse(marker: &str) -> Option<Meridiem> {
        match marker {
            "A" => Some(Meridiem::Am),
            "P" => Some(Meridiem::Pm),
            _ => None,
        }
    }

    fn flip(self) -> Meridiem {
        match self {
            Meridiem::Am => Meridiem::Pm,
            Meridiem::Pm => Meridiem::Am,
        }
    }
}

/// First registered spelling found in `text`, longest spellings first.
///
/// When the trailing letters of a spelling are really the start of a
/// location code (`"JUN1RCC"` is JUN1 at RCC, not JUN1 R), that occurrence
/// is skipped. This separates the Red and Black variants, which differ only
/// in their last letter.
pub fn team(registry: &Registry, text: &str) -> Option<TeamMatch> {
    let haystack = text.to_ascii_uppercase();

    for spelling in registry.teams() {
        let occurrence = haystack
            .match_indices(spelling.spelling.as_str())
            .map(|(start, found)| (start, start + found.len()))
            .find(|&(start, end)| !tail_starts_location(registry, &haystack, start, end));

        let Some((_, end)) = occurrence else {
            continue;
        };

        let Some(team) = registry.team_code(spelling.child) else {
            continue;
        };

        return Some(TeamMatch {
            child: spelling.child,
            team: team.to_string(),
            end,
        });
    }

    None
}

fn tail_starts_location(registry: &Registry, haystack: &str, start: usize, end: usize) -> bool {
    (start + 1..end).any(|at| {
        haystack.is_char_boundary(at)
            && registry.locations().iter().any(|location| {
                at + location.code.len() > end && haystack[at..].starts_with(&location.code)
            })
    })
}

/// First plausible `H[:MM][AM/PM]-H[:MM][AM/PM]` range in `text`.
///
/// Hours outside 1-12 and minutes past 59 disqualify a candidate, which
/// keeps digits embedded in other tokens from being read as times. With a
/// single marker the unmarked end takes the same marker unless that would
/// put it after the marked end, in which case it takes the other one
/// (`11-12:30PM` starts at 11 AM).
pub fn time(text: &str, policy: MarkerPolicy) -> Option<TimeRange> {
    let pattern = regex!(
        r"(?i)(\d{1,2})(?::(\d{2}))?(?:([AP])\.?(?:M\.?)?)?(?:-+|TO)(\d{1,2})(?::(\d{2}))?(?:([AP])\.?(?:M\.?)?)?"
    );

    for caps in pattern.captures_iter(text) {
        let number = |idx: usize| -> Option<u32> {
            caps.get(idx).map_or(Some(0), |m| m.as_str().parse().ok())
        };
        let marker = |idx: usize| {
            caps.get(idx)
                .and_then(|m| Meridiem::parse(&m.as_str().to_ascii_uppercase()))
        };

        let (Some(start_hour), Some(start_minute), Some(end_hour), Some(end_minute)) =
            (number(1), number(2), number(4), number(5))
        else {
            continue;
        };

        if !(1..=12).contains(&start_hour)
            || !(1..=12).contains(&end_hour)
            || start_minute > 59
            || end_minute > 59
        {
            continue;
        }

        let start_clock = (start_hour % 12) * 60 + start_minute;
        let end_clock = (end_hour % 12) * 60 + end_minute;

        let (start_marker, end_marker) = match (marker(3), marker(6)) {
            (Some(start), Some(end)) => (start, end),
            (None, None) => continue,
            _ if policy == MarkerPolicy::Both => continue,
            (None, Some(end)) if start_clock > end_clock => (end.flip(), end),
            (None, Some(end)) => (end, end),
            (Some(start), None) if start_clock > end_clock => (start, start.flip()),
            (Some(start), None) => (start, start),
        };

        let (Some(start), Some(end)) = (
            clock(start_hour, start_minute, start_marker),
            clock(end_hour, end_minute, end_marker),
        ) else {
            continue;
        };

        return Some(TimeRange { start, end });
    }

    None
}

fn clock(hour: u32, minute: u32, marker: Meridiem) -> Option<NaiveTime> {
    let hour = match marker {
        Meridiem::Am => hour % 12,
        Meridiem::Pm => hour % 12 + 12,
    };
    NaiveTime::from_hms_opt(hour, minute, 0)
}

/// First location whose code occurs in `text`, longest code first.
pub fn location<'r>(registry: &'r Registry, text: &str) -> Option<&'r Location> {
    let haystack = text.to_ascii_uppercase();
    registry
        .locations()
        .iter()
        .find(|location| haystack.contains(location.code.as_str()))
}

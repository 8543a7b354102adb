//! Reshapes a schedule that arrives already grouped by date and child.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::structs::format_date;
use crate::{normalize, order, Child, Error, Event, Extractor};

/// Date formats accepted for grouped keys.
const DATE_FORMATS: [&str; 6] = [
    "%b %d, %Y",
    "%B %d, %Y",
    "%Y-%m-%d",
    "%m/%d/%Y",
    "%m-%d-%Y",
    "%m/%d/%y",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupedEntry {
    pub time: String,
    pub location_code: String,
    #[serde(default)]
    pub double_session: bool,
}

/// `date -> child name -> practice`.
pub type GroupedSchedule = BTreeMap<String, BTreeMap<String, GroupedEntry>>;

pub fn parse_grouped(json: &str) -> Result<GroupedSchedule, Error> {
    Ok(serde_json::from_str(json)?)
}

impl Extractor {
    /// Flattens a grouped schedule into the ordered event list.
    ///
    /// Unknown children and location codes are dropped. Dates and times
    /// that cannot be read are kept verbatim and sort last.
    pub fn reshape_grouped(&self, grouped: &GroupedSchedule) -> Vec<Event> {
        let mut events = Vec::new();

        for (date, children) in grouped {
            let date = canonical_date(date);

            for (name, entry) in children {
                let Some(child) = Child::from_name(name) else {
                    debug!(name, "untracked child");
                    continue;
                };

                let Some(team) = self.registry().team_code(child) else {
                    continue;
                };

                let Some(location) = self.registry().location(&entry.location_code) else {
                    debug!(code = entry.location_code.as_str(), "unknown location");
                    continue;
                };

                events.push(Event::new(
                    child,
                    team.to_string(),
                    date.clone(),
                    self.canonical_time(&entry.time),
                    location.clone(),
                    entry.double_session,
                ));
            }
        }

        order::finalize(events)
    }

    fn canonical_time(&self, time: &str) -> String {
        let compact = normalize::compact(time).to_ascii_uppercase();
        (self.strategies().time)(&compact, self.config().markers)
            .map_or_else(|| time.trim().to_string(), |range| range.to_string())
    }
}

fn canonical_date(date: &str) -> String {
    let trimmed = date.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
        .map_or_else(|| trimmed.to_string(), format_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Config, Registry};

    fn extractor() -> Extractor {
        Extractor::new(Registry::default(), Config::default())
    }

    #[test]
    fn reshapes_grouped_schedule() {
        let grouped = parse_grouped(
            r#"{
                "2026-02-10": {
                    "Nastya": {"time": "6-7:30 PM", "location_code": "MICC"},
                    "Liza": {"time": "5:00 PM - 6:00 PM", "location_code": "mw", "double_session": true}
                },
                "Feb 9, 2026": {
                    "Sonya": {"time": "7-8PM", "location_code": "BAC"}
                }
            }"#,
        )
        .unwrap();

        let events = extractor().reshape_grouped(&grouped);
        let summary: Vec<(Child, &str, &str)> = events
            .iter()
            .map(|e| (e.child, e.date.as_str(), e.time.as_str()))
            .collect();

        assert_eq!(
            summary,
            [
                (Child::Sonya, "Feb 9, 2026", "7:00 PM - 8:00 PM"),
                (Child::Liza, "Feb 10, 2026", "5:00 PM - 6:00 PM"),
                (Child::Nastya, "Feb 10, 2026", "6:00 PM - 7:30 PM"),
            ]
        );
        assert!(events[1].double_session);
        assert_eq!(events[1].team, "JUN1R");
        assert_eq!(events[1].location.code, "MW");
    }

    #[test]
    fn drops_unknown_children_and_locations() {
        let grouped = parse_grouped(
            r#"{
                "Feb 9, 2026": {
                    "Masha": {"time": "7-8PM", "location_code": "BAC"},
                    "Liza": {"time": "7-8PM", "location_code": "NOPE"}
                }
            }"#,
        )
        .unwrap();

        assert!(extractor().reshape_grouped(&grouped).is_empty());
    }

    #[test]
    fn unreadable_values_are_kept_and_sort_last() {
        let grouped = parse_grouped(
            r#"{
                "next week": {"Nastya": {"time": "6-7PM", "location_code": "MICC"}},
                "Feb 9, 2026": {"Nastya": {"time": "evening", "location_code": "MICC"}}
            }"#,
        )
        .unwrap();

        let events = extractor().reshape_grouped(&grouped);
        assert_eq!(events[0].date, "Feb 9, 2026");
        assert_eq!(events[0].time, "evening");
        assert_eq!(events[1].date, "next week");
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(parse_grouped("[]"), Err(Error::Json(_))));
    }
}

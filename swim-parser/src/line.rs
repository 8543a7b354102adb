use chrono::NaiveDate;
use tracing::trace;

use crate::matchers::TimeRange;
use crate::{normalize, Child, Event, Extractor, Location};

/// Markers for a day without practice, compared against compacted text.
const OFF_MARKERS: [&str; 4] = ["OFF", "NOPRACTICE", "CANCELLED", "CANCELED"];

/// A practice recognized on one line, still waiting for its date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatch {
    pub child: Child,
    pub team: String,
    pub time: TimeRange,
    pub location: Location,
}

impl LineMatch {
    pub fn into_event(self, date: NaiveDate) -> Event {
        Event::resolved(self.child, self.team, date, self.time, self.location)
    }
}

pub fn is_off(compact: &str) -> bool {
    let compact = compact.to_ascii_uppercase();
    OFF_MARKERS.iter().any(|marker| compact.contains(marker))
}

impl Extractor {
    /// Recognizes a single practice on `line`, or rejects it.
    ///
    /// The team is looked up first; time and location are searched only in
    /// the text after the team token, and both must be present.
    pub fn parse_line(&self, line: &str) -> Option<LineMatch> {
        let compact = normalize::compact(line).to_ascii_uppercase();
        if compact.is_empty() {
            return None;
        }

        if is_off(&compact) {
            trace!(line, "no practice");
            return None;
        }

        let strategies = self.strategies();

        let Some(team) = (strategies.team)(self.registry(), &compact) else {
            trace!(line, "no tracked team");
            return None;
        };

        let rest = &compact[team.end..];

        let Some(time) = (strategies.time)(rest, self.config().markers) else {
            trace!(line, child = %team.child, "no time range");
            return None;
        };

        let Some(location) = (strategies.location)(self.registry(), rest) else {
            trace!(line, child = %team.child, "no location");
            return None;
        };

        Some(LineMatch {
            child: team.child,
            team: team.team,
            time,
            location: location.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matchers::{MarkerPolicy, Strategies};
    use crate::{Config, Registry};

    fn extractor() -> Extractor {
        Extractor::new(Registry::default(), Config::default())
    }

    #[test]
    fn parses_a_practice_line() {
        let found = extractor().parse_line("JUN2 6-7:30PM MICC").unwrap();
        assert_eq!(found.child, Child::Nastya);
        assert_eq!(found.team, "JUN2");
        assert_eq!(found.time.to_string(), "6:00 PM - 7:30 PM");
        assert_eq!(found.location.code, "MICC");
    }

    #[test]
    fn parses_spaced_out_glyphs() {
        let found = extractor()
            .parse_line("J U N 1 R   1 1 - 1 2 : 3 0 P  M W")
            .unwrap();
        assert_eq!(found.child, Child::Liza);
        assert_eq!(found.time.to_string(), "11:00 AM - 12:30 PM");
        assert_eq!(found.location.code, "MW");
    }

    #[test]
    fn off_lines_never_produce_events() {
        let extractor = extractor();
        for line in [
            "JUN2 OFF",
            "JUN2 6-7:30PM MICC off",
            "Off - JUN1 R 6-7PM MW",
            "JUN1 B no practice 6-7PM BAC",
        ] {
            assert!(extractor.parse_line(line).is_none(), "{line}");
        }
    }

    #[test]
    fn requires_time_and_location() {
        let extractor = extractor();
        assert!(extractor.parse_line("JUN2 MICC").is_none());
        assert!(extractor.parse_line("JUN2 6-7:30PM").is_none());
        assert!(extractor.parse_line("SENIOR 6-7:30PM MICC").is_none());
        assert!(extractor.parse_line("   ").is_none());
    }

    #[test]
    fn team_digits_are_not_read_as_time() {
        // "JUN2 12-1PM" must not be read as 2:12.
        let found = extractor().parse_line("JUN2 12-1PM MW").unwrap();
        assert_eq!(found.time.to_string(), "12:00 PM - 1:00 PM");
    }

    #[test]
    fn honours_marker_policy() {
        let strict = Extractor::new(
            Registry::default(),
            Config {
                markers: MarkerPolicy::Both,
                ..Config::default()
            },
        );
        assert!(strict.parse_line("JUN2 6-7:30PM MICC").is_none());
        assert!(strict.parse_line("JUN2 6PM-7:30PM MICC").is_some());
    }

    #[test]
    fn uses_injected_strategies() {
        fn nowhere<'r>(_: &'r Registry, _: &str) -> Option<&'r Location> {
            None
        }

        let extractor = extractor().with_strategies(Strategies {
            location: nowhere,
            ..Strategies::default()
        });
        assert!(extractor.parse_line("JUN2 6-7:30PM MICC").is_none());
    }

    #[test]
    fn into_event_attaches_date() {
        let event = extractor()
            .parse_line("JUN1 B 5-6:30PM BAC")
            .unwrap()
            .into_event(NaiveDate::from_ymd_opt(2026, 2, 3).unwrap());
        assert_eq!(event.date, "Feb 3, 2026");
        assert_eq!(event.child, Child::Sonya);
        assert_eq!(event.title, "Sonya @ BAC 5:00 PM - 6:30 PM");
    }
}

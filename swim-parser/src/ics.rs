use chrono::{Duration, NaiveDateTime};
use ics::{
    properties::{Categories, Description, DtEnd, DtStart, Location, RRule, Summary, TzName},
    Daylight, Standard, TimeZone,
};
use tracing::warn;

use crate::{Event, Schedule};

const TZID: &str = "America/Los_Angeles";

fn stamp(at: NaiveDateTime) -> String {
    at.format("%Y%m%dT%H%M%S").to_string()
}

impl Schedule {
    /// Calendar with one event per practice, each widened by `buffer` on
    /// both ends. Practices without a readable date or time are left out.
    #[must_use]
    pub fn to_ics(&self, buffer: Duration) -> ics::ICalendar<'_> {
        let mut pst_standard = Standard::new("19701101T020000", "-0700", "-0800");
        pst_standard.push(TzName::new("PST"));
        pst_standard.push(RRule::new("FREQ=YEARLY;BYMONTH=11;BYDAY=1SU"));

        let mut pdt_daylight = Daylight::new("19700308T020000", "-0800", "-0700");
        pdt_daylight.push(TzName::new("PDT"));
        pdt_daylight.push(RRule::new("FREQ=YEARLY;BYMONTH=3;BYDAY=2SU"));

        let mut timezone = TimeZone::daylight(TZID, pdt_daylight);
        timezone.add_standard(pst_standard);

        let mut icalendar = ics::ICalendar::new("2.0", &self.name);
        icalendar.add_timezone(timezone);

        for event in &self.events {
            match event.to_ics(buffer) {
                Some(ics_event) => icalendar.add_event(ics_event),
                None => warn!(title = event.title.as_str(), "cannot resolve practice time"),
            }
        }

        icalendar
    }
}

impl Event {
    #[must_use]
    pub fn to_ics(&self, buffer: Duration) -> Option<ics::Event<'_>> {
        let (start, end) = self.start_end()?;
        let start = stamp(start - buffer);
        let end = stamp(end + buffer);

        let id = format!("{}_{}", start, self.title.replace(' ', "-"));

        let mut ics_event = ics::Event::new(id, start.clone());

        ics_event.push(DtStart::new(start));
        ics_event.push(DtEnd::new(end));
        ics_event.push(Summary::new(&self.title));
        ics_event.push(Location::new(format!(
            "{}, {}",
            self.location.name, self.location.address
        )));
        ics_event.push(Description::new(format!(
            "Swim practice for {} ({}) at {}",
            self.child, self.team, self.location.name
        )));
        ics_event.push(Categories::new(self.child.name()));

        Some(ics_event)
    }
}

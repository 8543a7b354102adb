use std::collections::HashSet;

use chrono::{NaiveDate, Timelike};

use crate::Event;

/// Sorts and deduplicates an extracted event list.
pub fn finalize(mut events: Vec<Event>) -> Vec<Event> {
    sort_events(&mut events);
    dedup_events(events)
}

/// Stable sort by date, then start time.
///
/// Unparseable dates sort last and unparseable times sort as midnight.
pub fn sort_events(events: &mut [Event]) {
    events.sort_by_cached_key(sort_key);
}

fn sort_key(event: &Event) -> (NaiveDate, u32, u32) {
    let date = event.day().unwrap_or(NaiveDate::MAX);
    let (hour, minute) = event
        .time_range()
        .map_or((0, 0), |range| (range.start.hour(), range.start.minute()));

    (date, hour, minute)
}

/// Keeps the first of events that share child, date, time and location.
pub fn dedup_events(events: Vec<Event>) -> Vec<Event> {
    let mut seen = HashSet::new();
    events
        .into_iter()
        .filter(|event| {
            seen.insert((
                event.child,
                event.date.clone(),
                event.time.clone(),
                event.location.code.clone(),
            ))
        })
        .collect()
}

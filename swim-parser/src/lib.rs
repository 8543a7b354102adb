macro_rules! regex {
    ($pattern:expr) => {{
        static REGEX: once_cell::sync::Lazy<regex::Regex> =
            once_cell::sync::Lazy::new(|| regex::Regex::new($pattern).unwrap());
        &REGEX
    }};
}

mod error;
mod grouped;
mod line;
pub mod matchers;
pub mod normalize;
mod order;
mod parser;
mod registry;
mod structs;

#[cfg(feature = "ics")]
mod ics;

pub use error::Error;
pub use grouped::{parse_grouped, GroupedEntry, GroupedSchedule};
pub use line::LineMatch;
pub use order::{dedup_events, finalize, sort_events};
pub use parser::{Cell, Config, Document, Extractor, Row, Table};
pub use registry::{Registry, TeamSpelling};
pub use structs::{Child, Event, Location, Schedule};

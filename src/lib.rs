mod binder;
pub mod cli;
mod error;
mod event;
mod ics;
mod record;
pub mod server;

pub use binder::{CalendarOptions, ViewBinder, DEFAULT_CONTAINER, DEFAULT_TEMPLATE};
pub use error::{Error, Result};
pub use event::{records_to_events, EventDescriptor, MissingFieldPolicy, STYLE_CLASS};
pub use self::ics::events_to_ics;
pub use record::{load_records, parse_records, SourceRecord};

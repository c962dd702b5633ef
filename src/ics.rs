use chrono::{NaiveDate, NaiveDateTime};
use ics::{
    components::Parameter,
    escape_text,
    properties::{DtEnd, DtStart, Summary},
    ICalendar,
};
use log::warn;

use crate::event::EventDescriptor;

const DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, PartialEq, Eq)]
enum IcsDate {
    Date(String),
    DateTime(String),
}

impl IcsDate {
    fn parse(s: &str) -> Option<Self> {
        let s = s.trim();

        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
            return Some(Self::Date(date.format("%Y%m%d").to_string()));
        }

        DATETIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
            .map(|datetime| Self::DateTime(datetime.format("%Y%m%dT%H%M%S").to_string()))
    }

    fn value(&self) -> &str {
        match self {
            Self::Date(value) | Self::DateTime(value) => value,
        }
    }

    fn is_date(&self) -> bool {
        matches!(self, Self::Date(_))
    }
}

// UIDs only keep characters that need no escaping.
fn uid_title(title: &str) -> String {
    title
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '-'
            }
        })
        .collect()
}

fn to_ics_event<'a>(event: &'a EventDescriptor, dtstamp: &str) -> Option<ics::Event<'a>> {
    let (Some(start), Some(end)) = (IcsDate::parse(&event.start), IcsDate::parse(&event.end))
    else {
        warn!(
            "Leaving `{}` out of the iCalendar export: unrecognized date ({} - {})",
            event.title, event.start, event.end
        );
        return None;
    };

    let id = format!("{}_{}", start.value(), uid_title(&event.title));
    let mut ics_event = ics::Event::new(id, dtstamp.to_string());

    let mut dtstart = DtStart::new(start.value().to_string());
    if start.is_date() {
        dtstart.add(Parameter::new("VALUE", "DATE"));
    }

    let mut dtend = DtEnd::new(end.value().to_string());
    if end.is_date() {
        dtend.add(Parameter::new("VALUE", "DATE"));
    }

    ics_event.push(dtstart);
    ics_event.push(dtend);
    ics_event.push(Summary::new(escape_text(event.title.as_str())));

    Some(ics_event)
}

/// Builds an iCalendar document from the same descriptors the widget shows.
pub fn events_to_ics<'a>(
    name: &'a str,
    events: &'a [EventDescriptor],
    dtstamp: &str,
) -> ICalendar<'a> {
    let mut icalendar = ICalendar::new("2.0", name);

    for event in events {
        if let Some(ics_event) = to_ics_event(event, dtstamp) {
            icalendar.add_event(ics_event);
        }
    }

    icalendar
}

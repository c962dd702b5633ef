use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    record::SourceRecord,
};

pub const STYLE_CLASS: &str = "bg-blue";
pub const PLACEHOLDER_TITLE: &str = "(untitled)";

/// A single entry as the calendar widget expects it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventDescriptor {
    pub title: String,
    pub start: String,
    pub end: String,
    #[serde(rename = "className")]
    pub style_class: String,
    pub draggable: bool,
}

impl EventDescriptor {
    pub fn new<S: Into<String>>(title: S, start: S, end: S) -> Self {
        Self {
            title: title.into(),
            start: start.into(),
            end: end.into(),
            style_class: STYLE_CLASS.to_string(),
            draggable: true,
        }
    }
}

/// What to do with a record that lacks one of the mapped fields.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    #[default]
    Skip,
    /// Fill in a missing title. Records without dates are still skipped.
    Placeholder,
    Reject,
}

impl FromStr for MissingFieldPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::Skip),
            "placeholder" => Ok(Self::Placeholder),
            "reject" => Ok(Self::Reject),
            other => Err(format!(
                "unknown policy `{other}`, expected one of skip, placeholder, reject"
            )),
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|value| !value.trim().is_empty())
}

/// Maps records to descriptors, preserving order.
///
/// Dates are passed through as given. Neither their format nor `start <= end`
/// is checked here.
pub fn records_to_events(
    records: &[SourceRecord],
    policy: MissingFieldPolicy,
) -> Result<Vec<EventDescriptor>> {
    let mut events = Vec::with_capacity(records.len());

    for (index, record) in records.iter().enumerate() {
        match record_to_event(index, record, policy)? {
            Some(event) => events.push(event),
            None => continue,
        }
    }

    Ok(events)
}

fn record_to_event(
    index: usize,
    record: &SourceRecord,
    policy: MissingFieldPolicy,
) -> Result<Option<EventDescriptor>> {
    let missing = |field: &'static str| match policy {
        MissingFieldPolicy::Reject => Err(Error::MalformedRecord { index, field }),
        MissingFieldPolicy::Skip | MissingFieldPolicy::Placeholder => {
            warn!("Skipping record {index}: missing `{field}`");
            Ok(None)
        }
    };

    let title = match (present(&record.title), policy) {
        (Some(title), _) => title,
        (None, MissingFieldPolicy::Placeholder) => PLACEHOLDER_TITLE,
        (None, _) => return missing("title"),
    };

    let Some(start) = present(&record.production_date) else {
        return missing("production_date");
    };

    let Some(end) = present(&record.closing_date) else {
        return missing("closing_date");
    };

    Ok(Some(EventDescriptor::new(title, start, end)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn launch() -> SourceRecord {
        SourceRecord::new("Launch", "2024-01-05", "2024-01-10")
    }

    #[test]
    fn maps_single_record() {
        let events = records_to_events(&[launch()], MissingFieldPolicy::Skip).unwrap();

        assert_eq!(
            events,
            vec![EventDescriptor {
                title: "Launch".into(),
                start: "2024-01-05".into(),
                end: "2024-01-10".into(),
                style_class: "bg-blue".into(),
                draggable: true,
            }]
        );
    }

    #[test]
    fn preserves_count_and_order() {
        let records = (0..25)
            .map(|i| {
                SourceRecord::new(
                    format!("job {i}"),
                    format!("2024-03-{:02}", i + 1),
                    "2024-04-01".to_string(),
                )
            })
            .collect::<Vec<_>>();

        let events = records_to_events(&records, MissingFieldPolicy::Reject).unwrap();

        assert_eq!(events.len(), records.len());
        for (record, event) in records.iter().zip(&events) {
            assert_eq!(record.title.as_deref(), Some(event.title.as_str()));
            assert_eq!(record.production_date.as_deref(), Some(event.start.as_str()));
        }
    }

    #[test]
    fn empty_input_gives_no_events() {
        assert!(records_to_events(&[], MissingFieldPolicy::Skip)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn dates_are_not_validated() {
        let record = SourceRecord::new("Backwards", "2024-02-01", "not a date");
        let events = records_to_events(&[record], MissingFieldPolicy::Reject).unwrap();
        assert_eq!(events[0].end, "not a date");
    }

    #[test]
    fn skip_policy_drops_incomplete_records() {
        let records = vec![
            launch(),
            SourceRecord {
                closing_date: None,
                ..launch()
            },
            SourceRecord {
                title: Some("  ".into()),
                ..launch()
            },
            SourceRecord::new("Ship", "2024-01-12", "2024-01-13"),
        ];

        let titles = records_to_events(&records, MissingFieldPolicy::Skip)
            .unwrap()
            .into_iter()
            .map(|event| event.title)
            .collect::<Vec<_>>();

        assert_eq!(titles, ["Launch", "Ship"]);
    }

    #[test]
    fn placeholder_policy_fills_title_only() {
        let records = vec![
            SourceRecord {
                title: None,
                ..launch()
            },
            SourceRecord {
                production_date: None,
                ..launch()
            },
        ];

        let events = records_to_events(&records, MissingFieldPolicy::Placeholder).unwrap();

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, PLACEHOLDER_TITLE);
    }

    #[test]
    fn reject_policy_reports_index_and_field() {
        let records = vec![
            launch(),
            SourceRecord {
                production_date: Some(String::new()),
                ..launch()
            },
        ];

        let err = records_to_events(&records, MissingFieldPolicy::Reject).unwrap_err();
        assert!(matches!(
            err,
            Error::MalformedRecord {
                index: 1,
                field: "production_date"
            }
        ));
    }

    #[test]
    fn serializes_in_widget_shape() {
        let json = serde_json::to_value(EventDescriptor::new("Launch", "2024-01-05", "2024-01-10"))
            .unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "title": "Launch",
                "start": "2024-01-05",
                "end": "2024-01-10",
                "className": "bg-blue",
                "draggable": true,
            })
        );
    }

    #[test]
    fn parses_policy_names() {
        assert_eq!("skip".parse::<MissingFieldPolicy>(), Ok(MissingFieldPolicy::Skip));
        assert_eq!(
            "placeholder".parse::<MissingFieldPolicy>(),
            Ok(MissingFieldPolicy::Placeholder)
        );
        assert_eq!("reject".parse::<MissingFieldPolicy>(), Ok(MissingFieldPolicy::Reject));
        assert!("ignore".parse::<MissingFieldPolicy>().is_err());
    }
}

use std::{fs, path::Path};

use serde::Deserialize;

use crate::error::{Error, Result};

/// One row handed over by the data source.
///
/// Every field is optional so a single incomplete row does not poison the
/// whole payload; what happens to it is decided by [`crate::MissingFieldPolicy`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct SourceRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub production_date: Option<String>,
    #[serde(default)]
    pub closing_date: Option<String>,
}

impl SourceRecord {
    pub fn new<S: Into<String>>(title: S, production_date: S, closing_date: S) -> Self {
        Self {
            title: Some(title.into()),
            production_date: Some(production_date.into()),
            closing_date: Some(closing_date.into()),
        }
    }
}

pub fn parse_records<S: AsRef<str>>(s: S) -> Result<Vec<SourceRecord>> {
    Ok(serde_json::from_str(s.as_ref())?)
}

pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<SourceRecord>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_records(raw)
}

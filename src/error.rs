use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no element with id `{container}` in the page template")]
    MountPointNotFound { container: String },

    #[error("container id `{0}` is not a valid element id")]
    InvalidContainerId(String),

    #[error("record {index} is missing `{field}`")]
    MalformedRecord { index: usize, field: &'static str },

    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid record data: {0}")]
    Json(#[from] serde_json::Error),
}

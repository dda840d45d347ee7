use std::path::PathBuf;

use thiserror::Error;

use crate::io::{ParseError, RecordError};
use crate::ops::MergeError;
use crate::page::ConfigError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },

    #[error("{}: {source}", path.display())]
    Merge {
        path: PathBuf,
        #[source]
        source: MergeError,
    },

    #[error("failed to encode output: {0}")]
    Encode(#[from] RecordError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

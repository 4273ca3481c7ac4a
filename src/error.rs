use std::path::PathBuf;
use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Malformed API document: {0}")]
    MalformedSpec(String),

    #[error("Failed to encode '{text}'")]
    Encoding {
        text: String,
        #[source]
        source: BoxError,
    },

    #[error("Vector dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse API document: {0}")]
    Parse(String),
}

pub type Result<T, E = SearchError> = std::result::Result<T, E>;

impl SearchError {
    pub(crate) fn encoding(text: &str, source: impl Into<BoxError>) -> Self {
        SearchError::Encoding {
            text: text.to_string(),
            source: source.into(),
        }
    }

    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        SearchError::MalformedSpec(message.into())
    }
}

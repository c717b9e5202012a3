//! Error taxonomy for the reporting pipeline.
//!
//! Every stage returns [`PipelineError`]; nothing is retried or recovered,
//! the first error aborts the run.

use thiserror::Error;

/// Result alias used across the pipeline stages.
pub type Result<T> = std::result::Result<T, PipelineError>;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Endpoint unreachable, bad URL, or a non-success HTTP status.
    #[error("network error fetching {url}: {source}")]
    Network {
        url: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A payload or field did not have the expected shape.
    #[error("failed to parse {what}: {message}")]
    Parse { what: &'static str, message: String },

    /// The place resolver had no match for a coordinate pair.
    #[error("no place found for coordinates ({latitude}, {longitude})")]
    Resolution { latitude: f64, longitude: f64 },

    /// A report file could not be written.
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub fn network<E>(url: &str, source: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        PipelineError::Network {
            url: url.to_string(),
            source: source.into(),
        }
    }

    pub fn parse(what: &'static str, message: impl ToString) -> Self {
        PipelineError::Parse {
            what,
            message: message.to_string(),
        }
    }

    pub fn io(path: &str, source: impl Into<std::io::Error>) -> Self {
        PipelineError::Io {
            path: path.to_string(),
            source: source.into(),
        }
    }
}

//! Error handling for the rowmap engine.
//!
//! Failures fall into two families. Configuration errors mean the row type,
//! converter registry or filter object is malformed regardless of what the
//! server returns. Data retrieval errors mean a particular server response did
//! not match expectations. Neither is retried here.

pub mod util;

use std::path::PathBuf;

use crate::service::ServiceError;

/// Boxed error used as the source of wrapped failures
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Specialized error type for rowmap operations
#[derive(Debug, thiserror::Error)]
pub enum RowmapError {
    /// The row type, converters or selection are set up incorrectly
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The server response did not match what the row type expects
    #[error("Data retrieval error: {message}")]
    DataRetrieval {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Logging on to Answers failed
    #[error("Unable to connect to Answers as user '{username}'")]
    Connection {
        username: String,
        #[source]
        source: ServiceError,
    },

    /// The manager was used after it was closed or became unusable
    #[error("Invalid state: {message}")]
    InvalidState {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Error opening or reading a file
    #[error("IO error: {message} ({})", .path.display())]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: Option<std::io::Error>,
    },

    /// The configuration file is not valid JSON for `RowmapConfig`
    #[error("Invalid configuration file: {0}")]
    ConfigFile(#[from] serde_json::Error),
}

impl RowmapError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn data_retrieval(message: impl Into<String>) -> Self {
        Self::DataRetrieval {
            message: message.into(),
            source: None,
        }
    }

    pub fn data_retrieval_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::DataRetrieval {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
            source: None,
        }
    }

    pub fn invalid_state_with_source(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::InvalidState {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    pub fn io_error(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            message: message.into(),
            path: path.into(),
            source: None,
        }
    }

    pub fn io_error_with_source(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            message: message.into(),
            path: path.into(),
            source: Some(source),
        }
    }

    /// Whether this error points at a setup defect rather than a bad response
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration { .. } | Self::ConfigFile(_))
    }

    #[must_use]
    pub fn is_data_retrieval(&self) -> bool {
        matches!(self, Self::DataRetrieval { .. })
    }
}

/// Result type for rowmap operations
pub type Result<T> = std::result::Result<T, RowmapError>;

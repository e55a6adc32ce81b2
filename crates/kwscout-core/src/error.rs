//! Error types for kwscout-core.

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// A required setting is missing or unusable.
    ///
    /// Raised when a component is constructed, never later.
    #[error("invalid configuration for `{field}`: {reason}")]
    Invalid {
        /// Dotted config key that failed validation.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures talking to an external data source.
///
/// The pipeline never propagates these: they are logged and the
/// corresponding signal is treated as absent.
#[derive(Error, Debug)]
pub enum CollaboratorError {
    /// The request could not be sent or the body could not be read.
    #[error("{collaborator} request failed: {source}")]
    Transport {
        /// Name of the collaborator (e.g. `search`, `trends`).
        collaborator: &'static str,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status code.
    #[error("{collaborator} returned HTTP {status}")]
    Status {
        /// Name of the collaborator.
        collaborator: &'static str,
        /// HTTP status code.
        status: u16,
    },

    /// The service reported an error in its response body.
    #[error("{collaborator} reported an error: {message}")]
    Api {
        /// Name of the collaborator.
        collaborator: &'static str,
        /// Message from the service.
        message: String,
    },

    /// The response body did not have the expected shape.
    #[error("{collaborator} returned a malformed response: {reason}")]
    Malformed {
        /// Name of the collaborator.
        collaborator: &'static str,
        /// Decoder message.
        reason: String,
    },
}

impl CollaboratorError {
    /// Name of the collaborator that failed.
    pub const fn collaborator(&self) -> &'static str {
        match self {
            Self::Transport { collaborator, .. }
            | Self::Status { collaborator, .. }
            | Self::Api { collaborator, .. }
            | Self::Malformed { collaborator, .. } => collaborator,
        }
    }

    /// Whether retrying the same request could succeed.
    pub const fn is_transient(&self) -> bool {
        match self {
            Self::Transport { .. } => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Api { .. } | Self::Malformed { .. } => false,
        }
    }
}

/// Result type alias using [`CollaboratorError`].
pub type CollaboratorResult<T> = Result<T, CollaboratorError>;

/// Errors that can occur while persisting an analysis.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing the output file failed.
    #[error("failed to write {path}: {source}")]
    Io {
        /// Destination path.
        path: Utf8PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// JSON serialization failed.
    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV serialization failed.
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),
}

/// Result type alias using [`ExportError`].
pub type ExportResult<T> = Result<T, ExportError>;

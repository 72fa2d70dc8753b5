//! Error types for the logger system

use super::log_level::VALID_LEVEL_NAMES;

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Level string was empty
    #[error("logging level cannot be empty, expected one of: {}", VALID_LEVEL_NAMES)]
    EmptyLevel,

    /// Level string outside the recognized set
    #[error("invalid logging level '{level}', expected one of: {}", VALID_LEVEL_NAMES)]
    InvalidLevel { level: String },

    /// Application mode without a preset
    #[error("invalid app mode '{mode}', expected one of: development, staging, production")]
    InvalidAppMode { mode: String },

    /// Output destination could not be opened
    #[error("failed to open output '{path}': {source}")]
    SinkOpen {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// `output_paths` is empty; an empty error output list is allowed
    #[error("no output paths configured")]
    NoOutputs,

    /// Monitoring backend refused to attach
    #[error("failed to attach monitoring backend '{backend}': {message}")]
    BackendAttach { backend: String, message: String },

    /// Monitoring backend rejected a record
    #[error("monitoring backend '{backend}' rejected record: {message}")]
    BackendForward { backend: String, message: String },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Writer error (generic)
    #[error("Writer error: {0}")]
    WriterError(String),
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(level: impl Into<String>) -> Self {
        LoggerError::InvalidLevel {
            level: level.into(),
        }
    }

    /// Create an invalid app mode error
    pub fn invalid_app_mode(mode: impl Into<String>) -> Self {
        LoggerError::InvalidAppMode { mode: mode.into() }
    }

    /// Create a sink open error with the offending path
    pub fn sink_open(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::SinkOpen {
            path: path.into(),
            source,
        }
    }

    /// Create a backend attach error
    pub fn backend_attach(backend: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::BackendAttach {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a backend forward error
    pub fn backend_forward(backend: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::BackendForward {
            backend: backend.into(),
            message: message.into(),
        }
    }

    /// Create a writer error (generic)
    pub fn writer<S: Into<String>>(msg: S) -> Self {
        LoggerError::WriterError(msg.into())
    }

    /// True for errors raised while validating configuration
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoggerError::EmptyLevel
                | LoggerError::InvalidLevel { .. }
                | LoggerError::InvalidAppMode { .. }
        )
    }
}

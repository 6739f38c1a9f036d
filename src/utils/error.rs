use std::path::PathBuf;
use thiserror::Error;

/// Failure while listing the watch directory.
#[derive(Error, Debug)]
pub enum SelectError {
    #[error("{path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path}: {source}")]
    Other {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure while moving the selected entry.
#[derive(Error, Debug)]
pub enum MoveError {
    #[error("{path}: {source}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} -> {destination}: {reason}")]
    Other {
        path: PathBuf,
        destination: PathBuf,
        reason: String,
    },
}

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Selection failed: {0}")]
    Select(#[from] SelectError),

    #[error("Move failed: {0}")]
    Move(#[from] MoveError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Source,
    Transfer,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::MissingConfigError { .. } | RelayError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
            RelayError::Select(_) => ErrorCategory::Source,
            RelayError::Move(_) => ErrorCategory::Transfer,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            RelayError::MissingConfigError { .. } | RelayError::InvalidConfigValueError { .. } => {
                ErrorSeverity::High
            }
            RelayError::Select(SelectError::NotFound { .. }) => ErrorSeverity::Medium,
            RelayError::Select(SelectError::Other { .. }) => ErrorSeverity::High,
            RelayError::Move(MoveError::NotFound { .. }) => ErrorSeverity::Low,
            RelayError::Move(MoveError::Other { .. }) => ErrorSeverity::Medium,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            RelayError::MissingConfigError { field } => {
                format!("Set {} before starting, e.g. `export {}=/path/to/dir`", field, field)
            }
            RelayError::InvalidConfigValueError { field, .. } => {
                format!("Check the value passed for {}", field)
            }
            RelayError::Select(_) => {
                "Make sure the watch directory exists, is a directory and is readable".to_string()
            }
            RelayError::Move(MoveError::NotFound { .. }) => {
                "The file disappeared before it could be moved; nothing to do".to_string()
            }
            RelayError::Move(MoveError::Other { .. }) => {
                "Make sure the destination directory exists and is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RelayError::MissingConfigError { field } => {
                format!("Environment variable '{}' undefined", field)
            }
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;

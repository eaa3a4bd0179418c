//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (model file not found, output closed, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Model source is malformed or internally inconsistent
    #[error("Model format error: {0}")]
    Format(String),

    /// Model source is malformed, with the file it came from
    #[error("Model format error in {file:?}: {message}")]
    FormatIn { file: PathBuf, message: String },

    /// A handle could not be resolved inside the open project
    #[error("Lookup error: {0}")]
    Lookup(String),

    /// A render operation was given a handle that is not part of the project
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A submachine refers back to one of its own ancestors
    #[error("Cyclic submachine nesting: {}", .path.join(" -> "))]
    CyclicNesting { path: Vec<String> },

    /// A second model was opened while another one is still open
    #[error("A model session is already open: {0}")]
    SessionBusy(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),

    /// Wrapped anyhow errors
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a model format error
    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    /// Create a lookup error
    pub fn lookup(msg: impl Into<String>) -> Self {
        Self::Lookup(msg.into())
    }

    /// Create an invalid argument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// Attach the originating file to a format error
    pub fn in_file(self, file: impl Into<PathBuf>) -> Self {
        match self {
            Error::Format(message) => Error::FormatIn {
                file: file.into(),
                message,
            },
            other => other,
        }
    }

    /// Check if error is a cyclic nesting report
    pub fn is_cycle(&self) -> bool {
        matches!(self, Error::CyclicNesting { .. })
    }
}

// Implement From traits for common external error types

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Format(format!("TOML error: {}", err))
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Format(format!("JSON error: {}", err))
    }
}

// Helper macros for creating errors

/// Create a model format error with formatting
#[macro_export]
macro_rules! format_error {
    ($($arg:tt)*) => {
        $crate::error::Error::format(format!($($arg)*))
    };
}

/// Bail with a model format error
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::format_error!($($arg)*))
    };
}

/// Ensure a condition is true or return a model format error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}

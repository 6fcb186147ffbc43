//! Error types for Lumen

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading geometry text.
#[derive(Debug, Error)]
pub enum GeometryError {
    /// The source could not be opened for reading.
    #[error("Geometry source unavailable: {path}")]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading failed after the source was opened.
    #[error("Failed to read geometry line {line}")]
    Read {
        line: usize,
        #[source]
        source: std::io::Error,
    },

    /// A token could not be converted to the section's numeric type.
    ///
    /// Only reported with [`NumberPolicy::Strict`](crate::geometry::NumberPolicy::Strict).
    #[error("Malformed number '{token}' on line {line}")]
    MalformedNumber { line: usize, token: String },

    /// A data line carried fewer tokens than its section requires.
    ///
    /// Only reported with [`NumberPolicy::Strict`](crate::geometry::NumberPolicy::Strict).
    #[error("Line {line} has {found} fields, expected {expected}")]
    MissingFields {
        line: usize,
        expected: usize,
        found: usize,
    },

    /// An index references a vertex past the end of the points section.
    ///
    /// Only reported with [`IndexPolicy::Validate`](crate::geometry::IndexPolicy::Validate).
    #[error("Index {index} out of range for {vertex_count} vertices")]
    IndexOutOfRange { index: u16, vertex_count: usize },
}

/// Main error type for Lumen operations
#[derive(Debug, Error)]
pub enum LumenError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Initialization error: {message}")]
    Initialization { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LumenError {
    /// Create a configuration error from a string
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        Self::Configuration {
            message: msg.into(),
        }
    }

    /// Create an initialization error from a string
    pub fn initialization<S: Into<String>>(msg: S) -> Self {
        Self::Initialization {
            message: msg.into(),
        }
    }
}

/// Result type alias for Lumen operations
pub type Result<T> = std::result::Result<T, LumenError>;

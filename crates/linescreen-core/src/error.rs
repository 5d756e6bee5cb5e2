//! Central error types for LineScreen
//!
//! This module provides comprehensive error handling using thiserror.
//! All errors implement std::error::Error and render a single-line
//! textual message suitable for the CLI surface.

use thiserror::Error;

/// Result type alias for LineScreen operations
pub type Result<T> = std::result::Result<T, LineScreenError>;

/// Central error type for all LineScreen operations
#[derive(Error, Debug, Clone)]
pub enum LineScreenError {
    /// Validation errors for input data
    #[error("Validation error: {message}")]
    ValidationError {
        /// Description of the validation failure
        message: String,
        /// Field that failed validation (if applicable)
        field: Option<String>,
    },

    /// Configuration errors (non-positive thresholds, bad factors)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// The root cell of the spatial index collapsed or is non-finite
    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    /// A query was issued with a timestep different from the build timestep
    #[error("Timestep mismatch: index built with dt={built}, queried with dt={queried}")]
    TimestepMismatch {
        /// Timestep the index was built with
        built: f64,
        /// Timestep passed to the query
        queried: f64,
    },

    /// Buffer or node-pool growth failed
    #[error("Allocation failure: {0}")]
    AllocationError(String),

    /// Malformed input record
    #[error("Parse error at record {record}: {message}")]
    ParseError {
        /// One-based record number in the input file
        record: usize,
        /// Description of the malformed field
        message: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// I/O errors
    #[error("IO error: {0}")]
    IoError(String),

    /// Threading/concurrency errors
    #[error("Concurrency error: {0}")]
    ConcurrencyError(String),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    InternalError(String),
}

impl LineScreenError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: None,
        }
    }

    /// Create a validation error with a specific field
    pub fn validation_field<S: Into<String>>(message: S, field: S) -> Self {
        Self::ValidationError {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::ConfigError(message.into())
    }

    /// Create an invalid-bounds error
    pub fn invalid_bounds<S: Into<String>>(message: S) -> Self {
        Self::InvalidBounds(message.into())
    }

    /// Create an allocation error
    pub fn allocation<S: Into<String>>(message: S) -> Self {
        Self::AllocationError(message.into())
    }

    /// Create a parse error for an input record
    pub fn parse<S: Into<String>>(record: usize, message: S) -> Self {
        Self::ParseError {
            record,
            message: message.into(),
        }
    }

    /// Get error category for telemetry
    pub fn category(&self) -> &str {
        match self {
            Self::ValidationError { .. } => "validation",
            Self::ConfigError(_) => "config",
            Self::InvalidBounds(_) => "invalid_bounds",
            Self::TimestepMismatch { .. } => "timestep_mismatch",
            Self::AllocationError(_) => "allocation",
            Self::ParseError { .. } => "parse",
            Self::SerializationError(_) => "serialization",
            Self::IoError(_) => "io",
            Self::ConcurrencyError(_) => "concurrency",
            Self::InternalError(_) => "internal",
        }
    }

    /// Check if error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::ConcurrencyError(_) | Self::IoError(_))
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for LineScreenError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for LineScreenError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

// Implement serde traits for error serialization
impl serde::Serialize for LineScreenError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("LineScreenError", 3)?;
        state.serialize_field("category", self.category())?;
        state.serialize_field("message", &self.to_string())?;
        state.serialize_field("retryable", &self.is_retryable())?;
        state.end()
    }
}

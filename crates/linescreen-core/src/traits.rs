//! Core traits for LineScreen types
//!
//! This module defines the fundamental traits that configuration and
//! data-record types implement for consistency across the workspace.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Trait for types that can be serialized to/from JSON
pub trait Serializable: Serialize + for<'de> Deserialize<'de> {
    /// Serialize to JSON string
    fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(Into::into)
    }

    /// Serialize to pretty JSON string
    fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Into::into)
    }

    /// Deserialize from JSON string
    fn from_json(json: &str) -> Result<Self>
    where
        Self: Sized,
    {
        serde_json::from_str(json).map_err(Into::into)
    }
}

/// Trait for types that can validate their internal state
pub trait Validatable {
    /// Validate the object's state
    ///
    /// # Errors
    /// Returns `LineScreenError::ValidationError` or
    /// `LineScreenError::ConfigError` if validation fails
    fn validate(&self) -> Result<()>;

    /// Check if the object is valid without returning an error
    fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    /// Get validation warnings (non-critical issues)
    fn validation_warnings(&self) -> Vec<String> {
        Vec::new()
    }
}

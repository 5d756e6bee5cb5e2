//! LineScreen Core Library
//!
//! Shared foundation for the LineScreen line-segment collision simulator.
//! It provides the error taxonomy, spatial-index configuration, and the
//! traits used across the workspace.
//!
//! # Features
//!
//! - **Error Handling**: Robust error types with detailed categorization
//! - **Configuration**: Type-safe spatial-index configuration with validation
//! - **Traits**: Common traits for serialization and validation
//!
//! # Example
//!
//! ```rust
//! use linescreen_core::prelude::*;
//!
//! let mut config = IndexConfig::default();
//! config.max_lines_per_node = 16;
//! assert!(config.validate().is_ok());
//!
//! let json = config.to_json_str().unwrap();
//! let restored = IndexConfig::from_json_str(&json).unwrap();
//! assert_eq!(restored.max_lines_per_node, 16);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod traits;

// Re-export commonly used items
pub use config::IndexConfig;
pub use error::{LineScreenError, Result};

/// Prelude module for convenient imports
///
/// Re-exports the most commonly used types and traits; use
/// `use linescreen_core::prelude::*;` for typical usage.
pub mod prelude {
    pub use crate::config::IndexConfig;
    pub use crate::error::{LineScreenError, Result};
    pub use crate::traits::{Serializable, Validatable};
}

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Package name
pub const PACKAGE_NAME: &str = env!("CARGO_PKG_NAME");

/// Get version string
pub fn version() -> String {
    format!("{} v{}", PACKAGE_NAME, VERSION)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        let ver = version();
        assert!(ver.contains("linescreen-core"));
    }
}

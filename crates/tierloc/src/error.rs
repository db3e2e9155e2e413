//! Error types for line accounting

use std::path::PathBuf;
use thiserror::Error;

use crate::table::Tier;

/// Result type for tierloc operations
pub type TierlocResult<T> = Result<T, TierlocError>;

/// Errors that can occur while measuring a code base
#[derive(Debug, Error)]
pub enum TierlocError {
    /// A referenced unit's source text could not be retrieved
    #[error("Cannot resolve unit '{unit}': {reason}")]
    Resolution {
        /// Registry key or reference of the unit
        unit: String,
        /// Why resolution failed
        reason: String,
    },

    /// Manifest file is not valid YAML for the manifest schema
    #[error("Manifest parse error: {message}")]
    ManifestParse {
        /// Error message
        message: String,
    },

    /// Manifest parsed but violates a structural rule
    #[error("Invalid manifest: {message}")]
    ManifestInvalid {
        /// Error message
        message: String,
    },

    /// A calculator was handed a cost table of the wrong tier
    #[error("Expected a {expected} cost table, got {actual}")]
    TierMismatch {
        /// Tier the calculator substitutes from
        expected: Tier,
        /// Tier of the table it received
        actual: Tier,
    },

    /// Manifest file could not be read
    #[error("Cannot read manifest {path}: {source}")]
    ManifestIo {
        /// Manifest path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON rendering failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TierlocError {
    /// Create a resolution error
    #[must_use]
    pub fn resolution(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Create a manifest parse error
    #[must_use]
    pub fn manifest_parse(message: impl Into<String>) -> Self {
        Self::ManifestParse {
            message: message.into(),
        }
    }

    /// Create an invalid manifest error
    #[must_use]
    pub fn manifest_invalid(message: impl Into<String>) -> Self {
        Self::ManifestInvalid {
            message: message.into(),
        }
    }

    /// Check if this error aborted unit resolution
    #[must_use]
    pub const fn is_resolution(&self) -> bool {
        matches!(self, Self::Resolution { .. })
    }
}

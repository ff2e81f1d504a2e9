//! Error types for the estimation core.
//!
//! Load failures are fatal to a session, a missing crop is recoverable, and an
//! empty recommendation list is not an error at all.

use std::path::PathBuf;

use thiserror::Error;

/// The main error type for carbon-agro operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Dataset Errors ===
    /// A dataset file could not be read or parsed as a table.
    #[error("failed to load dataset {path}: {message}")]
    DatasetLoad {
        /// Path of the offending file.
        path: PathBuf,
        /// Flattened context chain of the underlying failure.
        message: String,
    },

    // === Lookup Errors ===
    /// The requested crop has no rows in the yield dataset.
    #[error("crop '{crop}' not found in yield data")]
    CropNotFound {
        /// The crop as requested by the caller.
        crop: String,
    },

    /// A user-supplied quantity was negative or not finite.
    #[error("invalid {field}: {value} (must be a finite, non-negative number)")]
    InvalidInput {
        /// Name of the input field.
        field: &'static str,
        /// The rejected value.
        value: f64,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Wrap an `anyhow` chain from one of the format readers.
    pub(crate) fn dataset_load(path: impl Into<PathBuf>, err: &anyhow::Error) -> Self {
        Self::DatasetLoad {
            path: path.into(),
            message: format!("{err:#}"),
        }
    }

    /// Returns true if the caller can recover by showing a notice.
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::CropNotFound { .. } | Self::InvalidInput { .. })
    }
}

/// Result type alias using the crate error.
pub type Result<T> = std::result::Result<T, Error>;

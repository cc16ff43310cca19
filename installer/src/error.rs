//! Error types for the `mongodb-repro` command-line tool.
//!
//! Each component reports through its own error enum. [`ReproError`] wraps
//! them so the binary has a single type to print before exiting.

use crate::acquire::AcquireError;
use crate::artefact::error::ValidationError;
use crate::artefact::filename::FilenameError;
use crate::config::ConfigError;
use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors that can end a command.
#[derive(Debug, Error)]
pub enum ReproError {
    /// The requested build failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// An archive name could not be read.
    #[error(transparent)]
    Filename(#[from] FilenameError),

    /// Downloading or unpacking the build failed.
    #[error(transparent)]
    Acquire(#[from] AcquireError),

    /// The configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Failed to scan the binary directory.
    #[error("failed to scan binary directory {root}")]
    ScanFailed {
        /// The directory being scanned.
        root: Utf8PathBuf,
        /// The underlying error that caused the scan to fail.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write output.
    #[error("failed to write output")]
    WriteFailed {
        /// The underlying error that caused the write to fail.
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias using [`ReproError`].
pub type Result<T> = std::result::Result<T, ReproError>;

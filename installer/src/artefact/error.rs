//! Error types for build descriptor validation.
//!
//! Each variant provides a descriptive message identifying the invalid input
//! and the constraint that was violated. Validation always runs before any
//! name resolution or I/O, so these errors never carry filesystem or network
//! context.

use super::release::ReleaseField;
use thiserror::Error;

/// Errors arising from invalid build descriptor values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The architecture is not in the supported set.
    #[error("unsupported architecture \"{value}\"; expected one of: {expected}")]
    UnsupportedArch {
        /// The rejected architecture string.
        value: String,
        /// Comma-separated list of accepted architectures.
        expected: String,
    },

    /// The operating system is not in the supported set.
    #[error("unsupported operating system \"{value}\"; expected one of: {expected}")]
    UnsupportedOs {
        /// The rejected operating system string.
        value: String,
        /// Comma-separated list of accepted operating systems.
        expected: String,
    },

    /// The distribution tag is not in the supported set.
    #[error("unsupported distribution \"{value}\"; expected one of: {expected}")]
    UnsupportedDistro {
        /// The rejected distribution string.
        value: String,
        /// Comma-separated list of accepted distributions.
        expected: String,
    },

    /// A Linux build was requested without a distribution tag.
    #[error("{os} builds require a distribution")]
    MissingDistro {
        /// The operating system that needs a distribution.
        os: String,
    },

    /// The distribution does not belong to the requested operating system.
    #[error("distribution \"{distro}\" cannot be used for {os} builds")]
    DistroMismatch {
        /// The requested operating system.
        os: String,
        /// The conflicting distribution tag.
        distro: String,
    },

    /// A release number lies outside the configured bounds.
    #[error("{field} release number {value} must be {min} through {max}")]
    ReleaseOutOfRange {
        /// Which part of the release triple was rejected.
        field: ReleaseField,
        /// The rejected number.
        value: u32,
        /// Lowest accepted value.
        min: u32,
        /// Highest accepted value.
        max: u32,
    },

    /// Release text does not have the `X.Y.Z[-modifier]` shape.
    #[error("invalid release \"{value}\": {reason}")]
    InvalidRelease {
        /// The rejected release text.
        value: String,
        /// Description of the parse failure.
        reason: String,
    },

    /// A pre-release modifier is empty, too long, or not alphanumeric.
    #[error("invalid release modifier \"{value}\": {reason}")]
    InvalidModifier {
        /// The rejected modifier.
        value: String,
        /// Description of the validation failure.
        reason: String,
    },
}

/// Result type alias using [`ValidationError`].
pub type Result<T> = std::result::Result<T, ValidationError>;

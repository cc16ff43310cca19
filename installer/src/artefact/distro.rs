//! Distribution tags embedded in archive names.
//!
//! Linux builds carry one of a fixed set of distribution tags. Windows builds
//! carry the single `windows-64` sentinel; macOS builds carry none.

use super::error::{Result, ValidationError};
use serde::Serialize;
use std::fmt;

/// Linux distribution tags published by the download service.
const LINUX_DISTROS: &[&str] = &[
    "amzn64",
    "amazon2",
    "debian71",
    "debian81",
    "debian92",
    "debian10",
    "rhel57",
    "rhel62",
    "rhel67",
    "rhel70",
    "rhel71",
    "rhel72",
    "rhel80",
    "suse11",
    "suse12",
    "suse15",
    "ubuntu1204",
    "ubuntu1404",
    "ubuntu1604",
    "ubuntu1804",
    "ubuntu2004",
];

/// The distribution token every Windows archive carries.
const WINDOWS_SENTINEL: &str = "windows-64";

/// A validated distribution tag.
///
/// # Examples
///
/// ```
/// use mongodb_repro_installer::artefact::distro::Distro;
///
/// let distro: Distro = "rhel70".try_into().expect("valid distribution");
/// assert!(!distro.is_windows());
/// assert!(Distro::WINDOWS.is_windows());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Distro(&'static str);

impl Distro {
    /// The Windows sentinel distribution.
    pub const WINDOWS: Self = Self(WINDOWS_SENTINEL);

    /// Return the tag as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.0
    }

    /// Whether this is the Windows sentinel rather than a Linux tag.
    #[must_use]
    pub fn is_windows(self) -> bool {
        self.0 == WINDOWS_SENTINEL
    }

    /// Return the full list of supported Linux distribution tags.
    #[must_use]
    pub const fn linux() -> &'static [&'static str] {
        LINUX_DISTROS
    }
}

impl TryFrom<&str> for Distro {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self> {
        if value == WINDOWS_SENTINEL {
            return Ok(Self::WINDOWS);
        }
        LINUX_DISTROS
            .iter()
            .find(|tag| **tag == value)
            .map(|tag| Self(*tag))
            .ok_or_else(|| ValidationError::UnsupportedDistro {
                value: value.to_owned(),
                expected: format!("{}, {WINDOWS_SENTINEL}", LINUX_DISTROS.join(", ")),
            })
    }
}

impl fmt::Display for Distro {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

//! Hardware architecture and operating system of a MongoDB build.
//!
//! Both types are closed enumerations: an unknown value is rejected at
//! construction time with a [`ValidationError`] listing the accepted values.

use super::error::{Result, ValidationError};
use super::format::ArchiveFormat;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A supported hardware architecture.
///
/// # Examples
///
/// ```
/// use mongodb_repro_installer::artefact::platform::Arch;
///
/// let arch: Arch = "ppc64le".try_into().expect("valid architecture");
/// assert_eq!(arch.as_str(), "ppc64le");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Arch {
    /// 64-bit x86.
    #[serde(rename = "x86_64")]
    X86_64,
    /// 64-bit ARM.
    #[serde(rename = "aarch64")]
    Aarch64,
    /// Little-endian POWER.
    #[serde(rename = "ppc64le")]
    Ppc64le,
    /// IBM Z.
    #[serde(rename = "s390x")]
    S390x,
}

impl Arch {
    /// Every supported architecture.
    pub const ALL: [Self; 4] = [Self::X86_64, Self::Aarch64, Self::Ppc64le, Self::S390x];

    /// Return the token used in archive names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::X86_64 => "x86_64",
            Self::Aarch64 => "aarch64",
            Self::Ppc64le => "ppc64le",
            Self::S390x => "s390x",
        }
    }
}

impl TryFrom<&str> for Arch {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|arch| arch.as_str() == value)
            .ok_or_else(|| ValidationError::UnsupportedArch {
                value: value.to_owned(),
                expected: joined(Self::ALL.map(Self::as_str)),
            })
    }
}

impl FromStr for Arch {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value)
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A supported operating system.
///
/// The Windows platform is named `win32` by the download service; `windows`
/// is accepted as an alias when parsing caller input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Os {
    /// Linux; builds are further qualified by a distribution tag.
    #[serde(rename = "linux")]
    Linux,
    /// macOS.
    #[serde(rename = "macos")]
    MacOs,
    /// Windows.
    #[serde(rename = "win32")]
    Windows,
}

impl Os {
    /// Every supported operating system.
    pub const ALL: [Self; 3] = [Self::Linux, Self::MacOs, Self::Windows];

    /// Return the canonical platform name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::MacOs => "macos",
            Self::Windows => "win32",
        }
    }

    /// Return the directory segment under the download host.
    ///
    /// macOS builds live under `osx/` whatever their filename says.
    #[must_use]
    pub const fn url_directory(self) -> &'static str {
        match self {
            Self::Linux => "linux/",
            Self::MacOs => "osx/",
            Self::Windows => "win32/",
        }
    }

    /// Return the archive format the download service ships for this platform.
    #[must_use]
    pub const fn archive_format(self) -> ArchiveFormat {
        match self {
            Self::Windows => ArchiveFormat::Zip,
            Self::Linux | Self::MacOs => ArchiveFormat::TarGz,
        }
    }
}

impl TryFrom<&str> for Os {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self> {
        if value == "windows" {
            return Ok(Self::Windows);
        }
        Self::ALL
            .into_iter()
            .find(|os| os.as_str() == value)
            .ok_or_else(|| ValidationError::UnsupportedOs {
                value: value.to_owned(),
                expected: joined(Self::ALL.map(Self::as_str)),
            })
    }
}

impl FromStr for Os {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self> {
        Self::try_from(value)
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn joined<const N: usize>(values: [&str; N]) -> String {
    values.join(", ")
}

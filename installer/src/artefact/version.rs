//! The validated descriptor of a MongoDB server build.

use super::distro::Distro;
use super::error::{Result, ValidationError};
use super::naming::{Hosts, Location};
use super::platform::{Arch, Os};
use super::release::{Edition, Release, ReleaseBounds};
use std::fmt;

/// A MongoDB build: architecture, platform, distribution, and release.
///
/// A `Version` can only be obtained through validation, so every value is
/// resolvable to a download location. Fields are read through accessors.
///
/// # Examples
///
/// ```
/// use mongodb_repro_installer::artefact::distro::Distro;
/// use mongodb_repro_installer::artefact::platform::{Arch, Os};
/// use mongodb_repro_installer::artefact::release::{Edition, Release, ReleaseBounds};
/// use mongodb_repro_installer::artefact::version::Version;
///
/// let version = Version::new(
///     Arch::X86_64,
///     Os::Linux,
///     Some(Distro::try_from("ubuntu1604").expect("valid distribution")),
///     Release::new(4, 2, 5, Edition::Community),
///     &ReleaseBounds::default(),
/// )
/// .expect("valid build");
///
/// assert_eq!(
///     version.to_location().url(),
///     "https://fastdl.mongodb.org/linux/mongodb-linux-x86_64-ubuntu1604-4.2.5.tgz"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Version {
    arch: Arch,
    os: Os,
    distro: Option<Distro>,
    release: Release,
}

impl Version {
    /// Validate and assemble a build descriptor.
    ///
    /// Windows builds without a distribution receive the `windows-64`
    /// sentinel.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MissingDistro`] for a Linux build without
    /// a distribution, [`ValidationError::DistroMismatch`] when the
    /// distribution does not belong to `os`, and
    /// [`ValidationError::ReleaseOutOfRange`] when the release falls outside
    /// `bounds`.
    pub fn new(
        arch: Arch,
        os: Os,
        distro: Option<Distro>,
        release: Release,
        bounds: &ReleaseBounds,
    ) -> Result<Self> {
        let distro = normalise_distro(os, distro)?;
        bounds.check(&release)?;
        Ok(Self {
            arch,
            os,
            distro,
            release,
        })
    }

    /// Validate a build descriptor given as text fields.
    ///
    /// An empty `distro` means "none".
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for the first field that fails to
    /// parse or validate.
    pub fn from_parts(
        arch: &str,
        os: &str,
        distro: &str,
        release: &str,
        edition: Edition,
        bounds: &ReleaseBounds,
    ) -> Result<Self> {
        let arch = Arch::try_from(arch)?;
        let os = Os::try_from(os)?;
        let distro = match distro {
            "" => None,
            tag => Some(Distro::try_from(tag)?),
        };
        let release = Release::parse(release, edition)?;
        Self::new(arch, os, distro, release, bounds)
    }

    /// Return the hardware architecture.
    #[must_use]
    pub const fn arch(&self) -> Arch {
        self.arch
    }

    /// Return the operating system.
    #[must_use]
    pub const fn os(&self) -> Os {
        self.os
    }

    /// Return the distribution; `None` only for macOS.
    #[must_use]
    pub const fn distro(&self) -> Option<Distro> {
        self.distro
    }

    /// Return the release.
    #[must_use]
    pub const fn release(&self) -> &Release {
        &self.release
    }

    /// Resolve the download location using the public download hosts.
    #[must_use]
    pub fn to_location(&self) -> Location {
        self.to_location_with(&Hosts::default())
    }

    /// Resolve the download location against the given hosts.
    #[must_use]
    pub fn to_location_with(&self, hosts: &Hosts) -> Location {
        Location::resolve(self, hosts)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.release.edition().label(), self.release, self.os)?;
        if let Some(distro) = self.distro.filter(|d| !d.is_windows()) {
            write!(f, " {distro}")?;
        }
        write!(f, " {}", self.arch)
    }
}

fn normalise_distro(os: Os, distro: Option<Distro>) -> Result<Option<Distro>> {
    match (os, distro) {
        (Os::Windows, None) => Ok(Some(Distro::WINDOWS)),
        (Os::Windows, Some(d)) if d.is_windows() => Ok(Some(d)),
        (Os::Linux, Some(d)) if !d.is_windows() => Ok(Some(d)),
        (Os::MacOs, None) => Ok(None),
        (Os::Linux, None) => Err(ValidationError::MissingDistro {
            os: os.to_string(),
        }),
        (_, Some(d)) => Err(ValidationError::DistroMismatch {
            os: os.to_string(),
            distro: d.to_string(),
        }),
    }
}

//! Release numbers, pre-release modifiers, editions, and release bounds.
//!
//! A release is the `version.major.minor` triple plus an optional
//! pre-release modifier such as `rc1`, qualified by the edition. Which
//! triples are acceptable is not hard-coded: [`ReleaseBounds`] is a table
//! loaded from configuration so new release series can be admitted without
//! a code change.

use super::error::{Result, ValidationError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest modifier accepted, in bytes.
const MAX_MODIFIER_LEN: usize = 16;

/// Server edition; selects both the download host and the filename token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Edition {
    /// Enterprise Advanced builds.
    Enterprise,
    /// Community builds.
    Community,
}

impl Edition {
    /// Whether this is the enterprise edition.
    #[must_use]
    pub const fn is_enterprise(self) -> bool {
        matches!(self, Self::Enterprise)
    }

    /// Return the edition name for display.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Enterprise => "Enterprise",
            Self::Community => "Community",
        }
    }
}

/// A pre-release tag such as `rc1`.
///
/// # Examples
///
/// ```
/// use mongodb_repro_installer::artefact::release::Modifier;
///
/// let modifier = Modifier::try_from("rc1").expect("valid modifier");
/// assert_eq!(modifier.as_str(), "rc1");
/// assert!(Modifier::try_from("rc-1").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Modifier(String);

impl Modifier {
    /// Return the modifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<&str> for Modifier {
    type Error = ValidationError;

    fn try_from(value: &str) -> Result<Self> {
        let reason = if value.is_empty() {
            Some("modifier is empty".to_owned())
        } else if value.len() > MAX_MODIFIER_LEN {
            Some(format!("modifier is longer than {MAX_MODIFIER_LEN} characters"))
        } else if !value.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Some("modifier must be ASCII letters and digits".to_owned())
        } else {
            None
        };

        match reason {
            Some(reason) => Err(ValidationError::InvalidModifier {
                value: value.to_owned(),
                reason,
            }),
            None => Ok(Self(value.to_owned())),
        }
    }
}

impl fmt::Display for Modifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Names the three numbers of a release triple in error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReleaseField {
    /// The leading release series number.
    Version,
    /// The major number within the series.
    Major,
    /// The minor (patch) number.
    Minor,
}

impl fmt::Display for ReleaseField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Version => "version",
            Self::Major => "major",
            Self::Minor => "minor",
        })
    }
}

/// A MongoDB release: number triple, optional modifier, and edition.
///
/// # Examples
///
/// ```
/// use mongodb_repro_installer::artefact::release::{Edition, Release};
///
/// let release = Release::parse("4.4.0-rc1", Edition::Community).expect("valid release");
/// assert_eq!(release.triple(), (4, 4, 0));
/// assert_eq!(release.to_string(), "4.4.0-rc1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Release {
    version: u32,
    major: u32,
    minor: u32,
    modifier: Option<Modifier>,
    edition: Edition,
}

impl Release {
    /// Create a release without a modifier.
    #[must_use]
    pub const fn new(version: u32, major: u32, minor: u32, edition: Edition) -> Self {
        Self {
            version,
            major,
            minor,
            modifier: None,
            edition,
        }
    }

    /// Attach a pre-release modifier.
    #[must_use]
    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifier = Some(modifier);
        self
    }

    /// Parse `X.Y.Z` or `X.Y.Z-modifier` text.
    ///
    /// Bounds are not checked here; that happens when the release becomes
    /// part of a [`super::version::Version`].
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidRelease`] when the text is not a
    /// dotted triple of unsigned integers, or
    /// [`ValidationError::InvalidModifier`] when the suffix is malformed.
    pub fn parse(text: &str, edition: Edition) -> Result<Self> {
        let (numbers, modifier) = match text.split_once('-') {
            Some((numbers, modifier)) => (numbers, Some(Modifier::try_from(modifier)?)),
            None => (text, None),
        };

        let (version, major, minor) =
            parse_triple(numbers).ok_or_else(|| ValidationError::InvalidRelease {
                value: text.to_owned(),
                reason: "expected three dot-separated numbers such as 4.2.9".to_owned(),
            })?;

        let release = Self::new(version, major, minor, edition);
        Ok(match modifier {
            Some(modifier) => release.with_modifier(modifier),
            None => release,
        })
    }

    /// Return the `(version, major, minor)` triple.
    #[must_use]
    pub const fn triple(&self) -> (u32, u32, u32) {
        (self.version, self.major, self.minor)
    }

    /// Return the pre-release modifier, if any.
    #[must_use]
    pub fn modifier(&self) -> Option<&Modifier> {
        self.modifier.as_ref()
    }

    /// Return the edition.
    #[must_use]
    pub const fn edition(&self) -> Edition {
        self.edition
    }

    /// Whether the release is at or after `version.major`.
    #[must_use]
    pub const fn is_at_least(&self, version: u32, major: u32) -> bool {
        self.version > version || (self.version == version && self.major >= major)
    }
}

/// Formats the triple and modifier as they appear in archive names.
impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.version, self.major, self.minor)?;
        if let Some(modifier) = &self.modifier {
            write!(f, "-{modifier}")?;
        }
        Ok(())
    }
}

/// Parse a `X.Y.Z` triple of unsigned integers.
pub(crate) fn parse_triple(text: &str) -> Option<(u32, u32, u32)> {
    let mut parts = text.split('.');
    let version = parse_number(parts.next()?)?;
    let major = parse_number(parts.next()?)?;
    let minor = parse_number(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    Some((version, major, minor))
}

fn parse_number(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// An inclusive numeric range in the release bounds table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Bound {
    /// Lowest accepted value.
    pub min: u32,
    /// Highest accepted value.
    pub max: u32,
}

impl Bound {
    /// Create an inclusive bound.
    #[must_use]
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    fn check(self, field: ReleaseField, value: u32) -> Result<()> {
        if (self.min..=self.max).contains(&value) {
            Ok(())
        } else {
            Err(ValidationError::ReleaseOutOfRange {
                field,
                value,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// The table of acceptable release numbers.
///
/// Loaded from the `[release_bounds]` section of the configuration file;
/// any omitted entry keeps its default.
///
/// ```toml
/// [release_bounds]
/// version = { min = 3, max = 8 }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReleaseBounds {
    /// Accepted release series numbers.
    pub version: Bound,
    /// Accepted major numbers.
    pub major: Bound,
    /// Accepted minor numbers.
    pub minor: Bound,
}

impl ReleaseBounds {
    /// Check every number of `release` against the table.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::ReleaseOutOfRange`] naming the first
    /// number that falls outside its bound.
    pub fn check(&self, release: &Release) -> Result<()> {
        let (version, major, minor) = release.triple();
        self.version.check(ReleaseField::Version, version)?;
        self.major.check(ReleaseField::Major, major)?;
        self.minor.check(ReleaseField::Minor, minor)
    }
}

impl Default for ReleaseBounds {
    fn default() -> Self {
        Self {
            version: Bound::new(2, 8),
            major: Bound::new(0, 9),
            minor: Bound::new(0, 40),
        }
    }
}

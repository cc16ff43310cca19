//! Reverse resolution: archive names back to build descriptors.
//!
//! The grammar is
//! `mongodb-<os-token>-<arch>[-enterprise][-<distro>]-<X.Y.Z>[-<modifier>][.<ext>]`.
//! Names are consumed left to right by a small tokenizer. Distribution tags
//! may themselves contain hyphens (`windows-64`), so every segment before the
//! first `X.Y.Z` triple belongs to the distribution.

use super::distro::Distro;
use super::error::ValidationError;
use super::format::ArchiveFormat;
use super::naming::{ENTERPRISE_TOKEN, NAME_PREFIX, OsToken};
use super::platform::Arch;
use super::release::{Edition, Modifier, Release, ReleaseBounds, parse_triple};
use super::version::Version;
use thiserror::Error;

/// Errors raised while reading an archive name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilenameError {
    /// The name does not follow the archive naming grammar.
    #[error("\"{filename}\" is not a MongoDB archive name: expected {expected}")]
    Grammar {
        /// The rejected name.
        filename: String,
        /// What the tokenizer expected at the point of failure.
        expected: &'static str,
    },

    /// The extension contradicts the platform named in the archive.
    #[error("\"{filename}\" has extension {extension}, which its platform is not published as")]
    ExtensionMismatch {
        /// The rejected name.
        filename: String,
        /// The conflicting extension.
        extension: &'static str,
    },

    /// The name is well formed but describes an invalid build.
    #[error("\"{filename}\" names an invalid build: {source}")]
    Invalid {
        /// The rejected name.
        filename: String,
        /// The validation failure.
        #[source]
        source: ValidationError,
    },
}

/// Result type alias using [`FilenameError`].
pub type Result<T> = std::result::Result<T, FilenameError>;

/// The pieces of an archive name before validation.
#[derive(Debug, PartialEq, Eq)]
struct Tokens<'a> {
    os: OsToken,
    arch: &'a str,
    edition: Edition,
    distro: Option<String>,
    triple: (u32, u32, u32),
    modifier: Option<&'a str>,
}

/// Parse an archive name, with or without extension, into a [`Version`].
///
/// # Examples
///
/// ```
/// use mongodb_repro_installer::artefact::filename::to_version;
/// use mongodb_repro_installer::artefact::platform::Os;
/// use mongodb_repro_installer::artefact::release::ReleaseBounds;
///
/// let version = to_version(
///     "mongodb-osx-ssl-x86_64-4.0.19.tgz",
///     &ReleaseBounds::default(),
/// )
/// .expect("valid archive name");
/// assert_eq!(version.os(), Os::MacOs);
/// assert!(!version.release().edition().is_enterprise());
/// ```
///
/// # Errors
///
/// Returns [`FilenameError::Grammar`] when the name does not match the
/// grammar, [`FilenameError::ExtensionMismatch`] when a `.zip` names a
/// non-Windows build or a `.tgz` names a Windows build, and
/// [`FilenameError::Invalid`] when the parsed build fails validation.
pub fn to_version(filename: &str, bounds: &ReleaseBounds) -> Result<Version> {
    let (stem, extension) = split_extension(filename);
    let tokens = tokenize(stem).map_err(|expected| FilenameError::Grammar {
        filename: filename.to_owned(),
        expected,
    })?;

    let os = tokens.os.os();
    if let Some(format) = extension
        && format != os.archive_format()
    {
        return Err(FilenameError::ExtensionMismatch {
            filename: filename.to_owned(),
            extension: format.extension(),
        });
    }

    build(&tokens, bounds).map_err(|source| FilenameError::Invalid {
        filename: filename.to_owned(),
        source,
    })
}

fn split_extension(filename: &str) -> (&str, Option<ArchiveFormat>) {
    [ArchiveFormat::TarGz, ArchiveFormat::Zip]
        .into_iter()
        .find_map(|format| {
            filename
                .strip_suffix(format.extension())
                .map(|stem| (stem, Some(format)))
        })
        .unwrap_or((filename, None))
}

fn tokenize(stem: &str) -> std::result::Result<Tokens<'_>, &'static str> {
    let rest = stem.strip_prefix(NAME_PREFIX).ok_or("the \"mongodb-\" prefix")?;

    let (os, rest) = OsToken::PARSE_ORDER
        .into_iter()
        .find_map(|token| {
            rest.strip_prefix(token.as_str())
                .and_then(|r| r.strip_prefix('-'))
                .map(|r| (token, r))
        })
        .ok_or("an OS token (linux, macos, osx, osx-ssl, win32)")?;

    let (arch, rest) = rest.split_once('-').ok_or("an architecture followed by a release")?;

    let (edition, rest) = match rest
        .strip_prefix(ENTERPRISE_TOKEN)
        .and_then(|r| r.strip_prefix('-'))
    {
        Some(r) => (Edition::Enterprise, r),
        None => (Edition::Community, rest),
    };

    let mut segments = rest.split('-');
    let mut distro_parts = Vec::new();
    let triple = loop {
        match segments.next() {
            Some(segment) => match parse_triple(segment) {
                Some(triple) => break triple,
                None => distro_parts.push(segment),
            },
            None => return Err("a release number such as 4.2.5"),
        }
    };
    let modifier = segments.next();
    if segments.next().is_some() {
        return Err("at most one modifier after the release number");
    }

    Ok(Tokens {
        os,
        arch,
        edition,
        distro: (!distro_parts.is_empty()).then(|| distro_parts.join("-")),
        triple,
        modifier,
    })
}

fn build(tokens: &Tokens<'_>, bounds: &ReleaseBounds) -> std::result::Result<Version, ValidationError> {
    let arch = Arch::try_from(tokens.arch)?;
    let distro = tokens.distro.as_deref().map(Distro::try_from).transpose()?;
    let (version, major, minor) = tokens.triple;
    let mut release = Release::new(version, major, minor, tokens.edition);
    if let Some(modifier) = tokens.modifier {
        release = release.with_modifier(Modifier::try_from(modifier)?);
    }
    Version::new(arch, tokens.os.os(), distro, release, bounds)
}

#[cfg(test)]
#[path = "filename_tests.rs"]
mod tests;

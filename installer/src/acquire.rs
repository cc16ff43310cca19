//! Archive acquisition: resolve, download, and unpack a build.
//!
//! [`download_archive`] fetches one URL and expands it under a destination
//! root. [`acquire`] adds name resolution and the single cache rule: when
//! the build's directory already exists under the binary directory, nothing
//! is fetched.
//!
//! The fetch always completes before extraction starts, and a failed fetch
//! leaves the destination untouched.

use camino::Utf8PathBuf;
use std::io::Write;
use std::path::Path;

use crate::artefact::download::{ArchiveFetcher, DownloadError, HttpFetcher};
use crate::artefact::extraction::{ArchiveExtractor, ExtractionError, FsExtractor};
use crate::artefact::format::ArchiveFormat;
use crate::artefact::version::Version;
use crate::config::Settings;
use crate::output::write_stderr_line;

/// Errors arising from the acquisition pipeline.
#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    /// The URL could not be parsed.
    #[error("invalid download URL \"{url}\": {reason}")]
    InvalidUrl {
        /// The rejected URL.
        url: String,
        /// The parser's description of the problem.
        reason: String,
    },

    /// The archive could not be retrieved.
    #[error(transparent)]
    Download(#[from] DownloadError),

    /// The archive could not be expanded.
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

/// Result type alias using [`AcquireError`].
pub type Result<T> = std::result::Result<T, AcquireError>;

/// What [`acquire`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquireOutcome {
    /// The archive was downloaded and unpacked.
    Fetched {
        /// The build's directory under the binary directory.
        path: Utf8PathBuf,
        /// Number of regular files written.
        files: usize,
    },
    /// The build's directory already existed; nothing was fetched.
    AlreadyPresent {
        /// The existing directory.
        path: Utf8PathBuf,
    },
}

impl AcquireOutcome {
    /// Return the build's directory.
    #[must_use]
    pub fn path(&self) -> &Utf8PathBuf {
        match self {
            Self::Fetched { path, .. } | Self::AlreadyPresent { path } => path,
        }
    }
}

/// Download `url` and expand it under `dest_root`.
///
/// Returns the number of regular files written.
///
/// # Errors
///
/// Returns [`AcquireError::Extraction`] with
/// [`ExtractionError::UnsupportedFormat`] when the URL does not end in
/// `.zip`, `.tgz`, or `.tar.gz` (checked before any request is made),
/// [`AcquireError::Download`] when the fetch fails, and
/// [`AcquireError::Extraction`] when the archive cannot be expanded.
pub fn download_archive(dest_root: &Path, url: &str, timeout_secs: u64) -> Result<usize> {
    let fetcher = HttpFetcher::new(std::time::Duration::from_secs(timeout_secs));
    download_archive_with(dest_root, url, &fetcher, &FsExtractor)
}

/// Testable inner function with injected dependencies.
///
/// # Errors
///
/// See [`download_archive`].
pub fn download_archive_with(
    dest_root: &Path,
    url: &str,
    fetcher: &dyn ArchiveFetcher,
    extractor: &dyn ArchiveExtractor,
) -> Result<usize> {
    let format = format_for_url(url)?;
    let bytes = fetcher.fetch(url)?;
    Ok(extractor.extract(&bytes, format, dest_root)?)
}

/// Resolve `version`, then download and unpack it into the binary
/// directory unless it is already there.
///
/// Progress lines are written to `progress`; pass [`std::io::sink`] to
/// silence them.
///
/// # Errors
///
/// See [`download_archive`].
pub fn acquire(
    version: &Version,
    settings: &Settings,
    progress: &mut dyn Write,
) -> Result<AcquireOutcome> {
    let fetcher = HttpFetcher::new(settings.timeout());
    acquire_with(version, settings, &fetcher, &FsExtractor, progress)
}

/// Testable inner function with injected dependencies.
///
/// # Errors
///
/// See [`download_archive`].
pub fn acquire_with(
    version: &Version,
    settings: &Settings,
    fetcher: &dyn ArchiveFetcher,
    extractor: &dyn ArchiveExtractor,
    progress: &mut dyn Write,
) -> Result<AcquireOutcome> {
    let location = version.to_location_with(&settings.hosts);
    let path = settings.binary_dir.join(location.filename());

    if path.exists() {
        log::debug!("{version} is already present at {path}; skipping download");
        return Ok(AcquireOutcome::AlreadyPresent { path });
    }

    let url = location.url();
    write_stderr_line(progress, format!("Downloading {url}..."));
    let files = download_archive_with(settings.binary_dir.as_std_path(), &url, fetcher, extractor)?;
    log::debug!("unpacked {files} files into {path}");

    Ok(AcquireOutcome::Fetched { path, files })
}

/// Derive the archive format from the extension of the URL's path.
///
/// Query strings and fragments are ignored.
///
/// # Errors
///
/// Returns [`AcquireError::InvalidUrl`] when the URL cannot be parsed and
/// [`ExtractionError::UnsupportedFormat`] when the extension is unknown.
pub fn format_for_url(url: &str) -> Result<ArchiveFormat> {
    let uri: ureq::http::Uri = url.parse().map_err(|e: ureq::http::uri::InvalidUri| {
        AcquireError::InvalidUrl {
            url: url.to_owned(),
            reason: e.to_string(),
        }
    })?;
    let name = uri.path().rsplit('/').next().unwrap_or_default();
    ArchiveFormat::detect(name).ok_or_else(|| {
        AcquireError::Extraction(ExtractionError::UnsupportedFormat {
            name: name.to_owned(),
        })
    })
}

#[cfg(test)]
#[path = "acquire_tests.rs"]
mod tests;

//! Network retrieval of build archives.
//!
//! A fetch is a single GET bound to a fixed timeout that buffers the whole
//! body in memory. The trait seam lets the acquisition pipeline run against
//! a mock in tests.

use std::io::Read;
use std::time::Duration;

/// Trait for retrieving an archive by URL.
///
/// # Examples
///
/// ```no_run
/// use mongodb_repro_installer::artefact::download::{ArchiveFetcher, HttpFetcher};
/// use std::time::Duration;
///
/// let fetcher = HttpFetcher::new(Duration::from_secs(60));
/// let bytes = fetcher.fetch("https://fastdl.mongodb.org/linux/mongodb-linux-x86_64-ubuntu1604-4.2.5.tgz");
/// # let _ = bytes;
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveFetcher {
    /// Retrieve the full body at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`DownloadError::Status`] for a non-success status and
    /// [`DownloadError::Transport`] for connection failures and timeouts.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError>;
}

/// Errors arising from archive retrieval.
#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    /// The server answered with a non-success status.
    #[error("download of {url} failed with HTTP status {status}")]
    Status {
        /// The URL that was requested.
        url: String,
        /// The status code returned.
        status: u16,
    },

    /// The request could not be completed.
    #[error("download of {url} failed: {reason}")]
    Transport {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },
}

/// HTTP fetcher using a `ureq` agent with a global request timeout.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher whose requests are bounded by `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl ArchiveFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, DownloadError> {
        log::info!("downloading {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;

        // The reader imposes no size cap; server archives exceed ureq's
        // default body limit.
        let mut bytes = Vec::new();
        response
            .into_body()
            .into_reader()
            .read_to_end(&mut bytes)
            .map_err(|e| DownloadError::Transport {
                url: url.to_owned(),
                reason: e.to_string(),
            })?;
        log::info!("downloaded {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

/// Retrieve `url` in one request bounded by `timeout_secs`.
///
/// # Errors
///
/// Returns a [`DownloadError`] on non-success status, network failure, or
/// timeout.
pub fn download(url: &str, timeout_secs: u64) -> Result<Vec<u8>, DownloadError> {
    HttpFetcher::new(Duration::from_secs(timeout_secs)).fetch(url)
}

/// Map a ureq error to a [`DownloadError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> DownloadError {
    match err {
        ureq::Error::StatusCode(status) => DownloadError::Status {
            url: url.to_owned(),
            status: *status,
        },
        other => DownloadError::Transport {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}

//! Settings loaded from an optional TOML file and command-line overrides.
//!
//! Every path and policy the pipeline needs is carried in [`Settings`] and
//! passed in explicitly. Values come from, in increasing precedence: built-in
//! defaults, the configuration file, then command-line flags.
//!
//! ```toml
//! binary_dir = "/opt/mongodb-binaries"
//! timeout_secs = 120
//!
//! [hosts]
//! enterprise = "https://downloads.mongodb.com/"
//! community = "https://fastdl.mongodb.org/"
//!
//! [release_bounds]
//! version = { min = 2, max = 8 }
//! ```

use crate::artefact::naming::Hosts;
use crate::artefact::release::ReleaseBounds;
use crate::dirs::BaseDirs;
use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Directory under the platform configuration directory holding the file.
pub const CONFIG_DIR_NAME: &str = "mongodb-repro";

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Directory under the home directory that receives unpacked builds.
const DEFAULT_BINARY_DIR_NAME: &str = "mongodb-binaries";

/// Request timeout applied when nothing else is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Errors arising while assembling [`Settings`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        /// The file that was read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid.
    #[error("invalid configuration file {path}: {reason}")]
    Parse {
        /// The file that was parsed.
        path: Utf8PathBuf,
        /// The parser's description of the problem.
        reason: String,
    },

    /// No binary directory was configured and the home directory is unknown.
    #[error("could not determine a binary directory; pass --binary-dir or set binary_dir")]
    NoBinaryDir,

    /// A platform directory is not valid UTF-8.
    #[error("directory is not valid UTF-8: {}", path.display())]
    NonUtf8Path {
        /// The offending path.
        path: PathBuf,
    },

    /// A zero timeout would fail every request immediately.
    #[error("timeout must be at least one second")]
    ZeroTimeout,
}

/// Result type alias using [`ConfigError`].
pub type Result<T> = std::result::Result<T, ConfigError>;

/// The on-disk configuration file; every entry is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Where archives are unpacked.
    pub binary_dir: Option<Utf8PathBuf>,
    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,
    /// Download hosts per edition.
    pub hosts: Hosts,
    /// Acceptable release numbers.
    pub release_bounds: ReleaseBounds,
}

impl ConfigFile {
    /// Parse configuration text; `path` is used in error messages.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn parse(text: &str, path: &Utf8Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            reason: e.to_string(),
        })
    }

    /// Read and parse the file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] when the file cannot be read and
    /// [`ConfigError::Parse`] when it is invalid.
    pub fn load(path: &Utf8Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_owned(),
            source,
        })?;
        Self::parse(&text, path)
    }
}

/// Values supplied on the command line, overriding the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    /// Explicit configuration file; it must exist when given.
    pub config: Option<Utf8PathBuf>,
    /// Binary directory override.
    pub binary_dir: Option<Utf8PathBuf>,
    /// Timeout override in seconds.
    pub timeout_secs: Option<u64>,
}

/// Resolved settings passed to the resolver, fetcher, and lister.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Where archives are unpacked and listed from.
    pub binary_dir: Utf8PathBuf,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Download hosts per edition.
    pub hosts: Hosts,
    /// Acceptable release numbers.
    pub release_bounds: ReleaseBounds,
}

impl Settings {
    /// Create settings with default hosts, bounds, and timeout.
    #[must_use]
    pub fn new(binary_dir: Utf8PathBuf) -> Self {
        Self {
            binary_dir,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            hosts: Hosts::default(),
            release_bounds: ReleaseBounds::default(),
        }
    }

    /// Return the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Assemble settings from defaults, the configuration file, and overrides.
///
/// Without `--config`, the file at
/// `<config dir>/mongodb-repro/config.toml` is used when it exists.
///
/// # Errors
///
/// Returns a [`ConfigError`] when the file cannot be read or parsed, when no
/// binary directory can be determined, or when the timeout is zero.
pub fn load_settings(overrides: &Overrides, dirs: &dyn BaseDirs) -> Result<Settings> {
    let file = match &overrides.config {
        Some(path) => ConfigFile::load(path)?,
        None => match default_config_path(dirs)? {
            Some(path) if path.is_file() => {
                log::debug!("loading configuration from {path}");
                ConfigFile::load(&path)?
            }
            _ => ConfigFile::default(),
        },
    };

    let binary_dir = match overrides.binary_dir.clone().or(file.binary_dir) {
        Some(dir) => dir,
        None => default_binary_dir(dirs)?,
    };
    let timeout_secs = overrides
        .timeout_secs
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::ZeroTimeout);
    }

    Ok(Settings {
        binary_dir,
        timeout_secs,
        hosts: file.hosts,
        release_bounds: file.release_bounds,
    })
}

/// Return the default configuration file path, if a configuration
/// directory exists on this platform.
///
/// # Errors
///
/// Returns [`ConfigError::NonUtf8Path`] when the directory is not UTF-8.
pub fn default_config_path(dirs: &dyn BaseDirs) -> Result<Option<Utf8PathBuf>> {
    dirs.config_dir()
        .map(|dir| utf8(dir).map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME)))
        .transpose()
}

fn default_binary_dir(dirs: &dyn BaseDirs) -> Result<Utf8PathBuf> {
    let home = dirs.home_dir().ok_or(ConfigError::NoBinaryDir)?;
    Ok(utf8(home)?.join(DEFAULT_BINARY_DIR_NAME))
}

fn utf8(path: PathBuf) -> Result<Utf8PathBuf> {
    Utf8PathBuf::from_path_buf(path).map_err(|path| ConfigError::NonUtf8Path { path })
}

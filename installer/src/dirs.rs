//! Directory resolution abstraction for platform-specific paths.
//!
//! Settings defaults depend on the user's home and configuration
//! directories. Resolving them through a trait keeps those lookups out of
//! unit tests.

use std::path::PathBuf;

/// Provides the base directories the tool derives its defaults from.
#[cfg_attr(test, mockall::automock)]
pub trait BaseDirs {
    /// Return the user's home directory.
    fn home_dir(&self) -> Option<PathBuf>;

    /// Return the platform configuration directory (for example
    /// `~/.config` on Linux).
    fn config_dir(&self) -> Option<PathBuf>;
}

/// [`BaseDirs`] backed by `directories-next`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemBaseDirs;

impl BaseDirs for SystemBaseDirs {
    fn home_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
    }

    fn config_dir(&self) -> Option<PathBuf> {
        directories_next::BaseDirs::new().map(|dirs| dirs.config_dir().to_path_buf())
    }
}

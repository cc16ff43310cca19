//! CLI argument definitions for `mongodb-repro`.
//!
//! This module defines the command-line interface using clap. It is separated
//! from the main entrypoint to keep the binary small and focused on
//! orchestration.

use crate::artefact::error::Result;
use crate::artefact::platform::Os;
use crate::artefact::release::{Edition, ReleaseBounds};
use crate::artefact::version::Version;
use crate::config::Overrides;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};

/// Distribution used for Linux builds when `--distro` is omitted.
pub const DEFAULT_LINUX_DISTRO: &str = "ubuntu1604";

/// Download and unpack MongoDB server builds for local reproductions.
#[derive(Parser, Debug)]
#[command(name = "mongodb-repro")]
#[command(version, about)]
#[command(long_about = concat!(
    "Download and unpack MongoDB server builds for local reproductions.\n\n",
    "Builds are identified by architecture, operating system, Linux ",
    "distribution, release, and edition. Each build is unpacked into its own ",
    "directory under the binary directory and is only downloaded once.",
))]
#[command(after_help = concat!(
    "EXAMPLES:\n",
    "  Fetch the default Enterprise build for Ubuntu 16.04:\n",
    "    $ mongodb-repro get\n\n",
    "  Fetch a Community release candidate for RHEL 8 on ARM:\n",
    "    $ mongodb-repro get --arch aarch64 --distro rhel80 --release 4.4.0-rc1 --community\n\n",
    "  Print the download URL for a macOS build:\n",
    "    $ mongodb-repro url --os macos --release 4.0.19\n\n",
    "  List unpacked builds:\n",
    "    $ mongodb-repro list --json",
))]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file [default: <config dir>/mongodb-repro/config.toml].
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Directory builds are unpacked into [default: ~/mongodb-binaries].
    #[arg(short, long, global = true, value_name = "DIR")]
    pub binary_dir: Option<Utf8PathBuf>,

    /// Download timeout in seconds [default: 60].
    #[arg(long, global = true, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Increase log verbosity (repeatable: -v, -vv, -vvv).
    #[arg(
        short,
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (errors still shown).
    #[arg(short, long, global = true, conflicts_with = "verbosity")]
    pub quiet: bool,
}

/// Available subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Download and unpack a build unless it is already present.
    Get(BuildArgs),

    /// Print where a build is published without downloading it.
    Url(BuildArgs),

    /// List builds unpacked in the binary directory.
    List(ListArgs),
}

/// Arguments describing one build.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct BuildArgs {
    /// Hardware architecture: x86_64, aarch64, ppc64le, or s390x.
    #[arg(long, default_value = "x86_64")]
    pub arch: String,

    /// Operating system: linux, macos, or win32.
    #[arg(long, default_value = "linux")]
    pub os: String,

    /// Linux distribution tag such as rhel80 [default on Linux: ubuntu1604].
    #[arg(long)]
    pub distro: Option<String>,

    /// Release, optionally with a pre-release modifier (e.g. 4.4.0-rc1).
    #[arg(long, default_value = "4.2.9")]
    pub release: String,

    /// Use the Community edition instead of Enterprise.
    #[arg(long)]
    pub community: bool,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ListArgs {
    /// Output in JSON format for scripting.
    #[arg(long)]
    pub json: bool,
}

impl BuildArgs {
    /// Return the requested edition.
    #[must_use]
    pub const fn edition(&self) -> Edition {
        if self.community {
            Edition::Community
        } else {
            Edition::Enterprise
        }
    }

    /// Validate the arguments into a [`Version`].
    ///
    /// A Linux build without `--distro` uses [`DEFAULT_LINUX_DISTRO`].
    ///
    /// # Examples
    ///
    /// ```
    /// use clap::Parser;
    /// use mongodb_repro_installer::artefact::release::ReleaseBounds;
    /// use mongodb_repro_installer::cli::{Cli, Command};
    ///
    /// let cli = Cli::parse_from(["mongodb-repro", "url", "--os", "win32"]);
    /// let Command::Url(args) = cli.command else { unreachable!() };
    /// let version = args.build_version(&ReleaseBounds::default()).unwrap();
    /// assert_eq!(
    ///     version.to_location().filename(),
    ///     "mongodb-win32-x86_64-enterprise-windows-64-4.2.9"
    /// );
    /// ```
    ///
    /// # Errors
    ///
    /// Returns a validation error for the first argument that is not
    /// acceptable.
    pub fn build_version(&self, bounds: &ReleaseBounds) -> Result<Version> {
        let distro = match (self.distro.as_deref(), Os::try_from(self.os.as_str())) {
            (Some(tag), _) => tag,
            (None, Ok(Os::Linux)) => DEFAULT_LINUX_DISTRO,
            (None, _) => "",
        };
        Version::from_parts(
            &self.arch,
            &self.os,
            distro,
            &self.release,
            self.edition(),
            bounds,
        )
    }
}

impl Cli {
    /// Collect the flags that override the configuration file.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            config: self.config.clone(),
            binary_dir: self.binary_dir.clone(),
            timeout_secs: self.timeout,
        }
    }

    /// Return the log level filter selected by `-v` and `-q`.
    #[must_use]
    pub const fn log_level(&self) -> log::LevelFilter {
        log_level_for(self.verbosity, self.quiet)
    }
}

/// Map the verbosity count to a log level; the default is `warn`.
#[must_use]
pub const fn log_level_for(verbosity: u8, quiet: bool) -> log::LevelFilter {
    if quiet {
        return log::LevelFilter::Error;
    }
    match verbosity {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;

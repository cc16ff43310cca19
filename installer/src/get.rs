//! Handlers for the `get` and `url` commands.
//!
//! Both validate the requested build first, so a bad argument never touches
//! the network or the binary directory.

use std::io::Write;

use crate::acquire::{AcquireOutcome, acquire_with};
use crate::artefact::download::{ArchiveFetcher, HttpFetcher};
use crate::artefact::extraction::{ArchiveExtractor, FsExtractor};
use crate::cli::BuildArgs;
use crate::config::Settings;
use crate::error::{ReproError, Result};
use crate::output::{LocationReport, outcome_message, write_stderr_line};

/// Download and unpack the requested build unless it is already present.
///
/// Progress goes to `stderr`; the build's directory is printed to `stdout`
/// so scripts can capture it.
///
/// # Errors
///
/// Returns an error if the arguments fail validation, the download or
/// extraction fails, or writing to stdout fails.
pub fn run_get(
    args: &BuildArgs,
    settings: &Settings,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<AcquireOutcome> {
    let fetcher = HttpFetcher::new(settings.timeout());
    run_get_with(args, settings, &fetcher, &FsExtractor, stdout, stderr)
}

/// Testable inner function with injected dependencies.
fn run_get_with(
    args: &BuildArgs,
    settings: &Settings,
    fetcher: &dyn ArchiveFetcher,
    extractor: &dyn ArchiveExtractor,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<AcquireOutcome> {
    let version = args.build_version(&settings.release_bounds)?;
    let outcome = acquire_with(&version, settings, fetcher, extractor, stderr)?;

    write_stderr_line(stderr, outcome_message(&outcome));
    writeln!(stdout, "{}", outcome.path()).map_err(|e| ReproError::WriteFailed { source: e })?;

    Ok(outcome)
}

/// Print where the requested build is published.
///
/// # Errors
///
/// Returns an error if the arguments fail validation or writing to stdout
/// fails.
pub fn run_url(args: &BuildArgs, settings: &Settings, stdout: &mut dyn Write) -> Result<()> {
    let version = args.build_version(&settings.release_bounds)?;
    let location = version.to_location_with(&settings.hosts);
    let report = LocationReport {
        version: &version,
        location: &location,
    };

    writeln!(stdout, "{}", report.display_text())
        .map_err(|e| ReproError::WriteFailed { source: e })?;

    Ok(())
}

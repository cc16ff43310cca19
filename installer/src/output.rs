//! Output helpers for the command-line surface.
//!
//! Progress lines go to stderr so stdout stays clean for URLs and listings.

use crate::acquire::AcquireOutcome;
use crate::artefact::naming::Location;
use crate::artefact::version::Version;
use std::fmt::Display;
use std::io::Write;

/// Write one line to `stderr`, ignoring write failures.
pub fn write_stderr_line(stderr: &mut dyn Write, message: impl Display) {
    if writeln!(stderr, "{message}").is_err() {
        // Best-effort progress; a closed stderr must not fail the run.
    }
}

/// Format the final message after an acquisition.
///
/// # Example
///
/// ```
/// use camino::Utf8PathBuf;
/// use mongodb_repro_installer::acquire::AcquireOutcome;
/// use mongodb_repro_installer::output::outcome_message;
///
/// let outcome = AcquireOutcome::Fetched {
///     path: Utf8PathBuf::from("/bin/mongodb-macos-x86_64-4.2.5"),
///     files: 1,
/// };
/// assert_eq!(outcome_message(&outcome), "Installed 1 file to /bin/mongodb-macos-x86_64-4.2.5");
/// ```
#[must_use]
pub fn outcome_message(outcome: &AcquireOutcome) -> String {
    match outcome {
        AcquireOutcome::Fetched { path, files } => {
            let plural = if *files == 1 { "file" } else { "files" };
            format!("Installed {files} {plural} to {path}")
        }
        AcquireOutcome::AlreadyPresent { path } => format!("Already installed at {path}"),
    }
}

/// Describes where a build is published, for the `url` subcommand.
#[derive(Debug)]
pub struct LocationReport<'a> {
    /// The requested build.
    pub version: &'a Version,
    /// Its resolved location.
    pub location: &'a Location,
}

impl LocationReport<'_> {
    /// Format the report; the URL is the last line.
    #[must_use]
    pub fn display_text(&self) -> String {
        [
            format!("Build: {}", self.version),
            format!("Archive: {}", self.location.archive_name()),
            format!("Directory: {}", self.location.filename()),
            self.location.url(),
        ]
        .join("\n")
    }
}

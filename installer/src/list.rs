//! List command implementation.
//!
//! This module provides the `run_list` command handler, which scans the
//! binary directory and prints the builds found there.

use camino::Utf8Path;
use log::debug;
use std::io::{self, Write};

use crate::artefact::release::ReleaseBounds;
use crate::cli::ListArgs;
use crate::config::Settings;
use crate::error::{ReproError, Result};
use crate::list_output::{format_human, format_json};
use crate::scanner::{Inventory, scan_inventory};

/// Lists the builds unpacked under the configured binary directory.
///
/// Output is written to stdout (human-readable by default, JSON with `--json`).
///
/// # Errors
///
/// Returns an error if:
/// - The binary directory exists but cannot be scanned
/// - Writing to stdout fails
pub fn run_list(args: &ListArgs, settings: &Settings, stdout: &mut dyn Write) -> Result<()> {
    run_list_with(args, settings, stdout, scan_inventory)
}

/// Internal implementation with an injectable scanner for testability.
fn run_list_with<F>(
    args: &ListArgs,
    settings: &Settings,
    stdout: &mut dyn Write,
    scan: F,
) -> Result<()>
where
    F: FnOnce(&Utf8Path, &ReleaseBounds) -> io::Result<Inventory>,
{
    let root = &settings.binary_dir;
    let inventory = scan(root, &settings.release_bounds).map_err(|e| ReproError::ScanFailed {
        root: root.clone(),
        source: e,
    })?;
    debug!(
        "found {} builds and {} other entries in {root}",
        inventory.entries.len(),
        inventory.rejected.len()
    );

    let output = if args.json {
        format_json(&inventory, root)
    } else {
        format_human(&inventory, root)
    };

    writeln!(stdout, "{output}").map_err(|e| ReproError::WriteFailed { source: e })?;

    Ok(())
}

//! Output formatting for the build inventory.
//!
//! This module formats a scanned [`Inventory`] for human-readable or JSON
//! output.

use camino::Utf8Path;
use serde::Serialize;

use crate::artefact::distro::Distro;
use crate::artefact::platform::{Arch, Os};
use crate::artefact::release::{Edition, Modifier};
use crate::scanner::{Inventory, InventoryEntry};

/// Format the inventory as an aligned table.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use mongodb_repro_installer::list_output::format_human;
/// use mongodb_repro_installer::scanner::Inventory;
///
/// let output = format_human(&Inventory::default(), Utf8Path::new("/opt/mongodb"));
/// assert!(output.contains("No builds found"));
/// ```
#[must_use]
pub fn format_human(inventory: &Inventory, root: &Utf8Path) -> String {
    if inventory.is_empty() {
        return format!(
            "No builds found in {root}.\n\nRun `mongodb-repro get` to download one."
        );
    }

    let mut lines = vec![format!("Builds in {root}:"), String::new()];

    if !inventory.entries.is_empty() {
        lines.push(row(["ARCH", "OS", "DISTRO", "RELEASE", "MODIFIER", "EDITION", "NAME"]));
        for entry in &inventory.entries {
            lines.push(entry_row(entry));
        }
    }

    if !inventory.rejected.is_empty() {
        lines.push(String::new());
        lines.push("Unrecognised entries:".to_owned());
        for rejected in &inventory.rejected {
            lines.push(format!("  {}: {}", rejected.name, rejected.reason));
        }
    }

    lines.join("\n")
}

fn entry_row(entry: &InventoryEntry) -> String {
    let version = &entry.version;
    let release = version.release();
    let (major, minor, patch) = release.triple();
    let triple = format!("{major}.{minor}.{patch}");
    row([
        version.arch().as_str(),
        version.os().as_str(),
        version.distro().map_or("-", Distro::as_str),
        &triple,
        release.modifier().map_or("-", Modifier::as_str),
        release.edition().label(),
        &entry.name,
    ])
}

fn row(cells: [&str; 7]) -> String {
    let [arch, os, distro, release, modifier, edition, name] = cells;
    format!("  {arch:<8} {os:<6} {distro:<11} {release:<8} {modifier:<9} {edition:<11} {name}")
        .trim_end()
        .to_owned()
}

/// Format the inventory as JSON.
///
/// # Examples
///
/// ```
/// use camino::Utf8Path;
/// use mongodb_repro_installer::list_output::format_json;
/// use mongodb_repro_installer::scanner::Inventory;
///
/// let json = format_json(&Inventory::default(), Utf8Path::new("/opt/mongodb"));
/// assert!(json.contains("\"builds\""));
/// ```
#[must_use]
pub fn format_json(inventory: &Inventory, root: &Utf8Path) -> String {
    let json_data = InventoryJson::from_inventory(inventory, root);
    serde_json::to_string_pretty(&json_data).unwrap_or_else(|_| "{}".to_owned())
}

/// JSON-serializable representation of an inventory.
#[derive(Debug, Serialize)]
pub struct InventoryJson {
    /// The scanned directory.
    pub root: String,
    /// Recognised builds.
    pub builds: Vec<BuildEntry>,
    /// Unrecognised entries.
    pub rejected: Vec<RejectedJson>,
}

impl InventoryJson {
    fn from_inventory(inventory: &Inventory, root: &Utf8Path) -> Self {
        let builds = inventory
            .entries
            .iter()
            .map(|entry| {
                let release = entry.version.release();
                let (major, minor, patch) = release.triple();
                BuildEntry {
                    name: entry.name.clone(),
                    arch: entry.version.arch(),
                    os: entry.version.os(),
                    distro: entry.version.distro(),
                    release: format!("{major}.{minor}.{patch}"),
                    modifier: release.modifier().map(|m| m.as_str().to_owned()),
                    edition: release.edition(),
                    url: entry.version.to_location().url(),
                }
            })
            .collect();
        let rejected = inventory
            .rejected
            .iter()
            .map(|r| RejectedJson {
                name: r.name.clone(),
                reason: r.reason.clone(),
            })
            .collect();

        Self {
            root: root.to_string(),
            builds,
            rejected,
        }
    }
}

/// JSON entry for a recognised build.
#[derive(Debug, Serialize)]
pub struct BuildEntry {
    /// Name on disk.
    pub name: String,
    /// Hardware architecture.
    pub arch: Arch,
    /// Operating system.
    pub os: Os,
    /// Distribution tag, absent for macOS.
    pub distro: Option<Distro>,
    /// Release triple.
    pub release: String,
    /// Pre-release modifier.
    pub modifier: Option<String>,
    /// Server edition.
    pub edition: Edition,
    /// Public download URL the build came from.
    pub url: String,
}

/// JSON entry for an unrecognised name.
#[derive(Debug, Serialize)]
pub struct RejectedJson {
    /// Name on disk.
    pub name: String,
    /// Why it was not recognised.
    pub reason: String,
}

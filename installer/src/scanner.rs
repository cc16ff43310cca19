//! Inventory scanner for builds unpacked under the binary directory.
//!
//! Each immediate child of the root is read back through the archive name
//! parser. Names that do not parse are collected with their reason rather
//! than failing the scan.

use std::io;

use camino::Utf8Path;

use crate::artefact::filename::to_version;
use crate::artefact::release::ReleaseBounds;
use crate::artefact::version::Version;

/// A recognised build in the inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InventoryEntry {
    /// The directory or file name as found on disk.
    pub name: String,
    /// The build the name describes.
    pub version: Version,
}

/// An entry whose name is not a valid build name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RejectedEntry {
    /// The name as found on disk, lossily converted when not UTF-8.
    pub name: String,
    /// Why the name was not recognised.
    pub reason: String,
}

/// The result of scanning a binary directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    /// Recognised builds, in directory enumeration order.
    pub entries: Vec<InventoryEntry>,
    /// Unrecognised names, in directory enumeration order.
    pub rejected: Vec<RejectedEntry>,
}

impl Inventory {
    /// Returns true if nothing was found at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.rejected.is_empty()
    }
}

/// Scan `root` for unpacked builds.
///
/// A missing root yields an empty inventory.
///
/// # Errors
///
/// Returns an error if the directory exists but cannot be read.
pub fn scan_inventory(root: &Utf8Path, bounds: &ReleaseBounds) -> io::Result<Inventory> {
    let mut inventory = Inventory::default();

    if !root.exists() {
        log::debug!("{root} does not exist; inventory is empty");
        return Ok(inventory);
    }

    for entry in root.as_std_path().read_dir()? {
        let entry = entry?;
        let Some(name) = entry.file_name().to_str().map(str::to_owned) else {
            let name = entry.file_name().to_string_lossy().into_owned();
            log::warn!("skipping non-UTF-8 entry {name}");
            inventory.rejected.push(RejectedEntry {
                name,
                reason: "name is not valid UTF-8".to_owned(),
            });
            continue;
        };

        match to_version(&name, bounds) {
            Ok(version) => inventory.entries.push(InventoryEntry { name, version }),
            Err(e) => {
                log::warn!("unrecognised entry in {root}: {e}");
                inventory.rejected.push(RejectedEntry {
                    name,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(inventory)
}

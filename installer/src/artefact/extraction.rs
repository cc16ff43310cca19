//! Archive expansion with mode and timestamp restoration.
//!
//! Archives are expanded from an in-memory buffer. Every regular file gets
//! its recorded modification time and permission bits back, so the
//! executables shipped in a server archive stay executable. Entry paths are
//! checked before anything is written to guard against zip-slip.
//!
//! Extraction is not transactional: files written before a failure remain.

use super::format::ArchiveFormat;
use filetime::FileTime;
use flate2::read::GzDecoder;
use std::fs::{self, File};
use std::io::{self, Cursor, Read, Write};
use std::path::{Component, Path, PathBuf};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Permission bits restored on extracted files.
const MODE_MASK: u32 = 0o7777;

/// Trait for expanding an archive buffer into a directory, enabling test
/// mocking.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveExtractor {
    /// Expand `bytes`, encoded as `format`, under `dest_dir`.
    ///
    /// Returns the number of regular files written.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractionError`] for malformed archives, unsupported or
    /// escaping entries, and filesystem failures.
    fn extract(
        &self,
        bytes: &[u8],
        format: ArchiveFormat,
        dest_dir: &Path,
    ) -> Result<usize>;
}

/// Errors arising from archive extraction.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The archive format could not be determined from its name.
    #[error("cannot determine archive format of \"{name}\"; expected .zip or .tgz")]
    UnsupportedFormat {
        /// The URL or file name whose extension was not recognised.
        name: String,
    },

    /// The archive or one of its entries could not be decoded.
    #[error("malformed archive entry \"{name}\": {reason}")]
    Malformed {
        /// The entry, or the archive itself, that failed to decode.
        name: String,
        /// Description of the decoding failure.
        reason: String,
    },

    /// The archive contains an entry that is neither a file nor a directory.
    #[error("archive entry \"{name}\" is a {kind}; only files and directories are supported")]
    UnsupportedEntry {
        /// The offending entry.
        name: String,
        /// The entry type found.
        kind: String,
    },

    /// A path in the archive attempts to escape the destination.
    #[error("path traversal detected: {path}")]
    PathTraversal {
        /// The offending path from the archive entry.
        path: String,
    },

    /// Writing the expanded tree failed.
    #[error("failed to write {}: {source}", path.display())]
    Filesystem {
        /// The path being created or updated.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },
}

impl ExtractionError {
    /// Whether the failure lies in the archive rather than the filesystem.
    #[must_use]
    pub const fn is_format(&self) -> bool {
        !matches!(self, Self::Filesystem { .. })
    }
}

/// Result type alias using [`ExtractionError`].
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// Extractor writing to the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsExtractor;

impl ArchiveExtractor for FsExtractor {
    fn extract(&self, bytes: &[u8], format: ArchiveFormat, dest_dir: &Path) -> Result<usize> {
        let written = match format {
            ArchiveFormat::Zip => extract_zip(bytes, dest_dir)?,
            ArchiveFormat::TarGz => extract_tar_gz(bytes, dest_dir)?,
        };
        log::info!("extracted {written} files into {}", dest_dir.display());
        Ok(written)
    }
}

/// Expand a zip archive held in memory.
///
/// Entries are processed in archive order. Files without a recorded Unix
/// mode keep the default permissions of a newly created file. Zip
/// timestamps carry no zone and are read as UTC.
///
/// # Errors
///
/// See [`ArchiveExtractor::extract`].
pub fn extract_zip(bytes: &[u8], dest_dir: &Path) -> Result<usize> {
    let mut archive =
        zip::ZipArchive::new(Cursor::new(bytes)).map_err(|e| malformed("zip archive", &e))?;
    let mut written = 0;

    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|e| malformed(&format!("zip entry {index}"), &e))?;
        let name = entry.name().to_owned();
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| ExtractionError::PathTraversal { path: name.clone() })?;
        validate_entry_path(&relative)?;
        let target = dest_dir.join(&relative);

        if entry.is_dir() {
            log::trace!("creating directory {name}");
            create_dir_all(&target)?;
            continue;
        }

        log::trace!("extracting {name}");
        write_file(&mut entry, &name, &target)?;
        let mtime = entry
            .last_modified()
            .and_then(zip_time)
            .unwrap_or_else(SystemTime::now);
        restore_metadata(&target, entry.unix_mode(), mtime, mtime)?;
        written += 1;
    }

    Ok(written)
}

/// Expand a gzip-compressed tarball held in memory.
///
/// Only directories and regular files are accepted; any other entry type
/// stops extraction before that entry is written.
///
/// # Errors
///
/// See [`ArchiveExtractor::extract`].
pub fn extract_tar_gz(bytes: &[u8], dest_dir: &Path) -> Result<usize> {
    let mut archive = tar::Archive::new(GzDecoder::new(bytes));
    let entries = archive.entries().map_err(|e| malformed("tarball", &e))?;
    let mut written = 0;

    for entry in entries {
        let mut entry = entry.map_err(|e| malformed("tarball", &e))?;
        let relative = entry
            .path()
            .map_err(|e| malformed("tarball", &e))?
            .into_owned();
        let name = relative.display().to_string();
        validate_entry_path(&relative)?;
        let target = dest_dir.join(&relative);

        let header = entry.header();
        let kind = header.entry_type();
        match kind {
            tar::EntryType::Directory => {
                log::trace!("creating directory {name}");
                create_dir_all(&target)?;
            }
            tar::EntryType::Regular | tar::EntryType::Continuous => {
                let mode = header.mode().map_err(|e| malformed(&name, &e))?;
                let mtime = header.mtime().map_err(|e| malformed(&name, &e))?;
                let atime = header
                    .as_gnu()
                    .and_then(|gnu| gnu.atime().ok())
                    .filter(|secs| *secs != 0)
                    .unwrap_or(mtime);

                let atime = unix_time(atime, &name)?;
                let mtime = unix_time(mtime, &name)?;

                log::trace!("extracting {name}");
                write_file(&mut entry, &name, &target)?;
                restore_metadata(&target, Some(mode), atime, mtime)?;
                written += 1;
            }
            tar::EntryType::XGlobalHeader => {
                log::trace!("skipping global pax header {name}");
            }
            other => {
                return Err(ExtractionError::UnsupportedEntry {
                    name,
                    kind: describe_entry_type(other),
                });
            }
        }
    }

    Ok(written)
}

/// Validate that an entry path does not escape the destination directory
/// via `..` components, a root, or a drive prefix.
pub(crate) fn validate_entry_path(path: &Path) -> Result<()> {
    let escapes = path.is_absolute()
        || path.components().any(|component| {
            matches!(
                component,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
    if escapes {
        return Err(ExtractionError::PathTraversal {
            path: path.display().to_string(),
        });
    }
    Ok(())
}

fn write_file(reader: &mut impl Read, name: &str, target: &Path) -> Result<()> {
    if let Some(parent) = target.parent() {
        create_dir_all(parent)?;
    }
    let mut file = File::create(target).map_err(|e| filesystem(target, e))?;
    io::copy(reader, &mut file).map_err(|e| copy_error(name, target, e))?;
    file.flush().map_err(|e| filesystem(target, e))
}

/// Decoder failures surface as data errors; anything else came from the
/// destination file.
fn copy_error(name: &str, target: &Path, err: io::Error) -> ExtractionError {
    match err.kind() {
        io::ErrorKind::InvalidData | io::ErrorKind::InvalidInput | io::ErrorKind::UnexpectedEof => {
            malformed(name, &err)
        }
        _ => filesystem(target, err),
    }
}

/// Restore timestamps, then permissions; a read-only mode would otherwise
/// block the timestamp update on some platforms.
fn restore_metadata(
    path: &Path,
    mode: Option<u32>,
    atime: SystemTime,
    mtime: SystemTime,
) -> Result<()> {
    filetime::set_file_times(
        path,
        FileTime::from_system_time(atime),
        FileTime::from_system_time(mtime),
    )
    .map_err(|e| filesystem(path, e))?;

    if let Some(mode) = mode {
        set_mode(path, mode & MODE_MASK).map_err(|e| filesystem(path, e))?;
    }
    Ok(())
}

#[cfg(unix)]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    fs::set_permissions(path, fs::Permissions::from_mode(mode))
}

#[cfg(not(unix))]
fn set_mode(path: &Path, mode: u32) -> io::Result<()> {
    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_readonly(mode & 0o222 == 0);
    fs::set_permissions(path, permissions)
}

fn create_dir_all(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|e| filesystem(path, e))
}

fn zip_time(stamp: zip::DateTime) -> Option<SystemTime> {
    let civil = jiff::civil::DateTime::new(
        i16::try_from(stamp.year()).ok()?,
        i8::try_from(stamp.month()).ok()?,
        i8::try_from(stamp.day()).ok()?,
        i8::try_from(stamp.hour()).ok()?,
        i8::try_from(stamp.minute()).ok()?,
        i8::try_from(stamp.second()).ok()?,
        0,
    )
    .ok()?;
    let zoned = civil.to_zoned(jiff::tz::TimeZone::UTC).ok()?;
    Some(SystemTime::from(zoned.timestamp()))
}

fn unix_time(secs: u64, name: &str) -> Result<SystemTime> {
    UNIX_EPOCH
        .checked_add(Duration::from_secs(secs))
        .ok_or_else(|| ExtractionError::Malformed {
            name: name.to_owned(),
            reason: format!("timestamp {secs} is out of range"),
        })
}

fn describe_entry_type(kind: tar::EntryType) -> String {
    match kind {
        tar::EntryType::Symlink => "symbolic link".to_owned(),
        tar::EntryType::Link => "hard link".to_owned(),
        tar::EntryType::Char => "character device".to_owned(),
        tar::EntryType::Block => "block device".to_owned(),
        tar::EntryType::Fifo => "fifo".to_owned(),
        other => format!("{other:?} entry"),
    }
}

fn malformed(name: &str, err: &dyn std::fmt::Display) -> ExtractionError {
    ExtractionError::Malformed {
        name: name.to_owned(),
        reason: err.to_string(),
    }
}

fn filesystem(path: &Path, source: io::Error) -> ExtractionError {
    ExtractionError::Filesystem {
        path: path.to_path_buf(),
        source,
    }
}

#[cfg(test)]
#[path = "extraction_tests.rs"]
mod tests;

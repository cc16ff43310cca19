//! Shared test utilities for the installer crate.
//!
//! Builders for small synthetic server archives and a one-shot HTTP
//! responder, so the fetcher and extractor can be exercised without real
//! network access.

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::{self, Cursor, Read, Write};
use std::net::{SocketAddr, TcpListener};
use std::thread::JoinHandle;
use zip::write::SimpleFileOptions;

/// One member of a synthetic archive.
#[derive(Debug, Clone)]
pub enum ArchiveMember {
    /// A regular file.
    File {
        /// Path inside the archive.
        path: String,
        /// File contents.
        contents: Vec<u8>,
        /// Unix permission bits.
        mode: u32,
        /// Modification time in seconds since the Unix epoch.
        mtime: u64,
    },
    /// A directory.
    Directory {
        /// Path inside the archive.
        path: String,
    },
    /// A symbolic link.
    Symlink {
        /// Path inside the archive.
        path: String,
        /// Link target.
        target: String,
    },
}

impl ArchiveMember {
    /// A regular file with the given mode and modification time.
    pub fn file(path: &str, contents: &[u8], mode: u32, mtime: u64) -> Self {
        Self::File {
            path: path.to_owned(),
            contents: contents.to_vec(),
            mode,
            mtime,
        }
    }

    /// A directory entry.
    pub fn directory(path: &str) -> Self {
        Self::Directory {
            path: path.to_owned(),
        }
    }

    /// A symbolic link pointing at `target`.
    pub fn symlink(path: &str, target: &str) -> Self {
        Self::Symlink {
            path: path.to_owned(),
            target: target.to_owned(),
        }
    }
}

/// Build a zip archive from `members`.
///
/// Zip timestamps have two-second resolution, so use even `mtime` values.
///
/// # Errors
///
/// Returns an error if a member cannot be written or its `mtime` cannot be
/// represented in a zip archive.
pub fn zip_archive(members: &[ArchiveMember]) -> io::Result<Vec<u8>> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let base = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for member in members {
        match member {
            ArchiveMember::File {
                path,
                contents,
                mode,
                mtime,
            } => {
                let options = base
                    .last_modified_time(zip_stamp(*mtime)?)
                    .unix_permissions(*mode);
                writer
                    .start_file(path.as_str(), options)
                    .map_err(io::Error::other)?;
                writer.write_all(contents)?;
            }
            ArchiveMember::Directory { path } => {
                writer
                    .add_directory(path.as_str(), base)
                    .map_err(io::Error::other)?;
            }
            ArchiveMember::Symlink { path, target } => {
                writer
                    .add_symlink(path.as_str(), target.as_str(), base)
                    .map_err(io::Error::other)?;
            }
        }
    }

    Ok(writer.finish().map_err(io::Error::other)?.into_inner())
}

fn zip_stamp(mtime: u64) -> io::Result<zip::DateTime> {
    let secs = i64::try_from(mtime).map_err(io::Error::other)?;
    let utc = jiff::Timestamp::from_second(secs)
        .map_err(io::Error::other)?
        .to_zoned(jiff::tz::TimeZone::UTC);
    zip::DateTime::from_date_and_time(
        u16::try_from(utc.year()).map_err(io::Error::other)?,
        u8::try_from(utc.month()).map_err(io::Error::other)?,
        u8::try_from(utc.day()).map_err(io::Error::other)?,
        u8::try_from(utc.hour()).map_err(io::Error::other)?,
        u8::try_from(utc.minute()).map_err(io::Error::other)?,
        u8::try_from(utc.second()).map_err(io::Error::other)?,
    )
    .map_err(io::Error::other)
}

/// Build a gzip-compressed tarball from `members`.
///
/// Names are written verbatim into GNU headers, so hostile paths such as
/// `../escape.txt` survive into the archive.
///
/// # Panics
///
/// Panics if a name exceeds 100 bytes.
///
/// # Errors
///
/// Returns an error if the archive cannot be written.
pub fn tar_gz_archive(members: &[ArchiveMember]) -> io::Result<Vec<u8>> {
    let mut builder = tar::Builder::new(GzEncoder::new(Vec::new(), Compression::fast()));

    for member in members {
        let mut header = tar::Header::new_gnu();
        let (path, contents): (&str, &[u8]) = match member {
            ArchiveMember::File {
                path,
                contents,
                mode,
                mtime,
            } => {
                header.set_entry_type(tar::EntryType::Regular);
                header.set_mode(*mode);
                header.set_mtime(*mtime);
                if let Some(gnu) = header.as_gnu_mut() {
                    gnu.set_atime(*mtime);
                }
                (path.as_str(), contents.as_slice())
            }
            ArchiveMember::Directory { path } => {
                header.set_entry_type(tar::EntryType::Directory);
                header.set_mode(0o755);
                (path.as_str(), &[][..])
            }
            ArchiveMember::Symlink { path, target } => {
                header.set_entry_type(tar::EntryType::Symlink);
                header.set_mode(0o777);
                header.set_link_name(target)?;
                (path.as_str(), &[][..])
            }
        };
        write_raw_name(&mut header, path);
        header.set_size(contents.len() as u64);
        header.set_cksum();
        builder.append(&header, contents)?;
    }

    builder.into_inner().and_then(GzEncoder::finish)
}

fn write_raw_name(header: &mut tar::Header, path: &str) {
    let field = &mut header.as_old_mut().name;
    assert!(path.len() < field.len(), "tar name too long: {path}");
    field.fill(0);
    for (slot, byte) in field.iter_mut().zip(path.as_bytes()) {
        *slot = *byte;
    }
}

/// A local HTTP server that answers exactly one request.
#[derive(Debug)]
pub struct OneShotServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl OneShotServer {
    /// Return an absolute URL for `path` on this server.
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Wait for the response to be written.
    ///
    /// # Errors
    ///
    /// Returns the panic payload if the server thread panicked.
    pub fn join(self) -> std::thread::Result<()> {
        self.handle.join()
    }
}

/// Serve one request with `status` and `body`, then stop.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub fn serve_once(status: u16, body: Vec<u8>) -> io::Result<OneShotServer> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    let handle = std::thread::spawn(move || {
        let Ok((mut stream, _)) = listener.accept() else {
            return;
        };
        let mut request = Vec::<u8>::new();
        let mut buf = [0_u8; 1024];
        while !request.windows(4).any(|w| w == b"\r\n\r\n") {
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => break,
                Ok(n) => request.extend(buf.iter().take(n)),
            }
        }
        let reason = match status {
            200 => "OK",
            404 => "Not Found",
            _ => "Status",
        };
        let head = format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
            body.len()
        );
        // The client may hang up early on error statuses.
        if stream.write_all(head.as_bytes()).is_ok() {
            stream.write_all(&body).ok();
        }
    });
    Ok(OneShotServer { addr, handle })
}

/// Return a URL on a local port with nothing listening.
///
/// # Errors
///
/// Returns an error if no local port can be bound.
pub fn unused_local_url(path: &str) -> io::Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    Ok(format!("http://{addr}{path}"))
}

//! Archive formats shipped by the download service.

use std::fmt;

/// The container format of a downloaded artefact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    /// A zip archive; used for Windows builds only.
    Zip,
    /// A gzip-compressed tarball; used for every other platform.
    TarGz,
}

impl ArchiveFormat {
    /// Return the extension used in archive names, including the leading dot.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Zip => ".zip",
            Self::TarGz => ".tgz",
        }
    }

    /// Detect the format from the end of a file name.
    ///
    /// `.tar.gz` is accepted as a spelling of the tarball format. Matching is
    /// case-insensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use mongodb_repro_installer::artefact::format::ArchiveFormat;
    ///
    /// assert_eq!(
    ///     ArchiveFormat::detect("mongodb-linux-x86_64-ubuntu1804-4.2.5.tgz"),
    ///     Some(ArchiveFormat::TarGz)
    /// );
    /// assert_eq!(ArchiveFormat::detect("mongodb-linux-x86_64-ubuntu1804-4.2.5"), None);
    /// ```
    #[must_use]
    pub fn detect(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".zip") {
            Some(Self::Zip)
        } else if lower.ends_with(".tgz") || lower.ends_with(".tar.gz") {
            Some(Self::TarGz)
        } else {
            None
        }
    }
}

impl fmt::Display for ArchiveFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

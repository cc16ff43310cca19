//! Mapping from a build descriptor to its download location.
//!
//! Archive names follow
//! `mongodb-<os-token>-<arch>[-enterprise][-<distro>]-<release>[-<modifier>]`
//! plus `.zip` for Windows and `.tgz` elsewhere. The OS token differs from the
//! platform name for macOS releases before 4.2, which were published as `osx`
//! (enterprise) or `osx-ssl` (community). macOS archives always live under the
//! `osx/` directory on the host.

use super::platform::Os;
use super::release::{Edition, Release};
use super::version::Version;
use serde::Deserialize;

/// Default host for enterprise builds.
pub const ENTERPRISE_HOST: &str = "https://downloads.mongodb.com/";

/// Default host for community builds.
pub const COMMUNITY_HOST: &str = "https://fastdl.mongodb.org/";

/// The marker token carried by enterprise archive names.
pub(crate) const ENTERPRISE_TOKEN: &str = "enterprise";

/// The fixed prefix of every archive name.
pub(crate) const NAME_PREFIX: &str = "mongodb-";

/// First release series that uses the `macos` token.
const MODERN_MACOS: (u32, u32) = (4, 2);

/// Download hosts, one per edition.
///
/// Overridable through the `[hosts]` configuration table so mirrors and
/// local test servers can stand in for the public service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Hosts {
    /// Host serving enterprise builds.
    pub enterprise: String,
    /// Host serving community builds.
    pub community: String,
}

impl Hosts {
    /// Return the host for `edition` without a trailing slash.
    #[must_use]
    pub fn for_edition(&self, edition: Edition) -> &str {
        let host = match edition {
            Edition::Enterprise => &self.enterprise,
            Edition::Community => &self.community,
        };
        host.trim_end_matches('/')
    }
}

impl Default for Hosts {
    fn default() -> Self {
        Self {
            enterprise: ENTERPRISE_HOST.to_owned(),
            community: COMMUNITY_HOST.to_owned(),
        }
    }
}

/// The OS token embedded in archive names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OsToken {
    /// `linux`.
    Linux,
    /// `macos`, used from 4.2 onwards.
    Macos,
    /// `osx`, legacy enterprise macOS builds.
    OsxEnterprise,
    /// `osx-ssl`, legacy community macOS builds.
    OsxCommunity,
    /// `win32`.
    Win32,
}

impl OsToken {
    /// Tokens in the order a parser must try them: `osx-ssl` before `osx`.
    pub const PARSE_ORDER: [Self; 5] = [
        Self::OsxCommunity,
        Self::Linux,
        Self::Macos,
        Self::Win32,
        Self::OsxEnterprise,
    ];

    /// Select the token a given platform and release were published under.
    #[must_use]
    pub const fn for_release(os: Os, release: &Release) -> Self {
        match os {
            Os::Linux => Self::Linux,
            Os::Windows => Self::Win32,
            Os::MacOs if release.is_at_least(MODERN_MACOS.0, MODERN_MACOS.1) => Self::Macos,
            Os::MacOs if release.edition().is_enterprise() => Self::OsxEnterprise,
            Os::MacOs => Self::OsxCommunity,
        }
    }

    /// Return the token text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Macos => "macos",
            Self::OsxEnterprise => "osx",
            Self::OsxCommunity => "osx-ssl",
            Self::Win32 => "win32",
        }
    }

    /// Return the platform the token denotes.
    #[must_use]
    pub const fn os(self) -> Os {
        match self {
            Self::Linux => Os::Linux,
            Self::Macos | Self::OsxEnterprise | Self::OsxCommunity => Os::MacOs,
            Self::Win32 => Os::Windows,
        }
    }
}

/// Where a build can be downloaded from.
///
/// Only produced by resolving a [`Version`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    filename: String,
    url_prefix: String,
    url_suffix: String,
}

impl Location {
    pub(crate) fn resolve(version: &Version, hosts: &Hosts) -> Self {
        let release = version.release();
        let edition = release.edition();
        let os = version.os();

        let mut filename = format!(
            "{NAME_PREFIX}{}-{}",
            OsToken::for_release(os, release).as_str(),
            version.arch()
        );
        if edition.is_enterprise() {
            filename.push('-');
            filename.push_str(ENTERPRISE_TOKEN);
        }
        if let Some(distro) = version.distro() {
            filename.push('-');
            filename.push_str(distro.as_str());
        }
        filename.push('-');
        filename.push_str(&release.to_string());

        let location = Self {
            filename,
            url_prefix: format!("{}/{}", hosts.for_edition(edition), os.url_directory()),
            url_suffix: os.archive_format().extension().to_owned(),
        };
        log::debug!("resolved {version} to {}", location.url());
        location
    }

    /// Return the archive name without its extension.
    ///
    /// This is also the name of the top-level directory inside the archive.
    #[must_use]
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// Return the host and directory, ending in `/`.
    #[must_use]
    pub fn url_prefix(&self) -> &str {
        &self.url_prefix
    }

    /// Return the extension, including the leading dot.
    #[must_use]
    pub fn url_suffix(&self) -> &str {
        &self.url_suffix
    }

    /// Return the archive name with its extension.
    #[must_use]
    pub fn archive_name(&self) -> String {
        format!("{}{}", self.filename, self.url_suffix)
    }

    /// Return the full download URL.
    #[must_use]
    pub fn url(&self) -> String {
        format!("{}{}{}", self.url_prefix, self.filename, self.url_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artefact::release::ReleaseBounds;
    use rstest::rstest;

    fn version(arch: &str, os: &str, distro: &str, release: &str, edition: Edition) -> Version {
        Version::from_parts(arch, os, distro, release, edition, &ReleaseBounds::default())
            .expect("valid build")
    }

    #[test]
    fn windows_enterprise_location() {
        let location = version("x86_64", "win32", "windows-64", "4.2.5", Edition::Enterprise)
            .to_location();
        assert_eq!(
            location.filename(),
            "mongodb-win32-x86_64-enterprise-windows-64-4.2.5"
        );
        assert_eq!(location.url_prefix(), "https://downloads.mongodb.com/win32/");
        assert_eq!(location.url_suffix(), ".zip");
    }

    #[rstest]
    #[case::enterprise(Edition::Enterprise, "mongodb-osx-x86_64-enterprise-4.0.19")]
    #[case::community(Edition::Community, "mongodb-osx-ssl-x86_64-4.0.19")]
    fn legacy_macos_tokens(#[case] edition: Edition, #[case] expected: &str) {
        let location = version("x86_64", "macos", "", "4.0.19", edition).to_location();
        assert_eq!(location.filename(), expected);
        assert!(location.url_prefix().ends_with("/osx/"));
        assert_eq!(location.url_suffix(), ".tgz");
    }

    #[rstest]
    #[case::amazon2(
        "x86_64", "linux", "amazon2", "4.2.5", Edition::Enterprise,
        "https://downloads.mongodb.com/linux/mongodb-linux-x86_64-enterprise-amazon2-4.2.5.tgz"
    )]
    #[case::macos(
        "x86_64", "macos", "", "4.2.5", Edition::Enterprise,
        "https://downloads.mongodb.com/osx/mongodb-macos-x86_64-enterprise-4.2.5.tgz"
    )]
    #[case::ppc(
        "ppc64le", "linux", "rhel71", "4.2.5", Edition::Enterprise,
        "https://downloads.mongodb.com/linux/mongodb-linux-ppc64le-enterprise-rhel71-4.2.5.tgz"
    )]
    #[case::older_series(
        "x86_64", "linux", "amzn64", "3.4.24", Edition::Enterprise,
        "https://downloads.mongodb.com/linux/mongodb-linux-x86_64-enterprise-amzn64-3.4.24.tgz"
    )]
    #[case::community(
        "x86_64", "linux", "ubuntu1604", "4.2.5", Edition::Community,
        "https://fastdl.mongodb.org/linux/mongodb-linux-x86_64-ubuntu1604-4.2.5.tgz"
    )]
    #[case::release_candidate(
        "aarch64", "linux", "ubuntu1804", "4.4.0-rc1", Edition::Community,
        "https://fastdl.mongodb.org/linux/mongodb-linux-aarch64-ubuntu1804-4.4.0-rc1.tgz"
    )]
    fn resolves_published_urls(
        #[case] arch: &str,
        #[case] os: &str,
        #[case] distro: &str,
        #[case] release: &str,
        #[case] edition: Edition,
        #[case] expected: &str,
    ) {
        assert_eq!(version(arch, os, distro, release, edition).to_location().url(), expected);
    }

    #[test]
    fn custom_hosts_replace_prefix() {
        let hosts = Hosts {
            enterprise: "http://127.0.0.1:8080".to_owned(),
            community: "http://mirror.example/".to_owned(),
        };
        let enterprise = version("x86_64", "linux", "rhel70", "4.2.5", Edition::Enterprise);
        let community = version("x86_64", "linux", "rhel70", "4.2.5", Edition::Community);
        assert_eq!(
            enterprise.to_location_with(&hosts).url_prefix(),
            "http://127.0.0.1:8080/linux/"
        );
        assert_eq!(
            community.to_location_with(&hosts).url_prefix(),
            "http://mirror.example/linux/"
        );
    }

    #[test]
    fn archive_name_appends_extension() {
        let location = version("x86_64", "linux", "debian10", "4.2.5", Edition::Community)
            .to_location();
        assert_eq!(location.archive_name(), "mongodb-linux-x86_64-debian10-4.2.5.tgz");
    }

    #[test]
    fn parse_order_tries_longer_macos_token_first() {
        let order = OsToken::PARSE_ORDER.map(OsToken::as_str);
        let ssl = order.iter().position(|t| *t == "osx-ssl");
        let plain = order.iter().position(|t| *t == "osx");
        assert!(ssl < plain);
    }
}

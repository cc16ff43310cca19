//! Tests for archive name parsing.

use super::*;
use crate::artefact::platform::Os;
use rstest::{fixture, rstest};

#[fixture]
fn bounds() -> ReleaseBounds {
    ReleaseBounds::default()
}

fn releases(edition: Edition) -> Vec<Release> {
    let rc = Modifier::try_from("rc1").expect("valid modifier");
    vec![
        Release::new(3, 6, 23, edition),
        Release::new(4, 0, 19, edition),
        Release::new(4, 2, 5, edition),
        Release::new(4, 4, 0, edition).with_modifier(rc),
    ]
}

fn platforms() -> Vec<(Os, Option<Distro>)> {
    let mut platforms = vec![(Os::MacOs, None), (Os::Windows, Some(Distro::WINDOWS))];
    platforms.extend(
        Distro::linux()
            .iter()
            .map(|tag| (Os::Linux, Some(Distro::try_from(*tag).expect("listed distro")))),
    );
    platforms
}

#[rstest]
fn every_valid_build_round_trips(bounds: ReleaseBounds) {
    let mut checked = 0_usize;
    for arch in Arch::ALL {
        for (os, distro) in platforms() {
            for edition in [Edition::Enterprise, Edition::Community] {
                for release in releases(edition) {
                    let version = Version::new(arch, os, distro, release, &bounds)
                        .expect("valid build");
                    let name = version.to_location().archive_name();
                    let parsed = to_version(&name, &bounds).expect("resolved names parse");
                    assert_eq!(parsed, version, "{name}");
                    checked += 1;
                }
            }
        }
    }
    assert_eq!(checked, 4 * 23 * 2 * 4);
}

#[rstest]
fn parses_name_without_extension(bounds: ReleaseBounds) {
    let version = to_version("mongodb-linux-x86_64-enterprise-rhel70-4.2.5", &bounds)
        .expect("valid name");
    assert_eq!(version.os(), Os::Linux);
    assert_eq!(version.distro().map(Distro::as_str), Some("rhel70"));
    assert_eq!(version.release().triple(), (4, 2, 5));
    assert_eq!(version.release().edition(), Edition::Enterprise);
}

#[rstest]
#[case::windows_sentinel("mongodb-win32-x86_64-enterprise-windows-64-4.2.5.zip", Os::Windows)]
#[case::legacy_enterprise("mongodb-osx-x86_64-enterprise-4.0.19.tgz", Os::MacOs)]
#[case::legacy_community("mongodb-osx-ssl-x86_64-4.0.19.tgz", Os::MacOs)]
#[case::modern_macos("mongodb-macos-x86_64-4.2.5.tgz", Os::MacOs)]
fn normalises_os_tokens(bounds: ReleaseBounds, #[case] name: &str, #[case] expected: Os) {
    let version = to_version(name, &bounds).expect("valid name");
    assert_eq!(version.os(), expected);
}

#[rstest]
fn reads_modifier(bounds: ReleaseBounds) {
    let version =
        to_version("mongodb-linux-aarch64-ubuntu1804-4.4.0-rc1.tgz", &bounds).expect("valid name");
    assert_eq!(version.release().modifier().map(Modifier::as_str), Some("rc1"));
}

#[rstest]
#[case::zip_on_linux("mongodb-linux-x86_64-ubuntu1804-4.2.5.zip", ".zip")]
#[case::tgz_on_windows("mongodb-win32-x86_64-windows-64-4.2.5.tgz", ".tgz")]
#[case::zip_on_macos("mongodb-macos-x86_64-4.2.5.zip", ".zip")]
fn rejects_extension_platform_mismatch(
    bounds: ReleaseBounds,
    #[case] name: &str,
    #[case] extension: &'static str,
) {
    let err = to_version(name, &bounds).expect_err("mismatched extension");
    assert_eq!(
        err,
        FilenameError::ExtensionMismatch {
            filename: name.to_owned(),
            extension,
        }
    );
    assert!(err.to_string().contains(name));
}

#[rstest]
#[case::wrong_prefix("mongo-linux-x86_64-ubuntu1804-4.2.5.tgz")]
#[case::unknown_os("mongodb-solaris-x86_64-4.2.5.tgz")]
#[case::no_release("mongodb-linux-x86_64-ubuntu1804.tgz")]
#[case::two_modifiers("mongodb-linux-x86_64-ubuntu1804-4.4.0-rc1-extra.tgz")]
#[case::arch_only("mongodb-linux-x86_64")]
#[case::empty("")]
#[case::stray_directory("data")]
fn rejects_names_outside_grammar(bounds: ReleaseBounds, #[case] name: &str) {
    let err = to_version(name, &bounds).expect_err("not an archive name");
    assert!(
        matches!(err, FilenameError::Grammar { ref filename, .. } if filename == name),
        "got {err:?}"
    );
}

#[rstest]
#[case::unknown_arch("mongodb-linux-sparc-ubuntu1804-4.2.5.tgz")]
#[case::unknown_distro("mongodb-linux-x86_64-gentoo-4.2.5.tgz")]
#[case::linux_without_distro("mongodb-linux-x86_64-4.2.5.tgz")]
#[case::out_of_range("mongodb-linux-x86_64-ubuntu1804-4.2.99.tgz")]
#[case::bad_modifier("mongodb-linux-x86_64-ubuntu1804-4.4.0-rc_1.tgz")]
fn wraps_validation_failures_with_name(bounds: ReleaseBounds, #[case] name: &str) {
    let err = to_version(name, &bounds).expect_err("invalid build");
    assert!(
        matches!(err, FilenameError::Invalid { ref filename, .. } if filename == name),
        "got {err:?}"
    );
}

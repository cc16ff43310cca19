//! Tests for CLI parsing and build argument validation.

use super::*;
use crate::artefact::distro::Distro;
use crate::artefact::error::ValidationError;
use crate::artefact::platform::Arch;
use rstest::rstest;

fn build_args(cli: Cli) -> BuildArgs {
    match cli.command {
        Command::Get(args) | Command::Url(args) => args,
        Command::List(_) => panic!("expected a build subcommand"),
    }
}

#[test]
fn cli_parses_get_defaults() {
    let cli = Cli::parse_from(["mongodb-repro", "get"]);
    assert!(cli.config.is_none());
    assert!(cli.binary_dir.is_none());
    assert!(cli.timeout.is_none());
    assert_eq!(cli.verbosity, 0);
    assert!(!cli.quiet);

    let args = build_args(cli);
    assert_eq!(args.arch, "x86_64");
    assert_eq!(args.os, "linux");
    assert!(args.distro.is_none());
    assert_eq!(args.release, "4.2.9");
    assert!(!args.community);
}

#[test]
fn cli_requires_a_subcommand() {
    Cli::try_parse_from(["mongodb-repro"]).expect_err("a subcommand is required");
}

#[test]
fn cli_parses_list_with_json() {
    let cli = Cli::parse_from(["mongodb-repro", "list", "--json"]);
    match cli.command {
        Command::List(args) => assert!(args.json),
        other => panic!("expected List command, got {other:?}"),
    }
}

#[test]
fn global_flags_follow_the_subcommand() {
    let cli = Cli::parse_from([
        "mongodb-repro",
        "list",
        "--binary-dir",
        "/srv/binaries",
        "--timeout",
        "5",
        "--config",
        "/etc/repro.toml",
    ]);
    assert_eq!(
        cli.overrides(),
        Overrides {
            config: Some(Utf8PathBuf::from("/etc/repro.toml")),
            binary_dir: Some(Utf8PathBuf::from("/srv/binaries")),
            timeout_secs: Some(5),
        }
    );
}

#[rstest]
#[case::quiet(&["mongodb-repro", "-q", "list"], log::LevelFilter::Error)]
#[case::default(&["mongodb-repro", "list"], log::LevelFilter::Warn)]
#[case::single(&["mongodb-repro", "-v", "list"], log::LevelFilter::Info)]
#[case::double_short(&["mongodb-repro", "-vv", "list"], log::LevelFilter::Debug)]
#[case::double_long(&["mongodb-repro", "--verbose", "--verbose", "list"], log::LevelFilter::Debug)]
#[case::triple(&["mongodb-repro", "list", "-vvv"], log::LevelFilter::Trace)]
fn verbosity_selects_log_level(#[case] args: &[&str], #[case] expected: log::LevelFilter) {
    let cli = Cli::parse_from(args);
    assert_eq!(cli.log_level(), expected);
}

#[test]
fn cli_rejects_verbose_with_quiet() {
    Cli::try_parse_from(["mongodb-repro", "--verbose", "--quiet", "list"])
        .expect_err("expected clap to reject conflicting flags");
}

#[rstest]
#[case::community(&["mongodb-repro", "get", "--community"], Edition::Community)]
#[case::enterprise(&["mongodb-repro", "get"], Edition::Enterprise)]
fn community_flag_selects_edition(#[case] args: &[&str], #[case] expected: Edition) {
    assert_eq!(build_args(Cli::parse_from(args)).edition(), expected);
}

#[test]
fn linux_without_distro_uses_default() {
    let args = build_args(Cli::parse_from(["mongodb-repro", "get"]));
    let version = args
        .build_version(&ReleaseBounds::default())
        .expect("defaults are valid");
    assert_eq!(version.distro().map(Distro::as_str), Some(DEFAULT_LINUX_DISTRO));
    assert_eq!(
        version.to_location().filename(),
        "mongodb-linux-x86_64-enterprise-ubuntu1604-4.2.9"
    );
}

#[rstest]
#[case::macos(&["mongodb-repro", "url", "--os", "macos", "--release", "4.0.19"], None)]
#[case::windows(&["mongodb-repro", "url", "--os", "windows"], Some("windows-64"))]
fn non_linux_builds_need_no_distro(#[case] args: &[&str], #[case] expected: Option<&str>) {
    let version = build_args(Cli::parse_from(args))
        .build_version(&ReleaseBounds::default())
        .expect("valid build");
    assert_eq!(version.distro().map(Distro::as_str), expected);
}

#[test]
fn explicit_build_arguments_reach_the_version() {
    let args = build_args(Cli::parse_from([
        "mongodb-repro",
        "get",
        "--arch",
        "aarch64",
        "--distro",
        "rhel80",
        "--release",
        "4.4.0-rc1",
        "--community",
    ]));
    let version = args
        .build_version(&ReleaseBounds::default())
        .expect("valid build");
    assert_eq!(version.arch(), Arch::Aarch64);
    assert_eq!(version.release().to_string(), "4.4.0-rc1");
    assert_eq!(
        version.to_location().url(),
        "https://fastdl.mongodb.org/linux/mongodb-linux-aarch64-rhel80-4.4.0-rc1.tgz"
    );
}

#[rstest]
#[case::arch(&["mongodb-repro", "get", "--arch", "sparc"])]
#[case::os(&["mongodb-repro", "get", "--os", "solaris"])]
#[case::distro(&["mongodb-repro", "get", "--distro", "gentoo"])]
#[case::release(&["mongodb-repro", "get", "--release", "4.x"])]
#[case::mismatch(&["mongodb-repro", "get", "--os", "macos", "--distro", "rhel70"])]
fn invalid_build_arguments_fail_validation(#[case] args: &[&str]) {
    let result = build_args(Cli::parse_from(args)).build_version(&ReleaseBounds::default());
    assert!(result.is_err(), "expected a validation error for {args:?}");
}

#[test]
fn release_outside_bounds_names_the_field() {
    let args = build_args(Cli::parse_from(["mongodb-repro", "get", "--release", "1.8.5"]));
    let err = args
        .build_version(&ReleaseBounds::default())
        .expect_err("version 1 is below the default bound");
    assert!(matches!(err, ValidationError::ReleaseOutOfRange { value: 1, .. }), "got {err:?}");
}

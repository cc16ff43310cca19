//! Behaviour-driven tests for downloading and unpacking archives.
//!
//! These scenarios serve synthetic archives from a local one-shot HTTP
//! server and check what lands on disk. Tests use the rstest-bdd v0.5.0
//! mutable world pattern.

use camino::Utf8PathBuf;
use mongodb_repro_installer::acquire::{
    AcquireError, AcquireOutcome, acquire, download_archive,
};
use mongodb_repro_installer::artefact::download::DownloadError;
use mongodb_repro_installer::artefact::extraction::ExtractionError;
use mongodb_repro_installer::artefact::release::{Edition, ReleaseBounds};
use mongodb_repro_installer::artefact::version::Version;
use mongodb_repro_installer::config::Settings;
use mongodb_repro_installer::test_utils::{
    ArchiveMember, OneShotServer, serve_once, tar_gz_archive, unused_local_url, zip_archive,
};
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::path::PathBuf;
use std::time::{Duration, UNIX_EPOCH};
use tempfile::TempDir;

/// 2020-06-15 12:30:00 UTC.
const FIXED_MTIME: u64 = 1_592_224_200;

// ---------------------------------------------------------------------------
// World types
// ---------------------------------------------------------------------------

struct AcquireWorld {
    temp: TempDir,
    server: Option<OneShotServer>,
    url: String,
    files: Option<usize>,
    error: Option<AcquireError>,
    outcome: Option<AcquireOutcome>,
}

impl AcquireWorld {
    fn dest(&self) -> PathBuf {
        self.temp.path().join("dest")
    }

    fn serve(&mut self, status: u16, body: Vec<u8>, archive_name: &str) {
        let server = serve_once(status, body).expect("bind local port");
        self.url = server.url(&format!("/linux/{archive_name}"));
        self.server = Some(server);
    }
}

#[fixture]
fn world() -> AcquireWorld {
    AcquireWorld {
        temp: TempDir::new().expect("failed to create temp dir"),
        server: None,
        url: String::new(),
        files: None,
        error: None,
        outcome: None,
    }
}

// ---------------------------------------------------------------------------
// Step definitions
// ---------------------------------------------------------------------------

#[given("a server publishing a tarball with the executable \"{path}\"")]
fn given_served_tarball(world: &mut AcquireWorld, path: String) {
    let archive = tar_gz_archive(&[ArchiveMember::file(&path, b"binary", 0o755, FIXED_MTIME)])
        .expect("build tarball");
    world.serve(200, archive, "build.tgz");
}

#[given("a server publishing a zip archive with the executable \"{path}\"")]
fn given_served_zip(world: &mut AcquireWorld, path: String) {
    let archive = zip_archive(&[ArchiveMember::file(&path, b"binary", 0o755, FIXED_MTIME)])
        .expect("build zip archive");
    world.serve(200, archive, "build.zip");
}

#[given("a server publishing a tarball with a symbolic link \"{path}\"")]
fn given_served_symlink(world: &mut AcquireWorld, path: String) {
    let archive =
        tar_gz_archive(&[ArchiveMember::symlink(&path, "mongod")]).expect("build tarball");
    world.serve(200, archive, "build.tgz");
}

#[given("a server answering every request with status {status}")]
fn given_failing_server(world: &mut AcquireWorld, status: u16) {
    world.serve(status, b"not found".to_vec(), "build.tgz");
}

#[when("the archive is downloaded")]
fn when_archive_downloaded(world: &mut AcquireWorld) {
    match download_archive(&world.dest(), &world.url, 5) {
        Ok(files) => world.files = Some(files),
        Err(err) => world.error = Some(err),
    }
    if let Some(server) = world.server.take() {
        server.join().expect("server thread finished");
    }
}

#[then("{count} file is unpacked")]
fn then_files_unpacked(world: &mut AcquireWorld, count: usize) {
    assert!(world.error.is_none(), "unexpected error: {:?}", world.error);
    assert_eq!(world.files, Some(count));
}

#[then("\"{path}\" keeps its mode and modification time")]
fn then_metadata_restored(world: &mut AcquireWorld, path: String) {
    let target = world.dest().join(path);
    let metadata = std::fs::metadata(&target).expect("unpacked file exists");
    assert_eq!(
        metadata.modified().expect("modification time"),
        UNIX_EPOCH + Duration::from_secs(FIXED_MTIME)
    );
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        assert_eq!(metadata.permissions().mode() & 0o7777, 0o755);
    }
}

#[then("the download fails with status {status}")]
fn then_download_fails(world: &mut AcquireWorld, status: u16) {
    match world.error.as_ref() {
        Some(AcquireError::Download(DownloadError::Status { url, status: actual })) => {
            assert_eq!(*actual, status);
            assert_eq!(url, &world.url);
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}

#[then("the destination directory was not created")]
fn then_destination_absent(world: &mut AcquireWorld) {
    assert!(!world.dest().exists());
}

#[then("extraction fails for the entry \"{name}\"")]
fn then_extraction_fails(world: &mut AcquireWorld, name: String) {
    match world.error.as_ref() {
        Some(AcquireError::Extraction(ExtractionError::UnsupportedEntry { name: actual, .. })) => {
            assert_eq!(actual, &name);
        }
        other => panic!("expected an unsupported entry error, got {other:?}"),
    }
}

#[then("nothing exists at \"{path}\"")]
fn then_nothing_at(world: &mut AcquireWorld, path: String) {
    assert!(std::fs::symlink_metadata(world.dest().join(path)).is_err());
}

#[given("the build directory \"{name}\" already exists")]
fn given_existing_build(world: &mut AcquireWorld, name: String) {
    std::fs::create_dir_all(world.dest().join(name)).expect("create build directory");
}

#[when("the Community build of \"{release}\" for \"{distro}\" is acquired")]
fn when_build_acquired(world: &mut AcquireWorld, release: String, distro: String) {
    let version = Version::from_parts(
        "x86_64",
        "linux",
        &distro,
        &release,
        Edition::Community,
        &ReleaseBounds::default(),
    )
    .expect("valid build");
    let mut settings = Settings::new(
        Utf8PathBuf::try_from(world.dest()).expect("UTF-8 temp path"),
    );
    // Any fetch would fail against a closed port.
    settings.hosts.community = unused_local_url("/").expect("bind local port");
    match acquire(&version, &settings, &mut std::io::sink()) {
        Ok(outcome) => world.outcome = Some(outcome),
        Err(err) => world.error = Some(err),
    }
}

#[then("the build is reported as already present")]
fn then_already_present(world: &mut AcquireWorld) {
    assert!(world.error.is_none(), "unexpected error: {:?}", world.error);
    assert!(matches!(
        world.outcome,
        Some(AcquireOutcome::AlreadyPresent { .. })
    ));
}

// ---------------------------------------------------------------------------
// Scenario bindings
// ---------------------------------------------------------------------------

#[scenario(
    path = "tests/features/acquire.feature",
    name = "Unpack a served tarball"
)]
fn scenario_unpack_tarball(world: AcquireWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/acquire.feature",
    name = "Unpack a served zip archive"
)]
fn scenario_unpack_zip(world: AcquireWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/acquire.feature",
    name = "A missing archive leaves nothing behind"
)]
fn scenario_missing_archive(world: AcquireWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/acquire.feature",
    name = "Symbolic links are refused"
)]
fn scenario_symlinks_refused(world: AcquireWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/acquire.feature",
    name = "An unpacked build is not fetched again"
)]
fn scenario_not_fetched_again(world: AcquireWorld) {
    let _ = world;
}

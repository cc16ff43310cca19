//! `mongodb-repro` CLI entrypoint.
//!
//! This binary downloads and unpacks MongoDB server builds into a local
//! binary directory, prints where builds are published, and lists the builds
//! already unpacked.

use clap::Parser;
use mongodb_repro_installer::cli::{Cli, Command};
use mongodb_repro_installer::config::{Settings, load_settings};
use mongodb_repro_installer::dirs::SystemBaseDirs;
use mongodb_repro_installer::error::Result;
use mongodb_repro_installer::get::{run_get, run_url};
use mongodb_repro_installer::list::run_list;
use mongodb_repro_installer::output::write_stderr_line;
use std::io::Write;

fn main() {
    let cli = Cli::parse();
    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stderr);
    let exit_code = exit_code_for_run_result(run_result, &mut stderr);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli, stderr: &mut dyn Write) -> Result<()> {
    let settings = load_settings(&cli.overrides(), &SystemBaseDirs)?;
    log::debug!("using binary directory {}", settings.binary_dir);
    dispatch(cli, &settings, &mut std::io::stdout(), stderr)
}

fn dispatch(
    cli: &Cli,
    settings: &Settings,
    stdout: &mut dyn Write,
    stderr: &mut dyn Write,
) -> Result<()> {
    match &cli.command {
        Command::Get(args) => {
            let mut sink = std::io::sink();
            let progress: &mut dyn Write = if cli.quiet { &mut sink } else { stderr };
            run_get(args, settings, stdout, progress).map(|_| ())
        }
        Command::Url(args) => run_url(args, settings, stdout),
        Command::List(args) => run_list(args, settings, stdout),
    }
}

fn exit_code_for_run_result(result: Result<()>, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => 0,
        Err(err) => {
            write_stderr_line(stderr, format_args!("error: {err}"));
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use mongodb_repro_installer::artefact::error::ValidationError;
    use mongodb_repro_installer::error::ReproError;
    use tempfile::TempDir;

    fn settings_in(temp: &TempDir) -> Settings {
        Settings::new(Utf8PathBuf::try_from(temp.path().to_owned()).expect("UTF-8 temp path"))
    }

    #[test]
    fn exit_code_for_run_result_returns_zero_on_success() {
        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Ok(()), &mut stderr);
        assert_eq!(exit_code, 0);
        assert!(stderr.is_empty());
    }

    #[test]
    fn exit_code_for_run_result_prints_error_and_returns_one() {
        let err = ReproError::Validation(ValidationError::UnsupportedOs {
            value: "solaris".to_owned(),
            expected: "linux, macos, win32".to_owned(),
        });

        let mut stderr = Vec::new();
        let exit_code = exit_code_for_run_result(Err(err), &mut stderr);
        assert_eq!(exit_code, 1);

        let stderr_text = String::from_utf8(stderr).expect("stderr was not UTF-8");
        assert!(stderr_text.starts_with("error: "));
        assert!(stderr_text.contains("solaris"));
    }

    #[test]
    fn dispatch_url_writes_to_stdout_only() {
        let temp = tempfile::tempdir().expect("temp dir");
        let cli = Cli::parse_from(["mongodb-repro", "url", "--os", "win32", "--release", "4.2.5"]);
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        dispatch(&cli, &settings_in(&temp), &mut stdout, &mut stderr).expect("url succeeds");

        let output = String::from_utf8(stdout).expect("UTF-8 stdout");
        assert!(output.ends_with(
            "https://downloads.mongodb.com/win32/mongodb-win32-x86_64-enterprise-windows-64-4.2.5.zip\n"
        ));
        assert!(stderr.is_empty());
    }

    #[test]
    fn dispatch_list_reports_empty_directory() {
        let temp = tempfile::tempdir().expect("temp dir");
        let cli = Cli::parse_from(["mongodb-repro", "list"]);
        let mut stdout = Vec::new();

        dispatch(&cli, &settings_in(&temp), &mut stdout, &mut Vec::new()).expect("list succeeds");

        assert!(String::from_utf8_lossy(&stdout).contains("No builds found"));
    }

    #[test]
    fn dispatch_get_already_present_is_quiet_with_q() {
        let temp = tempfile::tempdir().expect("temp dir");
        let settings = settings_in(&temp);
        std::fs::create_dir(
            settings
                .binary_dir
                .join("mongodb-linux-x86_64-enterprise-ubuntu1604-4.2.9"),
        )
        .expect("create existing build");
        let cli = Cli::parse_from(["mongodb-repro", "-q", "get"]);
        let (mut stdout, mut stderr) = (Vec::new(), Vec::new());

        dispatch(&cli, &settings, &mut stdout, &mut stderr).expect("get succeeds");

        assert!(String::from_utf8_lossy(&stdout).contains("ubuntu1604-4.2.9"));
        assert!(stderr.is_empty(), "quiet mode writes no progress");
    }
}

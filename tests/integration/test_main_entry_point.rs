// main.rsとエントリーポイントのテスト
use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn binary_path() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_bookz"))
}

fn run(args: &[&str]) -> Output {
    Command::new(binary_path())
        .args(args)
        .env("RUST_LOG", "info")
        .output()
        .expect("Failed to execute binary")
}

#[test]
fn test_cli_help() {
    let output = run(&["--help"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("bookz"));
    assert!(stdout.contains("--dir"));
    assert!(stdout.contains("--on-collision"));
    assert!(stdout.contains("--strict"));
}

#[test]
fn test_cli_version() {
    let output = run(&["--version"]);

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_dir_argument() {
    let output = run(&[]);

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("--dir"));
}

#[test]
fn test_nonexistent_directory_exits_with_failure() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("missing");

    let output = run(&["--dir", missing.to_str().unwrap()]);

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("missing"));
    assert!(stderr.contains("[HIGH]"));
}

#[test]
fn test_invalid_collision_policy() {
    let temp_dir = TempDir::new().unwrap();
    let output = run(&[
        "--dir",
        temp_dir.path().to_str().unwrap(),
        "--on-collision",
        "merge",
    ]);

    assert!(!output.status.success());
}

#[test]
fn test_missing_converter_still_exits_zero() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("a.epub"), "epub").unwrap();
    let converter = temp_dir.path().join("no-such-converter");

    let output = run(&[
        "--dir",
        temp_dir.path().to_str().unwrap(),
        "--converter",
        converter.to_str().unwrap(),
    ]);

    assert!(output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error converting a.epub"));
    assert!(temp_dir.path().join("mobi").is_dir());
}

#[cfg(unix)]
fn write_script_converter(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let script = dir.join("fake-convert.sh");
    fs::write(
        &script,
        "#!/bin/sh\ncase \"$1\" in\n  */bad.epub) echo \"cannot parse $1\" >&2; exit 3 ;;\nesac\ncp \"$1\" \"$2\"\n",
    )
    .unwrap();
    fs::set_permissions(&script, fs::Permissions::from_mode(0o755)).unwrap();
    script
}

#[cfg(unix)]
#[test]
fn test_converts_with_script_converter() {
    let temp_dir = TempDir::new().unwrap();
    let library = temp_dir.path().join("library");
    fs::create_dir_all(library.join("nested")).unwrap();
    fs::write(library.join("one.fb2"), "one").unwrap();
    fs::write(library.join("nested").join("two.TXT"), "two").unwrap();
    fs::write(library.join("cover.png"), "png").unwrap();
    let converter = write_script_converter(temp_dir.path());
    let report = temp_dir.path().join("report.json");

    let output = run(&[
        "--dir",
        library.to_str().unwrap(),
        "--converter",
        converter.to_str().unwrap(),
        "--report",
        report.to_str().unwrap(),
    ]);

    assert!(output.status.success(), "{output:?}");
    assert_eq!(fs::read_to_string(library.join("mobi").join("one.mobi")).unwrap(), "one");
    assert_eq!(fs::read_to_string(library.join("mobi").join("two.mobi")).unwrap(), "two");
    assert!(!library.join("mobi").join("cover.mobi").exists());

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(&report).unwrap()).unwrap();
    assert_eq!(report["summary"]["succeeded"], 2);
    assert_eq!(report["summary"]["failed"], 0);
}

#[cfg(unix)]
#[test]
fn test_strict_mode_reports_job_failures() {
    let temp_dir = TempDir::new().unwrap();
    let library = temp_dir.path().join("library");
    fs::create_dir_all(&library).unwrap();
    fs::write(library.join("good.epub"), "good").unwrap();
    fs::write(library.join("bad.epub"), "bad").unwrap();
    let converter = write_script_converter(temp_dir.path());

    let lenient = run(&[
        "--dir",
        library.to_str().unwrap(),
        "--converter",
        converter.to_str().unwrap(),
    ]);
    assert!(lenient.status.success());
    let stderr = String::from_utf8(lenient.stderr).unwrap();
    assert!(stderr.contains("Error converting bad.epub"));
    assert!(stderr.contains("cannot parse"));

    let strict = run(&[
        "--dir",
        library.to_str().unwrap(),
        "--converter",
        converter.to_str().unwrap(),
        "--strict",
    ]);
    assert_eq!(strict.status.code(), Some(2));
}

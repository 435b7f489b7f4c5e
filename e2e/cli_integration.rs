//! E2E: the `h5lzo` binary as a black box.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tempfile::TempDir;

fn h5lzo_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_h5lzo"))
}

fn h5lzo(dir: &Path, args: &[&str]) -> std::process::Output {
    Command::new(h5lzo_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("H5LZO_DISPLAY_LEVEL")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run h5lzo")
}

fn make_temp_input() -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("input.txt");
    fs::write(&input, "Hello, HDF5 LZO!\n".repeat(4096)).unwrap();
    (dir, input)
}

#[test]
fn compress_decompress_with_default_names() {
    let (dir, input) = make_temp_input();
    let original = fs::read(&input).unwrap();

    let out = h5lzo(dir.path(), &["input.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    let packed = dir.path().join("input.txt.h5lzo");
    assert!(packed.exists());
    assert!(fs::metadata(&packed).unwrap().len() < original.len() as u64);

    fs::remove_file(&input).unwrap();
    let out = h5lzo(dir.path(), &["input.txt.h5lzo"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(fs::read(&input).unwrap(), original);
}

#[test]
fn explicit_flags_and_output() {
    let (dir, _input) = make_temp_input();
    let out = h5lzo(
        dir.path(),
        &["-z", "-c", "4K", "-T", "2", "--no-checksum", "input.txt", "packed.bin"],
    );
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));

    let out = h5lzo(dir.path(), &["-d", "packed.bin", "restored.txt"]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert_eq!(
        fs::read(dir.path().join("restored.txt")).unwrap(),
        fs::read(dir.path().join("input.txt")).unwrap()
    );
}

#[test]
fn refuses_to_overwrite_without_force() {
    let (dir, _input) = make_temp_input();
    fs::write(dir.path().join("input.txt.h5lzo"), b"keep me").unwrap();

    let out = h5lzo(dir.path(), &["input.txt"]);
    assert!(!out.status.success());
    assert_eq!(fs::read(dir.path().join("input.txt.h5lzo")).unwrap(), b"keep me");

    let out = h5lzo(dir.path(), &["-f", "input.txt"]);
    assert!(out.status.success());
    assert_ne!(fs::read(dir.path().join("input.txt.h5lzo")).unwrap(), b"keep me");
}

#[test]
fn test_mode_accepts_valid_and_rejects_corrupt() {
    let (dir, _input) = make_temp_input();
    assert!(h5lzo(dir.path(), &["input.txt"]).status.success());
    assert!(h5lzo(dir.path(), &["-t", "input.txt.h5lzo"]).status.success());

    let packed = dir.path().join("input.txt.h5lzo");
    let mut bytes = fs::read(&packed).unwrap();
    let mid = bytes.len() / 2;
    bytes[mid] ^= 0xFF;
    fs::write(&packed, &bytes).unwrap();
    let out = h5lzo(dir.path(), &["-t", "input.txt.h5lzo"]);
    assert!(!out.status.success());
    assert!(!out.stderr.is_empty());
}

#[test]
fn decompress_needs_known_suffix_or_output() {
    let (dir, _input) = make_temp_input();
    let out = h5lzo(dir.path(), &["-d", "input.txt"]);
    assert!(!out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains(".h5lzo"));
}

#[test]
fn missing_input_exits_nonzero() {
    let dir = TempDir::new().unwrap();
    let out = h5lzo(dir.path(), &["does-not-exist.bin"]);
    assert!(!out.status.success());
    assert!(!dir.path().join("does-not-exist.bin.h5lzo").exists());
}

#[test]
fn quiet_mode_prints_nothing() {
    let (dir, _input) = make_temp_input();
    let out = h5lzo(dir.path(), &["-q", "input.txt"]);
    assert!(out.status.success());
    assert!(out.stderr.is_empty());
}

#[test]
fn info_prints_descriptor() {
    let dir = TempDir::new().unwrap();
    let out = h5lzo(dir.path(), &["--info"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("305"));
    assert!(stdout.contains("HDF5 lzo filter"));
    assert!(stdout.contains(h5lzo::LZO_VERSION_STRING));
    assert!(stdout.contains(h5lzo::version_string()));
}

#[test]
fn version_flag() {
    let dir = TempDir::new().unwrap();
    let out = h5lzo(dir.path(), &["--version"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn stdin_to_stdout_pipe() {
    let data = "pipeline ".repeat(10_000);
    let mut child = Command::new(h5lzo_bin())
        .args(["-q", "-f"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(data.as_bytes()).unwrap();
    let packed = child.wait_with_output().unwrap();
    assert!(packed.status.success());
    assert!(packed.stdout.len() < data.len());

    let mut child = Command::new(h5lzo_bin())
        .args(["-q", "-d"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(&packed.stdout).unwrap();
    let restored = child.wait_with_output().unwrap();
    assert!(restored.status.success());
    assert_eq!(restored.stdout, data.as_bytes());
}

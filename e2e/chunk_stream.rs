//! E2E: file-level chunk-stream compression with real temp files.

use std::fs;
use std::io;

use h5lzo::stream::{compress_file, decompress_file, test_file, Prefs, NUL_MARK};
use tempfile::TempDir;

fn quiet_prefs(chunk_size: usize) -> Prefs {
    let mut p = Prefs::default();
    p.set_chunk_size(chunk_size).unwrap();
    p
}

fn sample() -> Vec<u8> {
    let mut v: Vec<u8> = b"time,temperature,pressure\n"
        .iter()
        .chain(b"0.000,21.5,1013.25\n".iter().cycle().take(200_000))
        .copied()
        .collect();
    v.extend((0..50_000u32).map(|i| (i.wrapping_mul(0x9E37_79B9) >> 24) as u8));
    v
}

#[test]
fn compress_decompress_files() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("data.csv");
    let packed = dir.path().join("data.csv.h5lzo");
    let restored = dir.path().join("restored.csv");
    let original = sample();
    fs::write(&src, &original).unwrap();

    let prefs = quiet_prefs(64 * 1024);
    let stats = compress_file(src.to_str().unwrap(), packed.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(stats.bytes_in, original.len() as u64);
    assert_eq!(stats.bytes_out, fs::metadata(&packed).unwrap().len());
    assert!(stats.bytes_out < stats.bytes_in);

    let stats =
        decompress_file(packed.to_str().unwrap(), restored.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(stats.bytes_out, original.len() as u64);
    assert_eq!(fs::read(&restored).unwrap(), original);
}

#[test]
fn empty_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("empty");
    let packed = dir.path().join("empty.h5lzo");
    let restored = dir.path().join("empty.out");
    fs::write(&src, b"").unwrap();

    let prefs = quiet_prefs(4096);
    compress_file(src.to_str().unwrap(), packed.to_str().unwrap(), &prefs).unwrap();
    decompress_file(packed.to_str().unwrap(), restored.to_str().unwrap(), &prefs).unwrap();
    assert!(fs::read(&restored).unwrap().is_empty());
}

#[test]
fn existing_output_is_protected() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.bin");
    let dst = dir.path().join("in.bin.h5lzo");
    fs::write(&src, vec![0u8; 10_000]).unwrap();
    fs::write(&dst, b"precious").unwrap();

    let mut prefs = quiet_prefs(4096);
    let err = compress_file(src.to_str().unwrap(), dst.to_str().unwrap(), &prefs).unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
    assert_eq!(fs::read(&dst).unwrap(), b"precious");

    prefs.overwrite = true;
    compress_file(src.to_str().unwrap(), dst.to_str().unwrap(), &prefs).unwrap();
    assert_ne!(fs::read(&dst).unwrap(), b"precious");
}

#[test]
fn integrity_test_and_null_output() {
    let dir = TempDir::new().unwrap();
    let src = dir.path().join("in.bin");
    let packed = dir.path().join("in.bin.h5lzo");
    fs::write(&src, sample()).unwrap();
    let prefs = quiet_prefs(32 * 1024);
    compress_file(src.to_str().unwrap(), packed.to_str().unwrap(), &prefs).unwrap();

    let stats = test_file(packed.to_str().unwrap(), &prefs).unwrap();
    assert_eq!(stats.bytes_out, sample().len() as u64);
    decompress_file(packed.to_str().unwrap(), NUL_MARK, &prefs).unwrap();

    let mut bytes = fs::read(&packed).unwrap();
    let n = bytes.len();
    bytes[n / 3] ^= 0x80;
    fs::write(&packed, &bytes).unwrap();
    assert!(test_file(packed.to_str().unwrap(), &prefs).is_err());
}

#[test]
fn missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope");
    let out = dir.path().join("nope.h5lzo");
    let err = compress_file(missing.to_str().unwrap(), out.to_str().unwrap(), &quiet_prefs(4096))
        .unwrap_err();
    assert_eq!(err.kind(), io::ErrorKind::NotFound);
    assert!(!out.exists());
}

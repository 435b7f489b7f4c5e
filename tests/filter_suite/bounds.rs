// Compression bounds guard and direction dispatch.

use h5lzo::descriptor::H5Z_FLAG_REVERSE;
use h5lzo::filter::{filter_bound, ChunkStorage, Direction, Filter, FilterError, StreamHint};
use h5lzo::lzo::{compress_bound, LzoError};

use crate::support::{random_bytes, reset, CountingBuf, Scripted};

#[test]
fn incompressible_chunk_is_rejected_untouched() {
    let data = random_bytes(64 * 1024, 11);
    let mut buf = data.clone();
    let err = Filter::new()
        .apply(Direction::Forward, &[], data.len(), &mut buf, &mut StreamHint::new())
        .unwrap_err();
    assert!(err.is_rejection());
    assert!(matches!(err, FilterError::NotBeneficial { original, compressed }
        if original == data.len() && compressed >= original));
    assert_eq!(buf, data);
}

#[test]
fn equal_size_output_is_rejected() {
    reset(usize::MAX);
    let mut buf = CountingBuf::new(vec![3u8; 100]);
    let same = Scripted { compress: Ok(100), decompress: Ok(0) };
    let err = Filter::with_codec(same)
        .apply(Direction::Forward, &[], 100, &mut buf, &mut StreamHint::new())
        .unwrap_err();
    assert_eq!(err, FilterError::NotBeneficial { original: 100, compressed: 100 });
    assert_eq!(buf.bytes(), &[3u8; 100][..]);
}

#[test]
fn one_byte_saving_is_accepted() {
    reset(usize::MAX);
    let mut buf = CountingBuf::new(vec![3u8; 100]);
    let saves = Scripted { compress: Ok(99), decompress: Ok(0) };
    let n = Filter::with_codec(saves)
        .apply(Direction::Forward, &[], 100, &mut buf, &mut StreamHint::new())
        .unwrap();
    assert_eq!(n, 99);
    assert_eq!(buf.size(), 216);
}

#[test]
fn codec_failure_on_compress_propagates() {
    let mut buf = vec![3u8; 100];
    let broken = Scripted { compress: Err(LzoError::Error), decompress: Ok(0) };
    let err = Filter::with_codec(broken)
        .apply(Direction::Forward, &[], 100, &mut buf, &mut StreamHint::new())
        .unwrap_err();
    assert_eq!(err, FilterError::Codec(LzoError::Error));
    assert!(!err.is_rejection());
    assert_eq!(buf, vec![3u8; 100]);
}

#[test]
fn success_reports_bound_as_capacity() {
    for len in [64usize, 1000, 4096, 100_000] {
        let mut buf = vec![0u8; len];
        let n = Filter::new()
            .apply(Direction::Forward, &[], len, &mut buf, &mut StreamHint::new())
            .unwrap();
        assert!(n < len);
        assert_eq!(buf.len(), filter_bound(len).unwrap());
        assert!(filter_bound(len).unwrap() >= compress_bound(len));
    }
}

#[test]
fn flag_word_selects_direction() {
    let data = vec![0u8; 4096];
    let mut buf = data.clone();
    let n = Filter::new()
        .apply_flags(0, &[], 4096, &mut buf, &mut StreamHint::new())
        .unwrap();
    assert!(n < 4096);
    let n = Filter::new()
        .apply_flags(H5Z_FLAG_REVERSE | 0x0001, &[], n, &mut buf, &mut StreamHint::new())
        .unwrap();
    assert_eq!(&buf[..n], data.as_slice());
}

#[test]
fn aux_words_do_not_change_output() {
    let data: Vec<u8> = (0..10_000u32).map(|i| (i / 3 % 17) as u8).collect();
    let encode = |aux: &[u32]| {
        let mut buf = data.clone();
        let n = Filter::new()
            .apply(Direction::Forward, aux, data.len(), &mut buf, &mut StreamHint::new())
            .unwrap();
        buf.truncate(n);
        buf
    };
    let plain = encode(&[]);
    assert_eq!(encode(&[9]), plain);
    assert_eq!(encode(&[1, 20, 3]), plain);
    assert_eq!(encode(&[5, 5, 5, 5, 5, 5]), plain);
}

#[test]
fn empty_chunk() {
    // An empty chunk compresses to the bare end marker, which saves nothing.
    let mut buf: Vec<u8> = Vec::new();
    let err = Filter::new()
        .apply(Direction::Forward, &[], 0, &mut buf, &mut StreamHint::new())
        .unwrap_err();
    assert!(err.is_rejection());

    let mut buf = vec![0x11, 0, 0];
    let n = Filter::new()
        .apply(Direction::Reverse, &[], 3, &mut buf, &mut StreamHint::new())
        .unwrap();
    assert_eq!(n, 0);
}

// Round trips through the LZO1X encoder and safe decoder, covering each
// match encoding and the window boundary.

use h5lzo::lzo::{compress, compress_bound, compress_with_dict, decompress_safe, LzoError};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

fn encode(src: &[u8]) -> Vec<u8> {
    let mut enc = vec![0u8; compress_bound(src.len())];
    let n = compress(src, &mut enc).unwrap();
    enc.truncate(n);
    enc
}

fn roundtrip(src: &[u8]) -> Vec<u8> {
    let enc = encode(src);
    let mut dec = vec![0u8; src.len()];
    let m = decompress_safe(&enc, &mut dec).unwrap();
    assert_eq!(m, src.len());
    dec
}

fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut v = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut v);
    v
}

#[test]
fn every_short_length() {
    let text = b"the quick brown fox jumps over the lazy dog, the quick brown fox";
    for len in 0..=text.len() {
        assert_eq!(roundtrip(&text[..len]), &text[..len], "len = {len}");
    }
}

#[test]
fn incompressible_input_stays_within_bound() {
    let src = random_bytes(100_000, 1);
    let enc = encode(&src);
    assert!(enc.len() <= compress_bound(src.len()));
    assert!(enc.len() >= src.len());
    assert_eq!(roundtrip(&src), src);
}

#[test]
fn short_period_uses_near_matches() {
    let src: Vec<u8> = b"abc".iter().copied().cycle().take(10_000).collect();
    assert!(encode(&src).len() < 200);
    assert_eq!(roundtrip(&src), src);
}

#[test]
fn medium_distance_matches() {
    let block = random_bytes(5_000, 2);
    let src = [block.as_slice(), block.as_slice(), block.as_slice()].concat();
    assert_eq!(roundtrip(&src), src);
}

#[test]
fn far_matches_beyond_16k() {
    let block = random_bytes(20_000, 3);
    let src = [block.as_slice(), block.as_slice()].concat();
    assert_eq!(roundtrip(&src), src);
}

#[test]
fn handcrafted_far_match() {
    // 16400 literals (extended length), then a 5-byte match 16400 bytes back
    // encoded with the far-distance marker.
    let literals = random_bytes(16_400, 6);
    let mut stream = vec![0u8];
    stream.extend(std::iter::repeat(0u8).take(64));
    stream.push(62);
    stream.extend_from_slice(&literals);
    stream.extend_from_slice(&[16 | 3, 16 << 2, 0]);
    stream.extend_from_slice(&[0x11, 0, 0]);

    let mut dst = vec![0u8; 16_405];
    assert_eq!(decompress_safe(&stream, &mut dst), Ok(16_405));
    assert_eq!(&dst[..16_400], literals.as_slice());
    assert_eq!(&dst[16_400..], &literals[..5]);
}

// The encoder never emits the short M1 forms; streams from other LZO1X
// compressors do.

#[test]
fn handcrafted_short_match_after_literal_run() {
    // 3000 literals (11 zero extension bytes), then a 3-byte match 3000 back:
    // 2049 + (12 >> 2) + (237 << 2).
    let literals = random_bytes(3_000, 7);
    let mut stream = vec![0u8];
    stream.extend(std::iter::repeat(0u8).take(11));
    stream.push(177);
    stream.extend_from_slice(&literals);
    stream.extend_from_slice(&[12, 237]);
    stream.extend_from_slice(&[0x11, 0, 0]);

    let mut dst = vec![0u8; 3_003];
    assert_eq!(decompress_safe(&stream, &mut dst), Ok(3_003));
    assert_eq!(&dst[..3_000], literals.as_slice());
    assert_eq!(&dst[3_000..], &literals[..3]);

    let mut short = vec![0u8; 3_002];
    assert_eq!(decompress_safe(&stream, &mut short), Err(LzoError::OutputOverrun));
}

#[test]
fn handcrafted_short_match_after_trailing_literal() {
    // "abcdef", an M2 match of 3 one byte back carrying one trailing literal,
    // then a 2-byte match 2 back.
    let mut stream = vec![23u8];
    stream.extend_from_slice(b"abcdef");
    stream.extend_from_slice(&[65, 0, b'x', 4, 0]);
    stream.extend_from_slice(&[0x11, 0, 0]);

    let mut dst = vec![0u8; 12];
    assert_eq!(decompress_safe(&stream, &mut dst), Ok(12));
    assert_eq!(&dst, b"abcdeffffxfx");
}

#[test]
fn input_spanning_several_windows() {
    let mut src = Vec::with_capacity(300_000);
    let mut rng = StdRng::seed_from_u64(4);
    while src.len() < 300_000 {
        let mut word = [0u8; 6];
        rng.fill_bytes(&mut word);
        let repeat = 1 + (word[0] % 8) as usize;
        for _ in 0..repeat {
            src.extend_from_slice(&word);
        }
    }
    assert_eq!(roundtrip(&src), src);

    let zeros = vec![0u8; 200_000];
    assert!(encode(&zeros).len() < 4_000);
    assert_eq!(roundtrip(&zeros), zeros);
}

#[test]
fn exact_destination_is_enough() {
    let src = vec![0x5Au8; 4096];
    let enc = encode(&src);
    let mut dst = vec![0u8; src.len()];
    assert_eq!(decompress_safe(&enc, &mut dst), Ok(src.len()));
    let mut short = vec![0u8; src.len() - 1];
    assert_eq!(decompress_safe(&enc, &mut short), Err(LzoError::OutputOverrun));
}

#[test]
fn reused_dictionary_gives_identical_output() {
    let src: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8 ^ (i / 997) as u8).collect();
    let mut dict = vec![0u16; 1 << 14];
    let mut a = vec![0u8; compress_bound(src.len())];
    let mut b = vec![0u8; compress_bound(src.len())];
    let na = compress_with_dict(&src, &mut a, &mut dict).unwrap();
    let nb = compress_with_dict(&src, &mut b, &mut dict).unwrap();
    assert_eq!(&a[..na], &b[..nb]);
    assert_eq!(&a[..na], encode(&src).as_slice());
}

#[test]
fn truncated_streams_fail() {
    let src = random_bytes(3_000, 5);
    let enc = encode(&[src.as_slice(), src.as_slice()].concat());
    let mut dst = vec![0u8; 6_000];
    for cut in 1..=3 {
        let r = decompress_safe(&enc[..enc.len() - cut], &mut dst);
        assert_eq!(r, Err(LzoError::InputOverrun), "cut = {cut}");
    }
}

// Property tests: arbitrary inputs round-trip and the decoder never panics.

use h5lzo::lzo::{compress, compress_bound, decompress_safe, LzoError};
use proptest::collection::vec;
use proptest::prelude::*;

fn encode(src: &[u8]) -> Vec<u8> {
    let mut enc = vec![0u8; compress_bound(src.len())];
    let n = compress(src, &mut enc).unwrap();
    enc.truncate(n);
    enc
}

proptest! {
    #[test]
    fn arbitrary_bytes_round_trip(data in vec(any::<u8>(), 0..4096)) {
        let enc = encode(&data);
        prop_assert!(enc.len() <= compress_bound(data.len()));
        let mut dec = vec![0u8; data.len()];
        prop_assert_eq!(decompress_safe(&enc, &mut dec), Ok(data.len()));
        prop_assert_eq!(dec, data);
    }

    #[test]
    fn low_entropy_round_trip(data in vec(0u8..4, 0..20_000)) {
        let enc = encode(&data);
        let mut dec = vec![0u8; data.len()];
        prop_assert_eq!(decompress_safe(&enc, &mut dec), Ok(data.len()));
        prop_assert_eq!(dec, data);
    }

    #[test]
    fn small_destination_only_overruns(data in vec(0u8..3, 1..8192), short in 1usize..64) {
        let enc = encode(&data);
        let mut dst = vec![0u8; data.len().saturating_sub(short)];
        prop_assert_eq!(decompress_safe(&enc, &mut dst), Err(LzoError::OutputOverrun));
    }

    #[test]
    fn garbage_never_panics(data in vec(any::<u8>(), 0..512), cap in 0usize..2048) {
        let mut dst = vec![0u8; cap];
        if let Ok(n) = decompress_safe(&data, &mut dst) {
            prop_assert!(n <= cap);
        }
    }
}

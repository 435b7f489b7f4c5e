// Decompression growth loop.

use h5lzo::config::MIN_DECOMPRESS_ALLOC;
use h5lzo::filter::{Direction, Filter, FilterError, SizeHint, StreamHint};
use h5lzo::lzo::LzoError;
use proptest::prelude::*;

use crate::support::{compressed, live, regrows, reset, CountingBuf, Scripted};

#[test]
fn zeros_from_declared_capacity_of_one() {
    let packed = compressed(&[0u8; 4096]);
    let nbytes = packed.len();
    let mut buf = packed;
    let mut hint = StreamHint::with_size(1);
    let n = Filter::new()
        .apply(Direction::Reverse, &[], nbytes, &mut buf, &mut hint)
        .unwrap();
    assert_eq!(n, 4096);
    assert!(buf.len() >= 4096);
    assert!(buf[..n].iter().all(|&b| b == 0));
    assert_eq!(hint.get(), Some(4096));
}

#[test]
fn doublings_are_logarithmic() {
    reset(usize::MAX);
    let packed = compressed(&[0u8; 4096]);
    let nbytes = packed.len();
    let mut buf = CountingBuf::new(packed);
    let n = Filter::new()
        .apply(Direction::Reverse, &[], nbytes, &mut buf, &mut StreamHint::with_size(1))
        .unwrap();
    assert_eq!(n, 4096);
    // 64 -> 128 -> ... -> 4096
    assert_eq!(regrows(), (4096 / MIN_DECOMPRESS_ALLOC).ilog2() as usize);
    assert_eq!(buf.bytes().len(), 4096);
}

#[test]
fn unset_hint_starts_from_declared_capacity() {
    reset(usize::MAX);
    let mut packed = compressed(&[0u8; 4096]);
    let nbytes = packed.len();
    packed.resize(5000, 0);
    let mut buf = CountingBuf::new(packed);
    let mut hint = StreamHint::new();
    let n = Filter::new()
        .apply(Direction::Reverse, &[], nbytes, &mut buf, &mut hint)
        .unwrap();
    assert_eq!(n, 4096);
    assert_eq!(regrows(), 0);
    assert_eq!(buf.bytes().len(), 5000);
    assert!(buf.bytes()[..n].iter().all(|&b| b == 0));
    assert_eq!(hint.get(), Some(4096));
}

#[test]
fn growth_stops_at_allocation_failure() {
    reset(1 << 16);
    let base = live();
    let original = vec![9u8; 10];
    let mut buf = CountingBuf::new(original.clone());
    let overrun = Scripted { compress: Ok(0), decompress: Err(LzoError::OutputOverrun) };
    let err = Filter::with_codec(overrun)
        .apply(Direction::Reverse, &[], 10, &mut buf, &mut StreamHint::new())
        .unwrap_err();
    assert_eq!(err, FilterError::Allocation { requested: 1 << 17 });
    // 128, 256, ..., 1 << 17
    assert_eq!(regrows(), 11);
    assert_eq!(buf.bytes(), original.as_slice());
    assert_eq!(live(), base + 1);
}

#[test]
fn codec_error_is_not_retried() {
    reset(usize::MAX);
    let mut buf = CountingBuf::new(vec![1u8; 32]);
    let corrupt = Scripted { compress: Ok(0), decompress: Err(LzoError::LookbehindOverrun) };
    let err = Filter::with_codec(corrupt)
        .apply(Direction::Reverse, &[], 32, &mut buf, &mut StreamHint::new())
        .unwrap_err();
    assert_eq!(err, FilterError::Codec(LzoError::LookbehindOverrun));
    assert_eq!(regrows(), 0);
}

#[test]
fn zero_declared_capacity_starts_at_floor() {
    reset(usize::MAX);
    let packed = compressed(&[0u8; 64]);
    let nbytes = packed.len();
    let mut buf = CountingBuf::new(packed);
    Filter::new()
        .apply(Direction::Reverse, &[], nbytes, &mut buf, &mut StreamHint::with_size(0))
        .unwrap();
    assert_eq!(regrows(), 0);
    assert_eq!(buf.bytes().len(), MIN_DECOMPRESS_ALLOC);
}

#[test]
fn corrupt_chunk_fails() {
    let data: Vec<u8> = (0..4_000u32).map(|i| (i % 13) as u8).collect();
    let mut packed = compressed(&data);
    let last = packed.len() - 1;
    packed[last] = 0x55;
    let nbytes = packed.len();
    let before = packed.clone();
    let err = Filter::new()
        .apply(Direction::Reverse, &[], nbytes, &mut packed, &mut StreamHint::new())
        .unwrap_err();
    assert!(matches!(err, FilterError::Codec(_)), "{err:?}");
    assert_eq!(packed, before);
}

proptest! {
    #[test]
    fn any_starting_guess_reaches_the_data(len in 1usize..20_000, guess in 0usize..40_000, fill in 0u8..4) {
        let data: Vec<u8> = (0..len).map(|i| fill.wrapping_mul((i % 7) as u8)).collect();
        let mut buf = data.clone();
        let forward = Filter::new()
            .apply(Direction::Forward, &[], len, &mut buf, &mut StreamHint::new());
        prop_assume!(forward.is_ok());
        let nbytes = forward.unwrap();
        let mut hint = StreamHint::with_size(guess);
        let n = Filter::new()
            .apply(Direction::Reverse, &[], nbytes, &mut buf, &mut hint)
            .unwrap();
        prop_assert_eq!(n, len);
        prop_assert_eq!(&buf[..n], data.as_slice());
        prop_assert!(buf.len() >= len);
    }
}

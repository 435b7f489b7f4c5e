// Exactly one buffer survives every call, and it is the caller's.

use h5lzo::filter::{Direction, Filter, StreamHint};

use crate::support::{compressed, live, random_bytes, reset, CountingBuf};

#[test]
fn success_replaces_the_buffer() {
    reset(usize::MAX);
    let base = live();
    let mut buf = CountingBuf::new(vec![0u8; 8192]);
    let n = Filter::new()
        .apply(Direction::Forward, &[], 8192, &mut buf, &mut StreamHint::new())
        .unwrap();
    assert!(n < 8192);
    assert_eq!(live(), base + 1);

    let n = Filter::new()
        .apply(Direction::Reverse, &[], n, &mut buf, &mut StreamHint::new())
        .unwrap();
    assert_eq!(n, 8192);
    assert_eq!(live(), base + 1);
    drop(buf);
    assert_eq!(live(), base);
}

#[test]
fn rejection_keeps_the_buffer() {
    reset(usize::MAX);
    let base = live();
    let data = random_bytes(4096, 21);
    let mut buf = CountingBuf::new(data.clone());
    assert!(Filter::new()
        .apply(Direction::Forward, &[], data.len(), &mut buf, &mut StreamHint::new())
        .is_err());
    assert_eq!(buf.bytes(), data.as_slice());
    assert_eq!(live(), base + 1);
}

#[test]
fn decode_failure_keeps_the_buffer() {
    reset(usize::MAX);
    let base = live();
    let mut packed = compressed(&[7u8; 5000]);
    packed.truncate(packed.len() - 2);
    let before = packed.clone();
    let nbytes = packed.len();
    let mut buf = CountingBuf::new(packed);
    assert!(Filter::new()
        .apply(Direction::Reverse, &[], nbytes, &mut buf, &mut StreamHint::new())
        .is_err());
    assert_eq!(buf.bytes(), before.as_slice());
    assert_eq!(live(), base + 1);
}

#[test]
fn allocation_failure_keeps_the_buffer() {
    reset(1024);
    let base = live();
    let mut buf = CountingBuf::new(vec![0u8; 4096]);
    let err = Filter::new()
        .apply(Direction::Forward, &[], 4096, &mut buf, &mut StreamHint::new())
        .unwrap_err();
    assert!(!err.is_rejection());
    assert_eq!(buf.bytes(), &[0u8; 4096][..]);
    assert_eq!(live(), base + 1);
    reset(usize::MAX);
}

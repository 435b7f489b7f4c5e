#![no_main]
use h5lzo::filter::{Direction, Filter, StreamHint};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Any input either decodes or fails with the caller's buffer intact.
    let mut buf = data.to_vec();
    match Filter::new().apply(Direction::Reverse, &[], data.len(), &mut buf, &mut StreamHint::new()) {
        Ok(n) => assert!(n <= buf.len()),
        Err(_) => assert_eq!(buf, data),
    }
});

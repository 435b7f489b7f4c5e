#![no_main]
use h5lzo::filter::{Direction, Filter, StreamHint};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut buf = data.to_vec();
    let Ok(n) = Filter::new().apply(Direction::Forward, &[], data.len(), &mut buf, &mut StreamHint::new())
    else {
        // Declined chunks must come back untouched.
        assert_eq!(buf, data);
        return;
    };
    assert!(n < data.len());

    let m = Filter::new()
        .apply(Direction::Reverse, &[], n, &mut buf, &mut StreamHint::new())
        .expect("filter output must decode");
    assert_eq!(&buf[..m], data);
});

#![no_main]
use h5lzo::lzo::decompress_safe;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // First two bytes pick the destination size; the rest is the stream.
    if data.len() < 2 {
        return;
    }
    let cap = u16::from_le_bytes([data[0], data[1]]) as usize;
    let mut dst = vec![0u8; cap];
    if let Ok(n) = decompress_safe(&data[2..], &mut dst) {
        assert!(n <= cap);
    }
});

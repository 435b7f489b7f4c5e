// Decompressed-size heuristic: per-stream isolation and shared best effort.

use std::sync::Arc;
use std::thread;

use h5lzo::filter::{Direction, Filter, SharedHint, SizeHint, StreamHint};

use crate::support::compressed;

fn decode_with<H: SizeHint>(packed: &[u8], hint: &mut H) -> Vec<u8> {
    let mut buf = packed.to_vec();
    let n = Filter::new()
        .apply(Direction::Reverse, &[], packed.len(), &mut buf, hint)
        .unwrap();
    buf.truncate(n);
    buf
}

#[test]
fn stream_hints_are_isolated_across_threads() {
    let handles: Vec<_> = (1..=4usize)
        .map(|k| {
            thread::spawn(move || {
                let size = k * 10_000;
                let data: Vec<u8> = (0..size).map(|i| (i % (k + 2)) as u8).collect();
                let packed = compressed(&data);
                let mut hint = StreamHint::new();
                for _ in 0..20 {
                    assert_eq!(decode_with(&packed, &mut hint), data);
                    assert_eq!(hint.get(), Some(size));
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
}

#[test]
fn shared_hint_races_do_not_affect_results() {
    let shared = Arc::new(SharedHint::new());
    let handles: Vec<_> = (1..=4usize)
        .map(|k| {
            let shared = Arc::clone(&shared);
            thread::spawn(move || {
                let data: Vec<u8> = (0..k * 7_000).map(|i| (i % 5) as u8 * k as u8).collect();
                let packed = compressed(&data);
                for _ in 0..25 {
                    let mut hint = &*shared;
                    assert_eq!(decode_with(&packed, &mut hint), data);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }
    let last = shared.load().unwrap();
    assert!([7_000, 14_000, 21_000, 28_000].contains(&last));
}

#[test]
fn hint_tracks_the_latest_chunk() {
    let small = compressed(&[1u8; 1000]);
    let large = compressed(&[1u8; 50_000]);
    let mut hint = StreamHint::new();
    decode_with(&large, &mut hint);
    assert_eq!(hint.get(), Some(50_000));
    // An oversized guess still yields the exact length.
    assert_eq!(decode_with(&small, &mut hint).len(), 1000);
    assert_eq!(hint.get(), Some(1000));
}

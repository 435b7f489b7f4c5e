//! E2E: a dataset's worth of chunks through the filter.
//!
//! Mimics the host pipeline: every chunk of a "dataset" is written through
//! the forward path (stored raw when declined) and read back through the
//! reverse path with one size hint per dataset.

use h5lzo::filter::{Direction, Filter, SizeHint, StreamHint};
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

enum Stored {
    Raw(Vec<u8>),
    Lzo(Vec<u8>),
}

fn write_chunk(chunk: &[u8]) -> Stored {
    let mut buf = chunk.to_vec();
    match Filter::new().apply(Direction::Forward, &[], chunk.len(), &mut buf, &mut StreamHint::new()) {
        Ok(n) => {
            assert!(n < chunk.len());
            buf.truncate(n);
            Stored::Lzo(buf)
        }
        Err(e) => {
            assert!(e.is_rejection(), "{e}");
            assert_eq!(buf, chunk);
            Stored::Raw(buf)
        }
    }
}

fn read_chunk<H: SizeHint>(stored: &Stored, hint: &mut H) -> Vec<u8> {
    match stored {
        Stored::Raw(bytes) => bytes.clone(),
        Stored::Lzo(bytes) => {
            let mut buf = bytes.clone();
            let n = Filter::new()
                .apply(Direction::Reverse, &[], bytes.len(), &mut buf, hint)
                .unwrap();
            buf.truncate(n);
            buf
        }
    }
}

/// Float-like data: a slowly drifting, quantized little-endian f32 signal.
fn float_chunk(rng: &mut StdRng, n: usize) -> Vec<u8> {
    let mut v = Vec::with_capacity(n * 4);
    let mut x = rng.gen_range(0.0f32..1.0);
    for _ in 0..n {
        x += rng.gen_range(-0.001f32..0.001);
        v.extend_from_slice(&((x * 64.0).round() / 64.0).to_le_bytes());
    }
    v
}

#[test]
fn dataset_of_equal_chunks() {
    let mut rng = StdRng::seed_from_u64(1);
    let chunks: Vec<Vec<u8>> = (0..32).map(|_| float_chunk(&mut rng, 16 * 1024)).collect();
    let stored: Vec<Stored> = chunks.iter().map(|c| write_chunk(c)).collect();
    assert!(stored.iter().any(|s| matches!(s, Stored::Lzo(_))));

    let mut hint = StreamHint::new();
    for (chunk, s) in chunks.iter().zip(&stored) {
        assert_eq!(&read_chunk(s, &mut hint), chunk);
    }
    assert_eq!(hint.get(), Some(64 * 1024));
}

#[test]
fn dataset_with_partial_edge_chunks() {
    // Edge chunks of a dataset are smaller than the rest.
    let sizes = [65_536usize, 65_536, 65_536, 12_000, 65_536, 700, 1];
    let mut rng = StdRng::seed_from_u64(2);
    let chunks: Vec<Vec<u8>> = sizes
        .iter()
        .map(|&n| (0..n).map(|i| ((i / 16) as u8).wrapping_add(rng.gen_range(0..2))).collect())
        .collect();
    let stored: Vec<Stored> = chunks.iter().map(|c| write_chunk(c)).collect();

    let mut hint = StreamHint::new();
    for (chunk, s) in chunks.iter().zip(&stored) {
        assert_eq!(&read_chunk(s, &mut hint), chunk);
    }
}

#[test]
fn noise_and_structure_interleaved() {
    let mut rng = StdRng::seed_from_u64(3);
    let mut chunks = Vec::new();
    for i in 0..12 {
        let mut c = vec![0u8; 32 * 1024];
        if i % 2 == 0 {
            rng.fill_bytes(&mut c);
        } else {
            c.iter_mut().enumerate().for_each(|(j, b)| *b = (j % 251) as u8);
        }
        chunks.push(c);
    }
    let stored: Vec<Stored> = chunks.iter().map(|c| write_chunk(c)).collect();
    for (i, s) in stored.iter().enumerate() {
        assert_eq!(matches!(s, Stored::Raw(_)), i % 2 == 0, "chunk {i}");
    }
    let mut hint = StreamHint::new();
    for (chunk, s) in chunks.iter().zip(&stored) {
        assert_eq!(&read_chunk(s, &mut hint), chunk);
    }
}

#[test]
fn large_chunk_crosses_encoder_windows() {
    let chunk: Vec<u8> = (0..4usize << 20).map(|i| (i % 1021) as u8 ^ (i >> 18) as u8).collect();
    let stored = write_chunk(&chunk);
    assert!(matches!(stored, Stored::Lzo(_)));
    assert_eq!(read_chunk(&stored, &mut StreamHint::with_size(1)), chunk);
}

#[cfg(feature = "plugin")]
#[test]
fn malloc_buffers_behave_like_vecs() {
    use h5lzo::filter::ChunkStorage;
    use h5lzo::plugin::MallocBuf;

    let chunk: Vec<u8> = (0..100_000u32).map(|i| (i % 97) as u8).collect();
    let mut buf = MallocBuf::allocate(chunk.len()).unwrap();
    buf.as_mut_slice().copy_from_slice(&chunk);

    let n = Filter::new()
        .apply(Direction::Forward, &[], chunk.len(), &mut buf, &mut StreamHint::new())
        .unwrap();
    let m = Filter::new()
        .apply(Direction::Reverse, &[], n, &mut buf, &mut StreamHint::new())
        .unwrap();
    assert_eq!(m, chunk.len());
    assert_eq!(&buf.as_slice()[..m], chunk.as_slice());
}

// Shared fixtures: instrumented buffers and scripted codecs.

use std::cell::Cell;

use h5lzo::filter::{ChunkCodec, ChunkStorage, Direction, Filter, FilterError, StreamHint};
use h5lzo::lzo::LzoError;
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};

thread_local! {
    static LIVE: Cell<isize> = const { Cell::new(0) };
    static REGROWS: Cell<usize> = const { Cell::new(0) };
    static ALLOC_LIMIT: Cell<usize> = const { Cell::new(usize::MAX) };
}

/// Live `CountingBuf`s on this thread.
pub fn live() -> isize {
    LIVE.with(Cell::get)
}

pub fn regrows() -> usize {
    REGROWS.with(Cell::get)
}

/// Reset counters and set the largest allocation that succeeds.
pub fn reset(limit: usize) {
    REGROWS.with(|c| c.set(0));
    ALLOC_LIMIT.with(|c| c.set(limit));
}

/// A `Vec`-backed buffer that counts live instances and growth steps, and
/// fails allocations above a per-thread limit.
#[derive(Debug)]
pub struct CountingBuf(Vec<u8>);

impl CountingBuf {
    pub fn new(data: Vec<u8>) -> Self {
        LIVE.with(|c| c.set(c.get() + 1));
        Self(data)
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Drop for CountingBuf {
    fn drop(&mut self) {
        LIVE.with(|c| c.set(c.get() - 1));
    }
}

fn check_limit(size: usize) -> Result<(), FilterError> {
    if size > ALLOC_LIMIT.with(Cell::get) {
        return Err(FilterError::Allocation { requested: size });
    }
    Ok(())
}

impl ChunkStorage for CountingBuf {
    fn allocate(size: usize) -> Result<Self, FilterError> {
        check_limit(size)?;
        Ok(Self::new(<Vec<u8> as ChunkStorage>::allocate(size)?))
    }

    fn regrow(&mut self, size: usize) -> Result<(), FilterError> {
        REGROWS.with(|c| c.set(c.get() + 1));
        check_limit(size)?;
        self.0.regrow(size)
    }

    fn size(&self) -> usize {
        self.0.len()
    }

    fn as_slice(&self) -> &[u8] {
        &self.0
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

/// A codec that replays one fixed outcome for every call.
#[derive(Debug, Clone, Copy)]
pub struct Scripted {
    pub compress: Result<usize, LzoError>,
    pub decompress: Result<usize, LzoError>,
}

impl ChunkCodec for Scripted {
    fn dst_bound(&self, input_len: usize) -> Option<usize> {
        Some(input_len * 2 + 16)
    }

    fn compress(&self, _src: &[u8], _dst: &mut [u8]) -> Result<usize, LzoError> {
        self.compress
    }

    fn decompress(&self, _src: &[u8], _dst: &mut [u8]) -> Result<usize, LzoError> {
        self.decompress
    }
}

pub fn random_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut v = vec![0u8; len];
    StdRng::seed_from_u64(seed).fill_bytes(&mut v);
    v
}

/// Forward-filter `data` and return the compressed bytes.
pub fn compressed(data: &[u8]) -> Vec<u8> {
    let mut buf = data.to_vec();
    let n = Filter::new()
        .apply(Direction::Forward, &[], data.len(), &mut buf, &mut StreamHint::new())
        .unwrap();
    buf.truncate(n);
    buf
}

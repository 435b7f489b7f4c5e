//! Decompressed-size heuristic.
//!
//! LZO streams do not record their decoded length, so the decompression path
//! has to guess an output size.  Consecutive chunks of a dataset usually
//! decode to the same size, so the last observed size is the guess for the
//! next call.
//!
//! Two carriers are provided:
//!
//! - [`StreamHint`] — owned by the caller, one per logical chunk stream.
//!   Calls on different streams cannot see each other's value.
//! - [`SharedHint`] — one process-wide atomic for hosts that pass no
//!   context (the C plugin entry point).  Concurrent calls may overwrite each
//!   other's value.  That only changes the first allocation size: an
//!   undersized guess is always detected by the decoder and grown, and an
//!   oversized one just wastes memory for that call.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Source and sink for the "likely decoded size" of the next chunk.
pub trait SizeHint {
    /// Last recorded size, or `None` when nothing was recorded yet.
    fn get(&self) -> Option<usize>;

    /// Overwrite the hint with an exact decoded size.
    fn record(&mut self, decoded_len: usize);
}

/// Per-stream hint owned by the caller.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamHint {
    last: Option<usize>,
}

impl StreamHint {
    pub const fn new() -> Self {
        Self { last: None }
    }

    /// Start with a known expected size.
    pub const fn with_size(size: usize) -> Self {
        Self { last: Some(size) }
    }
}

impl SizeHint for StreamHint {
    fn get(&self) -> Option<usize> {
        self.last
    }

    fn record(&mut self, decoded_len: usize) {
        self.last = Some(decoded_len);
    }
}

/// Best-effort shared hint.  Zero encodes "unknown".
#[derive(Debug, Default)]
pub struct SharedHint {
    last: AtomicUsize,
}

impl SharedHint {
    pub const fn new() -> Self {
        Self { last: AtomicUsize::new(0) }
    }

    pub fn load(&self) -> Option<usize> {
        match self.last.load(Ordering::Relaxed) {
            0 => None,
            n => Some(n),
        }
    }

    pub fn store(&self, decoded_len: usize) {
        self.last.store(decoded_len, Ordering::Relaxed);
    }

    /// Forget the recorded size.
    pub fn reset(&self) {
        self.last.store(0, Ordering::Relaxed);
    }
}

impl SizeHint for &SharedHint {
    fn get(&self) -> Option<usize> {
        self.load()
    }

    fn record(&mut self, decoded_len: usize) {
        self.store(decoded_len);
    }
}

//! Owned chunk buffers.
//!
//! The filter allocates, grows and hands back buffers only through
//! [`ChunkStorage`], so the same engine serves Rust callers (`Vec<u8>`) and
//! the C plugin entry point, whose buffers live on the `malloc` heap.
//!
//! Ownership rules follow from the type system: the caller's buffer is
//! replaced by assignment (dropping, i.e. freeing, the old one exactly once)
//! and scratch buffers that are not handed back are dropped on every error
//! path.

use crate::filter::error::FilterError;

/// An owned, heap-allocated chunk buffer with a declared size.
pub trait ChunkStorage: Sized {
    /// Allocate `size` zeroed bytes.
    fn allocate(size: usize) -> Result<Self, FilterError>;

    /// Resize to `size` bytes, discarding the current contents.
    ///
    /// On failure the buffer keeps its previous allocation and stays owned
    /// by `self`.
    fn regrow(&mut self, size: usize) -> Result<(), FilterError>;

    /// Declared size of the allocation (the host's "buffer size").
    fn size(&self) -> usize;

    /// The initialized prefix of the buffer (at most [`size`](Self::size)
    /// bytes).
    fn as_slice(&self) -> &[u8];

    /// The whole allocation, [`size`](Self::size) bytes.
    fn as_mut_slice(&mut self) -> &mut [u8];
}

impl ChunkStorage for Vec<u8> {
    fn allocate(size: usize) -> Result<Self, FilterError> {
        let mut v = Vec::new();
        v.try_reserve_exact(size)
            .map_err(|_| FilterError::Allocation { requested: size })?;
        v.resize(size, 0);
        Ok(v)
    }

    fn regrow(&mut self, size: usize) -> Result<(), FilterError> {
        let mut grown = Vec::new();
        grown
            .try_reserve_exact(size)
            .map_err(|_| FilterError::Allocation { requested: size })?;
        grown.resize(size, 0);
        *self = grown;
        Ok(())
    }

    fn size(&self) -> usize {
        self.len()
    }

    fn as_slice(&self) -> &[u8] {
        self
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        self
    }
}

//! Chunk buffers on the C heap.
//!
//! HDF5 allocates chunk buffers with `malloc` and frees whatever the filter
//! hands back with `free`, so buffers crossing the plugin boundary must come
//! from the same allocator.

use std::ptr::NonNull;
use std::{mem, ptr, slice};

use libc::c_void;

use crate::filter::{ChunkStorage, FilterError};

/// An owned `malloc` allocation of `size` bytes, of which the first `init`
/// are initialized.  Dropping it calls `free`.
#[derive(Debug)]
pub struct MallocBuf {
    ptr: NonNull<u8>,
    size: usize,
    init: usize,
}

// SAFETY: MallocBuf uniquely owns its allocation; the C heap is thread-safe.
unsafe impl Send for MallocBuf {}

impl MallocBuf {
    /// Take ownership of a host buffer.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    /// `ptr` must come from `malloc`/`realloc`, be valid for `size` bytes,
    /// have its first `min(init, size)` bytes initialized, and not be used or
    /// freed by anyone else until it is released again with
    /// [`into_raw`](Self::into_raw) or dropped.
    pub unsafe fn from_raw(ptr: *mut c_void, size: usize, init: usize) -> Option<Self> {
        NonNull::new(ptr as *mut u8).map(|ptr| Self { ptr, size, init: init.min(size) })
    }

    /// Give up ownership, returning the pointer and declared size.
    pub fn into_raw(self) -> (*mut c_void, usize) {
        let me = mem::ManuallyDrop::new(self);
        (me.ptr.as_ptr() as *mut c_void, me.size)
    }
}

impl ChunkStorage for MallocBuf {
    fn allocate(size: usize) -> Result<Self, FilterError> {
        // SAFETY: calloc returns zeroed memory or null; a 1-byte minimum keeps
        // zero-size requests from returning a null "success".
        let p = unsafe { libc::calloc(size.max(1), 1) };
        NonNull::new(p as *mut u8)
            .map(|ptr| Self { ptr, size, init: size })
            .ok_or(FilterError::Allocation { requested: size })
    }

    fn regrow(&mut self, size: usize) -> Result<(), FilterError> {
        // SAFETY: self.ptr is a live malloc allocation owned by self.  On
        // failure realloc leaves it untouched, so it stays owned and is
        // freed on drop.
        let p = unsafe { libc::realloc(self.ptr.as_ptr() as *mut c_void, size.max(1)) };
        let ptr = NonNull::new(p as *mut u8).ok_or(FilterError::Allocation { requested: size })?;
        // SAFETY: the new allocation is valid for `size` bytes.
        unsafe { ptr::write_bytes(ptr.as_ptr(), 0, size) };
        self.ptr = ptr;
        self.size = size;
        self.init = size;
        Ok(())
    }

    fn size(&self) -> usize {
        self.size
    }

    fn as_slice(&self) -> &[u8] {
        // SAFETY: the first `init` bytes are initialized and owned by self.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.init) }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        if self.init < self.size {
            // SAFETY: the allocation spans `size` bytes.
            unsafe { ptr::write_bytes(self.ptr.as_ptr().add(self.init), 0, self.size - self.init) };
            self.init = self.size;
        }
        // SAFETY: all `size` bytes are now initialized and uniquely borrowed.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.size) }
    }
}

impl Drop for MallocBuf {
    fn drop(&mut self) {
        // SAFETY: self.ptr came from malloc/calloc/realloc and is owned by self.
        unsafe { libc::free(self.ptr.as_ptr() as *mut c_void) };
    }
}

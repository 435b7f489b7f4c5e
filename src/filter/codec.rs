//! The byte-stream codec seam and its destination sizing.

use crate::lzo::{self, LzoError};

/// Destination size the compression path allocates for `input_len` bytes:
/// `n + n/8 + 128 + 3`, the bound used for the LZO2 family.  `None` when the
/// sum overflows `usize`.
#[inline]
pub fn filter_bound(input_len: usize) -> Option<usize> {
    input_len.checked_add(input_len / 8)?.checked_add(128 + 3)
}

/// A block compressor/decompressor the filter drives as a black box.
///
/// `decompress` must report a destination that is too small as
/// [`LzoError::OutputOverrun`] and nothing else; every other error is treated
/// as a corrupt chunk.
pub trait ChunkCodec {
    /// Destination size for compressing `input_len` bytes.  Must never be
    /// smaller than the codec's own worst case.
    fn dst_bound(&self, input_len: usize) -> Option<usize>;

    /// Compress `src` into `dst`, returning the bytes written.
    fn compress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError>;

    /// Decompress `src` into `dst`, returning the bytes written.
    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError>;
}

/// LZO1X-1 compression with the safe LZO1X decoder.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Lzo1x;

impl ChunkCodec for Lzo1x {
    fn dst_bound(&self, input_len: usize) -> Option<usize> {
        filter_bound(input_len)
    }

    fn compress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
        lzo::compress(src, dst)
    }

    fn decompress(&self, src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
        lzo::decompress_safe(src, dst)
    }
}

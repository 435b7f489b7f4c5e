//! The filter transform: direction dispatch, the decompression growth loop,
//! and the compression bounds guard.
//!
//! Both paths follow one ownership rule.  On success the caller's buffer is
//! replaced by the output buffer (the old one is dropped exactly once).  On
//! failure the caller's buffer is left exactly as supplied and every scratch
//! buffer is dropped.

use tracing::{debug, trace, warn};

use crate::config::MIN_DECOMPRESS_ALLOC;
use crate::filter::codec::{ChunkCodec, Lzo1x};
use crate::filter::error::FilterError;
use crate::filter::hint::SizeHint;
use crate::filter::params::{AuxParams, Direction};
use crate::filter::storage::ChunkStorage;
use crate::lzo::LzoError;

/// The LZO chunk filter.
#[derive(Debug, Default, Clone, Copy)]
pub struct Filter<C = Lzo1x> {
    codec: C,
}

impl Filter<Lzo1x> {
    pub const fn new() -> Self {
        Self { codec: Lzo1x }
    }
}

impl<C: ChunkCodec> Filter<C> {
    /// Build a filter around another codec.  The codec's
    /// [`dst_bound`](ChunkCodec::dst_bound) must match its own worst case.
    pub fn with_codec(codec: C) -> Self {
        Self { codec }
    }

    /// Run one chunk through the filter.
    ///
    /// `buf` holds the chunk; its first `nbytes` bytes are the input and
    /// [`ChunkStorage::size`] is the declared capacity.  Returns the number of
    /// valid bytes in the (replaced) buffer.  `aux` may carry any number of
    /// words; they are parsed but do not affect the output.
    pub fn apply<B, H>(
        &self,
        direction: Direction,
        aux: &[u32],
        nbytes: usize,
        buf: &mut B,
        hint: &mut H,
    ) -> Result<usize, FilterError>
    where
        B: ChunkStorage,
        H: SizeHint,
    {
        let params = AuxParams::from_values(aux);
        debug!(
            ?direction,
            level = params.level,
            object_version = params.object_version,
            object_type = params.object_type,
            nbytes,
            "lzo filter call"
        );

        if nbytes > buf.as_slice().len() {
            return Err(FilterError::InvalidArgument("nbytes exceeds the buffer"));
        }

        match direction {
            Direction::Reverse => self.decompress_chunk(nbytes, buf, hint),
            Direction::Forward => self.compress_chunk(nbytes, buf),
        }
    }

    /// [`apply`](Self::apply) with the host's raw flag word.
    pub fn apply_flags<B, H>(
        &self,
        flags: u32,
        aux: &[u32],
        nbytes: usize,
        buf: &mut B,
        hint: &mut H,
    ) -> Result<usize, FilterError>
    where
        B: ChunkStorage,
        H: SizeHint,
    {
        self.apply(Direction::from_flags(flags), aux, nbytes, buf, hint)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Reverse: decompression growth loop
    // ─────────────────────────────────────────────────────────────────────────

    /// The output size is unknown up front.  Start from the hint (or the
    /// declared capacity), and double until the decoder stops reporting
    /// [`LzoError::OutputOverrun`].  There is no cap: the loop ends on
    /// success, on any other codec error, or when memory runs out.
    fn decompress_chunk<B, H>(
        &self,
        nbytes: usize,
        buf: &mut B,
        hint: &mut H,
    ) -> Result<usize, FilterError>
    where
        B: ChunkStorage,
        H: SizeHint,
    {
        let mut nalloc = hint.get().unwrap_or_else(|| buf.size()).max(MIN_DECOMPRESS_ALLOC);
        let mut out = B::allocate(nalloc).inspect_err(|e| warn!("lzo decompression: {e}"))?;

        let src = &buf.as_slice()[..nbytes];
        let decoded = loop {
            match self.codec.decompress(src, out.as_mut_slice()) {
                Ok(n) => break n,
                Err(LzoError::OutputOverrun) => {
                    nalloc = nalloc
                        .checked_mul(2)
                        .ok_or(FilterError::Allocation { requested: usize::MAX })?;
                    trace!(nalloc, "lzo output buffer too small, growing");
                    out.regrow(nalloc).inspect_err(|e| warn!("lzo decompression: {e}"))?;
                }
                Err(e) => {
                    warn!(error = %e, nbytes, "lzo decompression failed");
                    return Err(FilterError::Codec(e));
                }
            }
        };

        debug!(nbytes, decoded, capacity = nalloc, "lzo chunk decompressed");
        hint.record(decoded);
        *buf = out;
        Ok(decoded)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Forward: compression bounds guard
    // ─────────────────────────────────────────────────────────────────────────

    /// Compress into a worst-case-sized buffer and keep the result only if it
    /// is strictly smaller than the input.
    fn compress_chunk<B>(&self, nbytes: usize, buf: &mut B) -> Result<usize, FilterError>
    where
        B: ChunkStorage,
    {
        let dst_size = self
            .codec
            .dst_bound(nbytes)
            .ok_or(FilterError::Allocation { requested: usize::MAX })?;
        let mut out = B::allocate(dst_size).inspect_err(|e| warn!("lzo compression: {e}"))?;

        let written = self
            .codec
            .compress(&buf.as_slice()[..nbytes], out.as_mut_slice())
            .inspect_err(|e| warn!(error = %e, nbytes, "lzo compression failed"))?;

        if written >= nbytes {
            trace!(nbytes, written, "lzo chunk not compressible, storing raw");
            return Err(FilterError::NotBeneficial { original: nbytes, compressed: written });
        }

        debug!(nbytes, written, capacity = dst_size, "lzo chunk compressed");
        *buf = out;
        Ok(written)
    }
}

//! Error type for the chunk filter.

use thiserror::Error;

use crate::lzo::LzoError;

/// Why a filter call failed.
///
/// The host only ever sees the sentinel `0`; these variants exist so Rust
/// callers and logs can tell the cases apart.  An undersized decompression
/// buffer never surfaces here: the growth loop consumes
/// [`LzoError::OutputOverrun`] and retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// A scratch or output buffer could not be allocated, or its size
    /// overflowed `usize`.
    #[error("memory allocation failed for {requested} bytes")]
    Allocation { requested: usize },

    /// The codec reported something other than "output too small".
    #[error("lzo codec error: {0}")]
    Codec(#[from] LzoError),

    /// Compression did not save any space; the host stores the chunk raw.
    #[error("compressed size {compressed} is not smaller than original size {original}")]
    NotBeneficial { original: usize, compressed: usize },

    /// The caller's arguments are inconsistent (e.g. more valid bytes than
    /// the buffer holds).
    #[error("invalid argument: {0}")]
    InvalidArgument(&'static str),
}

impl FilterError {
    /// `true` for the rejection the host answers by storing the chunk
    /// uncompressed, as opposed to a real failure.
    pub fn is_rejection(&self) -> bool {
        matches!(self, FilterError::NotBeneficial { .. })
    }
}

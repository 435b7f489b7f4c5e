//! Chunk-stream I/O.
//!
//! Drives the chunk filter the way an HDF5 pipeline does, over ordinary byte
//! streams: input is cut into fixed-size chunks, each chunk is filtered on
//! its own, and chunks the filter declines are stored unmodified.
//!
//! | Module         | Contents                                        |
//! |----------------|-------------------------------------------------|
//! | [`prefs`]      | [`Prefs`]: chunk size, workers, checksums       |
//! | [`format`]     | stream and chunk headers                        |
//! | [`compress`]   | [`compress_stream`], [`compress_file`]          |
//! | [`decompress`] | [`decompress_stream`], [`decompress_file`]      |
//! | [`file_io`]    | stdin/stdout marks and the overwrite guard      |

pub mod compress;
pub mod decompress;
pub mod file_io;
pub mod format;
pub mod prefs;

use std::io;

use rayon::ThreadPool;

pub use compress::{compress_file, compress_stream};
pub use decompress::{decompress_file, decompress_stream, test_file};
pub use file_io::{NUL_MARK, STDIN_MARK, STDOUT_MARK};
pub use format::{ChunkHeader, ChunkKind, StreamHeader};
pub use prefs::Prefs;

/// Byte and chunk counts for one stream operation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StreamStats {
    pub bytes_in: u64,
    pub bytes_out: u64,
    pub chunks: u64,
    /// Chunks the filter declined and that were stored as-is.
    pub raw_chunks: u64,
}

impl StreamStats {
    /// Account for a chunk written by the compressor.
    fn record(&mut self, h: &ChunkHeader) {
        self.chunks += 1;
        self.raw_chunks += u64::from(h.kind == ChunkKind::Raw);
        self.bytes_in += u64::from(h.original_len);
        self.bytes_out += (h.encoded_len() + h.stored_len as usize) as u64;
    }

    /// Account for a chunk restored by the decompressor.
    fn record_decoded(&mut self, h: &ChunkHeader) {
        self.chunks += 1;
        self.raw_chunks += u64::from(h.kind == ChunkKind::Raw);
        self.bytes_in += (h.encoded_len() + h.stored_len as usize) as u64;
        self.bytes_out += u64::from(h.original_len);
    }

    /// Output size as a percentage of input size (100 for empty input).
    pub fn ratio_percent(&self) -> f64 {
        if self.bytes_in == 0 {
            return 100.0;
        }
        self.bytes_out as f64 * 100.0 / self.bytes_in as f64
    }
}

/// A dedicated pool for `nb_workers > 1`; `None` runs chunks on the caller.
pub(crate) fn worker_pool(nb_workers: usize) -> io::Result<Option<ThreadPool>> {
    if !crate::config::MULTITHREAD || nb_workers <= 1 {
        return Ok(None);
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(nb_workers)
        .build()
        .map(Some)
        .map_err(io::Error::other)
}

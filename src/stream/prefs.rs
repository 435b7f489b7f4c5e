//! Chunk-stream preferences.
//!
//! `Prefs` is a plain value type built from defaults, then environment
//! overrides, then command-line flags (in that order of precedence, lowest
//! first).

use std::io;

use crate::config::{
    env_usize, CHUNK_SIZE_DEFAULT, CHUNK_SIZE_MAX, ENV_CHUNK_SIZE, ENV_NBWORKERS, MULTITHREAD,
    NB_WORKERS_DEFAULT, NB_WORKERS_MAX,
};

/// Number of chunks queued per worker in one parallel batch.
pub const CHUNKS_PER_WORKER: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prefs {
    /// Uncompressed bytes per chunk.
    pub chunk_size: usize,
    /// Worker threads for chunk batches (1 = sequential).
    pub nb_workers: usize,
    /// Store an xxh32 of every chunk's original bytes.
    pub checksum: bool,
    /// Replace an existing destination file.
    pub overwrite: bool,
}

impl Default for Prefs {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE_DEFAULT,
            nb_workers: default_nb_workers(),
            checksum: true,
            overwrite: false,
        }
    }
}

impl Prefs {
    /// Defaults with `H5LZO_CHUNK_SIZE` / `H5LZO_NBWORKERS` applied.
    /// Out-of-range environment values are ignored.
    pub fn from_env() -> Self {
        let mut prefs = Self::default();
        if let Some(size) = env_usize(ENV_CHUNK_SIZE) {
            let _ = prefs.set_chunk_size(size);
        }
        if let Some(n) = env_usize(ENV_NBWORKERS) {
            prefs.set_nb_workers(n);
        }
        prefs
    }

    /// Chunk size must be in `1..=CHUNK_SIZE_MAX`.
    pub fn set_chunk_size(&mut self, size: usize) -> io::Result<()> {
        if size == 0 || size > CHUNK_SIZE_MAX {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("chunk size {size} out of range (1..={CHUNK_SIZE_MAX})"),
            ));
        }
        self.chunk_size = size;
        Ok(())
    }

    /// `0` selects one worker per logical core; values are clamped to
    /// `NB_WORKERS_MAX`, and to 1 without the `multithread` feature.
    pub fn set_nb_workers(&mut self, n: usize) {
        self.nb_workers = resolve_workers(n);
    }

    /// Chunks read before a batch is dispatched.
    pub fn batch_len(&self) -> usize {
        self.nb_workers.max(1) * CHUNKS_PER_WORKER
    }
}

/// Worker count used when nothing overrides it.
pub fn default_nb_workers() -> usize {
    resolve_workers(NB_WORKERS_DEFAULT)
}

fn resolve_workers(n: usize) -> usize {
    if !MULTITHREAD {
        return 1;
    }
    let n = if n == 0 { num_cpus::get() } else { n };
    n.clamp(1, NB_WORKERS_MAX)
}

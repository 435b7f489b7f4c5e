//! Direction flag and auxiliary filter parameters.

use crate::descriptor::H5Z_FLAG_REVERSE;

/// Which way a chunk flows through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Writing: compress the chunk.
    Forward,
    /// Reading: decompress the chunk.
    Reverse,
}

impl Direction {
    /// Decode the host's flag word; only the reverse bit is significant.
    pub fn from_flags(flags: u32) -> Self {
        if flags & H5Z_FLAG_REVERSE != 0 {
            Direction::Reverse
        } else {
            Direction::Forward
        }
    }

    /// The host flag word for this direction.
    pub fn flags(self) -> u32 {
        match self {
            Direction::Forward => 0,
            Direction::Reverse => H5Z_FLAG_REVERSE,
        }
    }
}

/// Default object version when the descriptor carries none (version 1.0).
pub const OBJECT_VERSION_DEFAULT: u32 = 10;
/// Default compression level.
pub const LEVEL_DEFAULT: u32 = 1;

/// The 0–3 client-data words stored with the filter in the dataset's
/// pipeline: `[level, object version, object type tag]`.
///
/// Parsed for diagnostics only.  None of them changes the encoded bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuxParams {
    pub level: u32,
    pub object_version: u32,
    pub object_type: u32,
    /// How many words the descriptor actually carried.
    pub count: usize,
}

impl Default for AuxParams {
    fn default() -> Self {
        Self {
            level: LEVEL_DEFAULT,
            object_version: OBJECT_VERSION_DEFAULT,
            object_type: 0,
            count: 0,
        }
    }
}

impl AuxParams {
    /// Read up to three words; missing words keep their defaults and extra
    /// words are ignored.
    pub fn from_values(values: &[u32]) -> Self {
        let mut p = Self { count: values.len(), ..Self::default() };
        if let Some(&v) = values.first() {
            p.level = v;
        }
        if let Some(&v) = values.get(1) {
            p.object_version = v;
        }
        if let Some(&v) = values.get(2) {
            p.object_type = v;
        }
        p
    }
}

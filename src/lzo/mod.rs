//! LZO1X block codec.
//!
//! The byte-stream primitive behind the filter: an LZO1X-1 encoder and the
//! safe LZO1X decoder, stream-compatible with the LZO library so chunks
//! written by other LZO filters for HDF5 decode here and the reverse.

pub mod compress;
pub mod decompress;
pub mod types;

pub use compress::{compress, compress_bound, compress_with_dict};
pub use decompress::decompress_safe;
pub use types::LzoError;

//! The LZO chunk filter.
//!
//! | Submodule   | Responsibility |
//! |-------------|----------------|
//! | [`engine`]  | `Filter`: direction dispatch, decompression growth loop, compression bounds guard. |
//! | [`codec`]   | `ChunkCodec` seam, the LZO1X implementation and `filter_bound`. |
//! | [`storage`] | `ChunkStorage`: owned buffers the filter allocates, grows and hands back. |
//! | [`hint`]    | Decompressed-size heuristic, per stream or process-wide. |
//! | [`params`]  | Direction flag and auxiliary client-data words. |
//! | [`error`]   | `FilterError`. |

pub mod codec;
pub mod engine;
pub mod error;
pub mod hint;
pub mod params;
pub mod storage;

pub use codec::{filter_bound, ChunkCodec, Lzo1x};
pub use engine::Filter;
pub use error::FilterError;
pub use hint::{SharedHint, SizeHint, StreamHint};
pub use params::{AuxParams, Direction};
pub use storage::ChunkStorage;

//! HDF5 LZO chunk filter (filter id 305).
//!
//! | Module         | Contents                                               |
//! |----------------|--------------------------------------------------------|
//! | [`lzo`]        | LZO1X-1 encoder and safe decoder                       |
//! | [`filter`]     | the chunk transform: growth loop, bounds guard, hints  |
//! | [`descriptor`] | published filter metadata                              |
//! | [`plugin`]     | C ABI for HDF5's dynamic plugin loader                 |
//! | [`stream`]     | chunked file compression driving the filter            |
//! | [`cli`]        | the `h5lzo` binary's argument handling and display     |
//! | [`config`]     | tunables and environment overrides                     |

pub mod cli;
pub mod config;
pub mod descriptor;
pub mod filter;
pub mod lzo;
#[cfg(feature = "plugin")]
pub mod plugin;
pub mod stream;

pub const VERSION_STRING: &str = env!("CARGO_PKG_VERSION");

/// LZO library release the codec is stream-compatible with.
pub const LZO_VERSION_STRING: &str = "2.10";

pub fn version_string() -> &'static str {
    VERSION_STRING
}

pub use descriptor::{FILTER_ID, FILTER_NAME};
pub use filter::{filter_bound, Direction, Filter, FilterError, SharedHint, StreamHint};
pub use lzo::{compress_bound, LzoError};

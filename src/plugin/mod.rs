//! HDF5 dynamic-plugin surface.
//!
//! Built with the `plugin` feature (on by default).  The cdylib produced by
//! `cargo build --release` can be placed in a directory listed in
//! `HDF5_PLUGIN_PATH`; HDF5 then resolves filter 305 through
//! [`abi::H5PLget_plugin_type`] and [`abi::H5PLget_plugin_info`].

pub mod abi;
pub mod malloc;

pub use abi::{h5lzo_filter, H5ZClass2, H5Z_LZO, PROCESS_HINT};
pub use malloc::MallocBuf;

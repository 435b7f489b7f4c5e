//! Operation mode selection.

use crate::cli::constants::H5LZO_EXTENSION;

/// What the CLI should do with its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpMode {
    /// Decompress `.h5lzo` inputs, compress anything else.
    Auto,
    Compress,
    Decompress,
    /// Decode and verify without writing output.
    Test,
    /// Print the filter descriptor.
    Info,
}

/// Infer the mode from `filename`'s extension.
pub fn determine_op_mode(filename: &str) -> OpMode {
    if filename.ends_with(H5LZO_EXTENSION) {
        OpMode::Decompress
    } else {
        OpMode::Compress
    }
}

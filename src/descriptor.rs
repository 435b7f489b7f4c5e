//! Published filter metadata.
//!
//! Static values the host reads when it registers or discovers the filter.
//! Nothing here is computed.

/// HDF5 filter identifier registered for LZO.
pub const FILTER_ID: u32 = 305;

/// Human-readable filter name reported to the host.
pub const FILTER_NAME: &str =
    "HDF5 lzo filter; see http://www.hdfgroup.org/services/contributions.html";

/// Bit in the host's flag word that selects the read (decompress) direction.
pub const H5Z_FLAG_REVERSE: u32 = 0x0100;

/// Version of the `H5Z_class_t` layout this plugin exports.
pub const H5Z_CLASS_T_VERS: i32 = 1;

/// `H5PL_TYPE_FILTER` from `H5PLextern.h`.
pub const H5PL_TYPE_FILTER: i32 = 0;

/// Filter descriptor as seen from Rust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterInfo {
    pub id: u32,
    pub name: &'static str,
    pub encoder_present: bool,
    pub decoder_present: bool,
}

pub const LZO_FILTER_INFO: FilterInfo = FilterInfo {
    id: FILTER_ID,
    name: FILTER_NAME,
    encoder_present: true,
    decoder_present: true,
};

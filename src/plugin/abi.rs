//! C-ABI exports — the three symbols HDF5 needs to load filter 305.
//!
//! | Symbol                  | Purpose                                        |
//! |-------------------------|------------------------------------------------|
//! | `H5PLget_plugin_type`   | reports "this library provides a filter"       |
//! | `H5PLget_plugin_info`   | returns the `H5Z_class2_t` descriptor          |
//! | `h5lzo_filter`          | the `H5Z_func_t` callback the descriptor names |
//!
//! HDF5 passes no per-dataset context to the callback, so the decompressed
//! size heuristic lives in [`PROCESS_HINT`], shared by every call in the
//! process.

use std::os::raw::{c_char, c_int, c_uint};
use std::slice;

use libc::{c_void, size_t};
use tracing::debug;

use crate::descriptor::{FILTER_ID, H5PL_TYPE_FILTER, H5Z_CLASS_T_VERS};
use crate::filter::{Filter, SharedHint};
use crate::plugin::malloc::MallocBuf;

/// `hid_t` from `H5Ipublic.h` (64-bit since HDF5 1.10).
type Hid = i64;
/// `herr_t` / `htri_t`.
type Herr = c_int;

/// `H5Z_can_apply_func_t` / `H5Z_set_local_func_t`.
pub type H5ZCallback = unsafe extern "C" fn(dcpl_id: Hid, type_id: Hid, space_id: Hid) -> Herr;

/// `H5Z_func_t`.
pub type H5ZFunc = unsafe extern "C" fn(
    flags: c_uint,
    cd_nelmts: size_t,
    cd_values: *const c_uint,
    nbytes: size_t,
    buf_size: *mut size_t,
    buf: *mut *mut c_void,
) -> size_t;

/// Layout of `H5Z_class2_t` from `H5Zpublic.h`.
#[repr(C)]
pub struct H5ZClass2 {
    pub version: c_int,
    pub id: c_int,
    pub encoder_present: c_uint,
    pub decoder_present: c_uint,
    pub name: *const c_char,
    pub can_apply: Option<H5ZCallback>,
    pub set_local: Option<H5ZCallback>,
    pub filter: Option<H5ZFunc>,
}

// SAFETY: the descriptor is immutable and `name` points at a 'static string.
unsafe impl Sync for H5ZClass2 {}

const FILTER_NAME_C: &[u8] =
    b"HDF5 lzo filter; see http://www.hdfgroup.org/services/contributions.html\0";

/// The descriptor returned by [`H5PLget_plugin_info`].
pub static H5Z_LZO: H5ZClass2 = H5ZClass2 {
    version: H5Z_CLASS_T_VERS,
    id: FILTER_ID as c_int,
    encoder_present: 1,
    decoder_present: 1,
    name: FILTER_NAME_C.as_ptr() as *const c_char,
    can_apply: None,
    set_local: None,
    filter: Some(h5lzo_filter),
};

/// Decompressed-size heuristic shared by every call through the C entry
/// point.  Best effort: see [`crate::filter::hint`].
pub static PROCESS_HINT: SharedHint = SharedHint::new();

// ─────────────────────────────────────────────────────────────────────────────
// Discovery hooks
// ─────────────────────────────────────────────────────────────────────────────

#[no_mangle]
pub extern "C" fn H5PLget_plugin_type() -> c_int {
    H5PL_TYPE_FILTER
}

#[no_mangle]
pub extern "C" fn H5PLget_plugin_info() -> *const c_void {
    &H5Z_LZO as *const H5ZClass2 as *const c_void
}

// ─────────────────────────────────────────────────────────────────────────────
// Filter callback
// ─────────────────────────────────────────────────────────────────────────────

/// Compress or decompress one chunk in place.
///
/// Returns the number of valid bytes now in `*buf`, or `0` on failure.  On
/// success `*buf` and `*buf_size` describe a new `malloc` allocation and the
/// old one has been freed; on failure both are left exactly as passed in.
///
/// # Safety
/// `*buf` must be a `malloc` allocation of `*buf_size` bytes whose first
/// `nbytes` are initialized, and `cd_values` must point at `cd_nelmts`
/// values (or be null when `cd_nelmts` is 0).
#[no_mangle]
pub unsafe extern "C" fn h5lzo_filter(
    flags: c_uint,
    cd_nelmts: size_t,
    cd_values: *const c_uint,
    nbytes: size_t,
    buf_size: *mut size_t,
    buf: *mut *mut c_void,
) -> size_t {
    if buf.is_null() || buf_size.is_null() {
        return 0;
    }
    let aux: &[u32] = if cd_nelmts == 0 || cd_values.is_null() {
        &[]
    } else {
        slice::from_raw_parts(cd_values as *const u32, cd_nelmts)
    };
    let Some(mut chunk) = MallocBuf::from_raw(*buf, *buf_size, nbytes) else {
        return 0;
    };

    let mut hint = &PROCESS_HINT;
    let result = Filter::new().apply_flags(flags, aux, nbytes, &mut chunk, &mut hint);

    // Success or not, hand the (possibly replaced) buffer back to the host.
    let (ptr, size) = chunk.into_raw();
    *buf = ptr;
    *buf_size = size;

    match result {
        Ok(n) => n,
        Err(e) => {
            debug!(error = %e, "lzo filter returning failure to host");
            0
        }
    }
}

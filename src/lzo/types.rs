//! LZO1X constants, status codes, and little-endian helpers shared by the
//! encoder and the safe decoder.
//!
//! Instruction layout (first byte of each instruction, `t`):
//!
//! | Range      | Instruction | Match length        | Offset range       |
//! |------------|-------------|---------------------|--------------------|
//! | `64..=255` | M2 match    | 3..=8               | 1..=0x0800         |
//! | `32..=63`  | M3 match    | 2..=33 (+extension) | 1..=0x4000         |
//! | `16..=31`  | M4 match    | 2..=9 (+extension)  | 0x4001..=0xBFFF    |
//! | `0..=15`   | literal run (or M1 match right after a run)            |
//!
//! The low two bits of the second-to-last byte of every match encode the
//! number (0–3) of literals that follow it.  The stream ends with the M4
//! instruction `0x11 0x00 0x00` (a zero distance).

use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Format constants
// ─────────────────────────────────────────────────────────────────────────────

pub const M2_MAX_OFFSET: usize = 0x0800;
pub const M3_MAX_OFFSET: usize = 0x4000;
pub const M4_MAX_OFFSET: usize = 0xBFFF;

pub const M2_MAX_LEN: usize = 8;
pub const M3_MAX_LEN: usize = 33;
pub const M4_MAX_LEN: usize = 9;

pub const M3_MARKER: u8 = 32;
pub const M4_MARKER: u8 = 16;

/// Three-byte end-of-stream instruction.
pub const EOF_MARKER: [u8; 3] = [M4_MARKER | 1, 0, 0];

/// Log₂ of the number of dictionary slots used by the LZO1X-1 encoder.
pub const D_BITS: u32 = 14;
/// Number of `u16` dictionary slots (the C `LZO1X_1_MEM_COMPRESS` / 2).
pub const D_SIZE: usize = 1 << D_BITS;

/// The encoder restarts its dictionary every this many input bytes so that
/// every back-reference stays within [`M4_MAX_OFFSET`].
pub const BLOCK_WINDOW: usize = 49_152;

/// Inputs at or below this length are emitted as a single literal run.
pub const MIN_MATCHABLE_LEN: usize = 20;

// ─────────────────────────────────────────────────────────────────────────────
// Status codes
// ─────────────────────────────────────────────────────────────────────────────

/// LZO status codes, minus `LZO_E_OK`.
///
/// `OutputOverrun` is the only recoverable condition: the caller may retry
/// with a larger destination.  Every other variant means the input is not a
/// valid LZO1X stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LzoError {
    /// Generic failure (`LZO_E_ERROR`).
    #[error("lzo error")]
    Error,
    /// The stream ended in the middle of an instruction.
    #[error("lzo input overrun")]
    InputOverrun,
    /// The destination buffer is too small for the decoded data.
    #[error("lzo output overrun")]
    OutputOverrun,
    /// A match refers to data before the start of the output.
    #[error("lzo lookbehind overrun")]
    LookbehindOverrun,
    /// Trailing bytes follow the end marker.
    #[error("lzo input not consumed")]
    InputNotConsumed,
}

impl LzoError {
    /// The negative status value used by the C library (`lzoconf.h`).
    pub fn code(self) -> i32 {
        match self {
            LzoError::Error => -1,
            LzoError::InputOverrun => -4,
            LzoError::OutputOverrun => -5,
            LzoError::LookbehindOverrun => -6,
            LzoError::InputNotConsumed => -8,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Little-endian helpers
// ─────────────────────────────────────────────────────────────────────────────

/// Read a little-endian `u32` at `pos`.  `src` must hold `pos + 4` bytes.
#[inline(always)]
pub fn read_le32(src: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([src[pos], src[pos + 1], src[pos + 2], src[pos + 3]])
}

/// Read a little-endian `u16` at `pos`.  `src` must hold `pos + 2` bytes.
#[inline(always)]
pub fn read_le16(src: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([src[pos], src[pos + 1]])
}

/// Dictionary slot for the four bytes `dv`.
#[inline(always)]
pub fn dict_index(dv: u32) -> usize {
    (dv.wrapping_mul(0x1824_429D) >> (32 - D_BITS)) as usize & (D_SIZE - 1)
}

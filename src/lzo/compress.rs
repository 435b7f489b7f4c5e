//! LZO1X-1 block encoder.
//!
//! A greedy, single-probe hash encoder producing the same instruction stream
//! layout as `lzo1x_1_compress` from the LZO library:
//!
//! | Rust function          | C equivalent                  |
//! |------------------------|-------------------------------|
//! | [`compress_bound`]     | documented LZO1X worst case   |
//! | [`compress`]           | `lzo1x_1_compress`            |
//! | [`compress_with_dict`] | `lzo1x_1_compress` + `wrkmem` |
//!
//! Input is processed in windows of [`BLOCK_WINDOW`] bytes.  The dictionary
//! is cleared at each window boundary so every back-reference fits the M4
//! offset range, while pending literals carry over into the next window.
//!
//! Unlike the C encoder, nothing is written past the end of the encoded data,
//! and the destination length is validated once up front instead of trusting
//! the caller.

use super::types::{
    dict_index, read_le32, LzoError, BLOCK_WINDOW, D_SIZE, EOF_MARKER, M2_MAX_LEN,
    M2_MAX_OFFSET, M3_MARKER, M3_MAX_LEN, M3_MAX_OFFSET, M4_MARKER, M4_MAX_LEN,
    MIN_MATCHABLE_LEN,
};

/// Worst-case encoded size for `input_len` bytes: `n + n/16 + 64 + 3`.
#[inline]
pub fn compress_bound(input_len: usize) -> usize {
    input_len + input_len / 16 + 64 + 3
}

/// Compress `src` into `dst`, returning the number of bytes written.
///
/// `dst` must hold at least [`compress_bound`]`(src.len())` bytes, otherwise
/// `Err(LzoError::OutputOverrun)` is returned and nothing is written.
pub fn compress(src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
    let mut dict = vec![0u16; D_SIZE];
    compress_with_dict(src, dst, &mut dict)
}

/// Same as [`compress`] with a caller-provided dictionary of at least
/// [`D_SIZE`] slots, so repeated calls can reuse one allocation.
pub fn compress_with_dict(src: &[u8], dst: &mut [u8], dict: &mut [u16]) -> Result<usize, LzoError> {
    if dst.len() < compress_bound(src.len()) {
        return Err(LzoError::OutputOverrun);
    }
    if dict.len() < D_SIZE {
        return Err(LzoError::Error);
    }
    let dict = &mut dict[..D_SIZE];

    let mut out = Emitter { dst, op: 0 };
    let mut lit_start = 0usize;
    let mut ip = 0usize;
    let mut remaining = src.len();

    while remaining > MIN_MATCHABLE_LEN {
        let window = remaining.min(BLOCK_WINDOW);
        dict.fill(0);
        compress_window(src, ip, ip + window, &mut lit_start, &mut out, dict);
        ip += window;
        remaining -= window;
    }

    // ── Trailing literals ────────────────────────────────────────────────────
    let t = src.len() - lit_start;
    if t > 0 {
        if out.op == 0 && t <= 238 {
            // A leading byte above 17 encodes a literal-only stream.
            out.push((17 + t) as u8);
        } else {
            out.literal_header(t);
        }
        out.extend(&src[lit_start..]);
    }

    out.extend(&EOF_MARKER);
    Ok(out.op)
}

// ─────────────────────────────────────────────────────────────────────────────
// Window encoder
// ─────────────────────────────────────────────────────────────────────────────

/// Encode `src[start..end]`.  Dictionary slots hold offsets relative to
/// `start`; a zeroed slot therefore points at `start` and is filtered out by
/// the four-byte comparison like any other stale entry.
fn compress_window(
    src: &[u8],
    start: usize,
    end: usize,
    lit_start: &mut usize,
    out: &mut Emitter<'_>,
    dict: &mut [u16],
) {
    let ip_end = end - MIN_MATCHABLE_LEN;
    let carried = start - *lit_start;
    let mut ip = start + 4usize.saturating_sub(carried);
    let mut skip = true;

    loop {
        if skip {
            // Step faster across long literal stretches.
            ip += 1 + ((ip - *lit_start) >> 5);
        }
        skip = true;
        if ip >= ip_end {
            break;
        }

        let dv = read_le32(src, ip);
        let slot = dict_index(dv);
        let m_pos = start + dict[slot] as usize;
        dict[slot] = (ip - start) as u16;
        if m_pos >= ip || dv != read_le32(src, m_pos) {
            continue;
        }

        // Flush the literals that precede this match.
        let t = ip - *lit_start;
        if t > 0 {
            out.literal_header(t);
            out.extend(&src[*lit_start..ip]);
        }

        let mut m_len = 4;
        while ip + m_len < ip_end && src[ip + m_len] == src[m_pos + m_len] {
            m_len += 1;
        }

        out.match_instruction(m_len, ip - m_pos);
        ip += m_len;
        *lit_start = ip;
        skip = false;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Instruction writer
// ─────────────────────────────────────────────────────────────────────────────

struct Emitter<'a> {
    dst: &'a mut [u8],
    op: usize,
}

impl Emitter<'_> {
    #[inline(always)]
    fn push(&mut self, b: u8) {
        self.dst[self.op] = b;
        self.op += 1;
    }

    #[inline(always)]
    fn extend(&mut self, bytes: &[u8]) {
        self.dst[self.op..self.op + bytes.len()].copy_from_slice(bytes);
        self.op += bytes.len();
    }

    /// Zero bytes for each full 255, then the remainder (always non-zero).
    fn length_run(&mut self, mut len: usize) {
        while len > 255 {
            len -= 255;
            self.push(0);
        }
        self.push(len as u8);
    }

    /// Header for a run of `t` literals that does not start the stream.
    fn literal_header(&mut self, t: usize) {
        if t <= 3 {
            // Short runs ride in the low bits of the previous match.
            debug_assert!(self.op >= 2);
            self.dst[self.op - 2] |= t as u8;
        } else if t <= 18 {
            self.push((t - 3) as u8);
        } else {
            self.push(0);
            self.length_run(t - 18);
        }
    }

    fn match_instruction(&mut self, m_len: usize, m_off: usize) {
        if m_len <= M2_MAX_LEN && m_off <= M2_MAX_OFFSET {
            let off = m_off - 1;
            self.push((((m_len - 1) << 5) | ((off & 7) << 2)) as u8);
            self.push((off >> 3) as u8);
        } else if m_off <= M3_MAX_OFFSET {
            let off = m_off - 1;
            if m_len <= M3_MAX_LEN {
                self.push(M3_MARKER | (m_len - 2) as u8);
            } else {
                self.push(M3_MARKER);
                self.length_run(m_len - M3_MAX_LEN);
            }
            self.push((off << 2) as u8);
            self.push((off >> 6) as u8);
        } else {
            let off = m_off - 0x4000;
            let high = ((off >> 11) & 8) as u8;
            if m_len <= M4_MAX_LEN {
                self.push(M4_MARKER | high | (m_len - 2) as u8);
            } else {
                self.push(M4_MARKER | high);
                self.length_run(m_len - M4_MAX_LEN);
            }
            self.push((off << 2) as u8);
            self.push((off >> 6) as u8);
        }
    }
}

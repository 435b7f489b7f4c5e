//! LZO1X safe decoder.
//!
//! Equivalent to `lzo1x_decompress_safe`: every read from `src` and every
//! write to `dst` is bounds-checked, and a malformed stream yields an
//! [`LzoError`] rather than a panic.
//!
//! The decoder never guesses the decoded size.  When `dst` is too small it
//! stops with [`LzoError::OutputOverrun`] and the caller decides whether to
//! retry with a larger buffer.  Input bounds are checked before output bounds
//! wherever both apply, so a truncated stream is reported as
//! [`LzoError::InputOverrun`] instead of provoking a pointless retry.

use super::types::{read_le16, LzoError, M2_MAX_OFFSET};

/// Decoder position between instructions.
#[derive(Clone, Copy)]
enum State {
    /// Read a fresh instruction byte (literal run or match).
    Instruction,
    /// Directly after a literal run: a byte below 16 is a 3-byte M1 match.
    AfterLiteralRun,
    /// Decode the match whose first byte is held here.
    Match(usize),
    /// Copy 1–3 trailing literals, then read the next match byte.
    TrailingLiterals(usize),
}

struct Cursor<'a> {
    src: &'a [u8],
    ip: usize,
    dst: &'a mut [u8],
    op: usize,
}

impl Cursor<'_> {
    #[inline(always)]
    fn need_ip(&self, n: usize) -> Result<(), LzoError> {
        if self.src.len() - self.ip < n {
            Err(LzoError::InputOverrun)
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    fn need_op(&self, n: usize) -> Result<(), LzoError> {
        if self.dst.len() - self.op < n {
            Err(LzoError::OutputOverrun)
        } else {
            Ok(())
        }
    }

    #[inline(always)]
    fn byte(&mut self) -> Result<usize, LzoError> {
        self.need_ip(1)?;
        let b = self.src[self.ip] as usize;
        self.ip += 1;
        Ok(b)
    }

    /// Extended length: each zero byte adds 255, the first non-zero byte
    /// ends the run and is added together with `base`.
    fn length_run(&mut self, base: usize) -> Result<usize, LzoError> {
        let mut len = 0usize;
        loop {
            match self.byte()? {
                0 => len += 255,
                b => return Ok(len + base + b),
            }
        }
    }

    fn literals(&mut self, n: usize) -> Result<(), LzoError> {
        self.need_ip(n)?;
        self.need_op(n)?;
        self.dst[self.op..self.op + n].copy_from_slice(&self.src[self.ip..self.ip + n]);
        self.ip += n;
        self.op += n;
        Ok(())
    }

    /// Copy `len` bytes starting `dist` bytes back.  Source and destination
    /// may overlap, which is how runs are encoded.
    fn copy_match(&mut self, dist: usize, len: usize) -> Result<(), LzoError> {
        let m_pos = self.op.checked_sub(dist).ok_or(LzoError::LookbehindOverrun)?;
        self.need_op(len)?;
        for i in 0..len {
            self.dst[self.op + i] = self.dst[m_pos + i];
        }
        self.op += len;
        Ok(())
    }
}

/// Decompress the LZO1X stream `src` into `dst`.
///
/// Returns the number of bytes written on success.  `dst` must be large
/// enough for the whole decoded stream; partial output is never reported.
pub fn decompress_safe(src: &[u8], dst: &mut [u8]) -> Result<usize, LzoError> {
    let mut c = Cursor { src, ip: 0, dst, op: 0 };

    let first = c.byte()?;
    let mut state = if first > 17 {
        let t = first - 17;
        if t < 4 {
            State::TrailingLiterals(t)
        } else {
            c.literals(t)?;
            State::AfterLiteralRun
        }
    } else {
        c.ip = 0;
        State::Instruction
    };

    loop {
        state = match state {
            State::Instruction => {
                let t = c.byte()?;
                if t >= 16 {
                    State::Match(t)
                } else {
                    let t = if t == 0 { c.length_run(15)? } else { t };
                    c.literals(t + 3)?;
                    State::AfterLiteralRun
                }
            }

            State::AfterLiteralRun => {
                let t = c.byte()?;
                if t >= 16 {
                    State::Match(t)
                } else {
                    let dist = 1 + M2_MAX_OFFSET + (t >> 2) + (c.byte()? << 2);
                    c.copy_match(dist, 3)?;
                    trailing(&c)
                }
            }

            State::Match(t) => {
                if t >= 64 {
                    // M2
                    let dist = 1 + ((t >> 2) & 7) + (c.byte()? << 3);
                    c.copy_match(dist, (t >> 5) + 1)?;
                } else if t >= 32 {
                    // M3
                    let len = match t & 31 {
                        0 => c.length_run(31)?,
                        l => l,
                    };
                    c.need_ip(2)?;
                    let dist = 1 + (read_le16(c.src, c.ip) >> 2) as usize;
                    c.ip += 2;
                    c.copy_match(dist, len + 2)?;
                } else if t >= 16 {
                    // M4, or the end marker
                    let len = match t & 7 {
                        0 => c.length_run(7)?,
                        l => l,
                    };
                    c.need_ip(2)?;
                    let dist = ((t & 8) << 11) + (read_le16(c.src, c.ip) >> 2) as usize;
                    c.ip += 2;
                    if dist == 0 {
                        return if c.ip == c.src.len() {
                            Ok(c.op)
                        } else {
                            Err(LzoError::InputNotConsumed)
                        };
                    }
                    c.copy_match(dist + 0x4000, len + 2)?;
                } else {
                    // M1
                    let dist = 1 + (t >> 2) + (c.byte()? << 2);
                    c.copy_match(dist, 2)?;
                }
                trailing(&c)
            }

            State::TrailingLiterals(t) => {
                c.literals(t)?;
                State::Match(c.byte()?)
            }
        };
    }
}

/// The literal count carried in the low bits of the match just decoded.
#[inline(always)]
fn trailing(c: &Cursor<'_>) -> State {
    match c.src[c.ip - 2] & 3 {
        0 => State::Instruction,
        t => State::TrailingLiterals(t as usize),
    }
}

//! Chunk-stream container layout.
//!
//! All integers are little-endian.
//!
//! ```text
//! stream  := header chunk* end
//! header  := magic:u32 version:u32 chunk_size:u32 flags:u8
//! chunk   := stored_len:u32 original_len:u32 kind:u8 [xxh32:u32] payload[stored_len]
//! end     := 0xFFFF_FFFF
//! ```
//!
//! `kind` 0 stores the chunk as-is (the filter declined it), `kind` 1 holds
//! the filter's compressed output.  The checksum is present when header flag
//! bit 0 is set and covers the original bytes.

use std::io::{self, Read, Write};

pub const MAGIC: u32 = 0x4C5A_4F35;
pub const VERSION: u32 = 1;
pub const END_MARK: u32 = u32::MAX;
pub const FLAG_CHECKSUM: u8 = 0x01;

pub const HEADER_SIZE: usize = 13;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamHeader {
    pub chunk_size: u32,
    pub checksum: bool,
}

impl StreamHeader {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        let mut b = [0u8; HEADER_SIZE];
        b[0..4].copy_from_slice(&MAGIC.to_le_bytes());
        b[4..8].copy_from_slice(&VERSION.to_le_bytes());
        b[8..12].copy_from_slice(&self.chunk_size.to_le_bytes());
        b[12] = if self.checksum { FLAG_CHECKSUM } else { 0 };
        w.write_all(&b)
    }

    pub fn read_from<R: Read>(r: &mut R) -> io::Result<Self> {
        let mut b = [0u8; HEADER_SIZE];
        r.read_exact(&mut b)?;
        let magic = u32::from_le_bytes([b[0], b[1], b[2], b[3]]);
        if magic != MAGIC {
            return Err(invalid(format!("unrecognized stream magic {magic:#010x}")));
        }
        let version = u32::from_le_bytes([b[4], b[5], b[6], b[7]]);
        if version != VERSION {
            return Err(invalid(format!("unsupported stream version {version}")));
        }
        Ok(Self {
            chunk_size: u32::from_le_bytes([b[8], b[9], b[10], b[11]]),
            checksum: b[12] & FLAG_CHECKSUM != 0,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ChunkKind {
    Raw = 0,
    Lzo = 1,
}

impl TryFrom<u8> for ChunkKind {
    type Error = io::Error;

    fn try_from(v: u8) -> io::Result<Self> {
        match v {
            0 => Ok(ChunkKind::Raw),
            1 => Ok(ChunkKind::Lzo),
            _ => Err(invalid(format!("unknown chunk kind {v}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    pub stored_len: u32,
    pub original_len: u32,
    pub kind: ChunkKind,
    pub checksum: Option<u32>,
}

impl ChunkHeader {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.stored_len.to_le_bytes())?;
        w.write_all(&self.original_len.to_le_bytes())?;
        w.write_all(&[self.kind as u8])?;
        if let Some(sum) = self.checksum {
            w.write_all(&sum.to_le_bytes())?;
        }
        Ok(())
    }

    /// Read the next chunk header; `None` at the end mark.
    pub fn read_from<R: Read>(r: &mut R, with_checksum: bool) -> io::Result<Option<Self>> {
        let stored_len = read_u32(r)?;
        if stored_len == END_MARK {
            return Ok(None);
        }
        let original_len = read_u32(r)?;
        let mut kind = [0u8; 1];
        r.read_exact(&mut kind)?;
        let kind = ChunkKind::try_from(kind[0])?;
        let checksum = if with_checksum { Some(read_u32(r)?) } else { None };
        Ok(Some(Self { stored_len, original_len, kind, checksum }))
    }

    /// Bytes this header occupies on disk.
    pub fn encoded_len(&self) -> usize {
        9 + if self.checksum.is_some() { 4 } else { 0 }
    }
}

pub fn write_end<W: Write>(w: &mut W) -> io::Result<()> {
    w.write_all(&END_MARK.to_le_bytes())
}

fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut b = [0u8; 4];
    r.read_exact(&mut b)?;
    Ok(u32::from_le_bytes(b))
}

pub(crate) fn invalid(msg: String) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg)
}

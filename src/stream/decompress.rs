//! Chunk-stream decompression.
//!
//! Each `lzo` chunk is fed to the reverse filter path with its payload as
//! the chunk buffer.  The recorded original length seeds the per-chunk
//! [`StreamHint`], so a well-formed stream decodes without growth; the
//! growth loop still covers streams whose recorded length is wrong, and the
//! decoded length is then checked against the record.

use std::io::{self, Read, Write};

use rayon::prelude::*;
use tracing::{debug, warn};
use xxhash_rust::xxh32::xxh32;

use crate::config::CHUNK_SIZE_MAX;
use crate::filter::{filter_bound, Direction, Filter, StreamHint};
use crate::stream::file_io::{open_dst_file, open_src_file};
use crate::stream::format::{invalid, ChunkHeader, ChunkKind, StreamHeader, HEADER_SIZE};
use crate::stream::prefs::Prefs;
use crate::stream::StreamStats;

struct StoredChunk {
    header: ChunkHeader,
    payload: Vec<u8>,
}

fn read_stored_chunk<R: Read>(
    src: &mut R,
    stream: &StreamHeader,
) -> io::Result<Option<StoredChunk>> {
    let Some(header) = ChunkHeader::read_from(src, stream.checksum)? else {
        return Ok(None);
    };
    let original = header.original_len as usize;
    let stored = header.stored_len as usize;
    if original > CHUNK_SIZE_MAX || original > stream.chunk_size as usize {
        return Err(invalid(format!(
            "chunk claims {original} bytes, stream chunk size is {}",
            stream.chunk_size
        )));
    }
    // A stored chunk never exceeds the filter's worst case for its size.
    if filter_bound(original).map_or(true, |bound| stored > bound) {
        return Err(invalid(format!("chunk of {stored} bytes cannot hold {original} bytes")));
    }
    let mut payload = vec![0u8; stored];
    src.read_exact(&mut payload)?;
    Ok(Some(StoredChunk { header, payload }))
}

fn decode_chunk(chunk: StoredChunk) -> io::Result<Vec<u8>> {
    let StoredChunk { header, payload } = chunk;
    let original = header.original_len as usize;

    let data = match header.kind {
        ChunkKind::Raw => {
            if payload.len() != original {
                return Err(invalid(format!(
                    "raw chunk holds {} bytes, header says {original}",
                    payload.len()
                )));
            }
            payload
        }
        ChunkKind::Lzo => {
            let nbytes = payload.len();
            let mut buf = payload;
            let mut hint = StreamHint::with_size(original);
            let n = Filter::new()
                .apply(Direction::Reverse, &[], nbytes, &mut buf, &mut hint)
                .map_err(|e| invalid(format!("corrupted chunk: {e}")))?;
            if n != original {
                return Err(invalid(format!("chunk decoded to {n} bytes, header says {original}")));
            }
            buf.truncate(n);
            buf
        }
    };

    if let Some(expected) = header.checksum {
        let actual = xxh32(&data, 0);
        if actual != expected {
            warn!(expected, actual, "chunk checksum mismatch");
            return Err(invalid(format!(
                "chunk checksum mismatch (expected {expected:#010x}, got {actual:#010x})"
            )));
        }
    }
    Ok(data)
}

/// Decode a chunk stream from `src`, writing the original bytes to `dst`.
///
/// Any corrupted chunk, checksum mismatch, or truncation fails the whole call
/// with [`io::ErrorKind::InvalidData`] (or `UnexpectedEof`).  Chunks of a
/// batch are verified before any of them is written.
pub fn decompress_stream<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    prefs: &Prefs,
) -> io::Result<StreamStats> {
    let header = StreamHeader::read_from(src)?;
    debug!(chunk_size = header.chunk_size, checksum = header.checksum, "chunk stream header");

    let mut stats = StreamStats::default();
    stats.bytes_in += HEADER_SIZE as u64;

    let pool = crate::stream::worker_pool(prefs.nb_workers)?;
    let batch_len = if pool.is_some() { prefs.batch_len() } else { 1 };

    loop {
        let mut batch = Vec::with_capacity(batch_len);
        let mut end = false;
        while batch.len() < batch_len {
            match read_stored_chunk(src, &header)? {
                Some(chunk) => batch.push(chunk),
                None => {
                    end = true;
                    break;
                }
            }
        }

        let headers: Vec<ChunkHeader> = batch.iter().map(|c| c.header).collect();
        let decoded: Vec<io::Result<Vec<u8>>> = match &pool {
            Some(pool) => pool.install(|| batch.into_par_iter().map(decode_chunk).collect()),
            None => batch.into_iter().map(decode_chunk).collect(),
        };
        let decoded = decoded.into_iter().collect::<io::Result<Vec<_>>>()?;

        for (header, data) in headers.iter().zip(decoded) {
            dst.write_all(&data)?;
            stats.record_decoded(header);
        }

        if end {
            break;
        }
    }
    stats.bytes_in += 4;

    dst.flush()?;
    debug!(
        chunks = stats.chunks,
        raw = stats.raw_chunks,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        "chunk stream decompressed"
    );
    Ok(stats)
}

/// Decompress `input` into `output`; either may be a stdin/stdout mark.
pub fn decompress_file(input: &str, output: &str, prefs: &Prefs) -> io::Result<StreamStats> {
    let mut src = open_src_file(input)?;
    let mut dst = open_dst_file(output, prefs)?;
    decompress_stream(&mut src, &mut dst, prefs)
}

/// Decode `input` and discard the output, reporting whether it is intact.
pub fn test_file(input: &str, prefs: &Prefs) -> io::Result<StreamStats> {
    let mut src = open_src_file(input)?;
    decompress_stream(&mut src, &mut io::sink(), prefs)
}

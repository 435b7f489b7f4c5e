//! Chunk-stream compression.
//!
//! Input is cut into `prefs.chunk_size` chunks and each chunk goes through
//! the forward filter path exactly as a host pipeline would run it: the
//! chunk buffer is handed to [`Filter::apply`] and is either replaced by the
//! compressed output or, when the filter declines, left untouched and stored
//! raw.
//!
//! With more than one worker, chunks are read in batches of
//! [`Prefs::batch_len`], compressed in parallel on a rayon pool, and written
//! in input order on the calling thread.

use std::io::{self, Read, Write};

use rayon::prelude::*;
use tracing::{debug, trace};
use xxhash_rust::xxh32::xxh32;

use crate::filter::{Direction, Filter, StreamHint};
use crate::stream::file_io::{open_dst_file, open_src_file};
use crate::stream::format::{write_end, ChunkHeader, ChunkKind, StreamHeader};
use crate::stream::prefs::Prefs;
use crate::stream::StreamStats;

/// One chunk ready to be written.
struct EncodedChunk {
    header: ChunkHeader,
    payload: Vec<u8>,
}

/// Run one chunk through the forward filter.  Any filter failure stores the
/// chunk raw: the filter guarantees the buffer is unchanged in that case.
fn encode_chunk(data: Vec<u8>, checksum: bool) -> io::Result<EncodedChunk> {
    let original_len = data.len();
    let sum = checksum.then(|| xxh32(&data, 0));
    let mut buf = data;

    let result = Filter::new().apply(
        Direction::Forward,
        &[],
        original_len,
        &mut buf,
        &mut StreamHint::new(),
    );
    let kind = match result {
        Ok(n) => {
            buf.truncate(n);
            ChunkKind::Lzo
        }
        Err(e) => {
            trace!(error = %e, original_len, "chunk stored raw");
            ChunkKind::Raw
        }
    };

    Ok(EncodedChunk {
        header: ChunkHeader {
            stored_len: to_u32(buf.len())?,
            original_len: to_u32(original_len)?,
            kind,
            checksum: sum,
        },
        payload: buf,
    })
}

/// Fill a chunk of up to `chunk_size` bytes; `None` at end of input.
pub(crate) fn read_chunk<R: Read>(src: &mut R, chunk_size: usize) -> io::Result<Option<Vec<u8>>> {
    let mut chunk = vec![0u8; chunk_size];
    let mut filled = 0;
    while filled < chunk_size {
        match src.read(&mut chunk[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    if filled == 0 {
        return Ok(None);
    }
    chunk.truncate(filled);
    Ok(Some(chunk))
}

/// Compress everything readable from `src` into a chunk stream on `dst`.
pub fn compress_stream<R: Read, W: Write>(
    src: &mut R,
    dst: &mut W,
    prefs: &Prefs,
) -> io::Result<StreamStats> {
    let header = StreamHeader { chunk_size: to_u32(prefs.chunk_size)?, checksum: prefs.checksum };
    header.write_to(dst)?;

    let mut stats = StreamStats::default();
    stats.bytes_out += crate::stream::format::HEADER_SIZE as u64;

    let pool = crate::stream::worker_pool(prefs.nb_workers)?;
    let batch_len = if pool.is_some() { prefs.batch_len() } else { 1 };

    loop {
        let mut batch = Vec::with_capacity(batch_len);
        let mut eof = false;
        while batch.len() < batch_len {
            match read_chunk(src, prefs.chunk_size)? {
                Some(chunk) => batch.push(chunk),
                None => {
                    eof = true;
                    break;
                }
            }
        }
        if batch.is_empty() {
            break;
        }

        let encoded: Vec<io::Result<EncodedChunk>> = match &pool {
            Some(pool) => pool.install(|| {
                batch
                    .into_par_iter()
                    .map(|chunk| encode_chunk(chunk, prefs.checksum))
                    .collect()
            }),
            None => batch.into_iter().map(|chunk| encode_chunk(chunk, prefs.checksum)).collect(),
        };

        for chunk in encoded {
            let chunk = chunk?;
            chunk.header.write_to(dst)?;
            dst.write_all(&chunk.payload)?;
            stats.record(&chunk.header);
        }

        if eof {
            break;
        }
    }

    write_end(dst)?;
    stats.bytes_out += 4;
    dst.flush()?;
    debug!(
        chunks = stats.chunks,
        raw = stats.raw_chunks,
        bytes_in = stats.bytes_in,
        bytes_out = stats.bytes_out,
        "chunk stream compressed"
    );
    Ok(stats)
}

/// Compress `input` into `output`; either may be a stdin/stdout mark.
pub fn compress_file(input: &str, output: &str, prefs: &Prefs) -> io::Result<StreamStats> {
    let mut src = open_src_file(input)?;
    let mut dst = open_dst_file(output, prefs)?;
    compress_stream(&mut src, &mut dst, prefs)
}

fn to_u32(n: usize) -> io::Result<u32> {
    u32::try_from(n).map_err(|_| {
        io::Error::new(io::ErrorKind::InvalidInput, format!("chunk of {n} bytes is too large"))
    })
}

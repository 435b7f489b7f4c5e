// config.rs — Compile-time configuration constants and environment overrides.

/// Smallest buffer the decompression path starts with.  A declared capacity
/// of 0 (or any smaller guess) means "no hint", not a zero-byte allocation.
pub const MIN_DECOMPRESS_ALLOC: usize = 64;

// Default chunk size for the chunk-stream container and CLI (1 MiB).
// Can be overridden by the H5LZO_CHUNK_SIZE environment variable,
// or by the -c command-line flag.
pub const CHUNK_SIZE_DEFAULT: usize = 1 << 20;

// Largest chunk the container can describe (lengths are stored as u32, and
// 0xFFFF_FFFF marks the end of the stream).
pub const CHUNK_SIZE_MAX: usize = 1 << 30;

// Default number of worker threads (0 = one per logical core).
// Can be overridden by the H5LZO_NBWORKERS environment variable,
// or by the -T command-line flag.
pub const NB_WORKERS_DEFAULT: usize = 0;

// Upper limit on worker threads selectable at runtime.
pub const NB_WORKERS_MAX: usize = 200;

// Whether chunk batches are processed in parallel.
pub const MULTITHREAD: bool = cfg!(feature = "multithread");

pub const ENV_CHUNK_SIZE: &str = "H5LZO_CHUNK_SIZE";
pub const ENV_NBWORKERS: &str = "H5LZO_NBWORKERS";
pub const ENV_DISPLAY_LEVEL: &str = "H5LZO_DISPLAY_LEVEL";

/// Parse an unsigned environment variable, accepting `K`/`M`/`G` suffixes
/// (binary multiples).  Unset or malformed values yield `None`.
pub fn env_usize(name: &str) -> Option<usize> {
    parse_size(&std::env::var(name).ok()?)
}

/// Parse `"64"`, `"64K"`, `"4M"`, `"1G"` (also `KiB`/`MiB`/`GiB`, `KB`/`MB`/`GB`).
pub fn parse_size(s: &str) -> Option<usize> {
    let s = s.trim();
    let digits_end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    let (digits, suffix) = s.split_at(digits_end);
    let value: usize = digits.parse().ok()?;
    let shift = match suffix {
        "" => 0,
        "K" | "KB" | "KiB" => 10,
        "M" | "MB" | "MiB" => 20,
        "G" | "GB" | "GiB" => 30,
        _ => return None,
    };
    value.checked_mul(1usize << shift)
}

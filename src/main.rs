//! Binary entry point for the `h5lzo` command-line tool.
//!
//! 1. `clap` parses the arguments into a [`Cli`].
//! 2. The display level and the `tracing` subscriber are set from `-q`/`-v`.
//! 3. [`run`] dispatches to the chunk-stream layer.

use std::io::IsTerminal;
use std::process::ExitCode;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use h5lzo::cli::args::Cli;
use h5lzo::cli::constants::{set_display_level, COMPRESSOR_NAME, IO_MT};
use h5lzo::cli::op_mode::OpMode;
use h5lzo::descriptor::{FILTER_ID, FILTER_NAME, LZO_FILTER_INFO};
use h5lzo::filter::filter_bound;
use h5lzo::stream::{compress_file, decompress_file, test_file, StreamStats, STDOUT_MARK};
use h5lzo::{displaylevel, displayout, LZO_VERSION_STRING};

/// Diagnostics from the library go through `tracing`; `RUST_LOG` wins over
/// the level implied by `-q`/`-v`.
fn init_logging(display_level: u32) {
    let level = match display_level {
        0..=2 => "error",
        3 => "warn",
        4 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("h5lzo={level}")));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_info() {
    let yes_no = |b: bool| if b { "yes" } else { "no" };
    displayout!("{COMPRESSOR_NAME} {}\n", h5lzo::version_string());
    displayout!("lzo format  : LZO1X-1 (lzo {LZO_VERSION_STRING})\n");
    displayout!("filter id   : {FILTER_ID}\n");
    displayout!("name        : {FILTER_NAME}\n");
    displayout!("encoder     : {}\n", yes_no(LZO_FILTER_INFO.encoder_present));
    displayout!("decoder     : {}\n", yes_no(LZO_FILTER_INFO.decoder_present));
    displayout!("plugin ABI  : {}\n", yes_no(cfg!(feature = "plugin")));
    displayout!("threading   : {IO_MT}\n");
    displayout!("bound(1 MiB): {:?} bytes\n", filter_bound(1 << 20));
}

fn report(verb: &str, input: &str, stats: &StreamStats) {
    displaylevel!(
        2,
        "{input:<20} : {verb} {} bytes to {} bytes ({:.2}%, {} chunks, {} stored raw)\n",
        stats.bytes_in,
        stats.bytes_out,
        stats.ratio_percent(),
        stats.chunks,
        stats.raw_chunks
    );
}

fn run(cli: &Cli) -> Result<()> {
    if cli.op_mode() == OpMode::Info {
        print_info();
        return Ok(());
    }

    let prefs = cli.prefs()?;
    let input = cli.input_name();
    let mode = cli.resolved_mode(input);
    let output = cli.output_name(mode, input)?;

    displaylevel!(
        3,
        "*** {COMPRESSOR_NAME} v{} {}-bit {IO_MT} ***\n",
        h5lzo::version_string(),
        std::mem::size_of::<*const ()>() * 8
    );
    displaylevel!(4, "chunk size {} bytes, {} workers\n", prefs.chunk_size, prefs.nb_workers);

    match mode {
        OpMode::Compress | OpMode::Auto => {
            if output == STDOUT_MARK && std::io::stdout().is_terminal() && !cli.force {
                bail!("refusing to write compressed data to a terminal (use -f to force)");
            }
            let stats = compress_file(input, &output, &prefs)
                .with_context(|| format!("{input}: compression failed"))?;
            report("compressed", input, &stats);
        }
        OpMode::Decompress => {
            let stats = decompress_file(input, &output, &prefs)
                .with_context(|| format!("{input}: decompression failed"))?;
            report("decompressed", input, &stats);
        }
        OpMode::Test => {
            let stats =
                test_file(input, &prefs).with_context(|| format!("{input}: integrity test failed"))?;
            displaylevel!(2, "{input:<20} : OK ({} chunks, {} bytes)\n", stats.chunks, stats.bytes_out);
        }
        OpMode::Info => unreachable!("handled above"),
    }
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let level = cli.display_level();
    set_display_level(level);
    init_logging(level);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            displaylevel!(1, "{COMPRESSOR_NAME}: {e:#}\n");
            ExitCode::FAILURE
        }
    }
}

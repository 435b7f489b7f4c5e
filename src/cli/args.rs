//! Command-line arguments.
//!
//! Parsing is declarative (`clap` derive); this module also resolves the
//! parsed flags into an [`OpMode`], a [`Prefs`] value, a display level and
//! the output name.

use anyhow::{anyhow, bail, Result};
use clap::{ArgAction, Parser};

use crate::cli::constants::H5LZO_EXTENSION;
use crate::cli::op_mode::{determine_op_mode, OpMode};
use crate::config::{env_usize, parse_size, ENV_DISPLAY_LEVEL};
use crate::stream::{Prefs, NUL_MARK, STDIN_MARK, STDOUT_MARK};

#[derive(Parser, Debug, Clone, Default)]
#[command(name = "h5lzo", version)]
#[command(about = "Chunked LZO compression through the HDF5 LZO filter (id 305)", long_about = None)]
pub struct Cli {
    /// Force compression
    #[arg(short = 'z', long, conflicts_with_all = ["decompress", "test", "info"])]
    pub compress: bool,

    /// Decompress
    #[arg(short = 'd', long, conflicts_with_all = ["test", "info"])]
    pub decompress: bool,

    /// Test the integrity of a compressed file
    #[arg(short = 't', long, conflicts_with = "info")]
    pub test: bool,

    /// Print the filter descriptor and exit
    #[arg(long)]
    pub info: bool,

    /// Uncompressed chunk size (accepts K, M, G suffixes)
    #[arg(short = 'c', long = "chunk-size", value_parser = parse_chunk_size)]
    pub chunk_size: Option<usize>,

    /// Worker threads (0 = one per core)
    #[arg(short = 'T', long = "threads")]
    pub threads: Option<usize>,

    /// Do not store per-chunk checksums
    #[arg(long)]
    pub no_checksum: bool,

    /// Overwrite existing output files
    #[arg(short = 'f', long)]
    pub force: bool,

    /// Suppress messages (repeat for fewer)
    #[arg(short = 'q', long, action = ArgAction::Count)]
    pub quiet: u8,

    /// More messages (repeat for more)
    #[arg(short = 'v', long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Input file ("stdin" or absent for standard input)
    pub input: Option<String>,

    /// Output file ("stdout" for standard output)
    pub output: Option<String>,
}

fn parse_chunk_size(s: &str) -> Result<usize, String> {
    parse_size(s).ok_or_else(|| format!("invalid size '{s}'"))
}

impl Cli {
    /// Mode from the flags alone; [`OpMode::Auto`] when none was given.
    pub fn op_mode(&self) -> OpMode {
        if self.info {
            OpMode::Info
        } else if self.test {
            OpMode::Test
        } else if self.decompress {
            OpMode::Decompress
        } else if self.compress {
            OpMode::Compress
        } else {
            OpMode::Auto
        }
    }

    /// Mode to run for `input`, resolving [`OpMode::Auto`] by extension.
    pub fn resolved_mode(&self, input: &str) -> OpMode {
        match self.op_mode() {
            OpMode::Auto => determine_op_mode(input),
            mode => mode,
        }
    }

    pub fn input_name(&self) -> &str {
        self.input.as_deref().unwrap_or(STDIN_MARK)
    }

    /// Base level from `H5LZO_DISPLAY_LEVEL` (default 2), adjusted by `-v`/`-q`.
    pub fn display_level(&self) -> u32 {
        let base = env_usize(ENV_DISPLAY_LEVEL).map_or(2, |l| l.min(u32::MAX as usize) as u32);
        (base + u32::from(self.verbose)).saturating_sub(u32::from(self.quiet))
    }

    /// Environment-derived preferences overridden by explicit flags.
    pub fn prefs(&self) -> Result<Prefs> {
        let mut prefs = Prefs::from_env();
        if let Some(size) = self.chunk_size {
            prefs.set_chunk_size(size)?;
        }
        if let Some(n) = self.threads {
            prefs.set_nb_workers(n);
        }
        prefs.checksum = !self.no_checksum;
        prefs.overwrite = self.force;
        Ok(prefs)
    }

    /// Explicit output name, or one derived from `input` for `mode`.
    pub fn output_name(&self, mode: OpMode, input: &str) -> Result<String> {
        if mode == OpMode::Test {
            return Ok(NUL_MARK.to_owned());
        }
        if let Some(out) = &self.output {
            return Ok(out.clone());
        }
        if input == STDIN_MARK {
            return Ok(STDOUT_MARK.to_owned());
        }
        match mode {
            OpMode::Decompress => input
                .strip_suffix(H5LZO_EXTENSION)
                .filter(|stem| !stem.is_empty())
                .map(str::to_owned)
                .ok_or_else(|| {
                    anyhow!("{input}: unknown suffix ({H5LZO_EXTENSION} expected); name an output file")
                }),
            OpMode::Compress | OpMode::Auto => Ok(format!("{input}{H5LZO_EXTENSION}")),
            OpMode::Test | OpMode::Info => bail!("no output for {mode:?}"),
        }
    }
}

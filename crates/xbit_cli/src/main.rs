//! xbit CLI: inspect, decode and build Xilinx configuration bitstreams.
//!
//! Provides `xbit dump` for listing the packets of a bitstream, `xbit frames`
//! for decoding a bitstream into a `.frm` frame file, and `xbit pack` for
//! building a full or partial bitstream from a `.frm` file.

#![warn(missing_docs)]

mod context;
mod dump;
mod frames;
mod pack;

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use xbit_common::ArchitectureKind;

/// xbit, a Xilinx bitstream toolkit.
#[derive(Parser, Debug)]
#[command(name = "xbit", version, about = "Xilinx configuration bitstream toolkit")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a custom `xbit.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print one line per configuration packet.
    Dump(DumpArgs),
    /// Decode a bitstream into a `.frm` frame file.
    Frames(FramesArgs),
    /// Build a bitstream from a `.frm` frame file.
    Pack(PackArgs),
}

/// Arguments for the `xbit dump` subcommand.
#[derive(Args, Debug)]
pub struct DumpArgs {
    /// Bitstream to read (`.bit` or raw).
    pub bitstream: PathBuf,

    /// Device family; defaults to `part.architecture` from the configuration.
    #[arg(short, long)]
    pub arch: Option<ArchitectureKind>,
}

/// Arguments for the `xbit frames` subcommand.
#[derive(Args, Debug)]
pub struct FramesArgs {
    /// Bitstream to decode (`.bit` or raw).
    pub bitstream: PathBuf,

    /// Part geometry JSON file.
    #[arg(short, long)]
    pub geometry: Option<PathBuf>,

    /// Device family.
    #[arg(short, long)]
    pub arch: Option<ArchitectureKind>,

    /// Output `.frm` file. Writes to stdout if omitted.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `xbit pack` subcommand.
#[derive(Args, Debug)]
pub struct PackArgs {
    /// Frame file to pack.
    pub frames: PathBuf,

    /// Part geometry JSON file.
    #[arg(short, long)]
    pub geometry: Option<PathBuf>,

    /// Device family.
    #[arg(short, long)]
    pub arch: Option<ArchitectureKind>,

    /// Output bitstream file.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Write a raw bitstream without the `.bit` header.
    #[arg(long)]
    pub raw: bool,

    /// Design name recorded in the `.bit` header.
    #[arg(long)]
    pub design_name: Option<String>,

    /// Build a partial bitstream from the selected address ranges.
    #[arg(long)]
    pub partial: bool,

    /// First CLB/IO/CLK frame address of the partial region (hex).
    #[arg(long, value_parser = parse_hex, requires = "partial")]
    pub clb_start: Option<u32>,

    /// Last CLB/IO/CLK frame address of the partial region (hex).
    #[arg(long, value_parser = parse_hex, requires = "partial")]
    pub clb_end: Option<u32>,

    /// First block RAM frame address of the partial region (hex).
    #[arg(long, value_parser = parse_hex, requires = "partial")]
    pub bram_start: Option<u32>,

    /// Last block RAM frame address of the partial region (hex).
    #[arg(long, value_parser = parse_hex, requires = "partial")]
    pub bram_end: Option<u32>,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<PathBuf>,
}

fn parse_hex(text: &str) -> Result<u32, String> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u32::from_str_radix(digits, 16).map_err(|e| format!("invalid hex address '{text}': {e}"))
}

/// Default log filter for the verbosity flags; `RUST_LOG` takes precedence.
fn default_log_filter(global: &GlobalArgs) -> &'static str {
    if global.quiet {
        "error"
    } else if global.verbose {
        "debug"
    } else {
        "warn"
    }
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default_log_filter(&global)),
    )
    .init();

    let result = match cli.command {
        Command::Dump(ref args) => dump::run(args, &global),
        Command::Frames(ref args) => frames::run(args, &global),
        Command::Pack(ref args) => pack::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

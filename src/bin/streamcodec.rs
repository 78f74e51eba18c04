// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Streamcodec CLI
//!
//! Command-line access to stream pipelines inferred from file names.
//!
//! ## Usage
//!
//! ```sh
//! # Show how a file name resolves
//! streamcodec pipeline export.csv.gz
//!
//! # Decode a file to stdout
//! streamcodec cat archive.zip --option zip.entry_file_name=rows.csv
//!
//! # Recompress
//! streamcodec copy export.csv.gz export.csv.zst --option zst.level=19
//!
//! # List registered extensions
//! streamcodec extensions
//! ```

mod cmd;
mod common;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use cmd::{CatCmd, CopyCmd, ExtensionsCmd, PipelineCmd};
use common::Result;

/// Streamcodec - layered stream transforms
///
/// Compression, archive and character-set streams are inferred from the
/// trailing extensions of each file name.
#[derive(Parser, Clone)]
#[command(name = "streamcodec")]
#[command(about = "Read and write files through streams inferred from their extensions", long_about = None)]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// TOML file of per-extension default options
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Clone)]
enum Commands {
    /// Show the stream pipeline a file name resolves to
    Pipeline(PipelineCmd),

    /// Decode a file to stdout
    Cat(CatCmd),

    /// Copy a file, re-encoding it for the output file name
    Copy(CopyCmd),

    /// List registered extensions
    Extensions(ExtensionsCmd),
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    common::init_logging(cli.verbose);
    let config = common::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Pipeline(cmd) => cmd.run(&config),
        Commands::Cat(cmd) => cmd.run(&config),
        Commands::Copy(cmd) => cmd.run(&config),
        Commands::Extensions(cmd) => cmd.run(),
    }
}

fn main() {
    let result = run();

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Copy command - decode one file and re-encode it as another.

use std::path::PathBuf;

use clap::Args;

use crate::common::{parse_stream_option, path_streams, Result, StreamOption};
use streamcodec::StreamConfig;

/// Copy a file, converting between the streams of both file names.
///
/// `data.csv.gz` to `data.csv.zst` decompresses with gzip and
/// recompresses with zstd.
#[derive(Args, Clone, Debug)]
pub struct CopyCmd {
    /// Input file
    #[arg(value_name = "INPUT")]
    input: PathBuf,

    /// Output file
    #[arg(value_name = "OUTPUT")]
    output: PathBuf,

    /// Declare input streams explicitly instead of inferring them
    #[arg(long = "input-stream", value_name = "EXT")]
    input_streams: Vec<String>,

    /// Declare output streams explicitly instead of inferring them
    #[arg(long = "output-stream", value_name = "EXT")]
    output_streams: Vec<String>,

    /// Output stream option (format: EXT.KEY=VALUE)
    #[arg(short, long = "option", value_name = "EXT.KEY=VALUE", value_parser = parse_stream_option)]
    options: Vec<StreamOption>,
}

impl CopyCmd {
    pub fn run(self, config: &StreamConfig) -> Result<()> {
        let source = path_streams(self.input, &self.input_streams, &[], config)?;
        let target = path_streams(self.output, &self.output_streams, &self.options, config)?;

        println!("Copying:");
        println!("  Input:  {} [{}]", source.path().display(), source.builder().resolve());
        println!("  Output: {} [{}]", target.path().display(), target.builder().resolve());

        let bytes = source.copy_to(&target)?;
        println!("  Copied {bytes} bytes");
        Ok(())
    }
}

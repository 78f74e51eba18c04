// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Pipeline command - show how a file name resolves.

use std::path::PathBuf;

use clap::Args;

use crate::common::{parse_stream_option, path_streams, Result, StreamOption};
use streamcodec::StreamConfig;

/// Show the stream pipeline a file resolves to.
#[derive(Args, Clone, Debug)]
pub struct PipelineCmd {
    /// File name (need not exist)
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Declare streams explicitly instead of inferring them
    #[arg(short, long = "stream", value_name = "EXT")]
    streams: Vec<String>,

    /// Stream option (format: EXT.KEY=VALUE)
    #[arg(short, long = "option", value_name = "EXT.KEY=VALUE", value_parser = parse_stream_option)]
    options: Vec<StreamOption>,
}

impl PipelineCmd {
    pub fn run(self, config: &StreamConfig) -> Result<()> {
        let streams = path_streams(self.file, &self.streams, &self.options, config)?;
        let pipeline = streams.builder().resolve();

        println!("=== {} ===", streams.path().display());
        if pipeline.is_empty() {
            println!("  (no streams)");
            return Ok(());
        }

        // Innermost first, the order callbacks see the data
        for (i, stage) in pipeline.iter().enumerate() {
            if stage.options().is_empty() {
                println!("  {}. {}", i + 1, stage.kind());
            } else {
                println!(
                    "  {}. {} {}",
                    i + 1,
                    stage.kind(),
                    serde_json::to_string(stage.options())?
                );
            }
        }
        Ok(())
    }
}

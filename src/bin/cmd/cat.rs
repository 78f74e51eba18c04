// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Cat command - decode a file to stdout.

use std::io::Write;
use std::path::PathBuf;

use clap::Args;

use crate::common::{parse_stream_option, path_streams, Result, StreamOption};
use streamcodec::StreamConfig;

/// Decode a file through its streams and write the result to stdout.
#[derive(Args, Clone, Debug)]
pub struct CatCmd {
    /// Input file
    #[arg(value_name = "FILE")]
    input: PathBuf,

    /// Declare input streams explicitly instead of inferring them
    #[arg(short, long = "stream", value_name = "EXT")]
    streams: Vec<String>,

    /// Stream option (format: EXT.KEY=VALUE)
    #[arg(short, long = "option", value_name = "EXT.KEY=VALUE", value_parser = parse_stream_option)]
    options: Vec<StreamOption>,
}

impl CatCmd {
    pub fn run(self, config: &StreamConfig) -> Result<()> {
        let streams = path_streams(self.input, &self.streams, &self.options, config)?;
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        streams.read(|io| {
            std::io::copy(io, &mut out)?;
            Ok(())
        })?;
        out.flush()?;
        Ok(())
    }
}

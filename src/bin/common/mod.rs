// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for CLI commands.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde_json::Value;
use tracing_subscriber::EnvFilter;

use streamcodec::{PathStreams, StreamConfig, TransformOptions};

pub use anyhow::Result as CliResult;
pub type Result<T = ()> = CliResult<T>;

/// Install the stderr log subscriber.
///
/// `-v` flags win over `RUST_LOG`; without either only warnings are shown.
pub fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

/// Load the configuration file, or an empty configuration.
pub fn load_config(path: Option<&Path>) -> Result<StreamConfig> {
    match path {
        Some(path) => Ok(StreamConfig::load(path)?),
        None => Ok(StreamConfig::default()),
    }
}

/// Option override given as `EXT.KEY=VALUE`.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamOption {
    pub extension: String,
    pub key: String,
    pub value: Value,
}

/// Parse an `EXT.KEY=VALUE` option.
///
/// The value is read as a TOML scalar (`9`, `true`, `"text"`); anything
/// that does not parse is taken as a bare string.
pub fn parse_stream_option(s: &str) -> CliResult<StreamOption> {
    let (name, raw) = s
        .split_once('=')
        .ok_or_else(|| anyhow::anyhow!("Option must be in format EXT.KEY=VALUE: {s}"))?;
    let (extension, key) = name
        .split_once('.')
        .filter(|(ext, key)| !ext.is_empty() && !key.is_empty())
        .ok_or_else(|| anyhow::anyhow!("Option name must be in format EXT.KEY: {name}"))?;

    Ok(StreamOption {
        extension: extension.to_lowercase(),
        key: key.to_string(),
        value: parse_value(raw),
    })
}

fn parse_value(raw: &str) -> Value {
    #[derive(serde::Deserialize)]
    struct Scalar {
        value: Value,
    }

    toml::from_str::<Scalar>(&format!("value = {raw}"))
        .map(|scalar| scalar.value)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Bind `path` to its streams, applying explicit streams, configuration
/// defaults and per-extension options in that order.
pub fn path_streams(
    path: PathBuf,
    streams: &[String],
    options: &[StreamOption],
    config: &StreamConfig,
) -> Result<PathStreams> {
    let mut path_streams = PathStreams::new(path);
    let display = path_streams.path().display().to_string();
    let builder = path_streams.builder_mut();

    for stream in streams {
        builder
            .declare_explicit(stream.as_str(), TransformOptions::new())
            .with_context(|| format!("Invalid stream '{stream}' for {display}"))?;
    }
    config.apply(builder)?;
    for option in options {
        let options = TransformOptions::new().with(option.key.clone(), option.value.clone());
        builder
            .declare(option.extension.as_str(), options)
            .with_context(|| format!("Invalid option for {display}"))?;
    }
    Ok(path_streams)
}

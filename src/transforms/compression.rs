// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Compression transforms: gzip, bzip2, zstd and lz4.
//!
//! Decoders accept concatenated members/frames. Encoders take an optional
//! `level` option and write their trailer only after the inner callback
//! succeeded. On failure the output is cut off where it stands: gzip and
//! bzip2 encoders finish themselves when dropped, so they write through an
//! `AbandonableSink` that swallows everything once the stream is abandoned.
//! The result never decodes as a complete stream.

use std::io::{Read, Write};
use std::ops::RangeInclusive;

use crate::core::{Result, StreamError, TransformOptions};
use crate::registry::{ReadCallback, ReadTransform, WriteCallback, WriteTransform};

/// Options accepted by the level-configurable compressors.
const LEVEL_OPTIONS: &[&str] = &["level"];

/// Read an optional `level` option, checking it against `range`.
fn compression_level(
    options: &TransformOptions,
    transform: &str,
    range: RangeInclusive<i64>,
    default: i64,
) -> Result<i64> {
    match options.get_i64(transform, "level")? {
        None => Ok(default),
        Some(level) if range.contains(&level) => Ok(level),
        Some(level) => Err(StreamError::invalid_option(
            transform,
            "level",
            format!(
                "{level} is out of range {}..={}",
                range.start(),
                range.end()
            ),
        )),
    }
}

/// Writer that stops forwarding once the stream is abandoned.
struct AbandonableSink<W> {
    output: W,
    abandoned: bool,
}

impl<W: Write> AbandonableSink<W> {
    fn new(output: W) -> Self {
        Self {
            output,
            abandoned: false,
        }
    }

    fn abandon(&mut self) {
        self.abandoned = true;
    }
}

impl<W: Write> Write for AbandonableSink<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        if self.abandoned {
            return Ok(buf.len());
        }
        self.output.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if self.abandoned {
            return Ok(());
        }
        self.output.flush()
    }
}

/// Run `inner` against an encoder, abandoning its sink if `inner` fails.
fn encode_with<E, W>(
    encoder: &mut E,
    sink: fn(&mut E) -> &mut AbandonableSink<W>,
    inner: &mut WriteCallback<'_>,
) -> Result<()>
where
    E: Write,
    W: Write,
{
    if let Err(e) = inner(encoder) {
        sink(encoder).abandon();
        return Err(e);
    }
    Ok(())
}

/// gzip (`.gz`, `.gzip`) via flate2.
#[derive(Debug, Clone, Copy, Default)]
pub struct GzipTransform;

impl GzipTransform {
    const NAME: &'static str = "gz";
    const DEFAULT_LEVEL: i64 = 6;
}

impl ReadTransform for GzipTransform {
    fn stream_with(
        &self,
        input: &mut dyn Read,
        options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, LEVEL_OPTIONS)?;
        let mut decoder = flate2::read::MultiGzDecoder::new(input);
        inner(&mut decoder)
    }
}

impl WriteTransform for GzipTransform {
    fn stream_with(
        &self,
        output: &mut dyn Write,
        options: &TransformOptions,
        inner: &mut WriteCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, LEVEL_OPTIONS)?;
        let level = compression_level(options, Self::NAME, 0..=9, Self::DEFAULT_LEVEL)?;
        let mut encoder = flate2::write::GzEncoder::new(
            AbandonableSink::new(output),
            flate2::Compression::new(level as u32),
        );
        encode_with(&mut encoder, flate2::write::GzEncoder::get_mut, inner)?;
        encoder.finish()?;
        Ok(())
    }
}

/// bzip2 (`.bz2`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Bzip2Transform;

impl Bzip2Transform {
    const NAME: &'static str = "bz2";
    const DEFAULT_LEVEL: i64 = 6;
}

impl ReadTransform for Bzip2Transform {
    fn stream_with(
        &self,
        input: &mut dyn Read,
        options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, LEVEL_OPTIONS)?;
        let mut decoder = bzip2::read::MultiBzDecoder::new(input);
        inner(&mut decoder)
    }
}

impl WriteTransform for Bzip2Transform {
    fn stream_with(
        &self,
        output: &mut dyn Write,
        options: &TransformOptions,
        inner: &mut WriteCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, LEVEL_OPTIONS)?;
        let level = compression_level(options, Self::NAME, 1..=9, Self::DEFAULT_LEVEL)?;
        let mut encoder = bzip2::write::BzEncoder::new(
            AbandonableSink::new(output),
            bzip2::Compression::new(level as u32),
        );
        encode_with(&mut encoder, bzip2::write::BzEncoder::get_mut, inner)?;
        encoder.finish()?;
        Ok(())
    }
}

/// Zstandard (`.zst`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ZstdTransform;

impl ZstdTransform {
    const NAME: &'static str = "zst";
    const DEFAULT_LEVEL: i64 = 3;
}

impl ReadTransform for ZstdTransform {
    fn stream_with(
        &self,
        input: &mut dyn Read,
        options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, LEVEL_OPTIONS)?;
        let mut decoder = zstd::stream::read::Decoder::new(input)?;
        inner(&mut decoder)
    }
}

impl WriteTransform for ZstdTransform {
    fn stream_with(
        &self,
        output: &mut dyn Write,
        options: &TransformOptions,
        inner: &mut WriteCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, LEVEL_OPTIONS)?;
        let levels = zstd::compression_level_range();
        let range = i64::from(*levels.start())..=i64::from(*levels.end());
        let level = compression_level(options, Self::NAME, range, Self::DEFAULT_LEVEL)?;
        let mut encoder = zstd::stream::write::Encoder::new(output, level as i32)?;
        inner(&mut encoder)?;
        encoder.finish()?;
        Ok(())
    }
}

/// LZ4 frame format (`.lz4`).
#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Transform;

impl Lz4Transform {
    const NAME: &'static str = "lz4";
}

impl ReadTransform for Lz4Transform {
    fn stream_with(
        &self,
        input: &mut dyn Read,
        options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, &[])?;
        let mut decoder = lz4_flex::frame::FrameDecoder::new(input);
        inner(&mut decoder)
    }
}

impl WriteTransform for Lz4Transform {
    fn stream_with(
        &self,
        output: &mut dyn Write,
        options: &TransformOptions,
        inner: &mut WriteCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, &[])?;
        let mut encoder = lz4_flex::frame::FrameEncoder::new(output);
        inner(&mut encoder)?;
        encoder.finish().map_err(|e| {
            StreamError::format(Self::NAME, format!("LZ4 frame finish failed: {e}"))
        })?;
        Ok(())
    }
}

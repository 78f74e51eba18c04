// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Daisy-chain execution of a resolved pipeline.
//!
//! For a pipeline `[d1, d2, ..., dN]` the executor folds over the stages
//! starting from the terminal callback, so that `dN` wraps the raw stream,
//! its output is handed to `d(N-1)`, and so on until `d1` hands its stream
//! to the callback. Every layer is a scoped guard nested inside the layer
//! that wraps it: when any layer or the callback fails, each layer already
//! entered releases its resources while the error unwinds back out.

use std::io::{Read, Write};
use std::sync::Arc;

use crate::core::{Result, StreamError, TransformOptions};
use crate::registry::{
    ExtensionRegistry, ReadCallback, ReadTransform, WriteCallback, WriteTransform,
};

use super::Pipeline;

/// Boxed read layer owning everything nested inside it.
type ReadLayer<'a> = Box<ReadCallback<'a>>;

/// Boxed write layer owning everything nested inside it.
type WriteLayer<'a> = Box<WriteCallback<'a>>;

/// Decode `input` through `pipeline` and hand the innermost stream to `callback`.
///
/// An empty pipeline hands `input` to `callback` untouched, without
/// consulting the registry.
///
/// # Errors
///
/// - `UnknownTransformType` / `UnsupportedTransform` if a stage has no
///   reader; reported before any stream is touched
/// - `MissingCallback` if a layer invokes its inner stream twice
/// - `CallbackNotInvoked` if a layer returns without invoking its inner stream
/// - any error raised by a layer or by `callback`, unchanged
pub fn execute_read<T, F>(
    pipeline: &Pipeline,
    registry: &ExtensionRegistry,
    input: &mut dyn Read,
    callback: F,
) -> Result<T>
where
    F: FnOnce(&mut dyn Read) -> Result<T>,
{
    if pipeline.is_empty() {
        return callback(input);
    }

    let factories = pipeline
        .iter()
        .map(|stage| {
            registry
                .reader_for(stage.kind().as_str())
                .map(|factory| (factory, stage.options()))
        })
        .collect::<Result<Vec<(Arc<dyn ReadTransform>, &TransformOptions)>>>()?;

    tracing::debug!(pipeline = %pipeline, "executing stream reader");

    let mut output = None;
    {
        let mut callback = Some(callback);
        let terminal: ReadLayer<'_> = Box::new(|io: &mut dyn Read| -> Result<()> {
            let callback = callback.take().ok_or(StreamError::MissingCallback)?;
            output = Some(callback(io)?);
            Ok(())
        });

        let mut chain = factories
            .into_iter()
            .zip(pipeline.iter())
            .fold(terminal, |mut inner, ((factory, options), stage)| {
                let kind = stage.kind();
                Box::new(move |io: &mut dyn Read| {
                    tracing::trace!(stream = %kind, "entering reader layer");
                    factory.stream_with(io, options, &mut *inner)
                }) as ReadLayer<'_>
            });
        chain(input)?;
    }

    output.ok_or_else(|| outermost_error(pipeline))
}

/// Encode into `output` through `pipeline`, handing the innermost stream to `callback`.
///
/// An empty pipeline hands `output` to `callback` untouched, without
/// consulting the registry.
///
/// # Errors
///
/// - `UnknownTransformType` / `UnsupportedTransform` if a stage has no
///   writer; reported before any stream is touched
/// - `MissingCallback` if a layer invokes its inner stream twice
/// - `CallbackNotInvoked` if a layer returns without invoking its inner stream
/// - any error raised by a layer or by `callback`, unchanged
pub fn execute_write<T, F>(
    pipeline: &Pipeline,
    registry: &ExtensionRegistry,
    output: &mut dyn Write,
    callback: F,
) -> Result<T>
where
    F: FnOnce(&mut dyn Write) -> Result<T>,
{
    if pipeline.is_empty() {
        return callback(output);
    }

    let factories = pipeline
        .iter()
        .map(|stage| {
            registry
                .writer_for(stage.kind().as_str())
                .map(|factory| (factory, stage.options()))
        })
        .collect::<Result<Vec<(Arc<dyn WriteTransform>, &TransformOptions)>>>()?;

    tracing::debug!(pipeline = %pipeline, "executing stream writer");

    let mut result = None;
    {
        let mut callback = Some(callback);
        let terminal: WriteLayer<'_> = Box::new(|io: &mut dyn Write| -> Result<()> {
            let callback = callback.take().ok_or(StreamError::MissingCallback)?;
            result = Some(callback(io)?);
            Ok(())
        });

        let mut chain = factories
            .into_iter()
            .zip(pipeline.iter())
            .fold(terminal, |mut inner, ((factory, options), stage)| {
                let kind = stage.kind();
                Box::new(move |io: &mut dyn Write| {
                    tracing::trace!(stream = %kind, "entering writer layer");
                    factory.stream_with(io, options, &mut *inner)
                }) as WriteLayer<'_>
            });
        chain(output)?;
    }

    result.ok_or_else(|| outermost_error(pipeline))
}

fn outermost_error(pipeline: &Pipeline) -> StreamError {
    let symbol = pipeline
        .stages()
        .last()
        .map(|stage| stage.kind().as_str())
        .unwrap_or_default();
    StreamError::callback_not_invoked(symbol)
}

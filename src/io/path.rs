// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! File-backed streams whose pipeline is inferred from the path.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::core::Result;
use crate::pipeline::StreamBuilder;
use crate::registry::{global_registry, ExtensionRegistry};

/// A file path paired with the builder that resolves its pipeline.
///
/// The builder starts out bound to the path's base name, so `.gz`, `.zip`
/// and friends are handled without any declaration. Use
/// [`builder_mut`](Self::builder_mut) to record options or override the
/// pipeline before reading or writing.
#[derive(Debug, Clone)]
pub struct PathStreams {
    path: PathBuf,
    builder: StreamBuilder,
}

impl PathStreams {
    /// Create path streams against the global registry.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// use std::io::Read;
    /// use streamcodec::io::PathStreams;
    ///
    /// let text = PathStreams::new("export.csv.gz").read(|io| {
    ///     let mut text = String::new();
    ///     io.read_to_string(&mut text)?;
    ///     Ok(text)
    /// })?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_registry(path, global_registry())
    }

    /// Create path streams against a specific registry.
    pub fn with_registry(path: impl Into<PathBuf>, registry: Arc<ExtensionRegistry>) -> Self {
        let path = path.into();
        let mut builder = StreamBuilder::new(registry);
        if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
            builder.set_file_name(name);
        }
        Self { path, builder }
    }

    /// Get the path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the pipeline builder.
    pub fn builder(&self) -> &StreamBuilder {
        &self.builder
    }

    /// Get the pipeline builder for declaring streams or options.
    pub fn builder_mut(&mut self) -> &mut StreamBuilder {
        &mut self.builder
    }

    /// Open the file and decode it through the resolved pipeline.
    pub fn read<T, F>(&self, callback: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Read) -> Result<T>,
    {
        tracing::debug!(path = %self.path.display(), "opening stream for reading");
        let file = File::open(&self.path)?;
        let mut input = BufReader::new(file);
        self.builder.reader(&mut input, callback)
    }

    /// Create (or truncate) the file and encode into it through the
    /// resolved pipeline.
    ///
    /// The file is flushed only after every layer has finished. A pipeline
    /// with a stage that cannot write fails before the file is created.
    pub fn write<T, F>(&self, callback: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Write) -> Result<T>,
    {
        self.builder.ensure_writable()?;
        tracing::debug!(path = %self.path.display(), "opening stream for writing");
        let file = File::create(&self.path)?;
        let mut output = BufWriter::new(file);
        let result = self.builder.writer(&mut output, callback)?;
        output.flush()?;
        Ok(result)
    }

    /// Decode this file and re-encode it into `target`.
    ///
    /// Returns the number of decoded bytes copied.
    pub fn copy_to(&self, target: &PathStreams) -> Result<u64> {
        let copied = self.read(|input| target.write(|output| Ok(std::io::copy(input, output)?)))?;
        tracing::debug!(
            source = %self.path.display(),
            target = %target.path.display(),
            bytes = copied,
            "copied stream"
        );
        Ok(copied)
    }
}

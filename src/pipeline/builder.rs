// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Builder for resolving stream pipelines.
//!
//! The `StreamBuilder` records transform declarations in one of two
//! mutually exclusive modes:
//!
//! - **explicit**: the pipeline is exactly what was declared, whatever the
//!   file name says;
//! - **deferred**: options are recorded per transform type and applied
//!   once the file name's trailing extensions are parsed.

use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;

use crate::core::{ExtensionSymbol, Result, StreamError, TransformOptions};
use crate::registry::{global_registry, ExtensionRegistry};

use super::{executor, Pipeline, TransformDescriptor};

/// Declaration state of a builder.
#[derive(Debug, Clone, Default, PartialEq)]
enum Declarations {
    /// Nothing declared yet.
    #[default]
    Unset,
    /// Transforms declared directly; the file name is ignored.
    Explicit(Vec<TransformDescriptor>),
    /// Option overrides applied to the file name's extensions.
    Deferred(Vec<TransformDescriptor>),
    /// The `none` sentinel was declared; the pipeline is fixed to empty.
    Disabled,
}

impl Declarations {
    fn is_explicit(&self) -> bool {
        matches!(self, Declarations::Explicit(_) | Declarations::Disabled)
    }
}

/// Accumulates transform declarations and resolves them into a [`Pipeline`].
///
/// # Example
///
/// ```rust
/// use streamcodec::core::TransformOptions;
/// use streamcodec::pipeline::StreamBuilder;
///
/// let mut builder = StreamBuilder::for_file("data.csv.gz");
/// builder
///     .declare_deferred("gz", TransformOptions::new().with("level", 9))
///     .unwrap();
///
/// let pipeline = builder.resolve();
/// assert_eq!(pipeline.kinds(), vec!["gz"]);
/// ```
#[derive(Debug, Clone)]
pub struct StreamBuilder {
    registry: Arc<ExtensionRegistry>,
    file_name: Option<String>,
    declarations: Declarations,
}

impl StreamBuilder {
    /// Create a builder with no file name against `registry`.
    pub fn new(registry: Arc<ExtensionRegistry>) -> Self {
        Self {
            registry,
            file_name: None,
            declarations: Declarations::Unset,
        }
    }

    /// Create a builder for `file_name` against the global registry.
    pub fn for_file(file_name: impl Into<String>) -> Self {
        Self::new(global_registry()).with_file_name(file_name)
    }

    /// Set the file name, returning the builder.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.set_file_name(file_name);
        self
    }

    /// Set the file name whose extensions drive deferred resolution.
    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        let file_name = file_name.into();
        self.file_name = (!file_name.is_empty()).then_some(file_name);
    }

    /// Get the file name, if set.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Get the registry this builder validates against.
    pub fn registry(&self) -> &Arc<ExtensionRegistry> {
        &self.registry
    }

    /// Declare a transform explicitly, merging options into any earlier
    /// declaration of the same type.
    ///
    /// Declaring [`ExtensionSymbol::NONE`] clears every declaration and
    /// fixes the pipeline to empty; later declarations are rejected.
    ///
    /// # Errors
    ///
    /// - `InvalidConfiguration` if deferred options were already recorded,
    ///   or if the pipeline was disabled with `none`
    /// - `UnknownTransformType` if `kind` is not registered
    pub fn declare_explicit(
        &mut self,
        kind: impl Into<ExtensionSymbol>,
        options: TransformOptions,
    ) -> Result<&mut Self> {
        let kind = kind.into();
        if matches!(self.declarations, Declarations::Deferred(_)) {
            return Err(StreamError::invalid_configuration(
                "cannot declare explicit streams after deferred options on the same builder",
            ));
        }

        if kind.is_none() {
            self.declarations = Declarations::Disabled;
            return Ok(self);
        }
        if self.declarations == Declarations::Disabled {
            return Err(StreamError::invalid_configuration(format!(
                "cannot declare stream '{kind}' after streams were disabled with '{}'",
                ExtensionSymbol::NONE
            )));
        }
        self.ensure_registered(&kind)?;

        if let Declarations::Unset = self.declarations {
            self.declarations = Declarations::Explicit(Vec::new());
        }
        if let Declarations::Explicit(declared) = &mut self.declarations {
            merge_into(declared, kind, options);
        }
        Ok(self)
    }

    /// Record options for a transform type, applied only if the file name
    /// carries that extension (the `encode` directive is always applied).
    ///
    /// # Errors
    ///
    /// - `UnknownTransformType` if `kind` is not registered
    /// - `InvalidConfiguration` if explicit streams were already declared,
    ///   or if no file name is set
    pub fn declare_deferred(
        &mut self,
        kind: impl Into<ExtensionSymbol>,
        options: TransformOptions,
    ) -> Result<&mut Self> {
        let kind = kind.into();
        self.ensure_registered(&kind)?;
        if self.declarations.is_explicit() {
            return Err(StreamError::invalid_configuration(
                "cannot record deferred options after explicit streams on the same builder",
            ));
        }
        if self.file_name.is_none() {
            return Err(StreamError::invalid_configuration(format!(
                "cannot record options for '{kind}' unless a file name is set"
            )));
        }

        if let Declarations::Unset = self.declarations {
            self.declarations = Declarations::Deferred(Vec::new());
        }
        if let Declarations::Deferred(recorded) = &mut self.declarations {
            merge_into(recorded, kind, options);
        }
        Ok(self)
    }

    /// Declare explicitly if explicit streams exist, else record a deferred
    /// option if a file name is set, else declare explicitly.
    pub fn declare(
        &mut self,
        kind: impl Into<ExtensionSymbol>,
        options: TransformOptions,
    ) -> Result<&mut Self> {
        if self.declarations.is_explicit() || self.file_name.is_none() {
            self.declare_explicit(kind, options)
        } else {
            self.declare_deferred(kind, options)
        }
    }

    /// Get the options recorded for `kind` in whichever mode is active.
    pub fn setting_for(&self, kind: &str) -> Option<&TransformOptions> {
        let kind = kind.to_lowercase();
        match &self.declarations {
            Declarations::Explicit(list) | Declarations::Deferred(list) => list
                .iter()
                .find(|d| d.kind().as_str() == kind)
                .map(TransformDescriptor::options),
            Declarations::Unset | Declarations::Disabled => None,
        }
    }

    /// Check if streams were disabled with the `none` sentinel.
    pub fn is_disabled(&self) -> bool {
        self.declarations == Declarations::Disabled
    }

    /// Check if explicit streams were declared.
    pub fn is_explicit(&self) -> bool {
        self.declarations.is_explicit()
    }

    /// Resolve the frozen pipeline.
    ///
    /// Resolution is pure: calling it repeatedly on the same state yields
    /// equal pipelines.
    pub fn resolve(&self) -> Pipeline {
        let pipeline = match (&self.declarations, &self.file_name) {
            (Declarations::Explicit(declared), _) => {
                Pipeline::from_descriptors(declared.iter().cloned())
            }
            (Declarations::Disabled, _) | (_, None) => Pipeline::empty(),
            (state, Some(file_name)) => {
                let recorded: &[TransformDescriptor] = match state {
                    Declarations::Deferred(recorded) => recorded.as_slice(),
                    _ => &[],
                };
                self.resolve_from_file_name(file_name, recorded)
            }
        };
        tracing::debug!(
            file_name = self.file_name.as_deref().unwrap_or(""),
            pipeline = %pipeline,
            "resolved stream pipeline"
        );
        pipeline
    }

    fn resolve_from_file_name(
        &self,
        file_name: &str,
        recorded: &[TransformDescriptor],
    ) -> Pipeline {
        let recorded_options = |kind: &ExtensionSymbol| {
            recorded
                .iter()
                .find(|d| d.kind() == kind)
                .map(|d| d.options().clone())
        };

        // Character-set conversion works on fully decoded bytes, so a
        // recorded `encode` option is always the innermost stage.
        let encode = ExtensionSymbol::encode();
        let leading = recorded_options(&encode)
            .map(|options| TransformDescriptor::new(encode, options));

        let parsed = self.parse_extensions(file_name).into_iter().map(|kind| {
            let options = recorded_options(&kind).unwrap_or_default();
            TransformDescriptor::new(kind, options)
        });

        Pipeline::from_descriptors(leading.into_iter().chain(parsed))
    }

    /// Registered trailing extensions of the base name, in left-to-right order.
    ///
    /// Parsing stops at the first trailing segment that is not registered.
    pub fn parse_extensions(&self, file_name: &str) -> Vec<ExtensionSymbol> {
        let Some(base_name) = Path::new(file_name).file_name().and_then(|n| n.to_str()) else {
            return Vec::new();
        };

        let mut parts: Vec<&str> = base_name.trim_end_matches('.').split('.').collect();
        let mut extensions = Vec::new();
        while let Some(part) = parts.pop() {
            let kind = ExtensionSymbol::new(part);
            if !self.registry.contains(kind.as_str()) {
                break;
            }
            extensions.insert(0, kind);
        }
        extensions
    }

    /// Resolve the pipeline and decode `input` through it.
    pub fn reader<T, F>(&self, input: &mut dyn Read, callback: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Read) -> Result<T>,
    {
        executor::execute_read(&self.resolve(), &self.registry, input, callback)
    }

    /// Resolve the pipeline and encode into `output` through it.
    pub fn writer<T, F>(&self, output: &mut dyn Write, callback: F) -> Result<T>
    where
        F: FnOnce(&mut dyn Write) -> Result<T>,
    {
        executor::execute_write(&self.resolve(), &self.registry, output, callback)
    }

    /// Check that every stage of the resolved pipeline has a writer, without
    /// touching any stream.
    ///
    /// # Errors
    ///
    /// Returns the `UnknownTransformType` or `UnsupportedTransform` error
    /// that [`writer`](Self::writer) would report.
    pub fn ensure_writable(&self) -> Result<()> {
        for stage in &self.resolve() {
            self.registry.writer_for(stage.kind().as_str())?;
        }
        Ok(())
    }

    fn ensure_registered(&self, kind: &ExtensionSymbol) -> Result<()> {
        if self.registry.contains(kind.as_str()) {
            Ok(())
        } else {
            Err(StreamError::unknown_transform(kind.as_str()))
        }
    }
}

fn merge_into(list: &mut Vec<TransformDescriptor>, kind: ExtensionSymbol, options: TransformOptions) {
    match list.iter_mut().find(|d| *d.kind() == kind) {
        Some(existing) => existing.options_mut().merge(&options),
        None => list.push(TransformDescriptor::new(kind, options)),
    }
}

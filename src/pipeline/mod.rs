// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Stream pipelines: declaration, resolution and daisy-chain execution.
//!
//! A [`StreamBuilder`] collects transform declarations (explicitly, or as
//! option overrides applied to the extensions of a file name) and resolves
//! them into a frozen [`Pipeline`]. The [`executor`] nests the registered
//! transforms around a raw stream in pipeline order.
//!
//! # Example
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::io::Read;
//! use streamcodec::pipeline::StreamBuilder;
//!
//! let builder = StreamBuilder::for_file("report.csv.gz");
//! let pipeline = builder.resolve();
//! assert_eq!(pipeline.kinds(), vec!["gz"]);
//!
//! let file = std::fs::File::open("report.csv.gz")?;
//! let mut input = std::io::BufReader::new(file);
//! let text = builder.reader(&mut input, |io| {
//!     let mut text = String::new();
//!     io.read_to_string(&mut text)?;
//!     Ok(text)
//! })?;
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod executor;

use std::sync::Arc;

use crate::core::{ExtensionSymbol, TransformOptions};

pub use builder::StreamBuilder;
pub use executor::{execute_read, execute_write};

/// One configured transform: a type and its options.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformDescriptor {
    kind: ExtensionSymbol,
    options: TransformOptions,
}

impl TransformDescriptor {
    /// Create a descriptor.
    pub fn new(kind: impl Into<ExtensionSymbol>, options: TransformOptions) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }

    /// Transform type.
    pub fn kind(&self) -> &ExtensionSymbol {
        &self.kind
    }

    /// Transform options.
    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    pub(crate) fn options_mut(&mut self) -> &mut TransformOptions {
        &mut self.options
    }
}

/// Ordered, immutable list of transform descriptors.
///
/// The first descriptor is the innermost layer (closest to the caller's
/// callback); the last descriptor is applied directly to the raw stream.
/// Kinds are unique. Cloning is cheap and clones share storage.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    stages: Arc<[TransformDescriptor]>,
}

impl Pipeline {
    /// Create an empty pipeline.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a pipeline, keeping the first position of each kind and
    /// merging the options of any repeated kind into it.
    pub fn from_descriptors(descriptors: impl IntoIterator<Item = TransformDescriptor>) -> Self {
        let mut stages: Vec<TransformDescriptor> = Vec::new();
        for descriptor in descriptors {
            match stages.iter_mut().find(|d| d.kind == descriptor.kind) {
                Some(existing) => existing.options.merge(&descriptor.options),
                None => stages.push(descriptor),
            }
        }
        Self {
            stages: stages.into(),
        }
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Check if the pipeline applies no transforms.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Iterate over stages, innermost first.
    pub fn iter(&self) -> std::slice::Iter<'_, TransformDescriptor> {
        self.stages.iter()
    }

    /// Get the stages as a slice.
    pub fn stages(&self) -> &[TransformDescriptor] {
        &self.stages
    }

    /// Get the options recorded for a kind.
    pub fn options_for(&self, kind: &str) -> Option<&TransformOptions> {
        let kind = kind.to_lowercase();
        self.stages
            .iter()
            .find(|d| d.kind.as_str() == kind)
            .map(|d| &d.options)
    }

    /// Stage kinds in pipeline order.
    pub fn kinds(&self) -> Vec<&str> {
        self.stages.iter().map(|d| d.kind.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a Pipeline {
    type Item = &'a TransformDescriptor;
    type IntoIter = std::slice::Iter<'a, TransformDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.stages.iter()
    }
}

impl std::fmt::Display for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_empty() {
            return f.write_str("(none)");
        }
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(" <- ")?;
            }
            write!(f, "{}", stage.kind)?;
        }
        Ok(())
    }
}

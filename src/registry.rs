// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Extension registry mapping file extensions to stream transforms.
//!
//! This module provides a registry pattern for transforms, allowing:
//! - Dynamic transform registration
//! - Per-direction factories (a format may be read-only)
//! - A process-wide registry pre-populated with the built-in transforms
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use streamcodec::registry::{ExtensionDescriptor, ExtensionRegistry};
//! use streamcodec::transforms::GzipTransform;
//!
//! let registry = ExtensionRegistry::new();
//! registry
//!     .register(
//!         "gz",
//!         ExtensionDescriptor::new()
//!             .with_reader(Arc::new(GzipTransform))
//!             .with_writer(Arc::new(GzipTransform)),
//!     )
//!     .unwrap();
//! assert!(registry.contains("GZ"));
//! ```

use std::collections::HashMap;
use std::fmt;
use std::io::{Read, Write};
use std::sync::{Arc, PoisonError, RwLock};

use crate::core::{Direction, ExtensionSymbol, Result, StreamError, TransformOptions};

/// Inner callback handed a decoding stream.
pub type ReadCallback<'a> = dyn FnMut(&mut dyn Read) -> Result<()> + 'a;

/// Inner callback handed an encoding stream.
pub type WriteCallback<'a> = dyn FnMut(&mut dyn Write) -> Result<()> + 'a;

/// Factory that wraps an input stream with one decoding layer.
///
/// Implementations must invoke `inner` exactly once with the decoded
/// stream, and must release whatever they opened before returning,
/// whether `inner` succeeded or not.
pub trait ReadTransform: Send + Sync {
    /// Wrap `input`, hand the decoded stream to `inner`, then release.
    fn stream_with(
        &self,
        input: &mut dyn Read,
        options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()>;
}

/// Factory that wraps an output stream with one encoding layer.
///
/// Implementations must invoke `inner` exactly once with the encoding
/// stream, flush any trailer on success, and release what they opened on
/// every exit path.
pub trait WriteTransform: Send + Sync {
    /// Wrap `output`, hand the encoding stream to `inner`, then finish.
    fn stream_with(
        &self,
        output: &mut dyn Write,
        options: &TransformOptions,
        inner: &mut WriteCallback<'_>,
    ) -> Result<()>;
}

/// Registered capabilities of one extension.
#[derive(Clone, Default)]
pub struct ExtensionDescriptor {
    reader: Option<Arc<dyn ReadTransform>>,
    writer: Option<Arc<dyn WriteTransform>>,
}

impl ExtensionDescriptor {
    /// Create a descriptor with no factories.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the reader factory.
    pub fn with_reader(mut self, reader: Arc<dyn ReadTransform>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Set the writer factory.
    pub fn with_writer(mut self, writer: Arc<dyn WriteTransform>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Get the reader factory, if any.
    pub fn reader(&self) -> Option<&Arc<dyn ReadTransform>> {
        self.reader.as_ref()
    }

    /// Get the writer factory, if any.
    pub fn writer(&self) -> Option<&Arc<dyn WriteTransform>> {
        self.writer.as_ref()
    }

    /// Check if a factory exists for `direction`.
    pub fn supports(&self, direction: Direction) -> bool {
        match direction {
            Direction::Read => self.reader.is_some(),
            Direction::Write => self.writer.is_some(),
        }
    }
}

impl fmt::Debug for ExtensionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionDescriptor")
            .field("reader", &self.reader.is_some())
            .field("writer", &self.writer.is_some())
            .finish()
    }
}

/// Registry of extension descriptors.
///
/// Populated at start, queried read-only while streams are executing.
#[derive(Default)]
pub struct ExtensionRegistry {
    // Use RwLock for thread-safe access
    extensions: RwLock<HashMap<ExtensionSymbol, ExtensionDescriptor>>,
}

impl ExtensionRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in transforms.
    pub fn with_builtins() -> Result<Self> {
        let registry = Self::new();
        crate::transforms::register_builtins(&registry)?;
        Ok(registry)
    }

    /// Register a descriptor for an extension, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::InvalidConfiguration` when `extension` is the
    /// reserved `none` sentinel or is empty.
    pub fn register(
        &self,
        extension: impl Into<ExtensionSymbol>,
        descriptor: ExtensionDescriptor,
    ) -> Result<()> {
        let extension = extension.into();
        if extension.is_none() || extension.as_str().is_empty() || extension.as_str().contains('.')
        {
            return Err(StreamError::invalid_configuration(format!(
                "cannot register reserved or malformed extension '{extension}'"
            )));
        }

        tracing::debug!(
            extension = %extension,
            reader = descriptor.supports(Direction::Read),
            writer = descriptor.supports(Direction::Write),
            "registering stream type"
        );
        let mut extensions = self
            .extensions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        extensions.insert(extension, descriptor);
        Ok(())
    }

    /// Unregister an extension.
    ///
    /// # Returns
    ///
    /// `true` if a descriptor was removed, `false` if not found
    pub fn unregister(&self, extension: &str) -> bool {
        let mut extensions = self
            .extensions
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        extensions.remove(extension.to_lowercase().as_str()).is_some()
    }

    /// Check if an extension is registered (case-insensitive).
    pub fn contains(&self, extension: &str) -> bool {
        let extensions = self
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        extensions.contains_key(extension.to_lowercase().as_str())
    }

    /// Get a copy of the descriptor for an extension.
    pub fn descriptor(&self, extension: &str) -> Option<ExtensionDescriptor> {
        let extensions = self
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        extensions.get(extension.to_lowercase().as_str()).cloned()
    }

    /// Check if an extension has a factory for `direction`.
    pub fn supports(&self, extension: &str, direction: Direction) -> bool {
        self.descriptor(extension)
            .is_some_and(|descriptor| descriptor.supports(direction))
    }

    /// Get the reader factory for an extension.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::UnknownTransformType` if the extension is not
    /// registered, or `StreamError::UnsupportedTransform` if it has no reader.
    pub fn reader_for(&self, extension: &str) -> Result<Arc<dyn ReadTransform>> {
        let descriptor = self
            .descriptor(extension)
            .ok_or_else(|| StreamError::unknown_transform(extension))?;
        descriptor
            .reader
            .ok_or_else(|| StreamError::unsupported(extension, Direction::Read))
    }

    /// Get the writer factory for an extension.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::UnknownTransformType` if the extension is not
    /// registered, or `StreamError::UnsupportedTransform` if it has no writer.
    pub fn writer_for(&self, extension: &str) -> Result<Arc<dyn WriteTransform>> {
        let descriptor = self
            .descriptor(extension)
            .ok_or_else(|| StreamError::unknown_transform(extension))?;
        descriptor
            .writer
            .ok_or_else(|| StreamError::unsupported(extension, Direction::Write))
    }

    /// Get all registered extensions, sorted.
    pub fn extensions(&self) -> Vec<ExtensionSymbol> {
        let extensions = self
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        let mut symbols: Vec<_> = extensions.keys().cloned().collect();
        symbols.sort();
        symbols
    }

    /// Get the number of registered extensions.
    pub fn count(&self) -> usize {
        let extensions = self
            .extensions
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        extensions.len()
    }
}

impl fmt::Debug for ExtensionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtensionRegistry")
            .field("extensions", &self.extensions())
            .finish()
    }
}

/// Global extension registry.
///
/// This is a convenience singleton holding the built-in transforms.
/// For custom registries, create an `ExtensionRegistry` instance directly.
static GLOBAL_REGISTRY: std::sync::OnceLock<Arc<ExtensionRegistry>> = std::sync::OnceLock::new();

fn init_global_registry() -> Arc<ExtensionRegistry> {
    let registry = ExtensionRegistry::new();
    if let Err(e) = crate::transforms::register_builtins(&registry) {
        tracing::warn!(
            error = %e,
            fields = ?e.log_fields(),
            "failed to register built-in stream types"
        );
    }
    Arc::new(registry)
}

/// Get the global extension registry.
///
/// Custom transforms registered here are visible to every builder created
/// with [`StreamBuilder::for_file`](crate::pipeline::StreamBuilder::for_file).
///
/// # Example
///
/// ```
/// # use streamcodec::registry::global_registry;
/// assert!(global_registry().contains("gz"));
/// ```
pub fn global_registry() -> Arc<ExtensionRegistry> {
    Arc::clone(GLOBAL_REGISTRY.get_or_init(init_global_registry))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Pass-through transform for testing
    struct Passthrough;

    impl ReadTransform for Passthrough {
        fn stream_with(
            &self,
            input: &mut dyn Read,
            _options: &TransformOptions,
            inner: &mut ReadCallback<'_>,
        ) -> Result<()> {
            inner(input)
        }
    }

    fn read_only() -> ExtensionDescriptor {
        ExtensionDescriptor::new().with_reader(Arc::new(Passthrough))
    }

    #[test]
    fn test_register_extension() {
        let registry = ExtensionRegistry::new();
        registry.register("mock", read_only()).unwrap();

        assert!(registry.contains("mock"));
        assert!(registry.contains("MOCK"));
        assert_eq!(registry.count(), 1);
    }

    #[test]
    fn test_register_reserved_extension() {
        let registry = ExtensionRegistry::new();
        let err = registry.register("none", read_only()).unwrap_err();
        assert!(matches!(err, StreamError::InvalidConfiguration { .. }));
        assert!(registry.register("tar.gz", read_only()).is_err());
        assert_eq!(registry.count(), 0);
    }

    #[test]
    fn test_unregister_extension() {
        let registry = ExtensionRegistry::new();
        registry.register("mock", read_only()).unwrap();
        assert!(registry.unregister("Mock"));
        assert!(!registry.contains("mock"));
        assert!(!registry.unregister("mock"));
    }

    #[test]
    fn test_reader_and_writer_lookup() {
        let registry = ExtensionRegistry::new();
        registry.register("mock", read_only()).unwrap();

        assert!(registry.reader_for("mock").is_ok());
        assert!(registry.supports("mock", Direction::Read));
        assert!(!registry.supports("mock", Direction::Write));

        let err = registry.writer_for("mock").err().unwrap();
        assert!(matches!(
            err,
            StreamError::UnsupportedTransform {
                direction: Direction::Write,
                ..
            }
        ));
    }

    #[test]
    fn test_lookup_unknown_extension() {
        let registry = ExtensionRegistry::new();
        let err = registry.reader_for("unknown").err().unwrap();
        assert!(matches!(err, StreamError::UnknownTransformType { .. }));
        assert!(!registry.supports("unknown", Direction::Read));
    }

    #[test]
    fn test_registered_extensions_sorted() {
        let registry = ExtensionRegistry::new();
        registry.register("zeta", read_only()).unwrap();
        registry.register("alpha", read_only()).unwrap();

        let names: Vec<_> = registry
            .extensions()
            .iter()
            .map(|s| s.as_str().to_string())
            .collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_global_registry_has_builtins() {
        let registry = global_registry();
        for ext in ["gz", "gzip", "bz2", "zst", "lz4", "zip", "encode"] {
            assert!(registry.contains(ext), "missing built-in {ext}");
        }
        assert!(!registry.supports("zip", Direction::Write));
    }

    #[test]
    fn test_concurrent_access() {
        use std::thread;

        let registry = Arc::new(ExtensionRegistry::new());
        registry.register("mock", read_only()).unwrap();

        // Spawn multiple threads accessing the registry
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = registry.clone();
                thread::spawn(move || {
                    for _ in 0..10 {
                        let _factory = registry.reader_for("mock");
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        // Registry should still be valid
        assert!(registry.contains("mock"));
    }
}

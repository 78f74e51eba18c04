// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-extension default options loaded from TOML.
//!
//! ```toml
//! [defaults.gz]
//! level = 9
//!
//! [defaults.encode]
//! charset = "utf-8"
//! cleaner = "printable"
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::{ExtensionSymbol, Result, StreamError, TransformOptions};
use crate::pipeline::StreamBuilder;

/// Default transform options keyed by extension.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StreamConfig {
    /// Options recorded for each extension a file name resolves to.
    pub defaults: BTreeMap<String, TransformOptions>,
}

impl StreamConfig {
    /// Parse a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::Config` if the document is not valid TOML or
    /// does not match the expected layout.
    pub fn from_toml_str(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| StreamError::config(e.to_string()))
    }

    /// Load a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|e| {
            StreamError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&source).map_err(|e| match e {
            StreamError::Config { message } => {
                StreamError::config(format!("{}: {message}", path.display()))
            }
            other => other,
        })?;
        tracing::debug!(
            path = %path.display(),
            extensions = config.defaults.len(),
            "loaded stream configuration"
        );
        Ok(config)
    }

    /// Add default options for an extension, merging into existing ones.
    pub fn with_default(mut self, extension: &str, options: TransformOptions) -> Self {
        let key = ExtensionSymbol::new(extension).as_str().to_string();
        self.defaults.entry(key).or_default().merge(&options);
        self
    }

    /// Get the defaults for an extension (case-insensitive).
    pub fn defaults_for(&self, extension: &str) -> Option<&TransformOptions> {
        self.defaults
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(extension))
            .map(|(_, options)| options)
    }

    /// Record every default on `builder` as a deferred option.
    ///
    /// Builders without a file name, or with explicit declarations, are left
    /// untouched: defaults only refine what a file name resolves to.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::UnknownTransformType` if a configured extension
    /// is not registered.
    pub fn apply(&self, builder: &mut StreamBuilder) -> Result<()> {
        if builder.file_name().is_none() || builder.is_explicit() {
            return Ok(());
        }
        for (extension, options) in &self.defaults {
            builder.declare_deferred(extension.as_str(), options.clone())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::ExtensionRegistry;
    use std::sync::Arc;

    const SAMPLE: &str = r#"
[defaults.gz]
level = 9

[defaults.encode]
charset = "utf-8"
cleaner = "printable"
"#;

    fn builder(file_name: &str) -> StreamBuilder {
        let registry = Arc::new(ExtensionRegistry::with_builtins().unwrap());
        StreamBuilder::new(registry).with_file_name(file_name)
    }

    #[test]
    fn test_parse() {
        let config = StreamConfig::from_toml_str(SAMPLE).unwrap();
        assert_eq!(config.defaults.len(), 2);
        let gz = config.defaults_for("GZ").unwrap();
        assert_eq!(gz.get_u64("gz", "level").unwrap(), Some(9));
    }

    #[test]
    fn test_empty_document() {
        let config = StreamConfig::from_toml_str("").unwrap();
        assert!(config.defaults.is_empty());
    }

    #[test]
    fn test_unknown_section_rejected() {
        let err = StreamConfig::from_toml_str("[streams]\ngz = 1\n").unwrap_err();
        assert!(matches!(err, StreamError::Config { .. }));
    }

    #[test]
    fn test_apply_records_deferred_options() {
        let config = StreamConfig::from_toml_str(SAMPLE).unwrap();
        let mut builder = builder("data.csv.gz");
        config.apply(&mut builder).unwrap();

        let pipeline = builder.resolve();
        assert_eq!(pipeline.kinds(), vec!["encode", "gz"]);
        assert_eq!(
            pipeline.options_for("gz").unwrap().get_u64("gz", "level").unwrap(),
            Some(9)
        );
    }

    #[test]
    fn test_apply_skips_explicit_builder() {
        let config = StreamConfig::from_toml_str(SAMPLE).unwrap();
        let mut builder = builder("data.csv.gz");
        builder.declare_explicit("zst", TransformOptions::new()).unwrap();
        config.apply(&mut builder).unwrap();
        assert_eq!(builder.resolve().kinds(), vec!["zst"]);
    }

    #[test]
    fn test_apply_unknown_extension() {
        let config = StreamConfig::default().with_default("rar", TransformOptions::new());
        let mut builder = builder("data.rar");
        let err = config.apply(&mut builder).unwrap_err();
        assert!(matches!(err, StreamError::UnknownTransformType { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = StreamConfig::load("/nonexistent/streamcodec.toml").unwrap_err();
        assert!(matches!(err, StreamError::Config { .. }));
    }
}

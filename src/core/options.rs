// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Per-transform option maps.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::error::{Result, StreamError};

/// String-keyed options handed to a transform factory.
///
/// Values are JSON-like so options can come from code, TOML configuration,
/// or the command line without a per-transform schema.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TransformOptions(Map<String, Value>);

impl TransformOptions {
    /// Create an empty option map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an option, returning the updated map.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set an option, replacing any previous value for the key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.0.insert(key.into(), value.into());
    }

    /// Overlay `other` onto these options key by key.
    ///
    /// Keys present only in `self` are kept.
    pub fn merge(&mut self, other: &TransformOptions) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    /// Get a raw option value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Check if an option is present.
    pub fn contains(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if there are no options.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over option keys and values.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Get a string option.
    pub fn get_str(&self, transform: &str, key: &str) -> Result<Option<&str>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s)),
            Some(other) => Err(type_mismatch(transform, key, "a string", other)),
        }
    }

    /// Get an unsigned integer option.
    pub fn get_u64(&self, transform: &str, key: &str) -> Result<Option<u64>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_u64()
                .map(Some)
                .ok_or_else(|| type_mismatch(transform, key, "an unsigned integer", &Value::Number(n.clone()))),
            Some(other) => Err(type_mismatch(transform, key, "an unsigned integer", other)),
        }
    }

    /// Get a signed integer option.
    pub fn get_i64(&self, transform: &str, key: &str) -> Result<Option<i64>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Number(n)) => n
                .as_i64()
                .map(Some)
                .ok_or_else(|| type_mismatch(transform, key, "an integer", &Value::Number(n.clone()))),
            Some(other) => Err(type_mismatch(transform, key, "an integer", other)),
        }
    }

    /// Get a boolean option.
    pub fn get_bool(&self, transform: &str, key: &str) -> Result<Option<bool>> {
        match self.0.get(key) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::Bool(b)) => Ok(Some(*b)),
            Some(other) => Err(type_mismatch(transform, key, "a boolean", other)),
        }
    }

    /// Reject any option key not in `allowed`.
    pub fn ensure_known(&self, transform: &str, allowed: &[&str]) -> Result<()> {
        match self.0.keys().find(|key| !allowed.contains(&key.as_str())) {
            Some(key) => Err(StreamError::invalid_option(
                transform,
                key.clone(),
                format!("unknown option, expected one of: {}", allowed.join(", ")),
            )),
            None => Ok(()),
        }
    }
}

impl From<Map<String, Value>> for TransformOptions {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for TransformOptions {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

fn type_mismatch(transform: &str, key: &str, expected: &str, actual: &Value) -> StreamError {
    StreamError::invalid_option(transform, key, format!("expected {expected}, got {actual}"))
}

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Core types used throughout streamcodec.
//!
//! This module provides the foundational types for the library:
//! - [`StreamError`] - Error handling
//! - [`ExtensionSymbol`] - Normalized transform identifier
//! - [`Direction`] - Read (decode) or write (encode) orientation
//! - [`TransformOptions`] - Per-transform option map

pub mod error;
pub mod options;

pub use error::{Result, StreamError};
pub use options::TransformOptions;

use std::borrow::Borrow;

/// Orientation requested for a pipeline execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Decode while reading
    Read,
    /// Encode while writing
    Write,
}

impl Direction {
    /// Convert to string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::Read => "reader",
            Direction::Write => "writer",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Case-insensitive token identifying a transform type.
///
/// The symbol is lower-cased on construction, so `"GZ"` and `"gz"` compare
/// equal and hash identically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExtensionSymbol(String);

impl ExtensionSymbol {
    /// Reserved symbol that disables every transform.
    pub const NONE: &'static str = "none";

    /// Reserved symbol for the character-encoding directive.
    pub const ENCODE: &'static str = "encode";

    /// Create a symbol, lower-casing the input.
    pub fn new(symbol: impl AsRef<str>) -> Self {
        Self(symbol.as_ref().to_lowercase())
    }

    /// The `encode` directive.
    pub fn encode() -> Self {
        Self(Self::ENCODE.to_string())
    }

    /// Check if this is the `none` sentinel.
    pub fn is_none(&self) -> bool {
        self.0 == Self::NONE
    }

    /// Check if this is the `encode` directive.
    pub fn is_encode(&self) -> bool {
        self.0 == Self::ENCODE
    }

    /// Get the normalized symbol text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExtensionSymbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ExtensionSymbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ExtensionSymbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&ExtensionSymbol> for ExtensionSymbol {
    fn from(s: &ExtensionSymbol) -> Self {
        s.clone()
    }
}

impl Borrow<str> for ExtensionSymbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for ExtensionSymbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

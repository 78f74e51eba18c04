// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! # Streamcodec
//!
//! Layered stream transforms inferred from file name extensions.
//!
//! A file name such as `export.csv.gz` or `archive.zip` tells the library
//! which transforms stand between the raw bytes and the data a caller wants.
//! The library resolves those into a pipeline and daisy-chains the
//! transforms around a reader or writer:
//! - **Registry** of extensions and their transforms in [`registry`]
//! - **Pipeline** builder and executor in [`pipeline`]
//! - **Built-in transforms** (gzip, bzip2, zstd, lz4, zip, encode) in [`transforms`]
//! - **Path streams** for files in [`io`]
//! - **Configuration** of per-extension defaults in [`config`]
//!
//! ## Example: Reading a compressed file
//!
//! ```rust,no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::io::Read;
//! use streamcodec::io::PathStreams;
//!
//! let rows = PathStreams::new("export.csv.gz").read(|io| {
//!     let mut text = String::new();
//!     io.read_to_string(&mut text)?;
//!     Ok(text.lines().count())
//! })?;
//! println!("{rows} rows");
//! # Ok(())
//! # }
//! ```
//!
//! ## Example: Explicit streams
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use std::io::Write;
//! use streamcodec::{StreamBuilder, TransformOptions};
//!
//! let mut builder = StreamBuilder::for_file("upload.bin");
//! builder.declare_explicit("zst", TransformOptions::new().with("level", 19))?;
//!
//! let mut compressed = Vec::new();
//! builder.writer(&mut compressed, |io| {
//!     io.write_all(b"hello")?;
//!     Ok(())
//! })?;
//! assert_eq!(&compressed[..4], &[0x28, 0xb5, 0x2f, 0xfd]);
//! # Ok(())
//! # }
//! ```

// Core types
pub mod core;

// Re-export core types for convenience
pub use core::{Direction, ExtensionSymbol, Result, StreamError, TransformOptions};

// Extension registry
pub mod registry;
pub use registry::{
    global_registry, ExtensionDescriptor, ExtensionRegistry, ReadTransform, WriteTransform,
};

// Pipeline builder and executor
pub mod pipeline;
pub use pipeline::{Pipeline, StreamBuilder, TransformDescriptor};

// Built-in transforms
pub mod transforms;

// File-backed streams
pub mod io;
pub use io::PathStreams;

// Per-extension defaults
pub mod config;
pub use config::StreamConfig;

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Built-in stream transforms.
//!
//! | Extension      | Read | Write | Backend                  |
//! |----------------|------|-------|--------------------------|
//! | `gz`, `gzip`   | yes  | yes   | flate2                   |
//! | `bz2`          | yes  | yes   | bzip2                    |
//! | `zst`          | yes  | yes   | zstd                     |
//! | `lz4`          | yes  | yes   | lz4_flex (frame format)  |
//! | `zip`          | yes  | no    | rawzip                   |
//! | `encode`       | yes  | yes   | character-set cleaning   |

pub mod compression;
pub mod encode;
pub mod zip;

use std::sync::Arc;

use crate::core::Result;
use crate::registry::{ExtensionDescriptor, ExtensionRegistry, ReadTransform, WriteTransform};

pub use compression::{Bzip2Transform, GzipTransform, Lz4Transform, ZstdTransform};
pub use encode::{Charset, EncodeReader, EncodeSettings, EncodeTransform, EncodeWriter};
pub use zip::ZipTransform;

/// Register every built-in transform with `registry`.
pub fn register_builtins(registry: &ExtensionRegistry) -> Result<()> {
    let gzip = bidirectional(GzipTransform);
    registry.register("gz", gzip.clone())?;
    registry.register("gzip", gzip)?;
    registry.register("bz2", bidirectional(Bzip2Transform))?;
    registry.register("zst", bidirectional(ZstdTransform))?;
    registry.register("lz4", bidirectional(Lz4Transform))?;
    registry.register("zip", ExtensionDescriptor::new().with_reader(Arc::new(ZipTransform)))?;
    registry.register("encode", bidirectional(EncodeTransform))?;
    Ok(())
}

fn bidirectional<T>(transform: T) -> ExtensionDescriptor
where
    T: ReadTransform + WriteTransform + 'static,
{
    let transform = Arc::new(transform);
    ExtensionDescriptor::new()
        .with_reader(transform.clone())
        .with_writer(transform)
}

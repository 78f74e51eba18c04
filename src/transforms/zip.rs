// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Zip archive reader.
//!
//! A zip archive keeps its directory at the end of the file, so the input
//! is spooled into memory before the selected entry is streamed to the
//! inner callback. Entry data is checked against the CRC-32 and size
//! recorded in the archive while it is read.

use std::io::{BufReader, Read};

use rawzip::{CompressionMethod, ZipArchive, ZipArchiveEntryWayfinder};

use crate::core::{Result, StreamError, TransformOptions};
use crate::registry::{ReadCallback, ReadTransform};

/// Read-only zip transform (`.zip`).
///
/// Options:
/// - `entry_file_name`: path of the entry to read (default: first file entry)
/// - `buffer_size`: chunk size used while spooling the archive (default 64 KiB)
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipTransform;

impl ZipTransform {
    const NAME: &'static str = "zip";
    const OPTIONS: &'static [&'static str] = &["entry_file_name", "buffer_size"];
    const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;
}

/// Entry chosen for reading.
struct SelectedEntry {
    name: String,
    method: CompressionMethod,
    wayfinder: ZipArchiveEntryWayfinder,
}

impl ReadTransform for ZipTransform {
    fn stream_with(
        &self,
        input: &mut dyn Read,
        options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()> {
        options.ensure_known(Self::NAME, Self::OPTIONS)?;
        let entry_file_name = options.get_str(Self::NAME, "entry_file_name")?;
        let buffer_size = match options.get_u64(Self::NAME, "buffer_size")? {
            None => Self::DEFAULT_BUFFER_SIZE,
            Some(0) => {
                return Err(StreamError::invalid_option(
                    Self::NAME,
                    "buffer_size",
                    "must be greater than zero",
                ))
            }
            Some(size) => usize::try_from(size).map_err(|_| {
                StreamError::invalid_option(Self::NAME, "buffer_size", "too large")
            })?,
        };

        let mut data = Vec::new();
        BufReader::with_capacity(buffer_size, input).read_to_end(&mut data)?;

        let archive = ZipArchive::from_slice(data.as_slice())
            .map_err(|e| StreamError::format(Self::NAME, format!("invalid zip archive: {e:?}")))?;
        let selected = select_entry(&archive, entry_file_name)?;
        let entry = archive
            .get_entry(selected.wayfinder)
            .map_err(|e| StreamError::format(Self::NAME, format!("invalid zip entry: {e:?}")))?;

        tracing::debug!(
            entry = %selected.name,
            method = ?selected.method,
            "reading zip entry"
        );

        let compressed = entry.data();
        match selected.method {
            CompressionMethod::Store => inner(&mut entry.verifying_reader(compressed)),
            CompressionMethod::Deflate => {
                let decoder = flate2::read::DeflateDecoder::new(compressed);
                inner(&mut entry.verifying_reader(decoder))
            }
            CompressionMethod::Bzip2 => {
                let decoder = bzip2::read::BzDecoder::new(compressed);
                inner(&mut entry.verifying_reader(decoder))
            }
            CompressionMethod::Zstd => {
                let decoder = zstd::stream::read::Decoder::new(compressed)?;
                inner(&mut entry.verifying_reader(decoder))
            }
            other => Err(StreamError::format(
                Self::NAME,
                format!(
                    "unsupported compression method {other:?} for entry '{}'",
                    selected.name
                ),
            )),
        }
    }
}

/// Find the first file entry, or the one named `wanted`.
fn select_entry<T: AsRef<[u8]>>(
    archive: &rawzip::ZipSliceArchive<T>,
    wanted: Option<&str>,
) -> Result<SelectedEntry> {
    for record in archive.entries() {
        let record = record.map_err(|e| {
            StreamError::format(ZipTransform::NAME, format!("invalid zip directory: {e:?}"))
        })?;
        if record.is_dir() {
            continue;
        }

        let path = record.file_path().try_normalize().map_err(|e| {
            StreamError::format(ZipTransform::NAME, format!("invalid zip entry path: {e:?}"))
        })?;
        let name: &str = path.as_ref();
        if wanted.is_some_and(|wanted| wanted != name) {
            continue;
        }

        return Ok(SelectedEntry {
            name: name.to_string(),
            method: record.compression_method(),
            wayfinder: record.wayfinder(),
        });
    }

    Err(match wanted {
        Some(name) => StreamError::format(
            ZipTransform::NAME,
            format!("File {name} not found within zip file"),
        ),
        None => StreamError::format(ZipTransform::NAME, "zip file contains no file entries"),
    })
}

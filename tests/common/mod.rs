// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Common utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::io::{Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use streamcodec::registry::{ReadCallback, WriteCallback};
use streamcodec::{
    ExtensionDescriptor, ExtensionRegistry, ReadTransform, Result, StreamError, TransformOptions,
    WriteTransform,
};

// ============================================================================
// Scratch Directories
// ============================================================================

/// Removes its directory when dropped.
#[derive(Debug)]
pub struct CleanupGuard(pub PathBuf);

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.0);
    }
}

/// Create a unique scratch directory for one test.
pub fn temp_dir(name: &str) -> (PathBuf, CleanupGuard) {
    let random = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let thread_id = format!("{:?}", std::thread::current().id())
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect::<String>();
    let dir = std::env::temp_dir().join(format!(
        "streamcodec_{}_{}_{}_{}",
        name,
        std::process::id(),
        thread_id,
        random
    ));
    fs::create_dir_all(&dir).unwrap();
    (dir.clone(), CleanupGuard(dir))
}

// ============================================================================
// Instrumented Transforms
// ============================================================================

/// Shared, ordered record of what instrumented transforms did.
#[derive(Debug, Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count_prefix(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

/// When an instrumented transform fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Never,
    /// After acquiring, before handing the stream inward.
    BeforeInner,
    /// After the inner callback returned successfully.
    AfterInner,
}

/// Logs `release:<tag>` when dropped.
struct Release {
    tag: &'static str,
    log: EventLog,
}

impl Drop for Release {
    fn drop(&mut self) {
        self.log.push(format!("release:{}", self.tag));
    }
}

/// Transform that records acquire/release events and appends its tag to
/// the bytes passing through, so layering order is visible in the data.
pub struct Recording {
    pub tag: &'static str,
    pub log: EventLog,
    pub failure: Failure,
}

impl Recording {
    fn acquire(&self) -> Result<Release> {
        self.log.push(format!("acquire:{}", self.tag));
        let release = Release {
            tag: self.tag,
            log: self.log.clone(),
        };
        if self.failure == Failure::BeforeInner {
            return Err(StreamError::Other(format!("{} failed", self.tag)));
        }
        Ok(release)
    }

    fn finish(&self) -> Result<()> {
        match self.failure {
            Failure::AfterInner => Err(StreamError::Other(format!("{} failed", self.tag))),
            _ => Ok(()),
        }
    }
}

impl ReadTransform for Recording {
    fn stream_with(
        &self,
        input: &mut dyn Read,
        _options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()> {
        let _release = self.acquire()?;
        let mut data = Vec::new();
        input.read_to_end(&mut data)?;
        data.extend_from_slice(self.tag.as_bytes());
        inner(&mut Cursor::new(data))?;
        self.finish()
    }
}

impl WriteTransform for Recording {
    fn stream_with(
        &self,
        output: &mut dyn Write,
        _options: &TransformOptions,
        inner: &mut WriteCallback<'_>,
    ) -> Result<()> {
        let _release = self.acquire()?;
        let mut data = Vec::new();
        inner(&mut data)?;
        data.extend_from_slice(self.tag.as_bytes());
        output.write_all(&data)?;
        self.finish()
    }
}

/// Register an instrumented transform under `extension`.
pub fn register_recording(
    registry: &ExtensionRegistry,
    extension: &'static str,
    log: &EventLog,
    failure: Failure,
) {
    let transform = Arc::new(Recording {
        tag: extension,
        log: log.clone(),
        failure,
    });
    registry
        .register(
            extension,
            ExtensionDescriptor::new()
                .with_reader(transform.clone())
                .with_writer(transform),
        )
        .unwrap();
}

/// Registry with instrumented `a`, `b`, `c`, a `fail` transform failing
/// before its inner stream, and a `late` transform failing after it.
pub fn recording_registry(log: &EventLog) -> Arc<ExtensionRegistry> {
    let registry = ExtensionRegistry::new();
    for tag in ["a", "b", "c"] {
        register_recording(&registry, tag, log, Failure::Never);
    }
    register_recording(&registry, "fail", log, Failure::BeforeInner);
    register_recording(&registry, "late", log, Failure::AfterInner);
    Arc::new(registry)
}

/// Registry holding only the built-in transforms.
pub fn builtin_registry() -> Arc<ExtensionRegistry> {
    Arc::new(ExtensionRegistry::with_builtins().unwrap())
}

// ============================================================================
// Fixtures
// ============================================================================

/// Build a zip archive; `deflate` selects the compression of every entry.
pub fn build_zip(entries: &[(&str, &[u8])], deflate: bool) -> Vec<u8> {
    let mut output = Vec::new();
    let mut archive = rawzip::ZipArchiveWriter::new(&mut output);
    for (name, data) in entries {
        let method = if deflate {
            rawzip::CompressionMethod::Deflate
        } else {
            rawzip::CompressionMethod::Store
        };
        let (mut entry, config) = archive
            .new_file(name)
            .compression_method(method)
            .start()
            .unwrap();
        if deflate {
            let encoder =
                flate2::write::DeflateEncoder::new(&mut entry, flate2::Compression::default());
            let mut writer = config.wrap(encoder);
            writer.write_all(data).unwrap();
            let (encoder, descriptor) = writer.finish().unwrap();
            encoder.finish().unwrap();
            entry.finish(descriptor).unwrap();
        } else {
            let mut writer = config.wrap(&mut entry);
            writer.write_all(data).unwrap();
            let (_, descriptor) = writer.finish().unwrap();
            entry.finish(descriptor).unwrap();
        }
    }
    archive.finish().unwrap();
    output
}

/// Sample CSV text used across suites.
pub const CSV: &str = "id,name,city\n1,Ada,London\n2,Grace,Arlington\n3,Linus,Helsinki\n";

// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Character-set cleaning (`encode`).
//!
//! The `encode` transform never changes the byte layout of valid text. It
//! replaces byte sequences that are invalid in the target character set and
//! can optionally strip control characters. In a pipeline it is always the
//! innermost layer, so it sees plain text.
//!
//! Options:
//! - `charset` (alias `encoding`): `utf-8` (default) or `us-ascii`
//! - `replace`: replacement for invalid bytes; defaults to U+FFFD for
//!   `utf-8` and `?` for `us-ascii`. May be empty to drop them.
//! - `cleaner`: `printable` removes control characters other than tab,
//!   carriage return and line feed.

use std::io::{self, Read, Write};

use crate::core::{Result, StreamError, TransformOptions};
use crate::registry::{ReadCallback, ReadTransform, WriteCallback, WriteTransform};

const NAME: &str = "encode";

/// Target character set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// UTF-8; invalid or truncated sequences are replaced.
    #[default]
    Utf8,
    /// 7-bit ASCII; every byte above 0x7F is replaced.
    UsAscii,
}

impl Charset {
    /// Parse a charset label (case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Some(Self::Utf8),
            "us-ascii" | "ascii" => Some(Self::UsAscii),
            _ => None,
        }
    }

    /// Canonical label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf-8",
            Self::UsAscii => "us-ascii",
        }
    }

    fn default_replacement(&self) -> &'static str {
        match self {
            Self::Utf8 => "\u{FFFD}",
            Self::UsAscii => "?",
        }
    }
}

impl std::fmt::Display for Charset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated `encode` options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodeSettings {
    charset: Charset,
    replace: String,
    printable_only: bool,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            charset: Charset::Utf8,
            replace: Charset::Utf8.default_replacement().to_string(),
            printable_only: false,
        }
    }
}

impl EncodeSettings {
    const OPTIONS: &'static [&'static str] = &["charset", "encoding", "replace", "cleaner"];

    /// Validate options.
    ///
    /// # Errors
    ///
    /// Returns `StreamError::InvalidOption` for unknown keys, unknown
    /// charsets or cleaners, conflicting `charset`/`encoding` values, and a
    /// non-ASCII replacement for `us-ascii`.
    pub fn from_options(options: &TransformOptions) -> Result<Self> {
        options.ensure_known(NAME, Self::OPTIONS)?;

        let charset = match (
            options.get_str(NAME, "charset")?,
            options.get_str(NAME, "encoding")?,
        ) {
            (Some(a), Some(b)) if !a.eq_ignore_ascii_case(b) => {
                return Err(StreamError::invalid_option(
                    NAME,
                    "encoding",
                    format!("conflicts with charset '{a}'"),
                ))
            }
            (Some(label), _) | (None, Some(label)) => Charset::from_label(label).ok_or_else(|| {
                StreamError::invalid_option(
                    NAME,
                    "charset",
                    format!("unsupported charset '{label}', expected utf-8 or us-ascii"),
                )
            })?,
            (None, None) => Charset::default(),
        };

        let replace = match options.get_str(NAME, "replace")? {
            Some(replace) if charset == Charset::UsAscii && !replace.is_ascii() => {
                return Err(StreamError::invalid_option(
                    NAME,
                    "replace",
                    "replacement must be ASCII for us-ascii",
                ))
            }
            Some(replace) => replace.to_string(),
            None => charset.default_replacement().to_string(),
        };

        let printable_only = match options.get_str(NAME, "cleaner")? {
            None => false,
            Some(cleaner) if cleaner.eq_ignore_ascii_case("printable") => true,
            Some(cleaner) => {
                return Err(StreamError::invalid_option(
                    NAME,
                    "cleaner",
                    format!("unknown cleaner '{cleaner}', expected printable"),
                ))
            }
        };

        Ok(Self {
            charset,
            replace,
            printable_only,
        })
    }

    /// Target charset.
    pub fn charset(&self) -> Charset {
        self.charset
    }

    /// Replacement text for invalid bytes.
    pub fn replace(&self) -> &str {
        &self.replace
    }

    /// Whether control characters are stripped.
    pub fn printable_only(&self) -> bool {
        self.printable_only
    }

    fn keeps(&self, c: char) -> bool {
        !self.printable_only || !c.is_control() || matches!(c, '\t' | '\r' | '\n')
    }

    fn emit_str(&self, text: &str, out: &mut Vec<u8>) {
        if !self.printable_only {
            out.extend_from_slice(text.as_bytes());
            return;
        }
        let mut utf8 = [0u8; 4];
        for c in text.chars().filter(|c| self.keeps(*c)) {
            out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
        }
    }
}

/// Incremental cleaner carrying incomplete UTF-8 sequences between chunks.
#[derive(Debug)]
struct Cleaner {
    settings: EncodeSettings,
    pending: Vec<u8>,
}

impl Cleaner {
    fn new(settings: EncodeSettings) -> Self {
        Self {
            settings,
            pending: Vec::new(),
        }
    }

    fn push(&mut self, input: &[u8], out: &mut Vec<u8>) {
        match self.settings.charset {
            Charset::UsAscii => {
                for &byte in input {
                    if !byte.is_ascii() {
                        out.extend_from_slice(self.settings.replace.as_bytes());
                    } else if self.settings.keeps(byte as char) {
                        out.push(byte);
                    }
                }
            }
            Charset::Utf8 => {
                let mut data = std::mem::take(&mut self.pending);
                data.extend_from_slice(input);
                let mut rest = data.as_slice();
                loop {
                    match std::str::from_utf8(rest) {
                        Ok(text) => {
                            self.settings.emit_str(text, out);
                            break;
                        }
                        Err(e) => {
                            let (valid, invalid) = rest.split_at(e.valid_up_to());
                            self.settings
                                .emit_str(std::str::from_utf8(valid).unwrap_or_default(), out);
                            match e.error_len() {
                                Some(len) => {
                                    out.extend_from_slice(self.settings.replace.as_bytes());
                                    rest = &invalid[len..];
                                }
                                // Truncated sequence: wait for the next chunk
                                None => {
                                    self.pending = invalid.to_vec();
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    fn finish(&mut self, out: &mut Vec<u8>) {
        if !self.pending.is_empty() {
            self.pending.clear();
            out.extend_from_slice(self.settings.replace.as_bytes());
        }
    }
}

/// Reader that cleans the text read from `inner`.
#[derive(Debug)]
pub struct EncodeReader<R> {
    inner: R,
    cleaner: Cleaner,
    chunk: Vec<u8>,
    cleaned: Vec<u8>,
    position: usize,
    eof: bool,
}

impl<R: Read> EncodeReader<R> {
    const CHUNK_SIZE: usize = 8 * 1024;

    /// Wrap `inner`.
    pub fn new(inner: R, settings: EncodeSettings) -> Self {
        Self {
            inner,
            cleaner: Cleaner::new(settings),
            chunk: vec![0; Self::CHUNK_SIZE],
            cleaned: Vec::new(),
            position: 0,
            eof: false,
        }
    }

    /// Unwrap the underlying reader.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Read for EncodeReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        // A chunk may clean down to nothing, so keep pulling until output or EOF
        while self.position == self.cleaned.len() && !self.eof {
            self.cleaned.clear();
            self.position = 0;
            let n = self.inner.read(&mut self.chunk)?;
            if n == 0 {
                self.cleaner.finish(&mut self.cleaned);
                self.eof = true;
            } else {
                self.cleaner.push(&self.chunk[..n], &mut self.cleaned);
            }
        }

        let available = &self.cleaned[self.position..];
        let n = available.len().min(buf.len());
        buf[..n].copy_from_slice(&available[..n]);
        self.position += n;
        Ok(n)
    }
}

/// Writer that cleans text before passing it to `inner`.
///
/// Call [`EncodeWriter::finish`] to flush a trailing truncated sequence.
#[derive(Debug)]
pub struct EncodeWriter<W> {
    inner: W,
    cleaner: Cleaner,
    scratch: Vec<u8>,
}

impl<W: Write> EncodeWriter<W> {
    /// Wrap `inner`.
    pub fn new(inner: W, settings: EncodeSettings) -> Self {
        Self {
            inner,
            cleaner: Cleaner::new(settings),
            scratch: Vec::new(),
        }
    }

    /// Write any pending replacement and return the underlying writer.
    pub fn finish(mut self) -> io::Result<W> {
        self.scratch.clear();
        self.cleaner.finish(&mut self.scratch);
        self.inner.write_all(&self.scratch)?;
        self.inner.flush()?;
        Ok(self.inner)
    }
}

impl<W: Write> Write for EncodeWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.scratch.clear();
        self.cleaner.push(buf, &mut self.scratch);
        self.inner.write_all(&self.scratch)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

/// Character-set cleaning transform (`encode`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeTransform;

impl ReadTransform for EncodeTransform {
    fn stream_with(
        &self,
        input: &mut dyn Read,
        options: &TransformOptions,
        inner: &mut ReadCallback<'_>,
    ) -> Result<()> {
        let settings = EncodeSettings::from_options(options)?;
        let mut reader = EncodeReader::new(input, settings);
        inner(&mut reader)
    }
}

impl WriteTransform for EncodeTransform {
    fn stream_with(
        &self,
        output: &mut dyn Write,
        options: &TransformOptions,
        inner: &mut WriteCallback<'_>,
    ) -> Result<()> {
        let settings = EncodeSettings::from_options(options)?;
        let mut writer = EncodeWriter::new(output, settings);
        inner(&mut writer)?;
        writer.finish()?;
        Ok(())
    }
}

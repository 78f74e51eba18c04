// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Pipeline builder tests.
//!
//! These tests exercise resolution of file names and declarations into
//! pipelines against the built-in registry.

mod common;

use common::builtin_registry;
use streamcodec::{StreamBuilder, StreamError, TransformOptions};

fn builder(file_name: &str) -> StreamBuilder {
    StreamBuilder::new(builtin_registry()).with_file_name(file_name)
}

// ============================================================================
// File Name Inference
// ============================================================================

#[test]
fn test_unregistered_inner_extension_is_ignored() {
    assert_eq!(builder("report.csv.gz").resolve().kinds(), vec!["gz"]);
}

#[test]
fn test_extensions_keep_left_to_right_order() {
    assert_eq!(
        builder("backup.tar.gz.zst").resolve().kinds(),
        vec!["gz", "zst"]
    );
}

#[test]
fn test_parsing_stops_at_first_unregistered_segment() {
    // "gz" before "csv" is not reached
    assert_eq!(builder("a.gz.csv.zip").resolve().kinds(), vec!["zip"]);
    assert!(builder("a.gz.csv").resolve().is_empty());
}

#[test]
fn test_extensions_case_insensitive() {
    assert_eq!(builder("EXPORT.CSV.GZ").resolve().kinds(), vec!["gz"]);
}

#[test]
fn test_directories_are_not_parsed() {
    assert!(builder("/srv/data.gz/report.csv").resolve().is_empty());
    assert_eq!(builder("/srv/data.gz/report.zst").resolve().kinds(), vec!["zst"]);
}

#[test]
fn test_no_file_name_resolves_empty() {
    let builder = StreamBuilder::new(builtin_registry());
    assert!(builder.resolve().is_empty());
}

#[test]
fn test_resolve_is_repeatable() {
    let mut builder = builder("data.csv.bz2");
    builder
        .declare_deferred("bz2", TransformOptions::new().with("level", 9))
        .unwrap();
    assert_eq!(builder.resolve(), builder.resolve());
}

// ============================================================================
// Deferred Options
// ============================================================================

#[test]
fn test_deferred_options_attach_to_parsed_extension() {
    let mut builder = builder("data.csv.gz");
    builder
        .declare_deferred("gz", TransformOptions::new().with("level", 1))
        .unwrap();

    let pipeline = builder.resolve();
    let options = pipeline.options_for("gz").unwrap();
    assert_eq!(options.get_u64("gz", "level").unwrap(), Some(1));
}

#[test]
fn test_deferred_options_for_absent_extension_are_dropped() {
    let mut builder = builder("data.csv.gz");
    builder
        .declare_deferred("zst", TransformOptions::new().with("level", 19))
        .unwrap();
    assert_eq!(builder.resolve().kinds(), vec!["gz"]);
}

#[test]
fn test_deferred_encode_is_first() {
    let mut builder = builder("data.gz");
    builder
        .declare_deferred("encode", TransformOptions::new().with("charset", "utf-8"))
        .unwrap();

    let pipeline = builder.resolve();
    assert_eq!(pipeline.kinds(), vec!["encode", "gz"]);
    assert_eq!(
        pipeline.options_for("encode").unwrap().get_str("encode", "charset").unwrap(),
        Some("utf-8")
    );
}

#[test]
fn test_deferred_encode_applies_without_extensions() {
    let mut builder = builder("notes.txt");
    builder
        .declare_deferred("encode", TransformOptions::new().with("cleaner", "printable"))
        .unwrap();
    assert_eq!(builder.resolve().kinds(), vec!["encode"]);
}

#[test]
fn test_deferred_options_merge() {
    let mut builder = builder("data.gz");
    builder
        .declare_deferred("encode", TransformOptions::new().with("charset", "us-ascii"))
        .unwrap()
        .declare_deferred("encode", TransformOptions::new().with("replace", "_"))
        .unwrap();

    let setting = builder.setting_for("encode").unwrap();
    assert_eq!(setting.len(), 2);
}

#[test]
fn test_deferred_requires_file_name() {
    let mut builder = StreamBuilder::new(builtin_registry());
    let err = builder
        .declare_deferred("gz", TransformOptions::new())
        .unwrap_err();
    assert!(matches!(err, StreamError::InvalidConfiguration { .. }));
}

#[test]
fn test_deferred_unknown_type() {
    let mut builder = builder("data.csv");
    let err = builder
        .declare_deferred("csv", TransformOptions::new())
        .unwrap_err();
    assert!(matches!(err, StreamError::UnknownTransformType { ref symbol } if symbol == "csv"));
}

// ============================================================================
// Explicit Declarations
// ============================================================================

#[test]
fn test_explicit_overrides_file_name() {
    let mut builder = builder("data.csv.gz");
    builder
        .declare_explicit("encode", TransformOptions::new())
        .unwrap()
        .declare_explicit("zst", TransformOptions::new())
        .unwrap();
    assert_eq!(builder.resolve().kinds(), vec!["encode", "zst"]);
}

#[test]
fn test_explicit_then_deferred_fails() {
    let mut builder = builder("data.gz");
    builder.declare_explicit("gz", TransformOptions::new()).unwrap();
    let err = builder
        .declare_deferred("gz", TransformOptions::new())
        .unwrap_err();
    assert!(matches!(err, StreamError::InvalidConfiguration { .. }));
}

#[test]
fn test_deferred_then_explicit_fails() {
    let mut builder = builder("data.gz");
    builder.declare_deferred("gz", TransformOptions::new()).unwrap();
    let err = builder
        .declare_explicit("gz", TransformOptions::new())
        .unwrap_err();
    assert!(matches!(err, StreamError::InvalidConfiguration { .. }));
}

#[test]
fn test_none_disables_streams() {
    let mut builder = builder("data.csv.gz");
    builder.declare_explicit("none", TransformOptions::new()).unwrap();

    assert!(builder.is_disabled());
    assert!(builder.resolve().is_empty());

    // Repeating none is fine, anything else is not
    builder.declare_explicit("NONE", TransformOptions::new()).unwrap();
    let err = builder
        .declare_explicit("gz", TransformOptions::new())
        .unwrap_err();
    assert!(matches!(err, StreamError::InvalidConfiguration { .. }));
    let err = builder.declare("gz", TransformOptions::new()).unwrap_err();
    assert!(matches!(err, StreamError::InvalidConfiguration { .. }));
}

#[test]
fn test_declare_dispatch() {
    // File name and nothing explicit: deferred
    let mut with_name = builder("data.gz");
    with_name
        .declare("gz", TransformOptions::new().with("level", 2))
        .unwrap();
    assert!(!with_name.is_explicit());
    assert_eq!(with_name.resolve().kinds(), vec!["gz"]);

    // No file name: explicit
    let mut anonymous = StreamBuilder::new(builtin_registry());
    anonymous.declare("bz2", TransformOptions::new()).unwrap();
    assert!(anonymous.is_explicit());
    assert_eq!(anonymous.resolve().kinds(), vec!["bz2"]);

    // Explicit already: stays explicit even with a file name
    let mut explicit = builder("data.gz");
    explicit.declare_explicit("lz4", TransformOptions::new()).unwrap();
    explicit.declare("gz", TransformOptions::new()).unwrap();
    assert_eq!(explicit.resolve().kinds(), vec!["lz4", "gz"]);
}

#[test]
fn test_pipeline_display() {
    let mut builder = builder("data.csv.gz");
    builder
        .declare_deferred("encode", TransformOptions::new())
        .unwrap();
    assert_eq!(builder.resolve().to_string(), "encode <- gz");
}

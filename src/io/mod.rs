// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! I/O layer binding stream pipelines to files.

pub mod path;

pub use path::PathStreams;

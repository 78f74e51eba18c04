// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! CLI subcommands.

mod cat;
mod copy;
mod extensions;
mod pipeline;

pub use cat::CatCmd;
pub use copy::CopyCmd;
pub use extensions::ExtensionsCmd;
pub use pipeline::PipelineCmd;

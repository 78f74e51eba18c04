// SPDX-FileCopyrightText: 2026 ArcheBase
//
// SPDX-License-Identifier: MulanPSL-2.0

//! Extensions command - list registered stream types.

use clap::Args;

use crate::common::Result;
use streamcodec::{global_registry, Direction};

/// List registered extensions and the directions they support.
#[derive(Args, Clone, Debug)]
pub struct ExtensionsCmd {}

impl ExtensionsCmd {
    pub fn run(self) -> Result<()> {
        let registry = global_registry();
        println!("{:<10} {:<6} {:<6}", "EXTENSION", "READ", "WRITE");
        for extension in registry.extensions() {
            let mark = |direction| {
                if registry.supports(extension.as_str(), direction) {
                    "yes"
                } else {
                    "-"
                }
            };
            println!(
                "{:<10} {:<6} {:<6}",
                extension.as_str(),
                mark(Direction::Read),
                mark(Direction::Write)
            );
        }
        Ok(())
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit validate` command - Validate configuration file.

use shmkit_core::{exists, ConfigLoader};

pub async fn execute(file: &str) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!(file = %file, "Validating configuration");

    match ConfigLoader::load_file(file) {
        Ok(config) => {
            println!("✓ Configuration is valid");
            println!();
            println!("Polling:");
            println!("  Interval: {}ms", config.poll.interval_ms);
            println!("  Timeout:  {}ms", config.poll.timeout_ms);
            println!();
            println!("Segments ({}):", config.segments.len());
            for segment in &config.segments {
                println!(
                    "  - {} (elements: {}, permission: {}, live: {})",
                    segment.name,
                    segment.elements,
                    segment.permission,
                    if exists(&segment.name) { "yes" } else { "no" }
                );
            }
            Ok(())
        }
        Err(e) => {
            eprintln!("✗ Configuration validation failed:");
            eprintln!("  {}", e);
            std::process::exit(1);
        }
    }
}

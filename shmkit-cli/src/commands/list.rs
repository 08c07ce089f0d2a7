// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit list` command - List segments from configuration.
//!
//! Lists segments defined in the configuration file together with whether
//! each name currently exists.

use serde::Serialize;
use shmkit_core::{exists, ConfigLoader, Permission, SegmentConfig};

/// One configured segment and its live state.
#[derive(Debug, Serialize)]
struct SegmentStatus<'a> {
    name: &'a str,
    elements: usize,
    permission: Permission,
    live: bool,
}

impl<'a> From<&'a SegmentConfig> for SegmentStatus<'a> {
    fn from(segment: &'a SegmentConfig) -> Self {
        Self {
            name: &segment.name,
            elements: segment.elements.value(),
            permission: segment.permission,
            live: exists(&segment.name),
        }
    }
}

pub async fn execute(config_path: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = ConfigLoader::load_file(config_path)?;
    let statuses: Vec<SegmentStatus<'_>> = config.segments.iter().map(Into::into).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        return Ok(());
    }

    println!("╔══════════════════════════════════════════════╦══════════╦════════════╦══════╗");
    println!("║ Name                                         ║ Elements ║ Permission ║ Live ║");
    println!("╠══════════════════════════════════════════════╬══════════╬════════════╬══════╣");

    for status in &statuses {
        println!(
            "║ {:<44} ║ {:<8} ║ {:<10} ║ {:<4} ║",
            status.name,
            status.elements,
            status.permission.name(),
            if status.live { "yes" } else { "no" }
        );
    }

    println!("╚══════════════════════════════════════════════╩══════════╩════════════╩══════╝");
    println!();
    println!("Total: {} segment(s)", statuses.len());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_kebab_case_permission() {
        let config = ConfigLoader::load_string(
            "segments:\n  - name: shmkit-list-test-absent\n    elements: 3\n    permission: read-only\n",
        )
        .unwrap();

        let status = SegmentStatus::from(&config.segments[0]);
        let json = serde_json::to_value(&status).unwrap();

        assert_eq!(json["name"], "/shmkit-list-test-absent");
        assert_eq!(json["elements"], 3);
        assert_eq!(json["permission"], "read-only");
        assert_eq!(json["live"], false);
    }
}

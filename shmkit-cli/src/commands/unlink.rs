// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit unlink` command - Remove a segment name.
//!
//! Useful for stale names left behind by a crashed process. Processes that
//! still map the segment keep their mapping.

use shmkit_core::{format_name, remove};

pub async fn execute(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let name = format_name(name);

    if remove(&name)? {
        tracing::info!(name = %name, "Segment unlinked");
        println!("✓ Unlinked {}", name);
    } else {
        println!("{} was not present", name);
    }

    Ok(())
}

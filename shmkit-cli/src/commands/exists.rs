// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit exists` command - Probe for a segment name.
//!
//! Exits with status 1 when the segment is absent so scripts can branch on it.

use shmkit_core::{exists, format_name};

pub async fn execute(name: &str) -> Result<(), Box<dyn std::error::Error>> {
    let name = format_name(name);

    if exists(&name) {
        println!("{} exists", name);
        Ok(())
    } else {
        println!("{} does not exist", name);
        std::process::exit(1);
    }
}

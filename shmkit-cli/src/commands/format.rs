// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit format` command - Print a normalized segment name.

use shmkit_core::format_name;

pub async fn execute(raw: &str) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", format_name(raw));
    Ok(())
}

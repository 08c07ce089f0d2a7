// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit send` command - Write i32 values into a segment.
//!
//! The segment is created if needed, filled, kept mapped for `--hold-ms`
//! and then torn down, which unlinks the name.

use std::time::Duration;

use shmkit_core::{format_name, TypedArray};

use crate::payload;

pub async fn execute(
    name: &str,
    values: &str,
    hold_ms: u64,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = format_name(name);
    let values = payload::parse_values(values)?;

    // SAFETY: receivers only read; the mutable slice lives for one copy
    let mut array = unsafe { TypedArray::<i32>::open(&name, values.len())? };
    array.as_mut_slice().copy_from_slice(&values);

    let checksum = payload::checksum(&values);
    tracing::info!(name = %name, len = values.len(), checksum, "Values written");
    println!(
        "✓ Wrote {} value(s) to {} (checksum {})",
        values.len(),
        name,
        checksum
    );

    if hold_ms > 0 {
        tracing::debug!(name = %name, hold_ms, "Holding segment");
        tokio::time::sleep(Duration::from_millis(hold_ms)).await;
    }

    Ok(())
}

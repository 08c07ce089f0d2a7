// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit demo` command - Exchange an array between two processes.
//!
//! This process writes a known sequence, then spawns `shmkit recv --read-only`
//! which waits for the matching checksum, prints the values and unlinks the
//! name on exit. Afterwards the local mapping must still hold the sequence.

use std::process::Stdio;

use shmkit_core::{exists, format_name, TypedArray};
use tokio::process::Command;

use crate::error::CliError;
use crate::payload;

pub async fn execute(config_path: &str, len: usize) -> Result<(), Box<dyn std::error::Error>> {
    let name = format_name(&format!("shmkit-demo-{}", std::process::id()));
    let values = payload::demo_values(len);
    let checksum = payload::checksum(&values);

    // SAFETY: the receiver only reads, and the mutable slice below is gone
    // before it is spawned
    let mut array = unsafe { TypedArray::<i32>::open(&name, len)? };
    array.as_mut_slice().copy_from_slice(&values);
    tracing::info!(name = %name, len, checksum, "Sequence written");

    let exe = std::env::current_exe().map_err(|e| CliError::Io {
        context: "locating the shmkit executable",
        source: e,
    })?;

    let output = Command::new(exe)
        .arg("--config")
        .arg(config_path)
        .arg("recv")
        .arg("--name")
        .arg(&name)
        .arg("--len")
        .arg(len.to_string())
        .arg("--checksum")
        .arg(checksum.to_string())
        .arg("--read-only")
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(|e| CliError::Io {
            context: "running the receiver",
            source: e,
        })?;

    if !output.status.success() {
        return Err(CliError::ChildFailed {
            status: output.status.to_string(),
        }
        .into());
    }

    let received = String::from_utf8_lossy(&output.stdout);
    let received = payload::parse_values(received.trim())?;
    if received != values {
        return Err(CliError::DataMismatch {
            expected: values,
            actual: received,
        }
        .into());
    }

    // The receiver's teardown unlinked the name; our mapping is unaffected
    if exists(&name) {
        return Err(CliError::SegmentLeaked { name }.into());
    }
    let local = array.snapshot();
    if local != values {
        return Err(CliError::DataMismatch {
            expected: values,
            actual: local,
        }
        .into());
    }

    println!("✓ Receiver read {}", payload::render(&received));
    println!("✓ {} unlinked by the receiver", name);
    println!("✓ Local mapping still holds {}", payload::render(&local));

    Ok(())
}

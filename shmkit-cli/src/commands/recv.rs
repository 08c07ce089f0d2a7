// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `shmkit recv` command - Wait for expected data to appear in a segment.
//!
//! Polls an i32 array until the CRC32 of its contents equals the expected
//! checksum, then prints the values. Polling settings come from the command
//! line, then the configuration file, then the built-in defaults.

use std::path::Path;

use shmkit_core::shm::Access;
use shmkit_core::{format_name, ConfigLoader, PollConfig, ReadOnly, ReadWrite, TypedArray};

use crate::error::CliError;
use crate::payload;

/// Parameters of a receive.
pub struct Request {
    pub name: String,
    pub len: usize,
    pub checksum: u32,
    pub read_only: bool,
    pub interval_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

pub async fn execute(config_path: &str, request: Request) -> Result<(), Box<dyn std::error::Error>> {
    let name = format_name(&request.name);
    let poll = resolve_poll(config_path, &request)?;

    tracing::info!(
        name = %name,
        len = request.len,
        read_only = request.read_only,
        interval_ms = poll.interval_ms,
        timeout_ms = poll.timeout_ms,
        "Waiting for data"
    );

    let values = if request.read_only {
        // SAFETY: wait_for only takes volatile snapshots
        let array = unsafe { TypedArray::<i32, ReadOnly>::open(&name, request.len)? };
        wait_for(&array, request.checksum, poll).await?
    } else {
        // SAFETY: wait_for only takes volatile snapshots
        let array = unsafe { TypedArray::<i32, ReadWrite>::open(&name, request.len)? };
        wait_for(&array, request.checksum, poll).await?
    };

    println!("{}", payload::render(&values));
    Ok(())
}

/// Poll settings with command line overrides applied.
fn resolve_poll(config_path: &str, request: &Request) -> Result<PollConfig, CliError> {
    let base = if Path::new(config_path).exists() {
        ConfigLoader::load_file(config_path)?.poll
    } else {
        PollConfig::default()
    };

    Ok(PollConfig {
        interval_ms: request.interval_ms.unwrap_or(base.interval_ms).max(1),
        timeout_ms: request.timeout_ms.unwrap_or(base.timeout_ms),
    })
}

/// Poll `array` until its checksum matches or the timeout expires.
async fn wait_for<M: Access>(
    array: &TypedArray<i32, M>,
    expected: u32,
    poll: PollConfig,
) -> Result<Vec<i32>, CliError> {
    let mut last = 0;
    let outcome = tokio::time::timeout(poll.timeout(), async {
        loop {
            let values = array.snapshot();
            last = payload::checksum(&values);
            if last == expected {
                return values;
            }
            tokio::time::sleep(poll.interval()).await;
        }
    })
    .await;

    match outcome {
        Ok(values) => {
            tracing::debug!(name = %array.name(), checksum = expected, "Checksum matched");
            Ok(values)
        }
        Err(_) => Err(CliError::Timeout {
            name: array.name().to_string(),
            timeout_ms: poll.timeout_ms,
            expected,
            actual: last,
        }),
    }
}

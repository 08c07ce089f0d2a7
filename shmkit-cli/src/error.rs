// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Errors raised by the CLI on top of the core library.

use shmkit_core::ShmError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] ShmError),

    #[error("Invalid value '{value}': expected a 32-bit integer")]
    InvalidValue { value: String },

    #[error("No values given")]
    EmptyPayload,

    #[error(
        "Timed out after {timeout_ms}ms waiting for {name}: expected checksum {expected:#010x}, last seen {actual:#010x}"
    )]
    Timeout {
        name: String,
        timeout_ms: u64,
        expected: u32,
        actual: u32,
    },

    #[error("Receiver process failed: {status}")]
    ChildFailed { status: String },

    #[error("Data mismatch: expected {expected:?}, got {actual:?}")]
    DataMismatch { expected: Vec<i32>, actual: Vec<i32> },

    #[error("Segment {name} still exists after the receiver tore it down")]
    SegmentLeaked { name: String },

    #[error("I/O error while {context}: {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

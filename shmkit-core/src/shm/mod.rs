// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shared Memory module.
//!
//! Named POSIX shared memory segments shared between independent processes,
//! plus typed views over them. Each process reaches a segment only through
//! its own [`SegmentHandle`]; there is no process-wide registry.
//!
//! No synchronization is provided. Concurrent access from several processes
//! must be coordinated by the callers, for example by polling with the
//! volatile `load`/`snapshot` accessors.

mod access;
mod array;
mod name;
mod object;
mod probe;
mod segment;

pub use access::{Access, ReadOnly, ReadWrite, Shareable};
pub use array::{FixedArray, TypedArray};
pub use name::{format_name, NAME_MAX, SEPARATOR};
pub use object::TypedObject;
pub use probe::exists;
pub use segment::{remove, SegmentHandle};

/// Segment name unique to one test in this process.
#[cfg(test)]
pub(crate) fn test_name(tag: &str) -> String {
    format!("/shmkit-test-{}-{}", tag, std::process::id())
}

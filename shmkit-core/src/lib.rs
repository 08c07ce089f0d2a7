// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Shmkit Core Library
//!
//! Lifecycle management for named POSIX shared memory segments.
//! Provides name normalization, existence probing, owned segment handles
//! that unmap and unlink on drop, typed object and array views, and the
//! YAML configuration describing a set of segments.

pub mod config;
pub mod error;
pub mod shm;
pub mod types;

// Re-export commonly used types
pub use config::{Config, ConfigLoader, PollConfig, SegmentConfig};
pub use error::{
    AccessCause, AccessError, ConfigurationError, MappingCause, MappingError, RangeError,
    ShmError, ShmResult,
};
pub use shm::{
    exists, format_name, remove, FixedArray, ReadOnly, ReadWrite, SegmentHandle, Shareable,
    TypedArray, TypedObject,
};
pub use types::{ElementCount, Permission};

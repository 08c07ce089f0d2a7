// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Custom error types for shmkit.
//!
//! Every failure is an explicit enum variant - no `Box<dyn Error>`, no
//! `anyhow::Result`. OS error codes are classified into a small, stable set of
//! causes so callers can match on them without caring about errno values.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for shmkit.
#[derive(Debug, Error)]
pub enum ShmError {
    // =========================================================================
    // Configuration Errors - Rejected Before Any OS Call
    // =========================================================================
    #[error("Invalid configuration: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Segment Errors - Construction Never Yields a Half-Open Segment
    // =========================================================================
    #[error("Shared memory access error: {0}")]
    Access(#[from] AccessError),

    #[error("Shared memory mapping error: {0}")]
    Mapping(#[from] MappingError),

    #[error("Shared memory range error: {0}")]
    Range(#[from] RangeError),

    // =========================================================================
    // System Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },
}

/// Errors detected while validating sizes, counts and configuration fields.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Cannot create shared memory object {name} with size 0")]
    ZeroSize { name: String },

    #[error("Cannot create shared memory array {name} with 0 elements")]
    ZeroLength { name: String },

    #[error("Cannot share zero-sized type {type_name} through {name}")]
    ZeroSizedType {
        name: String,
        type_name: &'static str,
    },

    #[error("Size of {name} overflows: {len} elements of {element_size} bytes")]
    SizeOverflow {
        name: String,
        len: usize,
        element_size: usize,
    },

    #[error("Invalid field value: {field} = {value} - {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Duplicate segment name: {name}")]
    DuplicateSegment { name: String },
}

/// Failure to open, resize or unlink the shared memory object (file/descriptor layer).
#[derive(Debug, Error)]
pub enum AccessError {
    #[error("could not open {name}: {cause}")]
    Open { name: String, cause: AccessCause },

    #[error("could not set {name} size to {size_bytes} bytes: {cause}")]
    Resize {
        name: String,
        size_bytes: usize,
        cause: AccessCause,
    },

    #[error("could not unlink {name}: {cause}")]
    Unlink { name: String, cause: AccessCause },
}

impl AccessError {
    /// Classified cause, regardless of which step failed.
    pub fn cause(&self) -> AccessCause {
        match self {
            Self::Open { cause, .. } | Self::Resize { cause, .. } | Self::Unlink { cause, .. } => {
                *cause
            }
        }
    }
}

/// Classified cause of an [`AccessError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessCause {
    #[error("permission denied")]
    PermissionDenied,

    #[error("invalid name")]
    InvalidName,

    #[error("too many files open")]
    TooManyOpenFiles,

    #[error("name too long")]
    NameTooLong,

    #[error("larger than maximum file size")]
    FileTooLarge,

    #[error("interrupted by signal")]
    Interrupted,

    #[error("internal error")]
    Internal,

    #[error("error code {0}")]
    Other(i32),
}

impl AccessCause {
    /// Classify an errno reported by `shm_open`.
    pub fn from_open_errno(errno: i32) -> Self {
        match errno {
            libc::EACCES => Self::PermissionDenied,
            libc::EINVAL => Self::InvalidName,
            libc::EMFILE | libc::ENFILE => Self::TooManyOpenFiles,
            libc::ENAMETOOLONG => Self::NameTooLong,
            libc::EINTR => Self::Interrupted,
            code => Self::Other(code),
        }
    }

    /// Classify an errno reported by `ftruncate`.
    pub fn from_resize_errno(errno: i32) -> Self {
        match errno {
            libc::EFBIG => Self::FileTooLarge,
            libc::EPERM | libc::EACCES => Self::PermissionDenied,
            libc::EINTR => Self::Interrupted,
            libc::EBADF | libc::EINVAL => Self::Internal,
            code => Self::Other(code),
        }
    }
}

/// Failure to map the shared memory object (virtual-memory layer).
#[derive(Debug, Error)]
#[error("could not map {name} ({size_bytes} bytes): {cause}")]
pub struct MappingError {
    pub name: String,
    pub size_bytes: usize,
    pub cause: MappingCause,
}

/// Classified cause of a [`MappingError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingCause {
    #[error("permissions/file error")]
    PermissionOrDescriptor,

    #[error("locking error")]
    Locking,

    #[error("too large")]
    TooLarge,

    #[error("cannot map zero bytes")]
    ZeroSize,

    #[error("filesystem does not support memory mapping")]
    Unsupported,

    #[error("no memory available or too many mappings")]
    OutOfMemory,

    #[error("file sealed or execution denied")]
    SealedOrExecDenied,

    #[error("error code {0}")]
    Other(i32),
}

impl MappingCause {
    /// Classify an errno reported by `mmap` for a request of `size_bytes`.
    pub fn from_errno(errno: i32, size_bytes: usize) -> Self {
        match errno {
            libc::EACCES | libc::EBADF => Self::PermissionOrDescriptor,
            libc::EAGAIN => Self::Locking,
            libc::EINVAL if size_bytes == 0 => Self::ZeroSize,
            libc::EINVAL => Self::TooLarge,
            libc::ENODEV => Self::Unsupported,
            libc::ENOMEM => Self::OutOfMemory,
            libc::EPERM => Self::SealedOrExecDenied,
            code => Self::Other(code),
        }
    }
}

/// Checked element access outside `[0, len)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("tried to access element {index} (len = {len})")]
pub struct RangeError {
    pub index: usize,
    pub len: usize,
}

/// Result type alias using ShmError.
pub type ShmResult<T> = Result<T, ShmError>;

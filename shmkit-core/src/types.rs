// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Newtype wrappers for validated inputs.
//!
//! Following the "Newtype" pattern in Rust to ensure valid state by construction.
//! All types validate their invariants at creation time.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;

/// How a process maps a segment.
///
/// The permission gates the mapping only: the backing object is always opened
/// read-write so a read-only opener can still create and size it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Permission {
    /// `PROT_READ` mapping. Writes through it fault.
    ReadOnly,
    /// `PROT_READ | PROT_WRITE` mapping shared with every other mapper.
    #[default]
    ReadWrite,
}

impl Permission {
    /// Get the permission name for messages and config files.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReadOnly => "read-only",
            Self::ReadWrite => "read-write",
        }
    }

    /// Page protection flags used for `mmap`.
    pub(crate) fn protection(&self) -> libc::c_int {
        match self {
            Self::ReadOnly => libc::PROT_READ,
            Self::ReadWrite => libc::PROT_READ | libc::PROT_WRITE,
        }
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, Self::ReadWrite)
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Permission {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read-only" | "ro" => Ok(Self::ReadOnly),
            "read-write" | "rw" => Ok(Self::ReadWrite),
            other => Err(ConfigurationError::InvalidField {
                field: "permission",
                value: other.to_string(),
                reason: "Must be one of: read-only, read-write".to_string(),
            }),
        }
    }
}

/// Validated element count for array segments.
/// Must be non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "usize", into = "usize")]
pub struct ElementCount(usize);

impl ElementCount {
    /// Create a new ElementCount with validation.
    pub fn new(count: usize) -> Result<Self, ConfigurationError> {
        if count == 0 {
            return Err(ConfigurationError::InvalidField {
                field: "elements",
                value: "0".to_string(),
                reason: "Element count must be greater than 0".to_string(),
            });
        }
        Ok(Self(count))
    }

    /// Get the inner count.
    pub fn value(&self) -> usize {
        self.0
    }

    /// Size in bytes of `self` elements of `element_size` bytes each.
    pub fn byte_size(&self, element_size: usize) -> Option<usize> {
        self.0.checked_mul(element_size)
    }
}

impl fmt::Display for ElementCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<usize> for ElementCount {
    type Error = ConfigurationError;

    fn try_from(value: usize) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ElementCount> for usize {
    fn from(count: ElementCount) -> Self {
        count.0
    }
}

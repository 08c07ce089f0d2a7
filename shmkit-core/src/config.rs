// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML configuration parser with strict schema validation.
//!
//! Describes the segments a deployment shares and how clients poll them.
//! Any invalid field results in a ConfigurationError before a single segment
//! is opened.

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigurationError, ShmError, ShmResult};
use crate::shm::format_name;
use crate::types::{ElementCount, Permission};

/// Raw segment configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawSegmentConfig {
    name: String,
    elements: usize,
    #[serde(default)]
    permission: Permission,
}

/// Raw polling configuration.
#[derive(Debug, Deserialize)]
struct RawPollConfig {
    #[serde(default = "default_interval_ms")]
    interval_ms: u64,
    #[serde(default = "default_timeout_ms")]
    timeout_ms: u64,
}

fn default_interval_ms() -> u64 {
    1
}

fn default_timeout_ms() -> u64 {
    5000
}

impl Default for RawPollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Raw root configuration file.
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    poll: RawPollConfig,
    segments: Vec<RawSegmentConfig>,
}

/// Validated segment configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentConfig {
    /// Normalized segment name.
    pub name: String,
    pub elements: ElementCount,
    pub permission: Permission,
}

/// Validated polling configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval_ms: u64,
    pub timeout_ms: u64,
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

/// Complete validated configuration.
#[derive(Debug)]
pub struct Config {
    pub poll: PollConfig,
    pub segments: Vec<SegmentConfig>,
}

impl Config {
    /// Find a segment by raw or normalized name.
    pub fn segment(&self, name: &str) -> Option<&SegmentConfig> {
        let name = format_name(name);
        self.segments.iter().find(|s| s.name == name)
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> ShmResult<Config> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ShmError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| ShmError::Io {
            context: "reading config file",
            source: e,
        })?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> ShmResult<Config> {
        let raw: RawConfig = serde_yaml::from_str(content).map_err(|e| ShmError::ConfigParse {
            message: format!("YAML parse error: {}", e),
        })?;

        Self::validate(raw)
    }

    /// Validate raw configuration and convert to validated types.
    fn validate(raw: RawConfig) -> ShmResult<Config> {
        let poll = Self::validate_poll(raw.poll)?;

        let mut segments = Vec::with_capacity(raw.segments.len());
        let mut seen_names = HashSet::new();

        for raw_segment in raw.segments {
            let segment = Self::validate_segment(raw_segment)?;

            // Distinct raw names can normalize to the same segment
            if !seen_names.insert(segment.name.clone()) {
                return Err(ConfigurationError::DuplicateSegment { name: segment.name }.into());
            }

            segments.push(segment);
        }

        if segments.is_empty() {
            return Err(ConfigurationError::InvalidField {
                field: "segments",
                value: "[]".to_string(),
                reason: "At least one segment must be defined".to_string(),
            }
            .into());
        }

        Ok(Config { poll, segments })
    }

    fn validate_poll(raw: RawPollConfig) -> ShmResult<PollConfig> {
        if raw.interval_ms == 0 {
            return Err(ConfigurationError::InvalidField {
                field: "interval_ms",
                value: "0".to_string(),
                reason: "Poll interval must be greater than 0".to_string(),
            }
            .into());
        }

        if raw.interval_ms > raw.timeout_ms {
            return Err(ConfigurationError::InvalidField {
                field: "interval_ms",
                value: raw.interval_ms.to_string(),
                reason: format!(
                    "Poll interval must not exceed timeout ({}ms)",
                    raw.timeout_ms
                ),
            }
            .into());
        }

        Ok(PollConfig {
            interval_ms: raw.interval_ms,
            timeout_ms: raw.timeout_ms,
        })
    }

    fn validate_segment(raw: RawSegmentConfig) -> ShmResult<SegmentConfig> {
        let name = format_name(&raw.name);
        if name.len() == 1 {
            return Err(ConfigurationError::InvalidField {
                field: "name",
                value: raw.name,
                reason: "Segment name is empty after normalization".to_string(),
            }
            .into());
        }

        let elements = ElementCount::new(raw.elements)?;

        Ok(SegmentConfig {
            name,
            elements,
            permission: raw.permission,
        })
    }
}

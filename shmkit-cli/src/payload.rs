// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Payload helpers for the i32 array exchange.
//!
//! The checksum is the CRC32 of the values in native byte order, which is
//! exactly what sits in the segment.

use crate::error::CliError;

/// Values written by `demo` before zero padding.
pub const DEMO_SEQUENCE: [i32; 5] = [4, 8, 6286, 2, 264];

/// Parse a comma separated list such as `4,8,-2`.
pub fn parse_values(raw: &str) -> Result<Vec<i32>, CliError> {
    let values = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i32>().map_err(|_| CliError::InvalidValue {
                value: s.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if values.is_empty() {
        return Err(CliError::EmptyPayload);
    }

    Ok(values)
}

/// CRC32 checksum of the values as laid out in memory.
pub fn checksum(values: &[i32]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    for value in values {
        hasher.update(&value.to_ne_bytes());
    }
    hasher.finalize()
}

/// Render values the way `recv` prints them.
pub fn render(values: &[i32]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// The demo sequence truncated or zero padded to `len` elements.
pub fn demo_values(len: usize) -> Vec<i32> {
    DEMO_SEQUENCE
        .iter()
        .copied()
        .chain(std::iter::repeat(0))
        .take(len)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_values() {
        assert_eq!(parse_values("4, 8,6286").unwrap(), vec![4, 8, 6286]);
        assert_eq!(parse_values("-1,").unwrap(), vec![-1]);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_values("4,x"),
            Err(CliError::InvalidValue { .. })
        ));
        assert!(matches!(parse_values(" , "), Err(CliError::EmptyPayload)));
        assert!(parse_values("99999999999").is_err());
    }

    #[test]
    fn test_checksum_matches_raw_bytes() {
        let values = [4, 8, 6286];
        let bytes: Vec<u8> = values.iter().flat_map(|v: &i32| v.to_ne_bytes()).collect();
        assert_eq!(checksum(&values), crc32fast::hash(&bytes));
        assert_ne!(checksum(&values), checksum(&[4, 8, 6287]));
    }

    #[test]
    fn test_demo_values() {
        assert_eq!(demo_values(8), vec![4, 8, 6286, 2, 264, 0, 0, 0]);
        assert_eq!(demo_values(2), vec![4, 8]);
    }

    #[test]
    fn test_render() {
        assert_eq!(render(&[4, -8, 0]), "4,-8,0");
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Segment name normalization.
//!
//! POSIX shared memory names live in a flat namespace: one leading `/`, no
//! other `/`, and shorter than `NAME_MAX`. Callers hand in whatever identifier
//! they have and get back something `shm_open` accepts.

/// Platform limit on a shared memory object name, in bytes.
pub const NAME_MAX: usize = 255;

/// Namespace separator.
pub const SEPARATOR: char = '/';

/// Normalize `raw` into a valid segment name.
///
/// Prepends a single `/`, drops every other `/` and NUL byte, and truncates on
/// a character boundary so the result is strictly shorter than [`NAME_MAX`].
/// Never fails; over-long input is silently cut.
pub fn format_name(raw: &str) -> String {
    let mut name = String::with_capacity(raw.len().min(NAME_MAX) + 1);
    name.push(SEPARATOR);

    for c in raw.chars().filter(|&c| c != SEPARATOR && c != '\0') {
        if name.len() + c.len_utf8() >= NAME_MAX {
            break;
        }
        name.push(c);
    }

    name
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_strips_separators() {
        assert_eq!(format_name("a/b//c"), "/abc");
        assert_eq!(format_name("/Test"), "/Test");
        assert_eq!(format_name("///"), "/");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_name(""), "/");
    }

    #[test]
    fn test_format_strips_nul() {
        assert_eq!(format_name("a\0b"), "/ab");
    }

    #[test]
    fn test_format_truncates() {
        let name = format_name(&"x".repeat(400));
        assert_eq!(name.len(), NAME_MAX - 1);
        assert!(name.starts_with('/'));
    }

    #[test]
    fn test_format_truncates_on_char_boundary() {
        let name = format_name(&"é".repeat(300));
        assert!(name.len() < NAME_MAX);
        assert!(name.chars().skip(1).all(|c| c == 'é'));
    }

    proptest! {
        #[test]
        fn prop_formatted_name_is_valid(raw in ".*") {
            let name = format_name(&raw);
            prop_assert!(name.starts_with(SEPARATOR));
            prop_assert!(!name[1..].contains(SEPARATOR));
            prop_assert!(!name.contains('\0'));
            prop_assert!(name.len() < NAME_MAX);
        }

        #[test]
        fn prop_format_is_idempotent(raw in ".*") {
            let name = format_name(&raw);
            prop_assert_eq!(format_name(&name), name);
        }
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Existence probe for named segments.

use std::ffi::CString;

/// Check whether a segment called `name` exists.
///
/// Performs a read-only, non-creating open. A segment that exists but refuses
/// access (`EACCES`) still counts as existing. Lookup failures, bad names and
/// descriptor exhaustion all report `false`.
///
/// The answer can be stale by the time the caller acts on it. Use it for
/// diagnostics, never for correctness.
pub fn exists(name: &str) -> bool {
    let Ok(c_name) = CString::new(name) else {
        return false;
    };

    // SAFETY: c_name is a valid NUL-terminated string
    let fd = unsafe { libc::shm_open(c_name.as_ptr(), libc::O_RDONLY, 0) };

    if fd >= 0 {
        // SAFETY: fd was just returned by shm_open and is not shared
        unsafe { libc::close(fd) };
        return true;
    }

    let errno = std::io::Error::last_os_error();
    let found = matches!(errno.raw_os_error(), Some(libc::EACCES | libc::EEXIST));
    tracing::trace!(name = %name, error = %errno, found, "Existence probe failed to open");
    found
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shm::{test_name, SegmentHandle};
    use crate::types::Permission;

    #[test]
    fn test_missing_segment() {
        assert!(!exists(&test_name("probe-missing")));
    }

    #[test]
    fn test_invalid_names() {
        assert!(!exists("/with\0nul"));
        assert!(!exists(&format!("/{}", "x".repeat(400))));
        assert!(!exists("/nested/name"));
    }

    #[test]
    fn test_existing_segment() {
        let name = test_name("probe-existing");
        let handle = SegmentHandle::open(&name, 64, Permission::ReadWrite).unwrap();
        assert!(exists(&name));
        assert!(exists(&name), "probe must not consume the segment");

        drop(handle);
        assert!(!exists(&name));
    }
}

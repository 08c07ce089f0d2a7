// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! SegmentHandle - POSIX shared memory lifecycle.
//!
//! Provides safe abstraction over shm_open, ftruncate and mmap.
//! Construction runs open → resize → map → close-descriptor and either
//! returns a fully mapped segment or an error with everything released.
//! Drop runs unmap → unlink and never fails.

use std::ffi::{CStr, CString};
use std::io;
use std::ptr::NonNull;

use crate::error::{
    AccessCause, AccessError, ConfigurationError, MappingCause, MappingError, ShmResult,
};
use crate::types::Permission;

/// Mode bits for newly created objects (umask still applies).
const CREATE_MODE: libc::mode_t = 0o666;

/// One open and mapped shared memory segment.
///
/// The descriptor is closed as soon as the mapping exists; the mapping alone
/// keeps the object reachable. Dropping the handle unmaps the region and
/// unlinks the name. Other processes keep their mappings until they drop
/// their own handles.
#[derive(Debug)]
pub struct SegmentHandle {
    /// Name of the shared memory object.
    name: String,
    /// Base of the mapped region.
    base: NonNull<u8>,
    /// Size of the mapped region in bytes.
    size_bytes: usize,
    /// Protection the region was mapped with.
    permission: Permission,
}

// SAFETY: the handle exclusively owns its mapping; the pointer is never
// shared with another SegmentHandle in this process.
unsafe impl Send for SegmentHandle {}

// SAFETY: &SegmentHandle only hands out raw pointers; synchronising access to
// the memory is the caller's responsibility.
unsafe impl Sync for SegmentHandle {}

impl SegmentHandle {
    /// Open the segment `name`, creating it if absent, and size and map it.
    ///
    /// The object is always opened read-write so that a read-only client can
    /// still create and size it; `permission` only decides the page
    /// protection of the mapping. An existing object is resized to exactly
    /// `size_bytes`, which truncates data past the new end.
    ///
    /// # Errors
    /// - [`ConfigurationError`] if `size_bytes` is zero or does not fit `off_t`
    ///   (no OS call is made).
    /// - [`AccessError`] if the object cannot be opened or resized.
    /// - [`MappingError`] if the object cannot be mapped.
    pub fn open(name: &str, size_bytes: usize, permission: Permission) -> ShmResult<Self> {
        if size_bytes == 0 {
            return Err(ConfigurationError::ZeroSize {
                name: name.to_string(),
            }
            .into());
        }

        let length =
            libc::off_t::try_from(size_bytes).map_err(|_| ConfigurationError::SizeOverflow {
                name: name.to_string(),
                len: size_bytes,
                element_size: 1,
            })?;

        let c_name = CString::new(name).map_err(|_| AccessError::Open {
            name: name.to_string(),
            cause: AccessCause::InvalidName,
        })?;

        let descriptor = Descriptor::open(&c_name, name)?;

        let mapped: ShmResult<NonNull<u8>> = descriptor
            .resize(size_bytes, length)
            .map_err(Into::into)
            .and_then(|()| descriptor.map(size_bytes, permission).map_err(Into::into));

        let base = match mapped {
            Ok(base) => base,
            Err(err) => {
                // Do not leave behind an object nobody got to use.
                if descriptor.created {
                    if let Err(unlink_err) = unlink(&c_name) {
                        tracing::warn!(
                            name = %name,
                            error = %unlink_err,
                            "Failed to unlink shared memory segment after failed open"
                        );
                    }
                }
                return Err(err);
            }
        };

        // The mapping now keeps the object alive.
        drop(descriptor);

        tracing::debug!(
            name = %name,
            size_bytes,
            permission = %permission,
            "Mapped shared memory segment"
        );

        Ok(Self {
            name: name.to_string(),
            base,
            size_bytes,
            permission,
        })
    }

    /// Get the name of this segment.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the size of the mapped region in bytes.
    pub fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Get the protection the region was mapped with.
    pub fn permission(&self) -> Permission {
        self.permission
    }

    /// Get a raw pointer to the start of the region.
    ///
    /// Writing through it is only valid for [`Permission::ReadWrite`]
    /// handles; on a read-only handle the write faults (`SIGSEGV`).
    pub fn as_ptr(&self) -> *mut u8 {
        self.base.as_ptr()
    }

    /// Get a byte view of the region.
    ///
    /// # Safety
    /// Caller must ensure no concurrent writes to the region, from this or
    /// any other process, for the lifetime of the slice.
    pub unsafe fn as_slice(&self) -> &[u8] {
        std::slice::from_raw_parts(self.base.as_ptr(), self.size_bytes)
    }
}

impl Drop for SegmentHandle {
    fn drop(&mut self) {
        // SAFETY: base and size_bytes describe the mapping made in open()
        let result = unsafe { libc::munmap(self.base.as_ptr().cast(), self.size_bytes) };
        if result < 0 {
            tracing::error!(
                name = %self.name,
                error = %io::Error::last_os_error(),
                "Failed to unmap shared memory segment"
            );
        }

        let Ok(c_name) = CString::new(self.name.as_str()) else {
            return;
        };

        match unlink(&c_name) {
            Ok(true) => tracing::debug!(name = %self.name, "Unlinked shared memory segment"),
            Ok(false) => tracing::debug!(name = %self.name, "Shared memory segment already unlinked"),
            Err(err) => tracing::warn!(
                name = %self.name,
                error = %err,
                "Failed to unlink shared memory segment"
            ),
        }
    }
}

/// Remove `name` from the shared memory namespace.
///
/// Existing mappings, in this and other processes, stay valid. Returns
/// `Ok(false)` if there was nothing to remove.
pub fn remove(name: &str) -> ShmResult<bool> {
    let c_name = CString::new(name).map_err(|_| AccessError::Unlink {
        name: name.to_string(),
        cause: AccessCause::InvalidName,
    })?;

    unlink(&c_name).map_err(|err| {
        AccessError::Unlink {
            name: name.to_string(),
            cause: AccessCause::from_open_errno(err.raw_os_error().unwrap_or_default()),
        }
        .into()
    })
}

/// `shm_unlink` treating a missing name as success.
fn unlink(c_name: &CStr) -> io::Result<bool> {
    // SAFETY: c_name is a valid NUL-terminated string
    if unsafe { libc::shm_unlink(c_name.as_ptr()) } == 0 {
        return Ok(true);
    }

    let err = io::Error::last_os_error();
    if err.raw_os_error() == Some(libc::ENOENT) {
        Ok(false)
    } else {
        Err(err)
    }
}

/// Descriptor held between shm_open and mmap. Closed on drop.
struct Descriptor<'a> {
    fd: libc::c_int,
    name: &'a str,
    /// Whether this open created the object.
    created: bool,
}

impl<'a> Descriptor<'a> {
    fn open(c_name: &CStr, name: &'a str) -> Result<Self, AccessError> {
        // Exclusive create first so a failed construction knows whether the
        // object is ours to clean up.
        // SAFETY: c_name is a valid NUL-terminated string
        let fd = unsafe {
            libc::shm_open(
                c_name.as_ptr(),
                libc::O_RDWR | libc::O_CREAT | libc::O_EXCL,
                CREATE_MODE,
            )
        };
        if fd >= 0 {
            return Ok(Self {
                fd,
                name,
                created: true,
            });
        }

        let errno = io::Error::last_os_error();
        if errno.raw_os_error() != Some(libc::EEXIST) {
            return Err(Self::open_error(name, &errno));
        }

        // Already there. O_CREAT again in case it was unlinked in between.
        // SAFETY: c_name is a valid NUL-terminated string
        let fd = unsafe { libc::shm_open(c_name.as_ptr(), libc::O_RDWR | libc::O_CREAT, CREATE_MODE) };
        if fd < 0 {
            return Err(Self::open_error(name, &io::Error::last_os_error()));
        }

        Ok(Self {
            fd,
            name,
            created: false,
        })
    }

    fn open_error(name: &str, errno: &io::Error) -> AccessError {
        AccessError::Open {
            name: name.to_string(),
            cause: AccessCause::from_open_errno(errno.raw_os_error().unwrap_or_default()),
        }
    }

    fn resize(&self, size_bytes: usize, length: libc::off_t) -> Result<(), AccessError> {
        // SAFETY: fd is a valid open descriptor
        if unsafe { libc::ftruncate(self.fd, length) } < 0 {
            let errno = io::Error::last_os_error();
            return Err(AccessError::Resize {
                name: self.name.to_string(),
                size_bytes,
                cause: AccessCause::from_resize_errno(errno.raw_os_error().unwrap_or_default()),
            });
        }
        Ok(())
    }

    fn map(&self, size_bytes: usize, permission: Permission) -> Result<NonNull<u8>, MappingError> {
        // SAFETY: fd is valid and sized to size_bytes, offset 0 is page aligned
        let ptr = unsafe {
            libc::mmap(
                std::ptr::null_mut(),
                size_bytes,
                permission.protection(),
                libc::MAP_SHARED,
                self.fd,
                0,
            )
        };

        if ptr == libc::MAP_FAILED {
            let errno = io::Error::last_os_error();
            return Err(MappingError {
                name: self.name.to_string(),
                size_bytes,
                cause: MappingCause::from_errno(errno.raw_os_error().unwrap_or_default(), size_bytes),
            });
        }

        NonNull::new(ptr.cast::<u8>()).ok_or_else(|| MappingError {
            name: self.name.to_string(),
            size_bytes,
            cause: MappingCause::Other(0),
        })
    }
}

impl Drop for Descriptor<'_> {
    fn drop(&mut self) {
        // SAFETY: fd was opened by Descriptor::open and is closed exactly once
        if unsafe { libc::close(self.fd) } < 0 {
            tracing::warn!(
                name = %self.name,
                fd = self.fd,
                error = %io::Error::last_os_error(),
                "Failed to close shared memory descriptor"
            );
        }
    }
}

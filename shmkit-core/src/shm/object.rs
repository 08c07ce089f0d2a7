// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! TypedObject - a segment holding exactly one `T`.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut};

use crate::error::{ConfigurationError, ShmResult};
use crate::shm::access::{Access, ReadWrite, Shareable};
use crate::shm::SegmentHandle;
use crate::types::Permission;

/// A shared memory segment sized for one value of `T`.
///
/// Reads go through `Deref` / [`get`](Self::get); writes through `DerefMut`,
/// [`set`](Self::set) or [`store`](Self::store), all of which exist only for
/// [`ReadWrite`] views. Values shared with other views or processes should
/// be read with [`load`](Self::load) and written with [`store`](Self::store),
/// which never create a reference into the segment.
///
/// ```no_run
/// use shmkit_core::shm::{format_name, ReadOnly, TypedObject};
///
/// let name = format_name("counter");
/// // SAFETY: both views only use load/store
/// let (mut writer, reader) = unsafe {
///     (
///         TypedObject::<u64>::open(&name)?,
///         TypedObject::<u64, ReadOnly>::open(&name)?,
///     )
/// };
/// writer.store(42);
/// assert_eq!(reader.load(), 42);
/// # Ok::<(), shmkit_core::ShmError>(())
/// ```
///
/// A read-only view cannot be written:
///
/// ```compile_fail
/// use shmkit_core::shm::{ReadOnly, TypedObject};
///
/// let mut reader = unsafe { TypedObject::<u64, ReadOnly>::open("/counter").unwrap() };
/// *reader = 7;
/// ```
///
/// Opening a view is `unsafe`:
///
/// ```compile_fail
/// use shmkit_core::shm::TypedObject;
///
/// let object = TypedObject::<u64>::open("/counter").unwrap();
/// ```
pub struct TypedObject<T, M = ReadWrite> {
    handle: SegmentHandle,
    _marker: PhantomData<(T, M)>,
}

impl<T: Shareable, M: Access> TypedObject<T, M> {
    /// Open (creating if absent) the segment `name`, sized for one `T`.
    ///
    /// # Safety
    /// The segment is shared memory that other views, in this or any other
    /// process, can modify at any time. While a reference returned by this
    /// view (`get`, `Deref`) is alive, nothing else may write the value.
    /// While a mutable reference (`get_mut`, `DerefMut`, `set`) is alive,
    /// no other view in this process may access the value and no other
    /// process may write it. [`load`](Self::load) and [`store`](Self::store)
    /// are always sound.
    ///
    /// # Errors
    /// [`ConfigurationError::ZeroSizedType`] for zero-sized `T`, otherwise
    /// whatever [`SegmentHandle::open`] reports.
    pub unsafe fn open(name: &str) -> ShmResult<Self> {
        let size_bytes = std::mem::size_of::<T>();
        if size_bytes == 0 {
            return Err(ConfigurationError::ZeroSizedType {
                name: name.to_string(),
                type_name: std::any::type_name::<T>(),
            }
            .into());
        }

        let handle = SegmentHandle::open(name, size_bytes, M::PERMISSION)?;

        Ok(Self {
            handle,
            _marker: PhantomData,
        })
    }

    /// Get the name of the underlying segment.
    pub fn name(&self) -> &str {
        self.handle.name()
    }

    /// Get the permission the segment is mapped with.
    pub fn permission(&self) -> Permission {
        self.handle.permission()
    }

    /// Underlying segment.
    pub fn handle(&self) -> &SegmentHandle {
        &self.handle
    }

    /// Get a raw pointer to the shared value.
    pub fn as_ptr(&self) -> *const T {
        self.handle.as_ptr().cast::<T>()
    }

    /// Get a reference to the shared value.
    pub fn get(&self) -> &T {
        // SAFETY: the region is size_of::<T>() bytes, page aligned, and any
        // bit pattern is a valid T; aliasing is covered by open()'s contract
        unsafe { &*self.as_ptr() }
    }

    /// Volatile read of the current shared value.
    pub fn load(&self) -> T {
        // SAFETY: valid, aligned region of one T; no reference is created
        unsafe { std::ptr::read_volatile(self.as_ptr()) }
    }
}

impl<T: Shareable> TypedObject<T, ReadWrite> {
    /// Get a raw mutable pointer to the shared value.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.handle.as_ptr().cast::<T>()
    }

    /// Get a mutable reference to the shared value.
    pub fn get_mut(&mut self) -> &mut T {
        // SAFETY: read-write mapping of size_of::<T>() bytes
        unsafe { &mut *self.as_mut_ptr() }
    }

    /// Copy `value` into the segment.
    pub fn set(&mut self, value: T) {
        *self.get_mut() = value;
    }

    /// Volatile write, visible to every other mapper.
    pub fn store(&mut self, value: T) {
        // SAFETY: read-write region of one T; no reference is created
        unsafe { std::ptr::write_volatile(self.as_mut_ptr(), value) }
    }
}

impl<T: Shareable, M: Access> Deref for TypedObject<T, M> {
    type Target = T;

    fn deref(&self) -> &T {
        self.get()
    }
}

impl<T: Shareable> DerefMut for TypedObject<T, ReadWrite> {
    fn deref_mut(&mut self) -> &mut T {
        self.get_mut()
    }
}

impl<T: Shareable + fmt::Debug, M: Access> fmt::Debug for TypedObject<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedObject")
            .field("name", &self.name())
            .field("permission", &self.permission())
            .field("value", &self.load())
            .finish()
    }
}

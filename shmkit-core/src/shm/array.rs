// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! TypedArray / FixedArray - segments holding contiguous values of `T`.
//!
//! Element `n` lives at byte offset `n * size_of::<T>()`. Both the
//! runtime-count [`TypedArray`] and the compile-time-count [`FixedArray`] fix
//! their length at construction.

use std::fmt;
use std::marker::PhantomData;
use std::ops::{Deref, DerefMut, Index, IndexMut};

use crate::error::{ConfigurationError, RangeError, ShmResult};
use crate::shm::access::{Access, ReadWrite, Shareable};
use crate::shm::SegmentHandle;
use crate::types::{ElementCount, Permission};

/// A shared memory segment sized for `len` contiguous values of `T`.
///
/// Access comes in three strengths:
/// - [`at`](Self::at) / [`at_mut`](Self::at_mut) return [`RangeError`] for
///   `index >= len`;
/// - `Index` / `IndexMut` panic out of range, like slices do;
/// - [`get_unchecked`](Self::get_unchecked) skips the check entirely.
///
/// Elements shared with other views or processes should be read with
/// [`load`](Self::load) or [`snapshot`](Self::snapshot) and written with
/// [`store`](Self::store), which never create a reference into the segment.
pub struct TypedArray<T, M = ReadWrite> {
    handle: SegmentHandle,
    len: usize,
    _marker: PhantomData<(T, M)>,
}

impl<T: Shareable, M: Access> TypedArray<T, M> {
    /// Open (creating if absent) the segment `name`, sized for `len` values.
    ///
    /// # Safety
    /// The segment is shared memory that other views, in this or any other
    /// process, can modify at any time. While a reference returned by this
    /// view (`at`, `get`, `as_slice`, `iter`, `Index`) is alive, nothing
    /// else may write the elements it covers. While a mutable reference
    /// (`at_mut`, `get_mut`, `as_mut_slice`, `iter_mut`, `IndexMut`) is
    /// alive, no other view in this process may access those elements and
    /// no other process may write them. [`load`](Self::load),
    /// [`store`](Self::store) and [`snapshot`](Self::snapshot) are always
    /// sound.
    ///
    /// # Errors
    /// [`ConfigurationError`] for `len == 0`, a zero-sized `T` or a byte size
    /// that overflows, all before any OS call; otherwise whatever
    /// [`SegmentHandle::open`] reports.
    pub unsafe fn open(name: &str, len: usize) -> ShmResult<Self> {
        let element_size = std::mem::size_of::<T>();
        if element_size == 0 {
            return Err(ConfigurationError::ZeroSizedType {
                name: name.to_string(),
                type_name: std::any::type_name::<T>(),
            }
            .into());
        }

        let count = ElementCount::new(len).map_err(|_| ConfigurationError::ZeroLength {
            name: name.to_string(),
        })?;

        let size_bytes =
            count
                .byte_size(element_size)
                .ok_or_else(|| ConfigurationError::SizeOverflow {
                    name: name.to_string(),
                    len,
                    element_size,
                })?;

        let handle = SegmentHandle::open(name, size_bytes, M::PERMISSION)?;

        Ok(Self {
            handle,
            len,
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

    /// Number of elements, fixed at construction.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Always `false`: empty arrays are rejected at construction.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Get a raw pointer to the first element.
    pub fn as_ptr(&self) -> *const T {
        self.handle.as_ptr().cast::<T>()
    }

    /// Get a slice over every element.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: the region holds exactly len values of T, page aligned, and
        // any bit pattern is a valid T
        unsafe { std::slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Bounds-checked access.
    pub fn at(&self, index: usize) -> Result<&T, RangeError> {
        self.as_slice().get(index).ok_or(RangeError {
            index,
            len: self.len,
        })
    }

    /// Get element `index`, or `None` out of range.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.as_slice().get(index)
    }

    /// Unchecked access.
    ///
    /// # Safety
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked(&self, index: usize) -> &T {
        &*self.as_ptr().add(index)
    }

    /// Volatile read of element `index`.
    pub fn load(&self, index: usize) -> Result<T, RangeError> {
        self.check(index)?;
        // SAFETY: index < len
        Ok(unsafe { std::ptr::read_volatile(self.as_ptr().add(index)) })
    }

    /// Volatile copy of every element.
    pub fn snapshot(&self) -> Vec<T> {
        (0..self.len)
            // SAFETY: i < len
            .map(|i| unsafe { std::ptr::read_volatile(self.as_ptr().add(i)) })
            .collect()
    }

    /// Iterate over the elements in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    fn check(&self, index: usize) -> Result<(), RangeError> {
        if index >= self.len {
            return Err(RangeError {
                index,
                len: self.len,
            });
        }
        Ok(())
    }
}

impl<T: Shareable> TypedArray<T, ReadWrite> {
    /// Get a raw mutable pointer to the first element.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.handle.as_ptr().cast::<T>()
    }

    /// Get a mutable slice over every element.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: read-write mapping holding exactly len values of T
        unsafe { std::slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Bounds-checked mutable access.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, RangeError> {
        let len = self.len;
        self.as_mut_slice()
            .get_mut(index)
            .ok_or(RangeError { index, len })
    }

    /// Get element `index` mutably, or `None` out of range.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.as_mut_slice().get_mut(index)
    }

    /// Unchecked mutable access.
    ///
    /// # Safety
    /// `index` must be less than [`len`](Self::len).
    pub unsafe fn get_unchecked_mut(&mut self, index: usize) -> &mut T {
        &mut *self.as_mut_ptr().add(index)
    }

    /// Volatile write of element `index`, visible to every other mapper.
    pub fn store(&mut self, index: usize, value: T) -> Result<(), RangeError> {
        self.check(index)?;
        // SAFETY: index < len, read-write mapping
        unsafe { std::ptr::write_volatile(self.as_mut_ptr().add(index), value) };
        Ok(())
    }

    /// Iterate mutably over the elements in order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<T: Shareable, M: Access> Index<usize> for TypedArray<T, M> {
    type Output = T;

    fn index(&self, index: usize) -> &T {
        &self.as_slice()[index]
    }
}

impl<T: Shareable> IndexMut<usize> for TypedArray<T, ReadWrite> {
    fn index_mut(&mut self, index: usize) -> &mut T {
        &mut self.as_mut_slice()[index]
    }
}

impl<'a, T: Shareable, M: Access> IntoIterator for &'a TypedArray<T, M> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T: Shareable> IntoIterator for &'a mut TypedArray<T, ReadWrite> {
    type Item = &'a mut T;
    type IntoIter = std::slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T: Shareable, M: Access> fmt::Debug for TypedArray<T, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedArray")
            .field("name", &self.name())
            .field("len", &self.len)
            .field("permission", &self.permission())
            .finish()
    }
}

/// A [`TypedArray`] whose length `N` is part of the type.
///
/// ```no_run
/// use shmkit_core::shm::{format_name, FixedArray};
///
/// // SAFETY: the only view of this segment
/// let mut values = unsafe { FixedArray::<i32, 8>::open(&format_name("Test"))? };
/// values.as_mut_array().copy_from_slice(&[4, 8, 6286, 2, 264, 0, 0, 0]);
/// assert_eq!(values.at(2)?, &6286);
/// # Ok::<(), shmkit_core::ShmError>(())
/// ```
pub struct FixedArray<T, const N: usize, M = ReadWrite> {
    inner: TypedArray<T, M>,
}

impl<T: Shareable, const N: usize, M: Access> FixedArray<T, N, M> {
    /// Open (creating if absent) the segment `name`, sized for `N` values.
    ///
    /// # Safety
    /// Same contract as [`TypedArray::open`].
    pub unsafe fn open(name: &str) -> ShmResult<Self> {
        Ok(Self {
            inner: TypedArray::open(name, N)?,
        })
    }

    /// Get the elements as a fixed-size array.
    pub fn as_array(&self) -> &[T; N] {
        // SAFETY: the region holds exactly N values of T
        unsafe { &*self.inner.as_ptr().cast::<[T; N]>() }
    }

    /// Unwrap into the runtime-length view.
    pub fn into_inner(self) -> TypedArray<T, M> {
        self.inner
    }
}

impl<T: Shareable, const N: usize> FixedArray<T, N, ReadWrite> {
    /// Get the elements as a mutable fixed-size array.
    pub fn as_mut_array(&mut self) -> &mut [T; N] {
        // SAFETY: read-write mapping holding exactly N values of T
        unsafe { &mut *self.inner.as_mut_ptr().cast::<[T; N]>() }
    }
}

impl<T, const N: usize, M> Deref for FixedArray<T, N, M> {
    type Target = TypedArray<T, M>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T, const N: usize, M> DerefMut for FixedArray<T, N, M> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<T: Shareable, const N: usize, M: Access> fmt::Debug for FixedArray<T, N, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedArray")
            .field("name", &self.inner.name())
            .field("len", &N)
            .field("permission", &self.inner.permission())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShmError;
    use crate::shm::{exists, test_name, ReadOnly};

    const SEQUENCE: [i32; 8] = [4, 8, 6286, 2, 264, 0, 0, 0];

    #[test]
    fn test_segment_is_sized_for_len_values() {
        let name = test_name("array-size");
        // SAFETY: single view
        let array = unsafe { TypedArray::<u64>::open(&name, 16) }.unwrap();
        assert_eq!(array.len(), 16);
        assert!(!array.is_empty());
        assert_eq!(array.handle().size_bytes(), 16 * 8);
    }

    #[test]
    fn test_zero_length_rejected_before_open() {
        let name = test_name("array-zero");
        // SAFETY: no view is created
        let err = unsafe { TypedArray::<i32>::open(&name, 0) }.unwrap_err();
        assert!(matches!(
            err,
            ShmError::Configuration(ConfigurationError::ZeroLength { .. })
        ));
        assert!(!exists(&name));

        // SAFETY: no view is created
        let err = unsafe { FixedArray::<i32, 0>::open(&name) }.unwrap_err();
        assert!(matches!(
            err,
            ShmError::Configuration(ConfigurationError::ZeroLength { .. })
        ));
        assert!(!exists(&name));
    }

    #[test]
    fn test_overflowing_size_rejected() {
        let name = test_name("array-overflow");
        // SAFETY: no view is created
        let err = unsafe { TypedArray::<u64>::open(&name, usize::MAX / 2) }.unwrap_err();
        assert!(matches!(
            err,
            ShmError::Configuration(ConfigurationError::SizeOverflow { .. })
        ));
        assert!(!exists(&name));
    }

    #[test]
    fn test_checked_access() {
        let name = test_name("array-checked");
        // SAFETY: single view
        let mut array = unsafe { TypedArray::<i32>::open(&name, SEQUENCE.len()) }.unwrap();
        for (i, value) in SEQUENCE.iter().enumerate() {
            *array.at_mut(i).unwrap() = *value;
        }

        for (i, value) in SEQUENCE.iter().enumerate() {
            assert_eq!(array.at(i), Ok(value));
            // SAFETY: i < len
            assert_eq!(unsafe { array.get_unchecked(i) }, value);
            assert_eq!(&array[i], value);
        }

        for i in 0..SEQUENCE.len() {
            // SAFETY: i < len
            unsafe { *array.get_unchecked_mut(i) *= -1 };
            assert_eq!(array.at(i), Ok(&-SEQUENCE[i]));
        }

        for i in SEQUENCE.len()..SEQUENCE.len() + 4 {
            assert_eq!(
                array.at(i),
                Err(RangeError {
                    index: i,
                    len: SEQUENCE.len()
                })
            );
            assert!(array.at_mut(i).is_err());
            assert!(array.load(i).is_err());
            assert!(array.store(i, 1).is_err());
        }
    }

    #[test]
    #[should_panic]
    fn test_index_out_of_range_panics() {
        let name = test_name("array-panic");
        // SAFETY: single view
        let array = unsafe { TypedArray::<i32>::open(&name, 4) }.unwrap();
        let _value = array[4];
    }

    #[test]
    fn test_reader_sees_writer() {
        let name = test_name("array-shared");
        // SAFETY: the writer only stores, and no writer reference is alive
        // while the reader iterates
        let (mut writer, reader) = unsafe {
            (
                TypedArray::<i32>::open(&name, SEQUENCE.len()).unwrap(),
                TypedArray::<i32, ReadOnly>::open(&name, SEQUENCE.len()).unwrap(),
            )
        };

        for (i, value) in SEQUENCE.iter().enumerate() {
            writer.store(i, *value).unwrap();
        }

        assert_eq!(reader.snapshot(), SEQUENCE.to_vec());
        assert_eq!(reader.load(2), Ok(6286));
        assert_eq!(reader.iter().sum::<i32>(), SEQUENCE.iter().sum::<i32>());
    }

    #[test]
    fn test_iteration() {
        let name = test_name("array-iter");
        // SAFETY: single view
        let mut array = unsafe { TypedArray::<u32>::open(&name, 5) }.unwrap();

        for (i, slot) in (&mut array).into_iter().enumerate() {
            *slot = i as u32 * 10;
        }
        for slot in array.iter_mut() {
            *slot += 1;
        }

        let collected: Vec<u32> = (&array).into_iter().copied().collect();
        assert_eq!(collected, vec![1, 11, 21, 31, 41]);
    }

    #[test]
    fn test_fixed_array() {
        let name = test_name("array-fixed");
        // SAFETY: references from the two views are never alive at once
        let (mut writer, reader) = unsafe {
            (
                FixedArray::<i32, 8>::open(&name).unwrap(),
                FixedArray::<i32, 8, ReadOnly>::open(&name).unwrap(),
            )
        };

        writer.as_mut_array().copy_from_slice(&SEQUENCE);

        assert_eq!(reader.as_array(), &SEQUENCE);
        assert_eq!(reader.len(), 8);
        assert_eq!(reader.at(4), Ok(&264));
        assert!(reader.at(8).is_err());

        let inner = reader.into_inner();
        assert_eq!(inner.permission(), Permission::ReadOnly);
    }
}

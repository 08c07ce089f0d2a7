// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Marker traits for typed segment views.
//!
//! [`Shareable`] restricts which types may be reinterpreted from raw shared
//! bytes. [`Access`] carries the mapping permission in the view's type, so a
//! read-only view has no way to hand out `&mut T`.

use crate::types::Permission;

/// Types that can be laid directly over shared memory.
///
/// No serialization is performed: every process attached to a segment reads
/// and writes the raw in-memory representation of `T`.
///
/// # Safety
/// Implementors must guarantee that:
/// - the layout is fixed (`#[repr(C)]`, `#[repr(transparent)]` or a
///   primitive) and identical in every process sharing the segment;
/// - every bit pattern is a valid value (a fresh segment is all zeroes, and
///   other processes may write anything);
/// - the type holds no pointers, references or handles into process-local
///   memory.
pub unsafe trait Shareable: Copy + 'static {}

macro_rules! impl_shareable {
    ($($ty:ty),* $(,)?) => {
        $(
            // SAFETY: plain integers and floats accept every bit pattern
            unsafe impl Shareable for $ty {}
        )*
    };
}

impl_shareable!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, f32, f64);

// SAFETY: arrays of Shareable elements have no padding and inherit validity
unsafe impl<T: Shareable, const N: usize> Shareable for [T; N] {}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::ReadOnly {}
    impl Sealed for super::ReadWrite {}
}

/// Access mode of a typed view.
pub trait Access: sealed::Sealed + 'static {
    /// Permission the segment is mapped with.
    const PERMISSION: Permission;
}

/// Read-only view: mapped `PROT_READ`, no mutable access.
#[derive(Debug)]
pub enum ReadOnly {}

/// Read-write view: mapped `PROT_READ | PROT_WRITE`, shared with every
/// other mapper of the same name.
#[derive(Debug)]
pub enum ReadWrite {}

impl Access for ReadOnly {
    const PERMISSION: Permission = Permission::ReadOnly;
}

impl Access for ReadWrite {
    const PERMISSION: Permission = Permission::ReadWrite;
}

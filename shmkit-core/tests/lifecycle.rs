// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Integration tests for the segment lifecycle through the public API.

use shmkit_core::shm::{exists, format_name, remove, FixedArray, ReadOnly, TypedArray, TypedObject};
use shmkit_core::{ConfigLoader, ConfigurationError, Permission, RangeError, ShmError};

const SEQUENCE: [i32; 8] = [4, 8, 6286, 2, 264, 0, 0, 0];

fn unique(tag: &str) -> String {
    format_name(&format!("shmkit-it-{}-{}", tag, std::process::id()))
}

#[test]
fn test_array_scenario_between_views() {
    let name = unique("scenario");

    // SAFETY: references from the two views are never alive at once
    let mut writer = unsafe { FixedArray::<i32, 8>::open(&name) }.unwrap();
    assert!(exists(&name));
    assert_eq!(writer.as_array(), &[0; 8]);

    for (slot, value) in writer.iter_mut().zip(SEQUENCE) {
        *slot = value;
    }

    // SAFETY: see writer
    let reader = unsafe { TypedArray::<i32, ReadOnly>::open(&name, SEQUENCE.len()) }.unwrap();
    assert_eq!(reader.snapshot(), SEQUENCE.to_vec());
    assert_eq!(reader[2], 6286);
    assert_eq!(reader.at(8), Err(RangeError { index: 8, len: 8 }));

    // Whoever drops first unlinks; the other mapping stays usable
    drop(reader);
    assert!(!exists(&name));
    assert_eq!(writer.as_array(), &SEQUENCE);

    drop(writer);
    assert!(!exists(&name));
}

#[test]
fn test_checked_access_agrees_with_unchecked() {
    let name = unique("checked");
    // SAFETY: single view
    let mut array = unsafe { TypedArray::<u16>::open(&name, 16) }.unwrap();

    for (i, slot) in array.iter_mut().enumerate() {
        *slot = (i * 3) as u16;
    }

    for i in 0..array.len() {
        // SAFETY: i < len
        let unchecked = unsafe { *array.get_unchecked(i) };
        assert_eq!(array.at(i).copied(), Ok(unchecked));
    }
    for i in array.len()..array.len() + 4 {
        assert!(array.at(i).is_err());
        assert!(array.store(i, 1).is_err());
    }
}

#[test]
fn test_zero_length_touches_nothing() {
    let name = unique("zero");
    // SAFETY: no view is created
    let err = unsafe { TypedArray::<i32>::open(&name, 0) }.unwrap_err();
    assert!(matches!(
        err,
        ShmError::Configuration(ConfigurationError::ZeroLength { .. })
    ));
    assert!(!exists(&name));
}

#[test]
fn test_external_unlink_is_tolerated() {
    let name = unique("external");
    // SAFETY: single view
    let mut object = unsafe { TypedObject::<u64>::open(&name) }.unwrap();
    object.set(7);

    assert!(remove(&name).unwrap());
    assert!(!exists(&name));
    assert_eq!(*object, 7);

    // Teardown after the name vanished is silent
    drop(object);
    assert!(!remove(&name).unwrap());
}

#[test]
fn test_config_drives_segments() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("shmkit.yaml");
    let raw = format!("shmkit-it-config-{}", std::process::id());
    std::fs::write(
        &path,
        format!(
            "segments:\n  - name: {}\n    elements: 4\n    permission: read-only\n",
            raw
        ),
    )
    .unwrap();

    let config = ConfigLoader::load_file(&path).unwrap();
    let segment = config.segment(&raw).unwrap();
    assert_eq!(segment.permission, Permission::ReadOnly);

    // SAFETY: single view
    let array =
        unsafe { TypedArray::<i32, ReadOnly>::open(&segment.name, segment.elements.value()) }
            .unwrap();
    assert_eq!(array.len(), 4);
    assert_eq!(array.permission(), Permission::ReadOnly);
    assert!(exists(&segment.name));
}

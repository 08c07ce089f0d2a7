// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! A value written through a `TypedObject` in one process is observed field
//! by field through a read-only `TypedObject` of the same name in another.

use std::process::{Child, Command};
use std::time::{Duration, Instant};

use shmkit_core::shm::{exists, ReadOnly, Shareable, TypedObject};

const SEGMENT_ENV: &str = "SHMKIT_OBJECT_SEGMENT";
const RECEIVE_TIMEOUT: Duration = Duration::from_secs(5);

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
struct Sample {
    x: i32,
    y: f32,
    z: u32,
}

// SAFETY: repr(C), no padding, every field accepts any bit pattern
unsafe impl Shareable for Sample {}

const SAMPLE: Sample = Sample {
    x: 84314,
    y: 0.214_984_56,
    z: 1,
};

/// Spawns an ignored test of this binary as a subprocess.
fn spawn_test_as_subprocess(test_name: &str, segment: &str) -> Child {
    let exe = std::env::current_exe().expect("Failed to get current exe");
    Command::new(exe)
        .args([
            "--exact",
            test_name,
            "--ignored",
            "--test-threads=1",
            "--nocapture",
        ])
        .env(SEGMENT_ENV, segment)
        .spawn()
        .expect("Failed to run subprocess")
}

#[test]
#[ignore = "run as a subprocess by test_object_observed_by_other_process"]
fn subprocess_receive_object() {
    let Ok(name) = std::env::var(SEGMENT_ENV) else {
        return;
    };

    // SAFETY: this view only uses load
    let reader = unsafe { TypedObject::<Sample, ReadOnly>::open(&name) }.unwrap();

    let deadline = Instant::now() + RECEIVE_TIMEOUT;
    loop {
        let seen = reader.load();
        if seen.x == SAMPLE.x && seen.y == SAMPLE.y && seen.z == SAMPLE.z {
            break;
        }
        assert!(Instant::now() < deadline, "last seen {:?}", seen);
        std::thread::sleep(Duration::from_millis(1));
    }
}

#[test]
fn test_object_observed_by_other_process() {
    let name = format!("/shmkit-object-{}", std::process::id());

    // SAFETY: the other process only reads; writer references are short lived
    let mut writer = unsafe { TypedObject::<Sample>::open(&name) }.unwrap();
    let child = spawn_test_as_subprocess("subprocess_receive_object", &name);

    std::thread::sleep(Duration::from_millis(50));
    writer.x = SAMPLE.x;
    writer.get_mut().y = SAMPLE.y;
    let current = writer.load();
    writer.store(Sample {
        z: SAMPLE.z,
        ..current
    });

    let status = child.wait_with_output().expect("Failed to wait for subprocess").status;
    assert!(status.success(), "receiver failed: {}", status);

    // The receiver unlinked the name on exit; this mapping is unaffected
    assert!(!exists(&name));
    assert_eq!(writer.load(), SAMPLE);
}

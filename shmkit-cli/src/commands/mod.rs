// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! CLI command modules.

pub mod demo;
pub mod exists;
pub mod format;
pub mod list;
pub mod recv;
pub mod send;
pub mod unlink;
pub mod validate;

// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Application layer: the use cases the CLI dispatches to, and the config
//! loading they share. Everything here is ordinary synchronous Rust -
//! no async runtime, matching spec.md §5's non-goals.

pub mod config_loader;
pub mod use_cases;

pub use config_loader::load_configs;
pub use use_cases::{decode_command, encode_command, lossless_probe_command, StageStats};

// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # revsub-bootstrap
//!
//! Process-entry concerns for `revsub`, kept separate from the codec
//! (`revsub-domain`) and its application/infrastructure wiring (`revsub`):
//! CLI parsing and argument validation, a lightweight bootstrap-phase logger
//! usable before the real `tracing` subscriber is installed, and a BSD
//! `sysexits.h`-style exit code mapping.
//!
//! This crate does not depend on `revsub-domain` - it maps error
//! *categories* (plain strings) to exit codes rather than matching on
//! `ReplError` itself, so the process-entry layer stays usable even if the
//! domain's error type grows variants this crate doesn't know about yet.

pub mod cli;
pub mod exit_code;
pub mod logger;

pub use cli::{parse_cli, ArgValidator, Cli, Commands, ValidationError};
pub use exit_code::ExitCode;
pub use logger::{BootstrapLogger, ConsoleLogger, NoOpLogger};

// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Tracing Initialization
//!
//! Installs the process-wide `tracing` subscriber once the CLI has been
//! parsed and validated - everything before this point logs through
//! `revsub_bootstrap::logger::BootstrapLogger` instead (see
//! `revsub_bootstrap::logger`), the same two-tier logging split the teacher
//! workspace uses.

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. `verbose` raises the default
/// level from `info` to `debug`; `RUST_LOG` always takes precedence when set.
pub fn init(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();

    // Only the process's real entry point should install the global
    // subscriber; a second call (e.g. from an integration test that also
    // exercises main()'s setup path) would panic, so this is deliberately
    // forgiving.
    let _ = tracing::subscriber::set_global_default(subscriber);
}

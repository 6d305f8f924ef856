// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # CLI Parser
//!
//! Command-line interface parsing using clap.
//!
//! This module defines the CLI structure and handles argument parsing.
//! Security validation happens in the validator module after parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure.
#[derive(Parser, Debug, Clone)]
#[command(name = "revsub")]
#[command(about = concat!("revsub v", env!("CARGO_PKG_VERSION"), " - reversible string-substitution codec"))]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Application config file path (TOML), overriding defaults for
    /// CTX_BEFORE/CTX_AFTER, the default backend, and default verbosity.
    #[arg(short = 'C', long, global = true)]
    pub config: Option<PathBuf>,
}

/// CLI subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Apply the forward substitution, emitting the transformed bytes and a
    /// flag stream that makes the transform invertible.
    Encode {
        /// Pipeline config: a config-file path, or `@listfile`.
        #[arg(short, long)]
        config: String,

        /// Input file path.
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path for the transformed bytes.
        #[arg(short, long)]
        output: PathBuf,

        /// Flag-stream file path.
        #[arg(short, long)]
        flags: PathBuf,

        /// Flag-stream backend: `ascii` (default), or a path to a shared
        /// object implementing the §6.5 C ABI (requires the
        /// `dylib-backend` feature).
        #[arg(short, long, default_value = "ascii")]
        backend: String,

        /// Report, per stage, the number of flags emitted and the
        /// flag-to-match ratio.
        #[arg(long)]
        stats: bool,
    },

    /// Consume a transformed byte string plus its flag stream, reconstructing
    /// the original bytes.
    Decode {
        /// Pipeline config: a config-file path, or `@listfile`.
        #[arg(short, long)]
        config: String,

        /// Input file path (the transformed bytes).
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path for the reconstructed bytes.
        #[arg(short, long)]
        output: PathBuf,

        /// Flag-stream file path.
        #[arg(short, long)]
        flags: PathBuf,

        /// Flag-stream backend: `ascii` (default), or a path to a shared
        /// object implementing the §6.5 C ABI (requires the
        /// `dylib-backend` feature).
        #[arg(short, long, default_value = "ascii")]
        backend: String,
    },

    /// Classify every pair in a config against a reference corpus, writing
    /// out a lossless-only and a lossy-only config file.
    LosslessProbe {
        /// Pipeline config: a config-file path, or `@listfile`.
        #[arg(short, long)]
        config: String,

        /// Reference data file path.
        #[arg(short, long)]
        data: PathBuf,

        /// Output path for the lossless-only config.
        #[arg(long)]
        out_lossless: PathBuf,

        /// Output path for the lossy-only config.
        #[arg(long)]
        out_lossy: PathBuf,
    },
}

/// Parses CLI arguments.
///
/// # Panics
///
/// Clap exits the process with an appropriate error message if parsing
/// fails; this function never returns in that case.
pub fn parse_cli() -> Cli {
    Cli::parse()
}

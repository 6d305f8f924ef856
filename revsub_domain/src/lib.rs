// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

// Enforce zero-panic production code at compile time; tests may still use
// unwrap/expect freely (see each module's #[cfg(test)] blocks).
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::panic))]

//! # revsub-domain
//!
//! The reversible string-substitution codec's core: config parsing, pattern
//! compilation, the forward stage, the encode simulator and decode replay
//! that make the transform invertible, multi-stage pipelines, and the
//! losslessness probe (spec.md §§1-4, §8-9).
//!
//! This crate performs no I/O of its own (spec.md §1 "Out of scope"): it
//! never opens a file, a terminal, or a dynamic loader. Configs arrive as
//! already-read byte slices ([`config::Config::parse_multi`]); flag bits move
//! through the [`flagstream::FlagSink`]/[`flagstream::FlagSource`] ports,
//! whose concrete backends (a plain ASCII file, a dynamically loaded entropy
//! coder) live in the `revsub` crate's infrastructure layer. Everything here
//! is synchronous, single-threaded, and operates on fully materialized byte
//! strings (spec.md §5 Non-goals: no streaming, no parallelism).
//!
//! ## Module map
//!
//! - [`escapes`] - `\xHH`/`\t`/`\n`/`\r`/`\\` escape grammar used by config
//!   files.
//! - [`config`] - the `Config`/`ReplacementPair` data model and the
//!   multi-config text parser.
//! - [`pattern`] - length-descending anchored alternation pattern builder.
//! - [`matcher`] - byte-string/`fancy_regex` bridging and the left-to-right,
//!   zero-length-advancing match scan.
//! - [`stage`] - a compiled `Config`: forward/backward patterns, forward/
//!   inverse maps, and the forward substitution itself.
//! - [`encode`] - the encode simulator (spec.md §4.6), the hard part.
//! - [`decode`] - the decode replay (spec.md §4.7), its mirror image.
//! - [`pipeline`] - multi-stage ordering and flag-stream reversal (spec.md
//!   §4.8).
//! - [`flagstream`] - the `FlagSink`/`FlagSource` port and `FlagRecord` shape.
//! - [`lossless`] - the per-pair losslessness probe (spec.md §4.10).
//! - [`error`] - the domain's `ReplError` hierarchy.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod escapes;
pub mod flagstream;
pub mod lossless;
pub mod matcher;
pub mod pattern;
pub mod pipeline;
pub mod stage;

pub use config::{Config, ReplacementPair};
pub use error::{ReplError, Result};
pub use flagstream::{FlagRecord, FlagSink, FlagSource, MatchContext, CTX_AFTER, CTX_BEFORE};
pub use pipeline::Pipeline;
pub use stage::CompiledStage;

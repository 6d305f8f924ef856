// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Domain Error System
//!
//! A hierarchical error type for the codec domain, categorized the way the
//! failure semantics of the codec are categorized: parsing, pattern
//! compilation, empty configs, and flag-stream underflow each get their own
//! variant so callers (and the bootstrap layer's exit-code mapping) can tell
//! them apart without string matching.
//!
//! IO is represented here too even though the domain itself performs no I/O:
//! callers in the infrastructure layer convert their own I/O failures into
//! this type so the whole call stack reports through one error enum.

use thiserror::Error;

/// Domain-specific errors for the codec.
#[derive(Error, Debug, Clone)]
pub enum ReplError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Pattern compilation error: {0}")]
    Compile(String),

    #[error("Empty pair set in config{0}")]
    Empty(EmptyConfigContext),

    #[error("Flag stream exhausted while a bit was expected")]
    Eof,

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Names the config that turned out to have zero pairs, if known.
///
/// Kept as its own small type (rather than a bare `String`) so `Empty`'s
/// `Display` impl reads naturally whether or not a name is available.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EmptyConfigContext(pub Option<String>);

impl std::fmt::Display for EmptyConfigContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.0 {
            Some(name) => write!(f, " '{name}'"),
            None => Ok(()),
        }
    }
}

impl ReplError {
    /// Creates an empty-config error naming the offending config.
    pub fn empty_config(name: impl Into<String>) -> Self {
        Self::Empty(EmptyConfigContext(Some(name.into())))
    }

    /// Creates an empty-config error without a name (anonymous single config).
    pub fn empty_config_unnamed() -> Self {
        Self::Empty(EmptyConfigContext(None))
    }

    /// Creates a new IO error.
    pub fn io(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    /// Creates a new parse error.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Creates a new pattern-compilation error.
    pub fn compile(msg: impl Into<String>) -> Self {
        Self::Compile(msg.into())
    }

    /// Gets the error category, used by the bootstrap layer's exit-code
    /// mapping (sysexits.h-style) and by logging to group diagnostics.
    pub fn category(&self) -> &'static str {
        match self {
            ReplError::Io(_) => "io",
            ReplError::Parse(_) => "parse",
            ReplError::Compile(_) => "compile",
            ReplError::Empty(_) => "empty",
            ReplError::Eof => "eof",
            ReplError::Internal(_) => "internal",
        }
    }

    /// `true` for EOF, the one failure mode that does not abort the run (see
    /// spec §4.11/§7): decode treats an exhausted flag stream as a decision of
    /// `0` and keeps going, but the output can no longer be guaranteed to
    /// reconstruct the original.
    pub fn is_non_fatal(&self) -> bool {
        matches!(self, ReplError::Eof)
    }
}

impl From<std::io::Error> for ReplError {
    fn from(err: std::io::Error) -> Self {
        ReplError::Io(err.to_string())
    }
}

impl From<fancy_regex::Error> for ReplError {
    fn from(err: fancy_regex::Error) -> Self {
        ReplError::Compile(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ReplError>;

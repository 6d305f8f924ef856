// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Exit Code Management
//!
//! Standardized Unix exit codes following BSD `sysexits.h` conventions.
//!
//! ## Exit Code Conventions
//!
//! - **0**: Success
//! - **1**: General error
//! - **64-78**: Specific error conditions (BSD sysexits.h)
//! - **130/143**: Fatal signal (SIGINT/SIGTERM)
//!
//! ## Usage
//!
//! ```rust,no_run
//! use revsub_bootstrap::exit_code::ExitCode;
//!
//! fn run_application() -> Result<(), Box<dyn std::error::Error>> {
//!     Ok(())
//! }
//!
//! fn main() {
//!     let result = run_application();
//!     let exit_code = match result {
//!         Ok(_) => ExitCode::Success,
//!         Err(e) => ExitCode::from_error(e.as_ref()),
//!     };
//!     std::process::exit(exit_code.as_i32());
//! }
//! ```

use std::fmt;

/// Exit codes following Unix conventions (BSD sysexits.h).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(i32)]
pub enum ExitCode {
    /// Successful termination (0)
    #[default]
    Success = 0,

    /// General error (1)
    Error = 1,

    /// Command line usage error (64)
    /// - Invalid arguments, missing required arguments, unknown flags
    UsageError = 64,

    /// Data format error (65)
    /// - Malformed config file, unparsable flag stream, invalid input data
    DataError = 65,

    /// Cannot open input (66)
    /// - Input file not found, cannot be read, or permission denied
    NoInput = 66,

    /// User does not exist (67) - unused by this codec, kept for sysexits.h parity.
    NoUser = 67,

    /// Host name unknown (68) - unused by this codec, kept for sysexits.h parity.
    NoHost = 68,

    /// Service unavailable (69)
    /// - The dylib flag-stream backend could not be loaded
    Unavailable = 69,

    /// Internal software error (70)
    /// - A domain invariant was violated (`ReplError::Internal`)
    Software = 70,

    /// System error (71) - OS call failed outside of plain file I/O.
    OsError = 71,

    /// Critical OS file missing (72) - a required system file is absent.
    OsFile = 72,

    /// Cannot create output file (73)
    /// - Cannot write the transformed output or flag stream
    CantCreate = 73,

    /// I/O error (74) - read or write error on an otherwise-openable file.
    IoError = 74,

    /// Temporary failure, retry (75) - unused by this codec, kept for sysexits.h parity.
    TempFail = 75,

    /// Remote error in protocol (76) - unused by this codec, kept for sysexits.h parity.
    Protocol = 76,

    /// Permission denied (77) - insufficient privileges on input or output path.
    NoPerm = 77,

    /// Configuration error (78)
    /// - Empty pair set, pattern compilation failure, or other config defect
    Config = 78,

    /// Interrupted by signal (SIGINT - Ctrl+C) (130)
    Interrupted = 130,

    /// Terminated by signal (SIGTERM) (143)
    Terminated = 143,
}

impl ExitCode {
    /// Converts to `i32` for use with `std::process::exit`.
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Maps a `revsub_domain::ReplError::category()` string to an exit code.
    ///
    /// `revsub_bootstrap` deliberately does not depend on `revsub-domain`
    /// (it is a process-entry-concerns crate, not a codec consumer), so this
    /// takes the category string the domain error already exposes rather
    /// than the error type itself.
    pub fn from_category(category: &str) -> Self {
        match category {
            "io" => ExitCode::IoError,
            "parse" => ExitCode::DataError,
            "compile" => ExitCode::Config,
            "empty" => ExitCode::Config,
            "eof" => ExitCode::DataError,
            "internal" => ExitCode::Software,
            _ => ExitCode::Error,
        }
    }

    /// Maps a generic error to an exit code by inspecting its `Display`
    /// text. Used for errors this crate does see directly (CLI parsing,
    /// path validation) that have no `category()` of their own.
    pub fn from_error(error: &dyn std::error::Error) -> Self {
        let error_string = error.to_string().to_lowercase();

        if error_string.contains("permission") || error_string.contains("access denied") {
            ExitCode::NoPerm
        } else if error_string.contains("not found") || error_string.contains("no such") {
            ExitCode::NoInput
        } else if error_string.contains("invalid") || error_string.contains("argument") {
            ExitCode::UsageError
        } else if error_string.contains("parse") || error_string.contains("format") {
            ExitCode::DataError
        } else if error_string.contains("io") || error_string.contains("read") || error_string.contains("write") {
            ExitCode::IoError
        } else if error_string.contains("config") {
            ExitCode::Config
        } else if error_string.contains("unavailable") || error_string.contains("not available") {
            ExitCode::Unavailable
        } else {
            ExitCode::Error
        }
    }

    /// Human-readable description of the exit code.
    pub fn description(self) -> &'static str {
        match self {
            ExitCode::Success => "Success",
            ExitCode::Error => "General error",
            ExitCode::UsageError => "Command line usage error",
            ExitCode::DataError => "Data format error",
            ExitCode::NoInput => "Cannot open input",
            ExitCode::NoUser => "User does not exist",
            ExitCode::NoHost => "Host name unknown",
            ExitCode::Unavailable => "Service unavailable",
            ExitCode::Software => "Internal software error",
            ExitCode::OsError => "System error",
            ExitCode::OsFile => "Critical OS file missing",
            ExitCode::CantCreate => "Cannot create output file",
            ExitCode::IoError => "I/O error",
            ExitCode::TempFail => "Temporary failure, retry",
            ExitCode::Protocol => "Remote error in protocol",
            ExitCode::NoPerm => "Permission denied",
            ExitCode::Config => "Configuration error",
            ExitCode::Interrupted => "Interrupted by signal (SIGINT)",
            ExitCode::Terminated => "Terminated by signal (SIGTERM)",
        }
    }

    pub fn is_success(self) -> bool {
        matches!(self, ExitCode::Success)
    }

    pub fn is_error(self) -> bool {
        !self.is_success()
    }

    pub fn is_signal(self) -> bool {
        matches!(self, ExitCode::Interrupted | ExitCode::Terminated)
    }
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code.as_i32()
    }
}

// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Path Argument Validation
//!
//! `revsub`'s CLI surface (§6.4) takes only file paths and a small set of
//! enumerated strings (`--backend ascii`, a `@listfile` config reference) -
//! there is no shell invocation downstream and no untrusted network input,
//! so this module validates what actually matters for this CLI: argument
//! length (malformed/corrupted argv hygiene), control-character rejection,
//! and that input paths exist while output paths' parent directories do and
//! are not a protected system directory.
//!
//! ## Checks
//!
//! - **Length limits** - reject absurdly long arguments/paths outright
//! - **Control-character rejection** - null bytes, bare CR, are never valid
//!   in a path on this platform
//! - **Existence** - input paths (config, data, the file being decoded) must
//!   exist; output paths need only an existing parent directory
//! - **System directory protection** - refuse to write into `/etc`, `/bin`,
//!   and similar

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Maximum single argument length.
const MAX_ARG_LENGTH: usize = 4096;

/// Maximum path length.
const MAX_PATH_LENGTH: usize = 4096;

/// Control-byte sequences that never belong in a path argument.
const DANGEROUS_PATTERNS: &[&str] = &["\n", "\r", "\0"];

/// Protected system directories - `revsub` never writes its outputs here.
const PROTECTED_DIRS: &[&str] = &["/etc", "/bin", "/sbin", "/usr/bin", "/usr/sbin", "/boot", "/sys", "/proc", "/dev"];

/// Path/argument validation errors.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Argument too long (max {MAX_ARG_LENGTH} characters): {0}")]
    ArgumentTooLong(String),

    #[error("Argument contains a control byte not valid in a path: {arg}")]
    DangerousPattern { arg: String },

    #[error("Path exceeds maximum length (max {MAX_PATH_LENGTH})")]
    PathTooLong,

    #[error("Refusing to write into protected system directory: {0}")]
    ProtectedDirectory(String),

    #[error("Path does not exist: {0}")]
    PathNotFound(String),

    #[error("Output directory does not exist: {0}")]
    OutputDirectoryNotFound(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Validates path and string arguments for `revsub`'s CLI surface.
pub struct ArgValidator;

impl ArgValidator {
    /// Validates a plain string argument (not a path) for length and
    /// control bytes - e.g. the `--backend` value before it is interpreted.
    pub fn validate_argument(arg: &str) -> Result<(), ValidationError> {
        if arg.len() > MAX_ARG_LENGTH {
            return Err(ValidationError::ArgumentTooLong(arg.chars().take(50).collect::<String>() + "..."));
        }

        for pattern in DANGEROUS_PATTERNS {
            if arg.contains(pattern) {
                return Err(ValidationError::DangerousPattern { arg: arg.to_string() });
            }
        }

        Ok(())
    }

    /// Validates a path that must already exist (config, data, decode
    /// input), returning its canonical form.
    pub fn validate_existing_path(path: &Path) -> Result<PathBuf, ValidationError> {
        let raw = path.to_string_lossy();
        Self::validate_argument(&raw)?;

        if !path.exists() {
            return Err(ValidationError::PathNotFound(raw.into_owned()));
        }

        let canonical = path
            .canonicalize()
            .map_err(|e| ValidationError::InvalidPath(format!("{}: {e}", raw)))?;

        if canonical.to_string_lossy().len() > MAX_PATH_LENGTH {
            return Err(ValidationError::PathTooLong);
        }

        Self::reject_protected(&canonical)?;
        Ok(canonical)
    }

    /// Validates a path that will be created (encode/decode output, the
    /// flag stream, the probe's split-config outputs): the path itself need
    /// not exist yet, but its parent directory must.
    pub fn validate_output_path(path: &Path) -> Result<PathBuf, ValidationError> {
        let raw = path.to_string_lossy();
        Self::validate_argument(&raw)?;

        if raw.len() > MAX_PATH_LENGTH {
            return Err(ValidationError::PathTooLong);
        }

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let canonical_parent = parent
            .canonicalize()
            .map_err(|_| ValidationError::OutputDirectoryNotFound(parent.display().to_string()))?;

        Self::reject_protected(&canonical_parent)?;
        Ok(canonical_parent.join(path.file_name().unwrap_or_default()))
    }

    /// Validates an optional path via [`Self::validate_existing_path`].
    pub fn validate_optional_existing_path(path: Option<&Path>) -> Result<Option<PathBuf>, ValidationError> {
        path.map(Self::validate_existing_path).transpose()
    }

    fn reject_protected(canonical: &Path) -> Result<(), ValidationError> {
        for protected in PROTECTED_DIRS {
            if canonical.starts_with(protected) {
                return Err(ValidationError::ProtectedDirectory(canonical.display().to_string()));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_safe_arguments() {
        assert!(ArgValidator::validate_argument("ascii").is_ok());
        assert!(ArgValidator::validate_argument("./libentropy.so").is_ok());
        assert!(ArgValidator::validate_argument("@listfile.txt").is_ok());
    }

    #[test]
    fn rejects_too_long_arguments() {
        let long_arg = "a".repeat(MAX_ARG_LENGTH + 1);
        assert!(matches!(ArgValidator::validate_argument(&long_arg), Err(ValidationError::ArgumentTooLong(_))));
    }

    #[test]
    fn rejects_control_bytes() {
        assert!(matches!(
            ArgValidator::validate_argument("file\nname"),
            Err(ValidationError::DangerousPattern { .. })
        ));
        assert!(matches!(
            ArgValidator::validate_argument("file\0name"),
            Err(ValidationError::DangerousPattern { .. })
        ));
    }

    #[test]
    fn validate_existing_path_rejects_missing_file() {
        let result = ArgValidator::validate_existing_path(Path::new("/no/such/path/revsub-test-fixture"));
        assert!(matches!(result, Err(ValidationError::PathNotFound(_))));
    }

    #[test]
    fn validate_existing_path_accepts_real_file() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        let result = ArgValidator::validate_existing_path(tmp.path());
        assert!(result.is_ok());
    }

    #[test]
    fn validate_output_path_requires_existing_parent() {
        let result = ArgValidator::validate_output_path(Path::new("/no/such/dir/out.bin"));
        assert!(matches!(result, Err(ValidationError::OutputDirectoryNotFound(_))));
    }

    #[test]
    fn validate_output_path_accepts_new_file_in_existing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("not-yet-created.bin");
        let result = ArgValidator::validate_output_path(&target);
        assert!(result.is_ok());
    }

    #[test]
    fn rejects_protected_system_directories() {
        let result = ArgValidator::validate_output_path(Path::new("/etc/revsub-out.bin"));
        assert!(matches!(result, Err(ValidationError::ProtectedDirectory(_))));
    }
}

// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Dynamically Loaded Flag-Stream Backend
//!
//! An optional backend (feature `dylib-backend`) that loads an external
//! shared object implementing the C ABI of spec.md §6.5:
//!
//! ```c
//! extern "C" int API(char op, const char* ctx, int ofs, int len, int mlen);
//! ```
//!
//! - `op = -1`: open. `ctx` is the target path, `ofs` is `0` for write or
//!   `1` for read. Returns 0 on success, non-zero on error.
//! - `op = -2`: close. Returns 0.
//! - `op = -3`: read one bit. Returns 0, 1, or -1 (EOF).
//! - `op >= 0`: write one bit (`op` non-zero means `1`, `0` means `0`).
//!   Returns 0.
//!
//! For a write (`op >= 0`) or a read (`op = -3`), `ctx` is the match's
//! context window, `ofs`/`len` locate the match within it (`ctx_offset`,
//! `ctx_len`), and `mlen` is the match's own length - the same
//! `(context, ctx_offset, ctx_len, match_len)` quartet a [`FlagRecord`]
//! carries, so a context-aware backend (an entropy coder) can condition its
//! encoding on it. Grounded directly in `original_source/default_dll.cpp`'s
//! own `API` entry point (`api_log(flag, ofs, len, mlen, ctx)` on write),
//! the reference implementation this ABI was distilled from.

use std::ffi::CString;
use std::io;
use std::os::raw::{c_char, c_int};
use std::path::Path;

use libloading::{Library, Symbol};
use revsub_domain::{FlagRecord, FlagSink, FlagSource, MatchContext};
use thiserror::Error;

type ApiFn = unsafe extern "C" fn(op: c_char, ctx: *const c_char, ofs: c_int, len: c_int, mlen: c_int) -> c_int;

#[derive(Debug, Error)]
pub enum DylibError {
    #[error("failed to load shared object {0}: {1}")]
    Load(String, libloading::Error),

    #[error("shared object {0} does not export `API`: {1}")]
    MissingSymbol(String, libloading::Error),

    #[error("backend open failed (API(-1, ...) returned non-zero)")]
    OpenFailed,

    #[error("backend path is not valid UTF-8/contains a NUL byte: {0}")]
    InvalidPath(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Owns the loaded `Library` and exposes the raw `API` call. `FlagSink`'s
/// and `FlagSource`'s `close` both call `op = -2`; whichever side opens the
/// backend is responsible for calling `open` first via
/// [`DylibBackend::open_for_write`]/[`DylibBackend::open_for_read`].
pub struct DylibBackend {
    // Held for its lifetime even though never read again - dropping it
    // would unmap the code backing `api`.
    _library: Library,
    api: ApiFn,
    closed: bool,
}

impl DylibBackend {
    /// Loads `so_path` and opens `target` for writing (op -1, ofs 0).
    pub fn open_for_write(so_path: &Path, target: &Path) -> Result<Self, DylibError> {
        Self::open(so_path, target, 0)
    }

    /// Loads `so_path` and opens `target` for reading (op -1, ofs 1).
    pub fn open_for_read(so_path: &Path, target: &Path) -> Result<Self, DylibError> {
        Self::open(so_path, target, 1)
    }

    fn open(so_path: &Path, target: &Path, ofs: c_int) -> Result<Self, DylibError> {
        // SAFETY: the caller is trusting `so_path` to be a well-formed
        // shared object implementing the documented `API` ABI; this is the
        // one inherently unsafe boundary of an optional, explicitly
        // opted-into feature.
        let library = unsafe { Library::new(so_path) }
            .map_err(|e| DylibError::Load(so_path.display().to_string(), e))?;
        let api: ApiFn = unsafe {
            let symbol: Symbol<ApiFn> = library
                .get(b"API\0")
                .map_err(|e| DylibError::MissingSymbol(so_path.display().to_string(), e))?;
            *symbol
        };

        let target_c = CString::new(target.to_string_lossy().into_owned())
            .map_err(|_| DylibError::InvalidPath(target.display().to_string()))?;

        // SAFETY: `api` is the symbol just resolved from the loaded
        // library; `target_c` outlives this call.
        let rc = unsafe { api(-1, target_c.as_ptr(), ofs, 0, 0) };
        if rc != 0 {
            return Err(DylibError::OpenFailed);
        }

        Ok(Self { _library: library, api, closed: false })
    }

    fn close_once(&mut self) -> Result<(), DylibError> {
        if self.closed {
            return Ok(());
        }
        // SAFETY: `self.api` was resolved from `self._library`, which is
        // still alive.
        unsafe { (self.api)(-2, std::ptr::null(), 0, 0, 0) };
        self.closed = true;
        Ok(())
    }
}

impl Drop for DylibBackend {
    fn drop(&mut self) {
        let _ = self.close_once();
    }
}

impl FlagSink for DylibBackend {
    type Error = DylibError;

    fn write(&mut self, record: &FlagRecord) -> Result<(), DylibError> {
        let op: c_int = if record.bit { 1 } else { 0 };
        let ctx = record.context.as_ptr() as *const c_char;
        // SAFETY: see open(). `ctx` stays valid for the call - `record`
        // outlives it - and `ctx_len` never exceeds `record.context.len()`.
        unsafe {
            (self.api)(
                op as c_char,
                ctx,
                record.ctx_offset as c_int,
                record.ctx_len as c_int,
                record.match_len as c_int,
            )
        };
        Ok(())
    }

    fn close(&mut self) -> Result<(), DylibError> {
        self.close_once()
    }
}

impl FlagSource for DylibBackend {
    type Error = DylibError;

    fn read(&mut self, ctx: MatchContext<'_>) -> Result<Option<bool>, DylibError> {
        let ptr = ctx.bytes.as_ptr() as *const c_char;
        // SAFETY: see open(). `ptr` stays valid for the call - `ctx`
        // borrows from the caller's live buffer - and `ctx_len` never
        // exceeds `ctx.bytes.len()`.
        let rc = unsafe {
            (self.api)(-3, ptr, ctx.ctx_offset as c_int, ctx.ctx_len as c_int, ctx.match_len as c_int)
        };
        match rc {
            -1 => Ok(None),
            0 => Ok(Some(false)),
            _ => Ok(Some(true)),
        }
    }

    fn close(&mut self) -> Result<(), DylibError> {
        self.close_once()
    }
}

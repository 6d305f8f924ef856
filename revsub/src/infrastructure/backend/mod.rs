// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! Concrete `FlagSink`/`FlagSource` adapters: the always-available
//! [`ascii`] reference backend, and the optional [`dylib`] backend behind
//! the `dylib-backend` feature. [`FlagSinkBackend`]/[`FlagSourceBackend`]
//! erase which concrete adapter is in play behind a single boxed error, so
//! the application layer's use cases can stay generic over "whichever
//! backend `--backend` named" without matching on it themselves.

pub mod ascii;

#[cfg(feature = "dylib-backend")]
pub mod dylib;

use std::error::Error as StdError;
use std::path::Path;

use revsub_domain::{FlagRecord, FlagSink, FlagSource, MatchContext};

use ascii::{AsciiFileReader, AsciiFileWriter};

/// Erased error type for [`FlagSinkBackend`]/[`FlagSourceBackend`] - boxed
/// rather than `anyhow::Error` because `FlagSink`/`FlagSource` require
/// `type Error: std::error::Error`, which `anyhow::Error` deliberately does
/// not implement.
pub type BackendError = Box<dyn StdError + Send + Sync>;

/// The flag-stream sink selected by `--backend` for an encode run.
pub enum FlagSinkBackend {
    Ascii(AsciiFileWriter),
    #[cfg(feature = "dylib-backend")]
    Dylib(dylib::DylibBackend),
}

impl FlagSinkBackend {
    /// `backend` is `"ascii"` (the default) or a path to a shared object
    /// implementing spec.md §6.5 (requires the `dylib-backend` feature).
    pub fn open(backend: &str, flags_path: &Path) -> anyhow::Result<Self> {
        if backend == "ascii" {
            return Ok(Self::Ascii(AsciiFileWriter::create(flags_path)?));
        }

        #[cfg(feature = "dylib-backend")]
        {
            let so_path = Path::new(backend);
            return Ok(Self::Dylib(dylib::DylibBackend::open_for_write(so_path, flags_path)?));
        }

        #[cfg(not(feature = "dylib-backend"))]
        {
            anyhow::bail!(
                "backend '{backend}' is not 'ascii' and this build was compiled without the dylib-backend feature"
            )
        }
    }
}

impl FlagSink for FlagSinkBackend {
    type Error = BackendError;

    fn write(&mut self, record: &FlagRecord) -> Result<(), BackendError> {
        match self {
            Self::Ascii(w) => w.write(record).map_err(Into::into),
            #[cfg(feature = "dylib-backend")]
            Self::Dylib(w) => w.write(record).map_err(Into::into),
        }
    }

    fn close(&mut self) -> Result<(), BackendError> {
        match self {
            Self::Ascii(w) => w.close().map_err(Into::into),
            #[cfg(feature = "dylib-backend")]
            Self::Dylib(w) => w.close().map_err(Into::into),
        }
    }
}

/// The flag-stream source selected by `--backend` for a decode run.
pub enum FlagSourceBackend {
    Ascii(AsciiFileReader),
    #[cfg(feature = "dylib-backend")]
    Dylib(dylib::DylibBackend),
}

impl FlagSourceBackend {
    pub fn open(backend: &str, flags_path: &Path) -> anyhow::Result<Self> {
        if backend == "ascii" {
            return Ok(Self::Ascii(AsciiFileReader::open(flags_path)?));
        }

        #[cfg(feature = "dylib-backend")]
        {
            let so_path = Path::new(backend);
            return Ok(Self::Dylib(dylib::DylibBackend::open_for_read(so_path, flags_path)?));
        }

        #[cfg(not(feature = "dylib-backend"))]
        {
            anyhow::bail!(
                "backend '{backend}' is not 'ascii' and this build was compiled without the dylib-backend feature"
            )
        }
    }
}

impl FlagSource for FlagSourceBackend {
    type Error = BackendError;

    fn read(&mut self, ctx: MatchContext<'_>) -> Result<Option<bool>, BackendError> {
        match self {
            Self::Ascii(r) => r.read(ctx).map_err(Into::into),
            #[cfg(feature = "dylib-backend")]
            Self::Dylib(r) => r.read(ctx).map_err(Into::into),
        }
    }

    fn close(&mut self) -> Result<(), BackendError> {
        match self {
            Self::Ascii(r) => r.close().map_err(Into::into),
            #[cfg(feature = "dylib-backend")]
            Self::Dylib(r) => r.close().map_err(Into::into),
        }
    }
}

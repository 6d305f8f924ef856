// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Application Configuration
//!
//! `AppConfig` layers defaults, an optional TOML file, and `REVSUB_*`
//! environment variables via the `config` crate - the same pattern the
//! teacher's infrastructure layer uses `config` + `toml` for, kept to a
//! handful of knobs since the domain's `Config`/`Pipeline` types (§3) stay
//! serialization-format-agnostic and never touch this module.
//!
//! ## Example file
//!
//! ```toml
//! [context]
//! before = 32
//! after = 32
//!
//! [backend]
//! default = "ascii"
//!
//! [logging]
//! verbose = false
//! ```

use config::{Config as ConfigSource, ConfigError, Environment, File};
use serde::Deserialize;

/// Context window defaults, mirroring `revsub_domain::flagstream::CTX_BEFORE`/
/// `CTX_AFTER`.
///
/// Advisory only: `revsub_domain::FlagRecord::with_context` builds every
/// context window from the compile-time `CTX_BEFORE`/`CTX_AFTER` constants,
/// so a `[context]` override here is not currently wired into the codec -
/// it is read and validated (and reported back by anything that dumps
/// `AppConfig`) but has no effect on an actual encode/decode run. A future
/// `Pipeline::compile` that takes an explicit context width would consume
/// this struct as its source.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ContextSettings {
    pub before: usize,
    pub after: usize,
}

impl Default for ContextSettings {
    fn default() -> Self {
        Self {
            before: revsub_domain::CTX_BEFORE,
            after: revsub_domain::CTX_AFTER,
        }
    }
}

/// Which flag-stream backend to use when `--backend` is not given on the CLI.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct BackendSettings {
    pub default: String,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self { default: "ascii".to_string() }
    }
}

/// Default verbosity when `--verbose` is not given on the CLI.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct LoggingSettings {
    pub verbose: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self { verbose: false }
    }
}

/// Layered application configuration: built-in defaults, overridden by an
/// optional TOML file, overridden by `REVSUB_*` environment variables.
#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default)]
    pub context: ContextSettings,
    #[serde(default)]
    pub backend: BackendSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl AppConfig {
    /// Loads configuration, layering a TOML file (if `path` is given and
    /// exists) and `REVSUB_*` environment variables over the built-in
    /// defaults above. `REVSUB_CONTEXT_BEFORE=16`, for instance, overrides
    /// `context.before`.
    pub fn load(path: Option<&std::path::Path>) -> Result<Self, ConfigError> {
        let defaults = AppConfig::default();
        let mut builder = ConfigSource::builder()
            .set_default("context.before", defaults.context.before as i64)?
            .set_default("context.after", defaults.context.after as i64)?
            .set_default("backend.default", defaults.backend.default.clone())?
            .set_default("logging.verbose", defaults.logging.verbose)?;

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }
        builder = builder.add_source(Environment::with_prefix("REVSUB").separator("_"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_domain_constants() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.context.before, revsub_domain::CTX_BEFORE);
        assert_eq!(cfg.context.after, revsub_domain::CTX_AFTER);
        assert_eq!(cfg.backend.default, "ascii");
        assert!(!cfg.logging.verbose);
    }

    #[test]
    fn load_with_no_file_falls_back_to_defaults() {
        let cfg = AppConfig::load(None).unwrap();
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn load_reads_toml_file_overrides() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("revsub.toml");
        std::fs::write(&path, "[context]\nbefore = 16\nafter = 8\n\n[backend]\ndefault = \"dylib\"\n").unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.context.before, 16);
        assert_eq!(cfg.context.after, 8);
        assert_eq!(cfg.backend.default, "dylib");
    }

    #[test]
    fn missing_file_path_is_an_error() {
        let result = AppConfig::load(Some(std::path::Path::new("/no/such/revsub.toml")));
        assert!(result.is_err());
    }
}

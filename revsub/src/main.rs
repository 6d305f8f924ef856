// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # revsub
//!
//! Entry point for the `revsub` CLI. Parses and validates argv via
//! `revsub-bootstrap`, installs the `tracing` subscriber, layers the
//! optional TOML config over built-in defaults, then dispatches to the
//! `encode`/`decode`/`lossless-probe` use cases in [`application`] (spec.md
//! §6.4). All codec logic lives in `revsub-domain`; this crate and
//! `revsub-bootstrap` are the "out of scope" collaborators spec.md §1 names
//! (CLI parsing, file I/O, the concrete flag-stream backend).

mod application;
mod infrastructure;

use std::path::Path;
use std::process::ExitCode as ProcessExitCode;

use revsub_bootstrap::logger::{BootstrapLogger, ConsoleLogger};
use revsub_bootstrap::{parse_cli, ArgValidator, Commands, ExitCode};

use application::{decode_command, encode_command, lossless_probe_command};
use infrastructure::AppConfig;

fn main() -> ProcessExitCode {
    let cli = parse_cli();
    let bootstrap_log = ConsoleLogger::new();

    let app_config = match AppConfig::load(cli.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            bootstrap_log.error(&format!("failed to load application config: {e}"));
            return ProcessExitCode::from(ExitCode::Config.as_i32() as u8);
        }
    };

    let verbose = cli.verbose || app_config.logging.verbose;
    infrastructure::logging::init(verbose);

    match run(cli.command, &app_config) {
        Ok(code) => ProcessExitCode::from(code.as_i32() as u8),
        Err(e) => {
            bootstrap_log.error(&e.to_string());
            ProcessExitCode::from(exit_code_for(&e).as_i32() as u8)
        }
    }
}

/// Maps a failed run's `anyhow::Error` to an [`ExitCode`]. A domain error
/// carries its own `category()` (spec.md §4.11/§7's error taxonomy); prefer
/// that categorized mapping over `ExitCode::from_error`'s `Display`
/// string-matching, which only applies to errors `revsub`/`revsub-bootstrap`
/// raise themselves (CLI parsing, path validation) that have no category.
fn exit_code_for(error: &anyhow::Error) -> ExitCode {
    match error.downcast_ref::<revsub_domain::ReplError>() {
        Some(domain_err) => ExitCode::from_category(domain_err.category()),
        None => ExitCode::from_error(error.root_cause()),
    }
}

fn run(command: Commands, app_config: &AppConfig) -> anyhow::Result<ExitCode> {
    match command {
        Commands::Encode { config, input, output, flags, backend, stats } => {
            let config = validate_config_arg(&config)?;
            let input = ArgValidator::validate_existing_path(&input)?;
            let output = ArgValidator::validate_output_path(&output)?;
            let flags_path = ArgValidator::validate_output_path(&flags)?;
            let backend = resolve_backend(&backend, app_config);

            let result = encode_command(&config, &input, &output, &flags_path, &backend, stats)?;
            if let Some(stage_stats) = result {
                for s in &stage_stats {
                    println!(
                        "stage {}: {} flags emitted, {} retained ({:.1}%)",
                        s.stage_index,
                        s.emitted,
                        s.retained,
                        s.ratio() * 100.0
                    );
                }
            }
            Ok(ExitCode::Success)
        }

        Commands::Decode { config, input, output, flags, backend } => {
            let config = validate_config_arg(&config)?;
            let input = ArgValidator::validate_existing_path(&input)?;
            let output = ArgValidator::validate_output_path(&output)?;
            let flags_path = ArgValidator::validate_existing_path(&flags)?;
            let backend = resolve_backend(&backend, app_config);

            let eof_count = decode_command(&config, &input, &output, &flags_path, &backend)?;
            if eof_count > 0 {
                eprintln!(
                    "warning: flag stream exhausted {eof_count} time(s) during decode; \
                     output is not guaranteed to reconstruct the original"
                );
            }
            Ok(ExitCode::Success)
        }

        Commands::LosslessProbe { config, data, out_lossless, out_lossy } => {
            let config = validate_config_arg(&config)?;
            let data = ArgValidator::validate_existing_path(&data)?;
            let out_lossless = ArgValidator::validate_output_path(&out_lossless)?;
            let out_lossy = ArgValidator::validate_output_path(&out_lossy)?;

            let (lossless_count, lossy_count) =
                lossless_probe_command(&config, &data, &out_lossless, &out_lossy)?;
            println!("{lossless_count} pair(s) lossless, {lossy_count} pair(s) lossy");
            Ok(ExitCode::Success)
        }
    }
}

/// `--config`/`-c` doubles as a config-file path or a `@listfile` reference
/// (spec.md §6.2); only the non-`@` form names a path that must exist.
fn validate_config_arg(arg: &str) -> anyhow::Result<String> {
    ArgValidator::validate_argument(arg)?;
    match revsub_domain::Config::list_file_reference(arg) {
        Some(list_path) => {
            ArgValidator::validate_existing_path(Path::new(list_path))?;
        }
        None => {
            ArgValidator::validate_existing_path(Path::new(arg))?;
        }
    }
    Ok(arg.to_string())
}

fn resolve_backend(cli_backend: &str, app_config: &AppConfig) -> String {
    if cli_backend == "ascii" && app_config.backend.default != "ascii" {
        app_config.backend.default.clone()
    } else {
        cli_backend.to_string()
    }
}

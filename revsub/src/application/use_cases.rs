// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Use Cases
//!
//! The three operations the CLI exposes (spec.md §6.4): `encode`, `decode`,
//! and `lossless-probe`. Each wires `revsub_domain`'s pure codec against the
//! infrastructure layer's flag-stream backends and config loading, and writes
//! its output atomically - to a sibling temp path, renamed into place only
//! once every stage has succeeded (spec.md §7, "no partial outputs").

use std::fs;
use std::path::{Path, PathBuf};

use revsub_domain::{Pipeline, Result};
use tracing::info;

use super::config_loader::load_configs;
use crate::infrastructure::backend::{FlagSinkBackend, FlagSourceBackend};

/// Per-stage flag accounting for `encode --stats` (spec.md §2.2): every
/// ambiguous backward-pattern match emits exactly one flag bit regardless of
/// its outcome, so `emitted` is also the count of ambiguous candidates this
/// stage encountered; `retained` is how many of those were genuine
/// replacements (`bit == true`) rather than natural collisions (`bit ==
/// false`) the decoder must *not* revert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageStats {
    pub stage_index: usize,
    pub emitted: usize,
    pub retained: usize,
}

impl StageStats {
    /// Fraction of this stage's flags that mark a genuine replacement.
    /// `0.0` when the stage emitted no flags at all (nothing was ambiguous).
    pub fn ratio(&self) -> f64 {
        if self.emitted == 0 {
            0.0
        } else {
            self.retained as f64 / self.emitted as f64
        }
    }
}

/// Writes `bytes` to a temp path alongside `target` and renames it into
/// place, so a failure partway through writing never leaves `target` holding
/// a truncated or otherwise partial result.
fn write_atomically(target: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let temp_path = sibling_temp_path(target);
    fs::write(&temp_path, bytes)?;
    fs::rename(&temp_path, target)
}

fn sibling_temp_path(target: &Path) -> PathBuf {
    let file_name = target.file_name().and_then(|n| n.to_str()).unwrap_or("output");
    target.with_file_name(format!(".{file_name}.revsub-tmp"))
}

/// Runs `revsub encode`: compiles the pipeline, encodes `input`, and writes
/// the transformed bytes to `output` and the flag stream to `flags_path`
/// through `backend`. Returns per-stage stats when `with_stats` is set.
pub fn encode_command(
    config_arg: &str,
    input: &Path,
    output: &Path,
    flags_path: &Path,
    backend: &str,
    with_stats: bool,
) -> anyhow::Result<Option<Vec<StageStats>>> {
    let configs = load_configs(config_arg)?;
    let pipeline = Pipeline::compile(&configs)?;
    let original = fs::read(input)?;

    let stats = if with_stats {
        let (transformed, stage_stats) = encode_with_stats(&configs, &original, flags_path, backend)?;
        write_atomically(output, &transformed)?;
        Some(stage_stats)
    } else {
        let mut sink = FlagSinkBackend::open(backend, flags_path)?;
        let transformed = pipeline.encode(&original, &mut sink)?;
        write_atomically(output, &transformed)?;
        None
    };

    info!(stages = pipeline.stage_count(), input = %input.display(), "encode complete");
    Ok(stats)
}

/// Re-walks `Pipeline::encode`'s own algorithm (forward each stage, simulate
/// its flags, emit every stage's flags to the real sink in reverse stage
/// order) one level down, in order to tally each stage's own flag counts
/// along the way for `--stats` (spec.md §2.2) - `Pipeline` itself does not
/// expose per-stage flag buffers, since ordinary encode/decode has no need
/// to look inside them.
fn encode_with_stats(
    configs: &[revsub_domain::Config],
    original: &[u8],
    flags_path: &Path,
    backend: &str,
) -> anyhow::Result<(Vec<u8>, Vec<StageStats>)> {
    use revsub_domain::encode::simulate;
    use revsub_domain::flagstream::{FlagSink, MemoryFlagStream};
    use revsub_domain::stage::CompiledStage;

    let stages: Vec<CompiledStage> =
        configs.iter().map(CompiledStage::compile).collect::<Result<_>>()?;

    let mut current = original.to_vec();
    let mut per_stage_flags = Vec::with_capacity(stages.len());
    for stage in &stages {
        let next = stage.forward(&current)?;
        let mut stage_flags = MemoryFlagStream::new();
        simulate(&current, &next, stage, &mut stage_flags)?;
        per_stage_flags.push(stage_flags);
        current = next;
    }

    let stats = per_stage_flags
        .iter()
        .enumerate()
        .map(|(stage_index, stage_flags)| {
            let emitted = stage_flags.records().len();
            let retained = stage_flags.records().iter().filter(|r| r.bit).count();
            StageStats { stage_index, emitted, retained }
        })
        .collect();

    let mut sink = FlagSinkBackend::open(backend, flags_path)?;
    for stage_flags in per_stage_flags.into_iter().rev() {
        for record in stage_flags.records() {
            sink.write(record)?;
        }
    }
    sink.close()?;

    Ok((current, stats))
}

/// Runs `revsub decode`: replays the pipeline's flag stream against
/// `input`, writing the recovered original to `output`. Returns the count of
/// decisions that defaulted to `0` because the flag stream ran out
/// (spec.md §4.11) - a non-zero count means the output is not guaranteed to
/// match the original that was encoded.
pub fn decode_command(
    config_arg: &str,
    input: &Path,
    output: &Path,
    flags_path: &Path,
    backend: &str,
) -> anyhow::Result<usize> {
    let configs = load_configs(config_arg)?;
    let pipeline = Pipeline::compile(&configs)?;
    let transformed = fs::read(input)?;

    let mut source = FlagSourceBackend::open(backend, flags_path)?;
    let (restored, eof_count) = pipeline.decode(&transformed, &mut source)?;
    write_atomically(output, &restored)?;

    if eof_count > 0 {
        tracing::warn!(eof_count, "flag stream exhausted during decode; output is not guaranteed lossless");
    }
    info!(stages = pipeline.stage_count(), output = %output.display(), "decode complete");

    Ok(eof_count)
}

/// Runs `revsub lossless-probe`: classifies every pair in `config_arg`
/// against `data` and writes the lossless/lossy splits as two multi-config
/// files (spec.md §4.10).
pub fn lossless_probe_command(
    config_arg: &str,
    data: &Path,
    out_lossless: &Path,
    out_lossy: &Path,
) -> anyhow::Result<(usize, usize)> {
    use revsub_domain::Config;

    let configs = load_configs(config_arg)?;
    let corpus = fs::read(data)?;
    let report = revsub_domain::lossless::probe(&configs, &corpus)?;

    let lossless_count: usize = report.lossless.iter().map(|c| c.pairs.len()).sum();
    let lossy_count: usize = report.lossy.iter().map(|c| c.pairs.len()).sum();

    write_atomically(out_lossless, &Config::render_multi(&report.lossless))?;
    write_atomically(out_lossy, &Config::render_multi(&report.lossy))?;

    info!(lossless_count, lossy_count, "lossless probe complete");
    Ok((lossless_count, lossy_count))
}

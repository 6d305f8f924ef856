// /////////////////////////////////////////////////////////////////////////////
// revsub
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Config Loading
//!
//! The one piece of I/O `revsub_domain::config` explicitly defers to the
//! infrastructure layer (spec.md §4.2/§6.2): reading a config file, or
//! expanding a `@listfile` into the multi-config files it names, each parsed
//! and concatenated in listing order.

use std::fs;
use std::path::Path;

use revsub_domain::{Config, Result};

/// Loads the configs named by `arg`: either a single config file path, or
/// `@listfile` naming one config-file path per line.
pub fn load_configs(arg: &str) -> Result<Vec<Config>> {
    match Config::list_file_reference(arg) {
        Some(list_path) => load_list_file(Path::new(list_path)),
        None => load_config_file(Path::new(arg)),
    }
}

fn load_config_file(path: &Path) -> Result<Vec<Config>> {
    let data = fs::read(path)?;
    Config::parse_multi(&data, &path.display().to_string())
}

fn load_list_file(path: &Path) -> Result<Vec<Config>> {
    let text = fs::read_to_string(path)?;
    let mut configs = Vec::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        configs.extend(load_config_file(Path::new(trimmed))?);
    }
    Ok(configs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_a_plain_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.txt");
        fs::write(&path, "\n\nfoo\tbar\n").unwrap();

        let configs = load_configs(path.to_str().unwrap()).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0].pairs[0].from, b"foo");
    }

    #[test]
    fn expands_a_list_file_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.cfg");
        let b = dir.path().join("b.cfg");
        fs::write(&a, "\n\nfoo\tbar\n").unwrap();
        fs::write(&b, "\n\nbar\tbaz\n").unwrap();

        let list = dir.path().join("configs.lst");
        fs::write(&list, format!("{}\n\n{}\n", a.display(), b.display())).unwrap();

        let configs = load_configs(&format!("@{}", list.display())).unwrap();
        assert_eq!(configs.len(), 2);
        assert_eq!(configs[0].pairs[0].from, b"foo");
        assert_eq!(configs[1].pairs[0].from, b"bar");
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let result = load_configs("/no/such/config.txt");
        assert!(result.is_err());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Loader configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::paths;

/// Config file looked up in the working directory
pub const CONFIG_FILE: &str = "modload.toml";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "MODLOAD_CONFIG";

/// Environment variable overriding `basepath`
pub const BASEPATH_ENV: &str = "MODLOAD_BASEPATH";

/// Environment variable overriding `cwd`
pub const CWD_ENV: &str = "MODLOAD_CWD";

/// Extensions probed when resolving package entry points
pub const DEFAULT_EXTENSIONS: &[&str] = &[".js", ".mjs", ".cjs", ".json", ".node"];

/// Configuration for resolution and loading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Default boundary for module type lookup
    pub basepath: Option<PathBuf>,

    /// Directory relative specifiers resolve against
    pub cwd: Option<PathBuf>,

    /// Extensions probed by the node_modules resolver
    pub extensions: Vec<String>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            basepath: None,
            cwd: None,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl LoaderConfig {
    /// Load configuration from default locations.
    ///
    /// `explicit` wins over `MODLOAD_CONFIG`, which wins over `modload.toml`
    /// in the working directory. Environment overrides apply last.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match config_path(explicit) {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_vars(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply `MODLOAD_BASEPATH` / `MODLOAD_CWD` through `lookup`.
    pub fn apply_vars(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(basepath) = lookup(BASEPATH_ENV).filter(|v| !v.is_empty()) {
            self.basepath = Some(PathBuf::from(basepath));
        }
        if let Some(cwd) = lookup(CWD_ENV).filter(|v| !v.is_empty()) {
            self.cwd = Some(PathBuf::from(cwd));
        }
    }

    /// Directory relative specifiers resolve against.
    ///
    /// A relative `cwd` is taken relative to the process working directory.
    pub fn working_dir(&self) -> Result<PathBuf> {
        let process_cwd = std::env::current_dir()?;
        Ok(match &self.cwd {
            Some(cwd) => paths::resolve(&process_cwd, cwd),
            None => process_cwd,
        })
    }
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    if let Some(path) = std::env::var_os(CONFIG_ENV).filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(path));
    }
    let local = PathBuf::from(CONFIG_FILE);
    local.is_file().then_some(local)
}

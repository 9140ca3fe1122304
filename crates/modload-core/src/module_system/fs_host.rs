// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Filesystem host: "loading" a module reads its source text

use super::host::{HostError, ModuleHost, NameResolve};
use super::load_error::{ERR_MODULE_NOT_FOUND, MODULE_NOT_FOUND};
use super::name_resolver::NodeModulesResolver;
use crate::config::LoaderConfig;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use url::Url;

/// Source text of a loaded module
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleSource {
    /// File the source was read from
    pub path: PathBuf,
    /// Whether it was read through `import()`
    pub is_esm: bool,
    /// The source text
    pub source: String,
}

/// Host that resolves packages through node_modules and reads module sources
#[derive(Debug, Clone)]
pub struct FsHost {
    names: NodeModulesResolver,
}

impl FsHost {
    /// Create a host using `names` for bare specifiers
    pub fn new(names: NodeModulesResolver) -> Self {
        Self { names }
    }

    /// Create a host from configuration
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        Ok(Self::new(NodeModulesResolver::from_config(config)?))
    }
}

impl NameResolve for FsHost {
    fn resolve_name(&self, specifier: &str) -> std::result::Result<PathBuf, HostError> {
        self.names.resolve(specifier)
    }
}

#[async_trait]
impl ModuleHost for FsHost {
    type Module = ModuleSource;

    fn require(&self, path: &Path) -> std::result::Result<ModuleSource, HostError> {
        match std::fs::read_to_string(path) {
            Ok(source) => Ok(ModuleSource {
                path: path.to_path_buf(),
                is_esm: false,
                source,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(HostError::with_code_error(
                MODULE_NOT_FOUND,
                format!("Cannot find module '{}'", path.display()),
            )),
            Err(err) => Err(HostError::from_io(err)),
        }
    }

    async fn import(&self, url: &Url) -> std::result::Result<ModuleSource, HostError> {
        let path = url.to_file_path().map_err(|()| {
            HostError::with_code_error(
                "ERR_UNSUPPORTED_ESM_URL_SCHEME",
                format!(
                    "Only URLs with a scheme in: file are supported by the default ESM loader. Received protocol '{}:'",
                    url.scheme()
                ),
            )
        })?;

        match tokio::fs::read_to_string(&path).await {
            Ok(source) => Ok(ModuleSource {
                path,
                is_esm: true,
                source,
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => Err(HostError::with_code_error(
                ERR_MODULE_NOT_FOUND,
                format!("Cannot find module '{}'", path.display()),
            )),
            Err(err) => Err(HostError::from_io(err)),
        }
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module loader - resolves, classifies and dispatches loads

use super::host::ModuleHost;
use super::load_error;
use super::resolver::{LoadKind, LoadMechanism, ModulePathResolver, ResolvedModule};
use super::specifier::ModuleSpecifier;
use crate::config::LoaderConfig;
use crate::error::{LoaderError, Result};
use std::path::{Path, PathBuf};

/// A loaded module together with how it was found and loaded
#[derive(Debug, Clone)]
pub struct LoadedModule<M, E> {
    /// Local file, absent for remote URLs
    pub file_path: Option<PathBuf>,
    /// Specifier text, URL string or resolved path
    pub load_path: String,
    /// The specifier passed to the loader
    pub specifier: ModuleSpecifier,
    /// The module as returned by the host
    pub module: M,
    /// The module, or the part of it the selector picked
    pub instance: E,
    /// Whether the module was loaded as ESM
    pub is_esm: bool,
    /// Mechanism and resolution source
    pub load_kind: LoadKind,
}

/// Loads ES modules through `import()` and CommonJS through `require`
pub struct ModuleLoader<H> {
    /// Host load primitives
    host: H,
    /// Working directory and default basepath
    config: LoaderConfig,
}

impl<H: ModuleHost> ModuleLoader<H> {
    /// Create a loader with default configuration
    pub fn new(host: H) -> Self {
        Self::with_config(host, LoaderConfig::default())
    }

    /// Create a loader with explicit configuration
    pub fn with_config(host: H, config: LoaderConfig) -> Self {
        Self { host, config }
    }

    /// The host
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The configuration
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Resolve a specifier without loading it.
    ///
    /// `basepath` falls back to the configured one.
    pub fn resolve(
        &self,
        specifier: &ModuleSpecifier,
        basepath: Option<&Path>,
    ) -> Result<ResolvedModule> {
        let cwd = self.config.working_dir()?;
        let basepath = basepath.or(self.config.basepath.as_deref());
        ModulePathResolver::new(&self.host, cwd).resolve(specifier, basepath)
    }

    /// Load a module; `instance` is a clone of `module`.
    pub async fn load(
        &self,
        specifier: impl Into<ModuleSpecifier>,
        basepath: Option<&Path>,
    ) -> Result<LoadedModule<H::Module, H::Module>>
    where
        H::Module: Clone,
    {
        self.load_with(specifier, basepath, <H::Module as Clone>::clone)
            .await
    }

    /// Load a module and project `instance` out of it with `selector`.
    ///
    /// A missing module under either mechanism fails with
    /// [`LoaderError::ModuleLoad`]. Any other host failure is returned as
    /// [`LoaderError::Host`] unchanged.
    pub async fn load_with<E, F>(
        &self,
        specifier: impl Into<ModuleSpecifier>,
        basepath: Option<&Path>,
        selector: F,
    ) -> Result<LoadedModule<H::Module, E>>
    where
        F: FnOnce(&H::Module) -> E,
    {
        let specifier = specifier.into();
        specifier.validate()?;
        if basepath.is_some_and(|base| base.to_str().is_none()) {
            return Err(LoaderError::invalid_argument("'basepath' is not a string"));
        }

        let resolved = self.resolve(&specifier, basepath)?;
        let mechanism = resolved.load_kind.mechanism;

        let loaded = match (mechanism, resolved.file_path.as_deref()) {
            (LoadMechanism::Require, Some(path)) => self.host.require(path),
            _ => {
                let url = resolved.import_url()?;
                self.host.import(&url).await
            }
        };
        let module =
            loaded.map_err(|err| load_error::normalize(err, mechanism, &resolved.load_path))?;

        let instance = selector(&module);

        Ok(LoadedModule {
            file_path: resolved.file_path,
            load_path: resolved.load_path,
            specifier,
            module,
            instance,
            is_esm: resolved.is_esm,
            load_kind: resolved.load_kind,
        })
    }
}

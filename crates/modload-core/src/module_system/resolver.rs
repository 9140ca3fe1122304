// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module path resolution
//!
//! Name resolution through the host is tried first, since it is the only way
//! to find installed packages. Specifiers it rejects are read as a URL or as
//! a path relative to the working directory.

use super::host::NameResolve;
use super::specifier::ModuleSpecifier;
use crate::error::{LoaderError, Result};
use crate::package_json::{classify_type, Location};
use crate::paths;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// How a module is loaded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadMechanism {
    /// Dynamic `import()`
    Import,
    /// Synchronous `require`
    Require,
}

impl LoadMechanism {
    /// Name used in error messages
    pub fn call_name(&self) -> &'static str {
        match self {
            LoadMechanism::Import => "import()",
            LoadMechanism::Require => "require",
        }
    }
}

/// How the specifier was turned into a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResolutionSource {
    /// Host name resolution
    Module,
    /// Direct filesystem path
    Path,
    /// URL
    Url,
}

/// Combined mechanism and source, e.g. `import-url`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LoadKind {
    /// How the module is loaded
    pub mechanism: LoadMechanism,
    /// How it was resolved
    pub source: ResolutionSource,
}

impl LoadKind {
    /// Build the kind for a classified module
    pub fn new(is_esm: bool, source: ResolutionSource) -> Self {
        let mechanism = if is_esm {
            LoadMechanism::Import
        } else {
            LoadMechanism::Require
        };
        Self { mechanism, source }
    }

    /// Tag form of this kind
    pub fn as_str(&self) -> &'static str {
        match (self.mechanism, self.source) {
            (LoadMechanism::Import, ResolutionSource::Module) => "import-module",
            (LoadMechanism::Import, ResolutionSource::Path) => "import-path",
            (LoadMechanism::Import, ResolutionSource::Url) => "import-url",
            (LoadMechanism::Require, ResolutionSource::Module) => "require-module",
            (LoadMechanism::Require, ResolutionSource::Path) => "require-path",
            (LoadMechanism::Require, ResolutionSource::Url) => "require-url",
        }
    }
}

impl fmt::Display for LoadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for LoadKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Where a specifier resolved to and how to load it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedModule {
    /// Local file, absent for remote URLs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<PathBuf>,
    /// Specifier text, URL string or resolved path; used in messages
    pub load_path: String,
    /// Whether the module loads as ESM
    #[serde(rename = "isESM")]
    pub is_esm: bool,
    /// Mechanism and resolution source
    pub load_kind: LoadKind,
}

impl ResolvedModule {
    /// URL handed to `import()`
    pub fn import_url(&self) -> Result<Url> {
        match &self.file_path {
            Some(path) => Url::from_file_path(path).map_err(|()| {
                LoaderError::invalid_argument(format!(
                    "cannot convert '{}' to a file URL",
                    path.display()
                ))
            }),
            None => Url::parse(&self.load_path).map_err(|err| {
                LoaderError::invalid_argument(format!("'modulepath' is not a valid URL: {err}"))
            }),
        }
    }
}

/// Resolves specifiers to files and classifies them
pub struct ModulePathResolver<'a> {
    names: &'a dyn NameResolve,
    cwd: PathBuf,
}

impl<'a> ModulePathResolver<'a> {
    /// Create a resolver; relative paths resolve against `cwd`
    pub fn new(names: &'a dyn NameResolve, cwd: impl Into<PathBuf>) -> Self {
        Self {
            names,
            cwd: cwd.into(),
        }
    }

    /// Resolve a specifier. `basepath` bounds the module type lookup.
    pub fn resolve(
        &self,
        specifier: &ModuleSpecifier,
        basepath: Option<&Path>,
    ) -> Result<ResolvedModule> {
        let is_url = specifier.is_url();

        let (file_path, load_path, source) = match self.resolve_name(specifier) {
            Some(path) => {
                let source = if is_url {
                    ResolutionSource::Url
                } else {
                    ResolutionSource::Module
                };
                (Some(path), specifier.to_string(), source)
            }
            None if is_url => {
                let url = specifier.to_url()?;
                let file_path = if url.scheme() == "file" {
                    Some(url.to_file_path().map_err(|()| {
                        LoaderError::invalid_argument(format!(
                            "'modulepath' is not a local file URL: {url}"
                        ))
                    })?)
                } else {
                    None
                };
                (file_path, url.to_string(), ResolutionSource::Url)
            }
            None => {
                let path = paths::resolve(&self.cwd, Path::new(specifier.as_str()));
                let load_path = path.display().to_string();
                (Some(path), load_path, ResolutionSource::Path)
            }
        };

        // Remote URLs have no package.json to consult and load as ESM.
        let is_esm = match &file_path {
            Some(path) => is_path_module(path, basepath),
            None => true,
        };

        let resolved = ResolvedModule {
            file_path,
            load_path,
            is_esm,
            load_kind: LoadKind::new(is_esm, source),
        };
        tracing::debug!(
            %specifier,
            load_kind = %resolved.load_kind,
            load_path = %resolved.load_path,
            "resolved module"
        );
        Ok(resolved)
    }

    fn resolve_name(&self, specifier: &ModuleSpecifier) -> Option<PathBuf> {
        match self.names.resolve_name(specifier.as_str()) {
            Ok(path) if path.is_file() => Some(path),
            Ok(path) => {
                tracing::debug!(path = %path.display(), "name resolution returned a non-file");
                None
            }
            Err(err) => {
                tracing::trace!(%specifier, error = %err, "name resolution failed");
                None
            }
        }
    }
}

/// Whether `path` loads as ESM: `.mjs` always, `.js` per package.json type.
pub fn is_path_module(path: &Path, basepath: Option<&Path>) -> bool {
    match paths::extension(path).as_deref() {
        Some("mjs") => true,
        Some("js") => classify_type(path, basepath.map(Location::from)).is_module(),
        _ => false,
    }
}

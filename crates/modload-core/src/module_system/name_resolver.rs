// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Bare specifier resolution through node_modules

use super::host::{HostError, NameResolve};
use super::load_error::ERR_MODULE_NOT_FOUND;
use crate::config::{LoaderConfig, DEFAULT_EXTENSIONS};
use crate::error::Result;
use crate::package_json::{PackageDescriptor, DESCRIPTOR_FILE};
use std::path::{Path, PathBuf};

/// Resolves package names by walking `node_modules` directories upward.
///
/// Only bare specifiers are handled. Relative, absolute and URL specifiers
/// are reported as not found so callers fall back to direct interpretation.
#[derive(Debug, Clone)]
pub struct NodeModulesResolver {
    /// Directory the node_modules walk starts from
    base_dir: PathBuf,
    /// File extensions to try
    extensions: Vec<String>,
}

impl NodeModulesResolver {
    /// Create a resolver rooted at `base_dir`
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        }
    }

    /// Create a resolver from the configured working directory and extensions
    pub fn from_config(config: &LoaderConfig) -> Result<Self> {
        Ok(Self::new(config.working_dir()?).with_extensions(config.extensions.clone()))
    }

    /// Replace the probed extensions
    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    /// Directory the walk starts from
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Check if a specifier names a package rather than a path or URL
    pub fn is_bare(specifier: &str) -> bool {
        !(specifier.is_empty()
            || specifier.starts_with("./")
            || specifier.starts_with("../")
            || specifier == "."
            || specifier == ".."
            || specifier.starts_with('/')
            || specifier.starts_with('\\')
            || specifier.contains("://")
            || (cfg!(windows) && specifier.chars().nth(1) == Some(':')))
    }

    /// Resolve a bare specifier
    pub fn resolve(&self, specifier: &str) -> std::result::Result<PathBuf, HostError> {
        if !Self::is_bare(specifier) {
            return Err(not_found(specifier));
        }

        let (package_name, subpath) = parse_package_specifier(specifier);

        // Walk up directory tree looking for node_modules
        let mut current = Some(self.base_dir.as_path());
        while let Some(dir) = current {
            let package_dir = dir.join("node_modules").join(package_name);

            if package_dir.is_dir() {
                let found = match subpath {
                    Some(sub) => self.resolve_path(&package_dir.join(sub)),
                    None => self.resolve_directory(&package_dir),
                };
                if let Some(path) = found {
                    tracing::trace!(specifier, path = %path.display(), "resolved package");
                    return Ok(canonical(&path));
                }
            }

            current = dir.parent();
        }

        Err(not_found(specifier))
    }

    /// Resolve a file, a file with an extension appended, or a directory
    fn resolve_path(&self, path: &Path) -> Option<PathBuf> {
        if path.is_file() {
            return Some(path.to_path_buf());
        }

        if let Some(with_ext) = self.probe_extensions(path) {
            return Some(with_ext);
        }

        if path.is_dir() {
            return self.resolve_directory(path);
        }

        None
    }

    /// Resolve a directory through package.json "main" or an index file
    fn resolve_directory(&self, dir: &Path) -> Option<PathBuf> {
        let descriptor_path = dir.join(DESCRIPTOR_FILE);
        if descriptor_path.is_file() {
            if let Ok(Some(pkg)) = PackageDescriptor::read(&descriptor_path) {
                if let Some(main) = pkg.main() {
                    let main_path = dir.join(main);
                    if main_path.is_file() {
                        return Some(main_path);
                    }
                    if let Some(with_ext) = self.probe_extensions(&main_path) {
                        return Some(with_ext);
                    }
                    if main_path.is_dir() {
                        if let Some(index) = self.probe_index(&main_path) {
                            return Some(index);
                        }
                    }
                }
            }
        }

        self.probe_index(dir)
    }

    fn probe_extensions(&self, path: &Path) -> Option<PathBuf> {
        let file_name = path.file_name()?.to_string_lossy().into_owned();
        self.extensions
            .iter()
            .map(|ext| path.with_file_name(format!("{file_name}{ext}")))
            .find(|candidate| candidate.is_file())
    }

    fn probe_index(&self, dir: &Path) -> Option<PathBuf> {
        self.extensions
            .iter()
            .map(|ext| dir.join(format!("index{ext}")))
            .find(|candidate| candidate.is_file())
    }
}

impl NameResolve for NodeModulesResolver {
    fn resolve_name(&self, specifier: &str) -> std::result::Result<PathBuf, HostError> {
        self.resolve(specifier)
    }
}

/// Split a package specifier into name and optional subpath
fn parse_package_specifier(specifier: &str) -> (&str, Option<&str>) {
    if let Some(scoped) = specifier.strip_prefix('@') {
        // Scoped package: @scope/name or @scope/name/subpath
        if let Some(slash_pos) = scoped.find('/') {
            let after_scope = &specifier[slash_pos + 2..];
            if let Some(subpath_pos) = after_scope.find('/') {
                let name_end = slash_pos + 2 + subpath_pos;
                return (&specifier[..name_end], Some(&specifier[name_end + 1..]));
            }
        }
        (specifier, None)
    } else if let Some(slash_pos) = specifier.find('/') {
        (&specifier[..slash_pos], Some(&specifier[slash_pos + 1..]))
    } else {
        (specifier, None)
    }
}

fn canonical(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| path.to_path_buf())
}

fn not_found(specifier: &str) -> HostError {
    HostError::with_code_error(
        ERR_MODULE_NOT_FOUND,
        format!("Cannot find package '{specifier}'"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn write(path: &Path, content: &str) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    #[test]
    fn test_parse_package_specifier() {
        assert_eq!(parse_package_specifier("lodash"), ("lodash", None));
        assert_eq!(parse_package_specifier("lodash/get"), ("lodash", Some("get")));
        assert_eq!(parse_package_specifier("@types/node"), ("@types/node", None));
        assert_eq!(
            parse_package_specifier("@babel/core/lib/index"),
            ("@babel/core", Some("lib/index"))
        );
    }

    #[test]
    fn test_is_bare() {
        assert!(NodeModulesResolver::is_bare("lodash"));
        assert!(NodeModulesResolver::is_bare("@scope/pkg"));
        assert!(!NodeModulesResolver::is_bare("./a.js"));
        assert!(!NodeModulesResolver::is_bare("../a.js"));
        assert!(!NodeModulesResolver::is_bare("/abs/a.js"));
        assert!(!NodeModulesResolver::is_bare("file:///abs/a.js"));
        assert!(!NodeModulesResolver::is_bare(""));
    }

    #[test]
    fn test_resolves_main_field() {
        let root = tempdir().unwrap();
        let pkg = root.path().join("node_modules/esm-pkg");
        write(&pkg.join(DESCRIPTOR_FILE), r#"{"main": "lib/entry"}"#);
        write(&pkg.join("lib/entry.mjs"), "export default 1;");

        let resolver = NodeModulesResolver::new(root.path().join("src"));
        let resolved = resolver.resolve("esm-pkg").unwrap();
        assert_eq!(resolved, canonical(&pkg.join("lib/entry.mjs")));
    }

    #[test]
    fn test_resolves_index_and_subpath() {
        let root = tempdir().unwrap();
        let pkg = root.path().join("node_modules/@scope/util");
        write(&pkg.join("index.js"), "module.exports = {};");
        write(&pkg.join("fp/map.js"), "module.exports = {};");

        let resolver = NodeModulesResolver::new(root.path());
        assert_eq!(
            resolver.resolve("@scope/util").unwrap(),
            canonical(&pkg.join("index.js"))
        );
        assert_eq!(
            resolver.resolve("@scope/util/fp/map").unwrap(),
            canonical(&pkg.join("fp/map.js"))
        );
    }

    #[test]
    fn test_missing_package() {
        let root = tempdir().unwrap();
        let err = NodeModulesResolver::new(root.path())
            .resolve("nonexistent-package")
            .unwrap_err();
        assert_eq!(err.code(), Some(ERR_MODULE_NOT_FOUND));
    }

    #[test]
    fn test_relative_specifier_is_not_resolved() {
        let root = tempdir().unwrap();
        write(&root.path().join("a.js"), "");
        assert!(NodeModulesResolver::new(root.path()).resolve("./a.js").is_err());
    }
}

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Upward package.json walk

use super::{Location, PackageDescriptor, DESCRIPTOR_FILE};
use crate::error::{LoaderError, Result};
use crate::paths;
use std::path::{Path, PathBuf};

/// State of a single package.json walk.
///
/// Created fresh for every lookup and handed to the predicate at each
/// descriptor, so callers can inspect where the walk is.
#[derive(Debug, Clone)]
pub struct TraversalState {
    start_directory: PathBuf,
    base_directory: PathBuf,
    root_path: PathBuf,
    current_directory: PathBuf,
    descriptor: Option<PackageDescriptor>,
    visit_count: usize,
    explicit_base: bool,
}

impl TraversalState {
    /// Set up a walk from `filepath`, bounded by `basepath`.
    ///
    /// Relative inputs resolve against the process working directory. Anything
    /// other than an existing directory starts the walk at its parent, which
    /// must exist; the file itself need not.
    pub fn new(filepath: impl Into<Location>, basepath: Option<Location>) -> Result<Self> {
        let cwd = std::env::current_dir()?;

        let file = paths::resolve(&cwd, &filepath.into().to_local_path("filepath")?);
        let start_directory = existing_directory(&file)
            .ok_or_else(|| LoaderError::invalid_argument("'filepath' does not exist"))?;
        let root_path = paths::root_of(&start_directory);

        let (base_directory, explicit_base) = match basepath {
            Some(base) => {
                let base = paths::resolve(&cwd, &base.to_local_path("basepath")?);
                let base = existing_directory(&base)
                    .ok_or_else(|| LoaderError::invalid_argument("'basepath' does not exist"))?;
                (base, true)
            }
            None => (root_path.clone(), false),
        };

        Ok(Self {
            current_directory: start_directory.clone(),
            start_directory,
            base_directory,
            root_path,
            descriptor: None,
            visit_count: 0,
            explicit_base,
        })
    }

    /// Directory the walk begins from
    pub fn start_directory(&self) -> &Path {
        &self.start_directory
    }

    /// Stopping boundary; the filesystem root unless a basepath was given
    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Filesystem root of the start directory
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// Directory currently being inspected
    pub fn current_directory(&self) -> &Path {
        &self.current_directory
    }

    /// Most recently parsed descriptor
    pub fn descriptor(&self) -> Option<&PackageDescriptor> {
        self.descriptor.as_ref()
    }

    /// Number of descriptors the predicate has declined so far
    pub fn visit_count(&self) -> usize {
        self.visit_count
    }

    /// True when a caller-supplied basepath is a strict ancestor of the start
    /// directory, i.e. there is a real boundary to walk up to.
    pub fn is_base_parent(&self) -> bool {
        if !self.explicit_base {
            return false;
        }

        match pathdiff::diff_paths(&self.start_directory, &self.base_directory) {
            Some(rel) => {
                !rel.as_os_str().is_empty() && !rel.starts_with("..") && !rel.is_absolute()
            }
            None => false,
        }
    }

    /// Directories the walk will visit, nearest first
    pub fn ancestors(&self) -> Ancestors {
        Ancestors {
            next: Some(self.start_directory.clone()),
            base: self.base_directory.clone(),
        }
    }

    /// Run the walk.
    ///
    /// Without a predicate the first object descriptor is returned. With one,
    /// descriptors are skipped until it returns true.
    pub fn walk(
        &mut self,
        predicate: Option<&dyn Fn(&TraversalState) -> bool>,
    ) -> Result<PackageDescriptor> {
        for dir in self.ancestors() {
            tracing::trace!(dir = %dir.display(), "inspecting directory");

            let candidate = dir.join(DESCRIPTOR_FILE);
            self.current_directory = dir;

            if !candidate.is_file() {
                continue;
            }

            let Some(descriptor) = PackageDescriptor::read(&candidate)? else {
                tracing::debug!(path = %candidate.display(), "skipping non-object package.json");
                continue;
            };

            self.descriptor = Some(descriptor.clone());

            let accepted = match predicate {
                Some(accept) => accept(self),
                None => true,
            };
            if accepted {
                return Ok(descriptor);
            }
            self.visit_count += 1;
        }

        Err(LoaderError::DescriptorNotFound {
            start: self.start_directory.clone(),
        })
    }
}

/// Ancestor directories from a start directory up to a boundary.
///
/// The boundary itself is yielded. Without a reachable boundary the
/// iterator ends after the filesystem root.
#[derive(Debug, Clone)]
pub struct Ancestors {
    next: Option<PathBuf>,
    base: PathBuf,
}

impl Iterator for Ancestors {
    type Item = PathBuf;

    fn next(&mut self) -> Option<PathBuf> {
        let current = self.next.take()?;
        if current != self.base {
            self.next = current.parent().map(Path::to_path_buf);
        }
        Some(current)
    }
}

/// Locate the nearest package.json above `filepath`.
///
/// Fails with `DescriptorNotFound` when the walk ends without a match and
/// with `DescriptorParse` on the first malformed descriptor.
pub fn locate_descriptor(
    filepath: impl Into<Location>,
    basepath: Option<Location>,
    predicate: Option<&dyn Fn(&TraversalState) -> bool>,
) -> Result<PackageDescriptor> {
    let mut state = TraversalState::new(filepath, basepath)?;
    state.walk(predicate)
}

fn existing_directory(path: &Path) -> Option<PathBuf> {
    if path.is_dir() {
        return Some(path.to_path_buf());
    }
    path.parent()
        .filter(|parent| parent.is_dir())
        .map(Path::to_path_buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::fs;
    use tempfile::tempdir;

    fn write_pkg(dir: &Path, content: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(DESCRIPTOR_FILE), content).unwrap();
    }

    #[test]
    fn test_finds_nearest_descriptor() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "outer"}"#);
        write_pkg(&root.path().join("inner"), r#"{"name": "inner"}"#);
        let file = root.path().join("inner/src/index.js");
        fs::create_dir_all(file.parent().unwrap()).unwrap();
        fs::write(&file, "").unwrap();

        let desc = locate_descriptor(file.as_path(), None, None).unwrap();
        assert_eq!(desc.name(), Some("inner"));
        assert_eq!(desc.path, root.path().join("inner").join(DESCRIPTOR_FILE));
    }

    #[test]
    fn test_directory_input_starts_at_itself() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "here"}"#);

        let state = TraversalState::new(root.path(), None).unwrap();
        assert_eq!(state.start_directory(), root.path());
        assert_eq!(state.current_directory(), root.path());
    }

    #[test]
    fn test_boundary_directory_is_inspected_and_stops_walk() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "above-boundary"}"#);
        let start = root.path().join("a");
        fs::create_dir_all(&start).unwrap();

        let mut state = TraversalState::new(start.as_path(), Some(start.as_path().into())).unwrap();
        let visited: Vec<_> = state.ancestors().collect();
        assert_eq!(visited, vec![start.clone()]);

        let err = state.walk(None).unwrap_err();
        assert!(matches!(err, LoaderError::DescriptorNotFound { .. }));

        write_pkg(&start, r#"{"name": "boundary"}"#);
        let desc = locate_descriptor(start.as_path(), Some(start.as_path().into()), None).unwrap();
        assert_eq!(desc.name(), Some("boundary"));
    }

    #[test]
    fn test_ancestors_end_at_root_without_boundary() {
        let root = tempdir().unwrap();
        let state = TraversalState::new(root.path(), None).unwrap();
        let visited: Vec<_> = state.ancestors().collect();

        assert_eq!(visited.first().map(PathBuf::as_path), Some(root.path()));
        assert_eq!(visited.last(), Some(&paths::root_of(root.path())));
    }

    #[test]
    fn test_predicate_skips_descriptors() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "outer", "type": "module"}"#);
        let inner = root.path().join("inner");
        write_pkg(&inner, r#"{"name": "inner"}"#);

        let seen = RefCell::new(Vec::new());
        let predicate = |state: &TraversalState| {
            let desc = state.descriptor().unwrap();
            seen.borrow_mut().push(desc.name().unwrap().to_string());
            desc.package_type().is_some()
        };

        let mut state = TraversalState::new(inner.as_path(), Some(root.path().into())).unwrap();
        let desc = state.walk(Some(&predicate)).unwrap();

        assert_eq!(desc.name(), Some("outer"));
        assert_eq!(state.visit_count(), 1);
        assert_eq!(state.current_directory(), root.path());
        assert_eq!(*seen.borrow(), vec!["inner", "outer"]);
    }

    #[test]
    fn test_predicate_never_satisfied_is_not_found() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "outer"}"#);
        let inner = root.path().join("inner");
        write_pkg(&inner, r#"{"name": "inner"}"#);

        let reject = |_: &TraversalState| false;
        let err = locate_descriptor(inner.as_path(), Some(root.path().into()), Some(&reject))
            .unwrap_err();
        assert!(matches!(err, LoaderError::DescriptorNotFound { .. }));
    }

    #[test]
    fn test_malformed_descriptor_aborts_walk() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "outer"}"#);
        let inner = root.path().join("inner");
        write_pkg(&inner, "{ broken");

        let err = locate_descriptor(inner.as_path(), None, None).unwrap_err();
        match err {
            LoaderError::DescriptorParse { path, .. } => {
                assert_eq!(path, inner.join(DESCRIPTOR_FILE))
            }
            other => panic!("expected parse failure, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_descriptor_is_skipped() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "outer"}"#);
        let inner = root.path().join("inner");
        write_pkg(&inner, "\"just a string\"");

        let desc = locate_descriptor(inner.as_path(), Some(root.path().into()), None).unwrap();
        assert_eq!(desc.name(), Some("outer"));
    }

    #[test]
    fn test_missing_file_starts_at_parent() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "parent", "type": "module"}"#);

        let state = TraversalState::new(root.path().join("not-yet.js").as_path(), None).unwrap();
        assert_eq!(state.start_directory(), root.path());

        let desc = locate_descriptor(root.path().join("not-yet.js").as_path(), None, None).unwrap();
        assert_eq!(desc.name(), Some("parent"));
    }

    #[test]
    fn test_missing_parent_is_invalid_argument() {
        let root = tempdir().unwrap();
        let err = TraversalState::new(root.path().join("nope/a.js").as_path(), None).unwrap_err();
        assert!(matches!(err, LoaderError::InvalidArgument(_)));
    }

    #[test]
    fn test_basepath_follows_parent_rule() {
        let root = tempdir().unwrap();
        let child = root.path().join("child");
        fs::create_dir_all(&child).unwrap();

        let state =
            TraversalState::new(child.as_path(), Some(root.path().join("missing.json").as_path().into()))
                .unwrap();
        assert_eq!(state.base_directory(), root.path());

        let err = TraversalState::new(
            child.as_path(),
            Some(root.path().join("nope/missing.json").as_path().into()),
        )
        .unwrap_err();
        assert!(matches!(err, LoaderError::InvalidArgument(_)));
    }

    #[test]
    fn test_visit_count_tracks_declined_descriptors() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "outer"}"#);

        let mut state = TraversalState::new(root.path(), None).unwrap();
        state.walk(None).unwrap();
        assert_eq!(state.visit_count(), 0);

        let reject = |_: &TraversalState| false;
        let mut state = TraversalState::new(root.path(), Some(root.path().into())).unwrap();
        state.walk(Some(&reject)).unwrap_err();
        assert_eq!(state.visit_count(), 1);
    }

    #[test]
    fn test_explicit_root_basepath_is_a_parent() {
        let root = tempdir().unwrap();
        let fs_root = paths::root_of(root.path());

        let explicit = TraversalState::new(root.path(), Some(fs_root.as_path().into())).unwrap();
        assert!(explicit.is_base_parent());

        let defaulted = TraversalState::new(root.path(), None).unwrap();
        assert!(!defaulted.is_base_parent());
    }

    #[test]
    fn test_file_url_input() {
        let root = tempdir().unwrap();
        write_pkg(root.path(), r#"{"name": "from-url"}"#);
        let file = root.path().join("index.js");
        fs::write(&file, "").unwrap();

        let url = url::Url::from_file_path(&file).unwrap();
        let desc = locate_descriptor(url, None, None).unwrap();
        assert_eq!(desc.name(), Some("from-url"));
    }

    #[test]
    fn test_is_base_parent() {
        let root = tempdir().unwrap();
        let child = root.path().join("child");
        fs::create_dir_all(&child).unwrap();

        let ancestor = TraversalState::new(child.as_path(), Some(root.path().into())).unwrap();
        assert!(ancestor.is_base_parent());

        let same = TraversalState::new(child.as_path(), Some(child.as_path().into())).unwrap();
        assert!(!same.is_base_parent());

        let below = TraversalState::new(root.path(), Some(child.as_path().into())).unwrap();
        assert!(!below.is_base_parent());

        let defaulted = TraversalState::new(child.as_path(), None).unwrap();
        assert!(!defaulted.is_base_parent());
        assert_eq!(defaulted.base_directory(), defaulted.root_path());
    }
}

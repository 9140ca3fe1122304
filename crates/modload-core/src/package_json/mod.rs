// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! package.json lookup and module type detection
//!
//! ## Lookup
//! - Upward walk from a file or directory to the nearest `package.json`
//! - Optional stopping boundary (`basepath`)
//! - Optional predicate to skip descriptors and keep walking
//!
//! ## Type detection
//! - `"type": "module"` marks `.js` files as ESM
//! - Anything else, or any failure, means CommonJS

mod classify;
mod traversal;

pub use classify::{classify_type, classify_type_with, has_declared_type, PackageType};
pub use traversal::{locate_descriptor, Ancestors, TraversalState};

use crate::error::{LoaderError, Result};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use url::Url;

/// File name of the package descriptor
pub const DESCRIPTOR_FILE: &str = "package.json";

/// A parsed package.json and the path it was read from
#[derive(Debug, Clone, PartialEq)]
pub struct PackageDescriptor {
    /// Absolute path of the descriptor file
    pub path: PathBuf,
    /// Top-level fields
    pub fields: Map<String, Value>,
}

impl PackageDescriptor {
    /// Read and parse a descriptor.
    ///
    /// Returns `Ok(None)` when the file holds valid JSON that is not an object.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        let content = std::fs::read_to_string(path)?;
        let value: Value =
            serde_json::from_str(&content).map_err(|source| LoaderError::DescriptorParse {
                path: path.to_path_buf(),
                source,
            })?;

        Ok(match value {
            Value::Object(fields) => Some(Self {
                path: path.to_path_buf(),
                fields,
            }),
            _ => None,
        })
    }

    /// Directory containing the descriptor
    pub fn directory(&self) -> &Path {
        self.path.parent().unwrap_or(&self.path)
    }

    /// Raw field lookup
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// The `type` field, when it is a string
    pub fn package_type(&self) -> Option<&str> {
        self.str_field("type")
    }

    /// The `name` field
    pub fn name(&self) -> Option<&str> {
        self.str_field("name")
    }

    /// The `version` field
    pub fn version(&self) -> Option<&str> {
        self.str_field("version")
    }

    /// The `main` field
    pub fn main(&self) -> Option<&str> {
        self.str_field("main")
    }

    fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

/// A path or `file:` URL accepted by the lookup functions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Filesystem path, absolute or relative to the working directory
    Path(PathBuf),
    /// URL; only the `file:` scheme maps to the filesystem
    Url(Url),
}

impl Location {
    /// Convert to a local path. `what` names the argument in error messages.
    pub fn to_local_path(&self, what: &str) -> Result<PathBuf> {
        match self {
            Location::Path(path) => Ok(path.clone()),
            Location::Url(url) => url.to_file_path().map_err(|()| {
                LoaderError::invalid_argument(format!("'{what}' is not a file URL: {url}"))
            }),
        }
    }
}

impl From<PathBuf> for Location {
    fn from(path: PathBuf) -> Self {
        Location::Path(path)
    }
}

impl From<&Path> for Location {
    fn from(path: &Path) -> Self {
        Location::Path(path.to_path_buf())
    }
}

impl From<&PathBuf> for Location {
    fn from(path: &PathBuf) -> Self {
        Location::Path(path.clone())
    }
}

impl From<&str> for Location {
    fn from(path: &str) -> Self {
        Location::Path(PathBuf::from(path))
    }
}

impl From<Url> for Location {
    fn from(url: Url) -> Self {
        Location::Url(url)
    }
}

impl From<&Url> for Location {
    fn from(url: &Url) -> Self {
        Location::Url(url.clone())
    }
}

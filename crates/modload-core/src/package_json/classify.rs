// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module type detection from package.json "type"

use super::{Location, TraversalState};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Module format declared for a file by its enclosing package
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageType {
    /// ECMAScript module (`"type": "module"`)
    Module,
    /// CommonJS module (the default)
    #[serde(rename = "commonjs")]
    CommonJs,
}

impl PackageType {
    /// Map a package.json `type` value; anything but `"module"` is CommonJS
    pub fn from_type_field(type_field: Option<&str>) -> Self {
        match type_field {
            Some("module") => PackageType::Module,
            _ => PackageType::CommonJs,
        }
    }

    /// The package.json spelling of this type
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageType::Module => "module",
            PackageType::CommonJs => "commonjs",
        }
    }

    /// Whether this is ESM
    pub fn is_module(&self) -> bool {
        matches!(self, PackageType::Module)
    }
}

impl fmt::Display for PackageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Predicate that accepts only descriptors declaring a string `type`
pub fn has_declared_type(state: &TraversalState) -> bool {
    state
        .descriptor()
        .is_some_and(|desc| desc.package_type().is_some())
}

/// Determine the module type for `filepath`.
///
/// Never fails: malformed or missing descriptors, and bad arguments, all
/// yield CommonJS.
pub fn classify_type(filepath: impl Into<Location>, basepath: Option<Location>) -> PackageType {
    classify_type_with(filepath, basepath, None)
}

/// Determine the module type for `filepath` with a custom stop predicate.
///
/// Without a predicate and with a basepath that is a strict ancestor, the
/// walk skips descriptors lacking a `type` field until the basepath. Without
/// a basepath the nearest descriptor decides, typed or not.
pub fn classify_type_with(
    filepath: impl Into<Location>,
    basepath: Option<Location>,
    predicate: Option<&dyn Fn(&TraversalState) -> bool>,
) -> PackageType {
    let mut state = match TraversalState::new(filepath, basepath) {
        Ok(state) => state,
        Err(err) => {
            tracing::debug!(error = %err, "module type lookup failed; assuming commonjs");
            return PackageType::CommonJs;
        }
    };

    let predicate = match predicate {
        Some(predicate) => Some(predicate),
        None if state.is_base_parent() => {
            Some(&has_declared_type as &dyn Fn(&TraversalState) -> bool)
        }
        None => None,
    };

    match state.walk(predicate) {
        Ok(descriptor) => {
            let package_type = PackageType::from_type_field(descriptor.package_type());
            tracing::debug!(
                package = %descriptor.path.display(),
                %package_type,
                skipped = state.visit_count(),
                "module type resolved"
            );
            package_type
        }
        Err(err) => {
            tracing::debug!(error = %err, "module type lookup failed; assuming commonjs");
            PackageType::CommonJs
        }
    }
}

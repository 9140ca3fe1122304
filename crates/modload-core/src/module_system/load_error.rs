// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Normalization of host "module not found" failures
//!
//! `require` and `import()` report a missing module with different codes.
//! Both become a single [`LoaderError::ModuleLoad`]; every other host error
//! passes through untouched.

use super::host::HostError;
use super::resolver::LoadMechanism;
use crate::error::LoaderError;

/// Code reported by `require` for a missing module, and the normalized code
pub const MODULE_NOT_FOUND: &str = "MODULE_NOT_FOUND";

/// Code reported by `import()` for a missing module
pub const ERR_MODULE_NOT_FOUND: &str = "ERR_MODULE_NOT_FOUND";

/// What to do with a host error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Report as the normalized not-found error
    NotFound,
    /// Propagate unchanged
    PassThrough,
}

const TRANSLATIONS: &[(&str, Disposition)] = &[
    (MODULE_NOT_FOUND, Disposition::NotFound),
    (ERR_MODULE_NOT_FOUND, Disposition::NotFound),
];

/// Look up how a host error is reported
pub fn disposition(err: &HostError) -> Disposition {
    err.code()
        .and_then(|code| TRANSLATIONS.iter().find(|(known, _)| *known == code))
        .map_or(Disposition::PassThrough, |(_, disposition)| *disposition)
}

/// Translate a failed load of `load_path` through `mechanism`
pub fn normalize(err: HostError, mechanism: LoadMechanism, load_path: &str) -> LoaderError {
    match disposition(&err) {
        Disposition::NotFound => {
            tracing::debug!(host_error = %err, load_path, "normalizing module not found");
            LoaderError::ModuleLoad {
                code: MODULE_NOT_FOUND,
                message: format!("{} failed to load {}", mechanism.call_name(), load_path),
            }
        }
        Disposition::PassThrough => LoaderError::Host(err),
    }
}

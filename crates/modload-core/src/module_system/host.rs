// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host runtime boundary
//!
//! The runtime embedding this crate provides bare-specifier resolution,
//! synchronous `require` and asynchronous `import()`. Failures come back as
//! [`HostError`] carrying the host's own error name and code.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use thiserror::Error;
use url::Url;

/// Error raised by a host primitive
#[derive(Debug, Error)]
#[error("{name}: {message}")]
pub struct HostError {
    name: String,
    code: Option<String>,
    message: String,
    #[source]
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl HostError {
    /// Create an error with a host error name (`SyntaxError`, `Error`, ...)
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: None,
            message: message.into(),
            source: None,
        }
    }

    /// Create a plain `Error`
    pub fn error(message: impl Into<String>) -> Self {
        Self::new("Error", message)
    }

    /// Create a plain `Error` carrying `code`
    pub fn with_code_error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::error(message).with_code(code)
    }

    /// Wrap an I/O failure
    pub fn from_io(err: std::io::Error) -> Self {
        Self::error(err.to_string()).with_source(err)
    }

    /// Attach an error code
    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    /// Attach the underlying cause
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Error name, e.g. `SyntaxError`
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Error code, e.g. `MODULE_NOT_FOUND`
    pub fn code(&self) -> Option<&str> {
        self.code.as_deref()
    }

    /// Error message without the name prefix
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Host bare-specifier resolution (`NameResolve`)
pub trait NameResolve {
    /// Resolve `specifier` to a file on disk
    fn resolve_name(&self, specifier: &str) -> Result<PathBuf, HostError>;
}

/// Host load primitives
#[async_trait]
pub trait ModuleHost: NameResolve + Send + Sync {
    /// Loaded module handle
    type Module: Send;

    /// Synchronous CommonJS load (`SyncRequire`).
    ///
    /// A missing module is reported with code `MODULE_NOT_FOUND`.
    fn require(&self, path: &Path) -> Result<Self::Module, HostError>;

    /// Asynchronous ES module load (`DynamicImport`).
    ///
    /// A missing module is reported with code `ERR_MODULE_NOT_FOUND`.
    async fn import(&self, url: &Url) -> Result<Self::Module, HostError>;
}

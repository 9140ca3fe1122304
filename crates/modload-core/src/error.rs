// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for module resolution and loading

use crate::module_system::HostError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for resolution and loading operations
pub type Result<T> = std::result::Result<T, LoaderError>;

/// Errors that can occur while resolving or loading a module
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Caller supplied a malformed argument
    #[error("TypeError: {0}")]
    InvalidArgument(String),

    /// A package.json exists but is not valid JSON
    #[error("Failed to parse '{}': {source}", path.display())]
    DescriptorParse {
        /// Descriptor that failed to parse
        path: PathBuf,
        /// Underlying JSON error
        #[source]
        source: serde_json::Error,
    },

    /// No package.json was located within the walked boundary
    #[error("No package.json located from '{}'", start.display())]
    DescriptorNotFound {
        /// Directory the walk started from
        start: PathBuf,
    },

    /// The host loader reported that the module does not exist
    #[error("[{code}] {message}")]
    ModuleLoad {
        /// Normalized error code
        code: &'static str,
        /// Names the load mechanism and the path attempted
        message: String,
    },

    /// Any other host failure, passed through unchanged
    #[error(transparent)]
    Host(#[from] HostError),

    /// File system error
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration file could not be parsed
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl LoaderError {
    /// Create a new InvalidArgument error
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    /// The error code, for errors that carry one
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::ModuleLoad { code, .. } => Some(*code),
            Self::Host(err) => err.code(),
            _ => None,
        }
    }

    /// Whether this is the normalized "module not found" error
    pub fn is_module_not_found(&self) -> bool {
        matches!(self, Self::ModuleLoad { .. })
    }
}

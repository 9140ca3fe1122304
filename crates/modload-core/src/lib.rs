// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # modload-core
//!
//! Resolves a module specifier to a file, decides whether it loads as an ES
//! module or as CommonJS, and dispatches the load to the host runtime.
//!
//! - Upward `package.json` lookup with an optional boundary and predicate
//! - `"type"`-aware ESM/CommonJS classification that never fails
//! - Name resolution first, then URL or path interpretation
//! - One `MODULE_NOT_FOUND` error for both `require` and `import()` misses
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modload_core::{FsHost, LoaderConfig, ModuleLoader};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = LoaderConfig::load(None)?;
//!     let loader = ModuleLoader::with_config(FsHost::from_config(&config)?, config);
//!     let loaded = loader.load("./src/index.js", None).await?;
//!     println!("{} {}", loaded.load_kind, loaded.load_path);
//!     Ok(())
//! }
//! ```
//!
//! ## Type lookup
//!
//! ```rust,ignore
//! use modload_core::package_json::{classify_type, PackageType};
//!
//! let ty = classify_type("pkg/index.js", Some("..".into()));
//! assert_eq!(ty, PackageType::Module);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod module_system;
pub mod package_json;
mod paths;

// Re-exports
pub use config::LoaderConfig;
pub use error::{LoaderError, Result};
pub use module_system::{
    FsHost, HostError, LoadKind, LoadedModule, ModuleHost, ModuleLoader, ModuleSpecifier,
    NameResolve, NodeModulesResolver, ResolvedModule,
};
pub use package_json::{classify_type, locate_descriptor, Location, PackageDescriptor, PackageType};

/// Version of modload
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

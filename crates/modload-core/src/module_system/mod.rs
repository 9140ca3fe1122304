// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module resolution and loading
//!
//! ## Resolution
//! - Host name resolution first (installed packages)
//! - Then `file://` / `http(s)://` URLs
//! - Then paths relative to the working directory
//!
//! ## Classification
//! - `.mjs` is ESM
//! - `.js` follows the enclosing package.json `"type"`
//! - Everything else is CommonJS
//!
//! ## Loading
//! - ESM through the host's `import()`, CommonJS through `require`
//! - Missing modules report one normalized `MODULE_NOT_FOUND` error

mod fs_host;
mod host;
pub mod load_error;
mod loader;
mod name_resolver;
mod resolver;
mod specifier;

pub use fs_host::{FsHost, ModuleSource};
pub use host::{HostError, ModuleHost, NameResolve};
pub use load_error::{Disposition, ERR_MODULE_NOT_FOUND, MODULE_NOT_FOUND};
pub use loader::{LoadedModule, ModuleLoader};
pub use name_resolver::NodeModulesResolver;
pub use resolver::{
    is_path_module, LoadKind, LoadMechanism, ModulePathResolver, ResolutionSource, ResolvedModule,
};
pub use specifier::ModuleSpecifier;

// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Module specifiers: package names, file paths and URLs

use crate::error::{LoaderError, Result};
use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use url::Url;

static URL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(https?://|file://)").expect("URL pattern is valid"));

/// What the caller asked to load
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSpecifier {
    /// Package name or file path; may also be a URL in string form
    Str(String),
    /// Parsed URL
    Url(Url),
}

impl ModuleSpecifier {
    /// The specifier text as given
    pub fn as_str(&self) -> &str {
        match self {
            ModuleSpecifier::Str(s) => s,
            ModuleSpecifier::Url(url) => url.as_str(),
        }
    }

    /// Whether this is a URL, either parsed or an `http(s)://` / `file://` string
    pub fn is_url(&self) -> bool {
        match self {
            ModuleSpecifier::Str(s) => URL_PATTERN.is_match(s),
            ModuleSpecifier::Url(_) => true,
        }
    }

    /// Parse as a URL
    pub fn to_url(&self) -> Result<Url> {
        match self {
            ModuleSpecifier::Str(s) => Url::parse(s).map_err(|err| {
                LoaderError::invalid_argument(format!("'modulepath' is not a valid URL: {err}"))
            }),
            ModuleSpecifier::Url(url) => Ok(url.clone()),
        }
    }

    /// Reject specifiers that cannot name anything
    pub fn validate(&self) -> Result<()> {
        match self {
            ModuleSpecifier::Str(s) if s.is_empty() || s.contains('\0') => Err(
                LoaderError::invalid_argument("'modulepath' is not a string or URL"),
            ),
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ModuleSpecifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ModuleSpecifier {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl From<&str> for ModuleSpecifier {
    fn from(s: &str) -> Self {
        ModuleSpecifier::Str(s.to_string())
    }
}

impl From<String> for ModuleSpecifier {
    fn from(s: String) -> Self {
        ModuleSpecifier::Str(s)
    }
}

impl From<&Path> for ModuleSpecifier {
    fn from(path: &Path) -> Self {
        ModuleSpecifier::Str(path.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for ModuleSpecifier {
    fn from(path: PathBuf) -> Self {
        ModuleSpecifier::from(path.as_path())
    }
}

impl From<Url> for ModuleSpecifier {
    fn from(url: Url) -> Self {
        ModuleSpecifier::Url(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_url() {
        assert!(ModuleSpecifier::from("file:///tmp/a.js").is_url());
        assert!(ModuleSpecifier::from("https://cdn.example.com/a.mjs").is_url());
        assert!(ModuleSpecifier::from("http://localhost/a.mjs").is_url());
        assert!(ModuleSpecifier::from(Url::parse("file:///tmp/a.js").unwrap()).is_url());

        assert!(!ModuleSpecifier::from("./a.js").is_url());
        assert!(!ModuleSpecifier::from("lodash").is_url());
        assert!(!ModuleSpecifier::from("node:fs").is_url());
        assert!(!ModuleSpecifier::from("ftp://host/a.js").is_url());
    }

    #[test]
    fn test_validate() {
        assert!(ModuleSpecifier::from("./a.js").validate().is_ok());
        assert!(matches!(
            ModuleSpecifier::from("").validate(),
            Err(LoaderError::InvalidArgument(_))
        ));
        assert!(matches!(
            ModuleSpecifier::from("a\0b").validate(),
            Err(LoaderError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_to_url() {
        let url = ModuleSpecifier::from("file:///tmp/a.js").to_url().unwrap();
        assert_eq!(url.scheme(), "file");
        assert!(ModuleSpecifier::from("http://[bad").to_url().is_err());
    }

    #[test]
    fn test_serializes_as_string() {
        let spec = ModuleSpecifier::from(Url::parse("file:///tmp/a.js").unwrap());
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"file:///tmp/a.js\"");
    }
}

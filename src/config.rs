//! Selecting which TotalSpaces2 library to load.
//!
//! The dylib is opened at runtime, so nothing has to be present when the crate
//! is built. By default a short list of well-known locations is searched; the
//! `TOTALSPACES2_LIB` environment variable or an explicit path pins a single
//! file instead.
//!
//! # Example
//!
//! ```no_run
//! use totalspaces2::{LibraryConfig, TotalSpaces};
//!
//! let config = LibraryConfig::with_path("/Applications/TotalSpaces2.app/libtotalspaces2api.dylib");
//! let spaces = TotalSpaces::load(&config)?;
//! println!("API version: {}", spaces.api_version());
//! # Ok::<(), totalspaces2::Error>(())
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Environment variable holding an explicit path to the dylib.
pub const LIBRARY_ENV_VAR: &str = "TOTALSPACES2_LIB";

/// File name of the TotalSpaces2 API library.
pub const LIBRARY_FILE_NAME: &str = "libtotalspaces2api.dylib";

/// Locations tried, in order, when no explicit path is configured.
///
/// The bare file name defers to the dyld search path.
pub const DEFAULT_SEARCH_PATHS: &[&str] = &[
    LIBRARY_FILE_NAME,
    "/usr/local/lib/libtotalspaces2api.dylib",
    "/opt/homebrew/lib/libtotalspaces2api.dylib",
];

/// Where to find `libtotalspaces2api.dylib`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LibraryConfig {
    path: Option<PathBuf>,
}

impl LibraryConfig {
    /// Search the default locations.
    #[must_use]
    pub const fn new() -> Self {
        Self { path: None }
    }

    /// Load exactly this file and nothing else.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    /// Honour `TOTALSPACES2_LIB` when set and non-empty, otherwise search the
    /// default locations.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(LIBRARY_ENV_VAR))
    }

    fn from_env_value(value: Option<OsString>) -> Self {
        value
            .filter(|v| !v.is_empty())
            .map_or_else(Self::new, Self::with_path)
    }

    /// The explicit path, if one was configured.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Whether a single explicit path is configured.
    #[must_use]
    pub const fn is_explicit(&self) -> bool {
        self.path.is_some()
    }

    /// Paths to try, in order.
    #[must_use]
    pub fn candidates(&self) -> Vec<PathBuf> {
        match &self.path {
            Some(path) => vec![path.clone()],
            None => DEFAULT_SEARCH_PATHS.iter().map(PathBuf::from).collect(),
        }
    }
}

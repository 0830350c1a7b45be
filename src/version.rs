//! Version reporting and compatibility.
//!
//! Three versions are involved: the API served by TotalSpaces2.app, the
//! loaded dylib, and TotalSpaces2 itself. The dylib talks to the app over a
//! private channel, so a dylib whose major version differs from the app's
//! API cannot be trusted. When communication fails outright every call
//! apart from the dylib version returns empty strings or zero, which also
//! shows up as a mismatch here.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Versions reported by the library.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Versions {
    /// API version served by TotalSpaces2.app, e.g. "2.1.0".
    pub api: String,
    /// Version of the loaded dylib, e.g. "2.1.0".
    pub library: String,
    /// Version of TotalSpaces2 itself, e.g. "2.9.17".
    pub total_spaces: String,
}

impl Versions {
    /// Major components of the API and library versions agree.
    #[must_use]
    pub fn is_compatible(&self) -> bool {
        is_compatible(&self.api, &self.library)
    }

    /// API and library version strings are identical.
    #[must_use]
    pub fn is_exact_match(&self) -> bool {
        !self.api.is_empty() && self.api == self.library
    }
}

impl fmt::Display for Versions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TotalSpaces2 {} (API {}, library {})",
            self.total_spaces, self.api, self.library
        )
    }
}

/// Leading dotted component of a version string, if non-empty.
#[must_use]
pub fn major_version(version: &str) -> Option<&str> {
    version
        .trim()
        .split('.')
        .next()
        .filter(|major| !major.is_empty())
}

/// Whether two version strings share a non-empty major component.
#[must_use]
pub fn is_compatible(api: &str, library: &str) -> bool {
    match (major_version(api), major_version(library)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

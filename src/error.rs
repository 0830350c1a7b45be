//! Error types for the TotalSpaces2 bindings.
//!
//! These cover failures detected by the binding itself: the library could not
//! be found or is incomplete, the API versions disagree, or an argument cannot
//! be represented as a C string. Failures reported by TotalSpaces2 (an invalid
//! space number, a name that is too long) are not errors here; they come back
//! as the native `false`, `0` or empty string.

use thiserror::Error;

/// Primary error type for TotalSpaces2 operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// The native library cannot be used on this system.
    ///
    /// Returned on platforms other than macOS and when none of the default
    /// search locations holds the dylib. Applications should handle this
    /// gracefully.
    #[error("TotalSpaces2 not available: {reason}")]
    NotAvailable {
        /// Why the library is unavailable.
        reason: String,
    },

    /// An explicitly configured library file failed to open.
    #[error("failed to load {path}: {message}")]
    LibraryLoad {
        /// Path that was opened.
        path: String,
        /// Loader diagnostic.
        message: String,
    },

    /// The library is missing a required `tsapi_*` entry point.
    #[error("native symbol {symbol} not found in TotalSpaces2 library")]
    MissingSymbol {
        /// Name of the missing symbol.
        symbol: String,
    },

    /// The API inside TotalSpaces2 and the dylib have different major versions.
    #[error("API version mismatch: TotalSpaces2 speaks {api}, library is {library}")]
    VersionMismatch {
        /// Version reported by TotalSpaces2.app.
        api: String,
        /// Version of the loaded dylib.
        library: String,
    },

    /// A recorded space layout names a display that is not connected.
    #[error("display {display} from the recorded layout is not connected")]
    UnknownDisplay {
        /// `CGDirectDisplayID` of the missing display.
        display: u32,
    },

    /// Invalid input was provided to an API.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of what was invalid.
        reason: String,
    },

    /// Internal error (should not occur in normal operation).
    #[error("internal error: {details}")]
    Internal {
        /// Details about the internal error.
        details: String,
    },
}

/// Result type alias for TotalSpaces2 operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new `NotAvailable` error.
    #[must_use]
    pub fn not_available(reason: impl Into<String>) -> Self {
        Self::NotAvailable {
            reason: reason.into(),
        }
    }

    /// Create a new `LibraryLoad` error.
    #[must_use]
    pub fn library_load(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::LibraryLoad {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a new `MissingSymbol` error.
    #[must_use]
    pub fn missing_symbol(symbol: impl Into<String>) -> Self {
        Self::MissingSymbol {
            symbol: symbol.into(),
        }
    }

    /// Create a new `VersionMismatch` error.
    #[must_use]
    pub fn version_mismatch(api: impl Into<String>, library: impl Into<String>) -> Self {
        Self::VersionMismatch {
            api: api.into(),
            library: library.into(),
        }
    }

    /// Create a new `UnknownDisplay` error.
    #[must_use]
    pub const fn unknown_display(display: u32) -> Self {
        Self::UnknownDisplay { display }
    }

    /// Create a new `InvalidInput` error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Create a new `Internal` error.
    #[must_use]
    pub fn internal(details: impl Into<String>) -> Self {
        Self::Internal {
            details: details.into(),
        }
    }

    /// Check if this error indicates the library is unavailable.
    #[must_use]
    pub const fn is_not_available(&self) -> bool {
        matches!(self, Self::NotAvailable { .. })
    }

    /// Check if this error comes from opening or resolving the library.
    #[must_use]
    pub const fn is_load_failure(&self) -> bool {
        matches!(
            self,
            Self::NotAvailable { .. } | Self::LibraryLoad { .. } | Self::MissingSymbol { .. }
        )
    }

    /// Check if this error is a version mismatch.
    #[must_use]
    pub const fn is_version_mismatch(&self) -> bool {
        matches!(self, Self::VersionMismatch { .. })
    }
}

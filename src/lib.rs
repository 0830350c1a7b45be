//! TotalSpaces2: Safe Rust Bindings for the TotalSpaces2 API
//!
//! TotalSpaces2 is a macOS utility that arranges spaces (virtual desktops)
//! in a grid. This crate drives it through its native API library,
//! `libtotalspaces2api.dylib`: query and rename spaces, move between them,
//! move windows and spaces around, pin applications, and receive
//! notifications when the current space or the layout changes. Space
//! arrangements across displays can be recorded and restored; see
//! [`layout`].
//!
//! # Design Philosophy
//!
//! - **Zero unsafe in public API**: All FFI quarantined in internal modules
//! - **Copy, then free**: every string and list handed out by the library is
//!   copied into owned Rust values and released exactly once
//! - **Loaded at runtime**: the dylib is opened with `libloading`, so the
//!   crate builds everywhere and degrades to an error where it cannot run
//!
//! # Quick Start
//!
//! ```no_run
//! use totalspaces2::{DisplayId, TotalSpaces};
//!
//! let spaces = TotalSpaces::connect()?;
//! println!("{}", spaces.versions());
//!
//! for display in spaces.displays() {
//!     let current = spaces.current_space_number(display.id);
//!     println!("{display}: on {}", spaces.space_name(current, display.id));
//! }
//!
//! spaces.move_to_space(2, DisplayId::MAIN);
//! # Ok::<(), totalspaces2::Error>(())
//! ```
//!
//! # Feature Flags
//!
//! - `serde` - `Serialize`/`Deserialize` for the data types
//!
//! # Locating the Library
//!
//! [`TotalSpaces::connect`] reads `TOTALSPACES2_LIB` for an explicit dylib
//! path and otherwise searches the usual install locations; see
//! [`LibraryConfig`].
//!
//! # Safety Guarantees
//!
//! This crate uses `#![deny(unsafe_code)]` at the library level. All FFI
//! code is quarantined in the internal `ffi` module, which is not exported.
//!
//! # Error Handling
//!
//! Loading can fail and returns [`Result<T, Error>`]. Once loaded, the
//! library reports its own failures through its return values (`false`,
//! `0` or an empty string), and these are passed through unchanged.
//!
//! # Thread Safety
//!
//! [`TotalSpaces`] is `Send + Sync` and cheap to clone. Notification
//! handlers run on the library's notification thread and must be
//! `Send + Sync`.
//!
//! # Graceful Degradation
//!
//! On other platforms, or when TotalSpaces2 is not installed, loading
//! returns [`Error::NotAvailable`] rather than panicking.
//!
//! ```no_run
//! use totalspaces2::TotalSpaces;
//!
//! let uuids = match TotalSpaces::connect() {
//!     Ok(spaces) => spaces.space_uuids(totalspaces2::DisplayId::MAIN),
//!     Err(_) => Vec::new(), // Graceful fallback
//! };
//! ```

// SAFETY: This crate denies unsafe code at the library level.
// All unsafe FFI code is quarantined in src/ffi/, which is not exported.
// We use deny (not forbid) so it can be overridden in the ffi module.
#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::doc_markdown)] // Allow TotalSpaces2, CoreGraphics, etc. without backticks

pub mod callbacks;
pub mod config;
pub mod display;
pub mod error;
pub mod layout;
pub mod space;
pub mod totalspaces;
pub mod version;
pub mod window;

// FFI module is internal only - not exported
mod ffi;

// Re-export main types for convenience
pub use callbacks::{LayoutChangedHandler, SpaceChangeHandler};
pub use config::LibraryConfig;
pub use display::{Display, DisplayId};
pub use error::{Error, Result};
pub use layout::{RestoreReport, SpaceLayout};
pub use space::{AppBinding, SpaceChange, SpaceInfo, SpaceRef, SpaceType};
pub use totalspaces::TotalSpaces;
pub use version::Versions;
pub use window::{Frame, Window, WindowId};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Check if we're running on macOS.
#[must_use]
pub const fn is_macos() -> bool {
    cfg!(target_os = "macos")
}

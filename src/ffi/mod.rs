//! FFI Quarantine Zone - All unsafe code isolated here.
//!
//! # Safety Architecture
//!
//! This module contains ALL unsafe code in the totalspaces2 crate. The public
//! API denies `unsafe_code`, so raw pointers returned by the TotalSpaces2
//! library never leave this module: strings and lists are copied into owned
//! Rust values and released here.
//!
//! ## Safety Rules
//!
//! - Every `unsafe` block has a `// SAFETY:` comment
//! - No raw pointers escape the FFI module
//! - Native strings are decoded lossily as UTF-8
//! - Every owned native string or list is released exactly once, NULL never
//! - Callbacks handed to the library are `'static` `extern "C"` functions
//!
//! # Module Structure
//!
//! ```text
//! ffi/
//! ├── mod.rs          # This file - module router
//! ├── sys.rs          # C layouts and prototypes from TSLib.h
//! ├── library.rs      # libloading symbol table and marshalling
//! └── fake.rs         # In-process stand-in for the dylib (tests only)
//! ```

// Allow unsafe in this module only - quarantine zone
#![allow(unsafe_code)]

pub mod library;
pub mod sys;

#[cfg(test)]
pub mod fake;

pub use library::{DisplayRecord, NativeLibrary, WindowRecord};

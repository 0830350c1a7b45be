//! Displays known to TotalSpaces2.
//!
//! Each display has its own grid of spaces when "Displays have separate
//! Spaces" is enabled in Mission Control. Every space operation therefore
//! takes a [`DisplayId`]; [`DisplayId::MAIN`] addresses the main display.

use crate::ffi::DisplayRecord;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// CoreGraphics display identifier (`CGDirectDisplayID`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct DisplayId(pub u32);

impl DisplayId {
    /// The main display. TotalSpaces2 resolves `0` to whichever display
    /// currently holds the menu bar.
    pub const MAIN: Self = Self(0);

    /// Raw `CGDirectDisplayID`.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for DisplayId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<DisplayId> for u32 {
    fn from(id: DisplayId) -> Self {
        id.0
    }
}

impl fmt::Display for DisplayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one display.
///
/// Re-fetch with [`TotalSpaces::displays`](crate::TotalSpaces::displays)
/// after a layout change; nothing is cached.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Display {
    /// Display identifier.
    pub id: DisplayId,
    /// Human-readable name, e.g. "Built-in Retina Display".
    pub name: String,
    /// Width in pixels.
    pub width: usize,
    /// Height in pixels.
    pub height: usize,
}

impl Display {
    /// Pixel dimensions as `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }
}

impl From<DisplayRecord> for Display {
    fn from(raw: DisplayRecord) -> Self {
        Self {
            id: DisplayId(raw.id),
            name: raw.name,
            width: raw.width,
            height: raw.height,
        }
    }
}

impl fmt::Display for Display {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{}, id {})", self.name, self.width, self.height, self.id)
    }
}

//! Spaces (virtual desktops) and the values used to address them.
//!
//! TotalSpaces2 never hands out a space record. A space is named by its
//! number on a display, and each attribute is queried on its own; see
//! [`TotalSpaces::space_info`](crate::TotalSpaces::space_info) for a
//! convenience that gathers them.

use crate::display::DisplayId;
use crate::ffi::sys;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Kind of a space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum SpaceType {
    /// A normal desktop.
    #[default]
    Desktop,
    /// A fullscreen app.
    FullScreen,
    /// The Dashboard, when configured as a space.
    Dashboard,
}

impl SpaceType {
    /// Map the native `SpaceType` enum value.
    #[must_use]
    pub const fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            sys::SPACE_TYPE_DESKTOP => Some(Self::Desktop),
            sys::SPACE_TYPE_FULL_SCREEN => Some(Self::FullScreen),
            sys::SPACE_TYPE_DASHBOARD => Some(Self::Dashboard),
            _ => None,
        }
    }

    /// Native enum value.
    #[must_use]
    pub const fn as_raw(self) -> u32 {
        match self {
            Self::Desktop => sys::SPACE_TYPE_DESKTOP,
            Self::FullScreen => sys::SPACE_TYPE_FULL_SCREEN,
            Self::Dashboard => sys::SPACE_TYPE_DASHBOARD,
        }
    }
}

impl fmt::Display for SpaceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Desktop => write!(f, "Desktop"),
            Self::FullScreen => write!(f, "Fullscreen"),
            Self::Dashboard => write!(f, "Dashboard"),
        }
    }
}

/// A space number on a particular display. Numbering starts at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpaceRef {
    /// Space number on the display.
    pub number: u32,
    /// Display holding the space.
    pub display: DisplayId,
}

impl SpaceRef {
    /// Space `number` on `display`.
    #[must_use]
    pub const fn new(number: u32, display: DisplayId) -> Self {
        Self { number, display }
    }

    /// Space `number` on the main display.
    #[must_use]
    pub const fn on_main(number: u32) -> Self {
        Self::new(number, DisplayId::MAIN)
    }
}

impl fmt::Display for SpaceRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "space {} on display {}", self.number, self.display)
    }
}

/// Attributes of one space, fetched one native call at a time.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpaceInfo {
    /// Which space this describes.
    pub space: SpaceRef,
    /// Display name, empty when the space number is invalid.
    pub name: String,
    /// Name set by the user in TotalSpaces2, if any.
    pub custom_name: Option<String>,
    /// Kind of space.
    pub space_type: SpaceType,
    /// Stable identifier, empty when the space number is invalid.
    pub uuid: String,
}

impl SpaceInfo {
    /// Whether TotalSpaces2 knew the space (invalid spaces report empty
    /// name and UUID).
    #[must_use]
    pub fn exists(&self) -> bool {
        !self.uuid.is_empty()
    }
}

/// Where [`TotalSpaces::bind_app_to_space`](crate::TotalSpaces::bind_app_to_space)
/// pins an application.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AppBinding {
    /// The space with this UUID.
    Space(String),
    /// Every space.
    AllSpaces,
    /// Remove any existing binding.
    Unbound,
}

impl AppBinding {
    /// The `spaceUUID` argument sent to the library; `None` becomes NULL.
    #[must_use]
    pub fn native_uuid(&self) -> Option<&str> {
        match self {
            Self::Space(uuid) => Some(uuid),
            Self::AllSpaces => Some(sys::ALL_SPACES_UUID),
            Self::Unbound => None,
        }
    }
}

/// Payload of a space-will-change notification.
///
/// Delivered just before the switch, so
/// [`current_space_number`](crate::TotalSpaces::current_space_number) still
/// reports `from` while the handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpaceChange {
    /// Space being left.
    pub from: u32,
    /// Space being entered.
    pub to: u32,
    /// Display where the switch happens.
    pub display: DisplayId,
}

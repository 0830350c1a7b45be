//! Windows as reported by TotalSpaces2.
//!
//! The window list is ordered front to back per space, so the first window
//! reported for a space is its frontmost one.
//!
//! # Example
//!
//! ```no_run
//! use totalspaces2::TotalSpaces;
//!
//! let spaces = TotalSpaces::connect()?;
//! for window in spaces.windows() {
//!     if let Some(frame) = window.parsed_frame() {
//!         // Nudge every window 20 points down.
//!         let (x, y) = frame.origin();
//!         spaces.move_window(window.id, x as f32, (y + 20.0) as f32);
//!     }
//! }
//! # Ok::<(), totalspaces2::Error>(())
//! ```

use crate::display::DisplayId;
use crate::ffi::WindowRecord;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Window identifier (`CGWindowID`), valid for the lifetime of the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct WindowId(pub u32);

impl From<u32> for WindowId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of one window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Window {
    /// Name of the owning application.
    pub app_name: String,
    /// Window identifier.
    pub id: WindowId,
    /// Whether the window is shown on every space.
    pub is_on_all_spaces: bool,
    /// Window title, possibly empty.
    pub title: String,
    /// Geometry as formatted by the native side, e.g. `{{146, 23}, {1133, 754}}`.
    pub frame: String,
    /// Display the window lives on.
    pub display_id: DisplayId,
    /// Space the window lives on.
    pub space_number: u32,
}

impl Window {
    /// Parse [`Window::frame`] into numbers.
    ///
    /// Returns `None` when the native string is not in the usual
    /// `{{x, y}, {w, h}}` shape.
    #[must_use]
    pub fn parsed_frame(&self) -> Option<Frame> {
        Frame::parse(&self.frame)
    }
}

impl From<WindowRecord> for Window {
    fn from(raw: WindowRecord) -> Self {
        Self {
            app_name: raw.app_name,
            id: WindowId(raw.window_id),
            is_on_all_spaces: raw.is_on_all_spaces,
            title: raw.title,
            frame: raw.frame,
            display_id: DisplayId(raw.display_id),
            space_number: raw.space_number,
        }
    }
}

/// Window geometry in screen points. The origin is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Frame {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl Frame {
    /// Parse a `{{x, y}, {w, h}}` rectangle string.
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();
        let opens = text.matches('{').count();
        let closes = text.matches('}').count();
        if opens != 3 || closes != 3 || !text.starts_with("{{") || !text.ends_with("}}") {
            return None;
        }

        let mut values = text
            .split(|c| c == '{' || c == '}' || c == ',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| part.parse::<f64>().ok().filter(|v| v.is_finite()));

        let frame = Self {
            x: values.next()??,
            y: values.next()??,
            width: values.next()??,
            height: values.next()??,
        };
        if values.next().is_some() {
            return None;
        }
        Some(frame)
    }

    /// Top-left corner as `(x, y)`.
    #[must_use]
    pub const fn origin(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Dimensions as `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    /// The same rectangle shifted by `(dx, dy)`.
    #[must_use]
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{{{{}, {}}}, {{{}, {}}}}}",
            self.x, self.y, self.width, self.height
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn window(frame: &str) -> Window {
        Window {
            app_name: "Mail".into(),
            id: WindowId(1234),
            is_on_all_spaces: false,
            title: "Inbox".into(),
            frame: frame.into(),
            display_id: DisplayId(1),
            space_number: 2,
        }
    }

    #[test]
    fn test_parse_native_frame() {
        let frame = Frame::parse("{{146, 23}, {1133, 754}}");
        assert_eq!(
            frame,
            Some(Frame {
                x: 146.0,
                y: 23.0,
                width: 1133.0,
                height: 754.0
            })
        );
    }

    #[test]
    fn test_parse_negative_and_fractional() {
        let frame = Frame::parse("{{-1440, 12.5}, {800.25, 600}}").unwrap();
        assert_eq!(frame.origin(), (-1440.0, 12.5));
        assert_eq!(frame.size(), (800.25, 600.0));
    }

    #[test]
    fn test_parse_tolerates_whitespace() {
        assert!(Frame::parse("  {{0,0},{10,10}} ").is_some());
        assert!(Frame::parse("{{ 0 , 0 }, { 10 , 10 }}").is_some());
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for text in [
            "",
            "{}",
            "{{1, 2}, {3}}",
            "{{1, 2}, {3, 4, 5}}",
            "{{1, 2}, {3, x}}",
            "{{1, 2}, {3, 4}",
            "1, 2, 3, 4",
            "{{NaN, 2}, {3, 4}}",
            "{{inf, 2}, {3, 4}}",
        ] {
            assert_eq!(Frame::parse(text), None, "accepted {text:?}");
        }
    }

    #[test]
    fn test_display_matches_native_format() {
        let frame = Frame {
            x: 146.0,
            y: 23.0,
            width: 1133.0,
            height: 754.0,
        };
        assert_eq!(frame.to_string(), "{{146, 23}, {1133, 754}}");
    }

    #[test]
    fn test_offset_keeps_size() {
        let frame = Frame::parse("{{146, 23}, {1133, 754}}").unwrap();
        let moved = frame.offset(0.0, 20.0);
        assert_eq!(moved.origin(), (146.0, 43.0));
        assert_eq!(moved.size(), frame.size());
    }

    #[test]
    fn test_window_parsed_frame() {
        assert!(window("{{0, 0}, {1, 1}}").parsed_frame().is_some());
        assert!(window("garbage").parsed_frame().is_none());
    }

    #[test]
    fn test_from_record() {
        let window = Window::from(WindowRecord {
            app_name: "Finder".into(),
            window_id: 42,
            is_on_all_spaces: true,
            title: String::new(),
            frame: "{{0, 0}, {800, 600}}".into(),
            display_id: 7,
            space_number: 3,
        });
        assert_eq!(window.id, WindowId(42));
        assert_eq!(window.display_id, DisplayId(7));
        assert!(window.is_on_all_spaces);
        assert_eq!(window.space_number, 3);
    }
}

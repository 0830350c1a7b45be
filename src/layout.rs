//! Recording and restoring the arrangement of spaces across displays.
//!
//! A [`SpaceLayout`] lists, for each display, the UUIDs of its spaces in
//! order. Restoring moves every recorded space that ended up on another
//! display back to its recorded display and position. Spaces already on the
//! right display are left where they are.
//!
//! With the `serde` feature a layout serialises as a JSON object keyed by
//! display id, e.g. `{"69733382": ["F5E3...", "0A1B..."]}`.
//!
//! # Example
//!
//! ```no_run
//! use totalspaces2::TotalSpaces;
//!
//! let spaces = TotalSpaces::connect()?;
//! let layout = spaces.record_layout();
//!
//! // ... displays are unplugged and reconnected ...
//!
//! let report = spaces.restore_layout(&layout)?;
//! for uuid in &report.failed {
//!     eprintln!("could not move space {uuid}");
//! }
//! # Ok::<(), totalspaces2::Error>(())
//! ```

use crate::display::DisplayId;
use crate::error::{Error, Result};
use crate::totalspaces::TotalSpaces;
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;
use tracing::{debug, instrument, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pause before retrying a rejected space move. TotalSpaces2 rejects moves
/// while a previous rearrangement is still animating.
pub const RESTORE_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Space UUIDs per display, in space order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct SpaceLayout {
    displays: BTreeMap<DisplayId, Vec<String>>,
}

impl SpaceLayout {
    /// An empty layout.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the spaces recorded for `display`, replacing any earlier entry.
    pub fn insert(&mut self, display: DisplayId, uuids: Vec<String>) {
        self.displays.insert(display, uuids);
    }

    /// Spaces recorded for `display`.
    #[must_use]
    pub fn spaces(&self, display: DisplayId) -> Option<&[String]> {
        self.displays.get(&display).map(Vec::as_slice)
    }

    /// Recorded displays in id order.
    pub fn displays(&self) -> impl Iterator<Item = DisplayId> + '_ {
        self.displays.keys().copied()
    }

    /// `(display, uuids)` pairs in display id order.
    pub fn iter(&self) -> impl Iterator<Item = (DisplayId, &[String])> {
        self.displays.iter().map(|(id, uuids)| (*id, uuids.as_slice()))
    }

    /// Whether no display was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.displays.is_empty()
    }
}

impl FromIterator<(DisplayId, Vec<String>)> for SpaceLayout {
    fn from_iter<I: IntoIterator<Item = (DisplayId, Vec<String>)>>(iter: I) -> Self {
        Self {
            displays: iter.into_iter().collect(),
        }
    }
}

/// Outcome of [`TotalSpaces::restore_layout`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RestoreReport {
    /// Spaces moved back to their recorded display.
    pub moved: Vec<String>,
    /// Spaces TotalSpaces2 refused to move, even after a retry.
    pub failed: Vec<String>,
    /// Recorded spaces that no longer exist.
    pub missing: Vec<String>,
}

impl RestoreReport {
    /// Every recorded space exists and was put in place.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty() && self.missing.is_empty()
    }
}

impl TotalSpaces {
    /// Record the UUIDs of every space on every connected display.
    #[instrument(level = "debug", skip(self))]
    #[must_use]
    pub fn record_layout(&self) -> SpaceLayout {
        self.displays()
            .into_iter()
            .map(|display| (display.id, self.space_uuids(display.id)))
            .collect()
    }

    /// Move recorded spaces back to the displays and positions in `layout`.
    ///
    /// A rejected move is retried once after [`RESTORE_RETRY_DELAY`], with
    /// the space located afresh.
    ///
    /// # Errors
    ///
    /// `UnknownDisplay` if `layout` names a display that is not connected.
    /// Nothing is moved in that case.
    pub fn restore_layout(&self, layout: &SpaceLayout) -> Result<RestoreReport> {
        self.restore_layout_with_delay(layout, RESTORE_RETRY_DELAY)
    }

    #[instrument(level = "debug", skip(self, layout))]
    pub(crate) fn restore_layout_with_delay(
        &self,
        layout: &SpaceLayout,
        retry_delay: Duration,
    ) -> Result<RestoreReport> {
        let connected: Vec<DisplayId> = self.displays().iter().map(|d| d.id).collect();
        if let Some(absent) = layout.displays().find(|id| !connected.contains(id)) {
            return Err(Error::unknown_display(absent.get()));
        }

        let mut report = RestoreReport::default();
        for (target, uuids) in layout.iter() {
            for (position, uuid) in (1u32..).zip(uuids) {
                let Some(current) = self.locate_space(uuid) else {
                    warn!(uuid = %uuid, "recorded space no longer exists");
                    report.missing.push(uuid.clone());
                    continue;
                };
                if current.display == target {
                    continue;
                }

                let mut moved =
                    self.move_space_to_display(current.number, current.display, position, target);
                if !moved {
                    debug!(uuid = %uuid, "space move rejected, retrying");
                    thread::sleep(retry_delay);
                    moved = self.locate_space(uuid).is_some_and(|again| {
                        self.move_space_to_display(again.number, again.display, position, target)
                    });
                }

                if moved {
                    report.moved.push(uuid.clone());
                } else {
                    warn!(uuid = %uuid, position, "failed to move space");
                    report.failed.push(uuid.clone());
                }
            }
        }
        debug!(
            moved = report.moved.len(),
            failed = report.failed.len(),
            missing = report.missing.len(),
            "layout restored"
        );
        Ok(report)
    }
}

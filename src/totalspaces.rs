//! The TotalSpaces2 handle.
//!
//! [`TotalSpaces`] wraps the loaded library and exposes one safe method per
//! native entry point. Results from the library are passed through as-is:
//! a rejected request comes back as `false`, `0` or an empty string, exactly
//! as TotalSpaces2 reports it.
//!
//! # Example
//!
//! ```no_run
//! use totalspaces2::{DisplayId, TotalSpaces};
//!
//! let spaces = TotalSpaces::connect()?;
//!
//! spaces.on_space_will_change(|change| {
//!     println!("Moving from space {} to space {}", change.from, change.to);
//! });
//!
//! spaces.move_to_space(1, DisplayId::MAIN);
//!
//! let current = spaces.current_space_number(DisplayId::MAIN);
//! println!("Current space is called: {}", spaces.space_name(current, DisplayId::MAIN));
//!
//! spaces.set_space_name(1, "Home", DisplayId::MAIN)?;
//! # Ok::<(), totalspaces2::Error>(())
//! ```

use crate::callbacks;
use crate::config::LibraryConfig;
use crate::display::{Display, DisplayId};
use crate::error::{Error, Result};
use crate::ffi::NativeLibrary;
use crate::space::{AppBinding, SpaceChange, SpaceInfo, SpaceRef, SpaceType};
use crate::version::Versions;
use crate::window::{Window, WindowId};
use std::ffi::CString;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Handle to the TotalSpaces2 API.
///
/// Cloning is cheap; all clones share the loaded library, which stays mapped
/// until the last clone is dropped. Dropping the last clone also cancels any
/// registered notification handlers; a handler that captures a clone keeps
/// the library loaded until it is cancelled.
///
/// # Thread Safety
///
/// `TotalSpaces` is `Send + Sync`. The library serialises requests to
/// TotalSpaces2.app itself.
#[derive(Debug, Clone)]
pub struct TotalSpaces {
    native: Arc<Connection>,
}

/// The loaded library, detached from the callback registry when dropped.
#[derive(Debug)]
struct Connection {
    native: NativeLibrary,
}

impl std::ops::Deref for Connection {
    type Target = NativeLibrary;

    fn deref(&self) -> &NativeLibrary {
        &self.native
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        callbacks::detach(&self.native);
    }
}

impl TotalSpaces {
    /// Load the library described by `config`.
    ///
    /// No version check is made; see [`TotalSpaces::connect`].
    ///
    /// # Errors
    ///
    /// - `NotAvailable` off macOS or when no default location holds the dylib
    /// - `LibraryLoad` when an explicit path fails to open
    /// - `MissingSymbol` when the dylib lacks an entry point
    #[instrument(level = "debug")]
    pub fn load(config: &LibraryConfig) -> Result<Self> {
        let native = NativeLibrary::open(config)?;
        Ok(Self {
            native: Arc::new(Connection { native }),
        })
    }

    /// Load the library (honouring `TOTALSPACES2_LIB`) and check that it
    /// can talk to the running TotalSpaces2.
    ///
    /// # Errors
    ///
    /// Any error of [`TotalSpaces::load`], or `VersionMismatch` when the
    /// major API version differs from the dylib's.
    pub fn connect() -> Result<Self> {
        Self::load(&LibraryConfig::from_env())?.ensure_compatible()
    }

    /// Check if the library can be loaded on this system.
    #[must_use]
    pub fn is_available() -> bool {
        Self::load(&LibraryConfig::from_env()).is_ok()
    }

    fn ensure_compatible(self) -> Result<Self> {
        let versions = self.versions();
        if !versions.is_compatible() {
            warn!(%versions, "TotalSpaces2 API version mismatch");
            return Err(Error::version_mismatch(versions.api, versions.library));
        }
        debug!(%versions, "connected to TotalSpaces2");
        Ok(self)
    }

    #[cfg(test)]
    pub(crate) fn with_native(native: NativeLibrary) -> Self {
        Self {
            native: Arc::new(Connection { native }),
        }
    }

    /// API version served by TotalSpaces2.app, e.g. "2.1.0".
    #[must_use]
    pub fn api_version(&self) -> String {
        self.native.api_version()
    }

    /// Version of TotalSpaces2 running on the system, e.g. "2.9.17".
    #[must_use]
    pub fn total_spaces_version(&self) -> String {
        self.native.total_spaces_version()
    }

    /// Version of the loaded dylib. Its major component should match
    /// [`TotalSpaces::api_version`].
    #[must_use]
    pub fn lib_total_spaces_version(&self) -> String {
        self.native.lib_total_spaces_version()
    }

    /// All three versions at once.
    #[must_use]
    pub fn versions(&self) -> Versions {
        Versions {
            api: self.api_version(),
            library: self.lib_total_spaces_version(),
            total_spaces: self.total_spaces_version(),
        }
    }

    /// The API and dylib versions are identical.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.versions().is_exact_match()
    }

    /// Number of the current space on `display_id`. Numbering starts at 1.
    #[must_use]
    pub fn current_space_number(&self, display_id: DisplayId) -> u32 {
        self.native.current_space_number(display_id.get())
    }

    /// Name of a space; empty when the space number is not valid.
    #[must_use]
    pub fn space_name(&self, space: u32, display_id: DisplayId) -> String {
        self.native.space_name(space, display_id.get())
    }

    /// Custom name of a space, `None` if the user has not set one.
    #[must_use]
    pub fn custom_space_name(&self, space: u32, display_id: DisplayId) -> Option<String> {
        self.native.custom_space_name(space, display_id.get())
    }

    /// Kind of a space.
    ///
    /// Values TotalSpaces2 adds in future versions are reported as
    /// [`SpaceType::Desktop`].
    #[must_use]
    pub fn space_type(&self, space: u32, display_id: DisplayId) -> SpaceType {
        let raw = self.native.space_type(space, display_id.get());
        SpaceType::from_raw(raw).unwrap_or_else(|| {
            warn!(
                raw,
                space,
                display = display_id.get(),
                "unknown space type, treating as desktop"
            );
            SpaceType::Desktop
        })
    }

    /// UUID of a space; empty when the space number is not valid.
    #[must_use]
    pub fn space_uuid(&self, space: u32, display_id: DisplayId) -> String {
        self.native.space_uuid(space, display_id.get())
    }

    /// Total number of spaces on `display_id`, including fullscreen apps and
    /// the Dashboard when it is a space.
    #[must_use]
    pub fn number_of_spaces(&self, display_id: DisplayId) -> u32 {
        self.native.number_of_spaces(display_id.get())
    }

    /// Number of grid columns defined in TotalSpaces2.
    #[must_use]
    pub fn defined_columns(&self, display_id: DisplayId) -> u32 {
        self.native.defined_columns(display_id.get())
    }

    /// Set the number of grid columns.
    ///
    /// The number of desktops is unchanged; follow up with
    /// [`add_desktops`](Self::add_desktops) or
    /// [`remove_desktops`](Self::remove_desktops).
    #[instrument(level = "debug", skip(self))]
    pub fn set_defined_columns(&self, columns: u32, display_id: DisplayId) -> bool {
        self.native.set_defined_columns(columns, display_id.get())
    }

    /// Switch `display_id` to `space`. Returns `false` if the space number is
    /// invalid. A space-will-change notification is sent.
    #[instrument(level = "debug", skip(self))]
    pub fn move_to_space(&self, space: u32, display_id: DisplayId) -> bool {
        self.native.move_to_space(space, display_id.get())
    }

    /// Rename a space. Names are limited to 255 bytes of UTF-8.
    ///
    /// Returns the library's verdict: `false` if the name is too long or the
    /// space number is invalid. A layout-changed notification is sent when
    /// the name actually changes.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `name` contains a NUL byte.
    #[instrument(level = "debug", skip(self))]
    pub fn set_space_name(&self, space: u32, name: &str, display_id: DisplayId) -> Result<bool> {
        let name = CString::new(name)
            .map_err(|_| Error::invalid_input("space name contains a NUL byte"))?;
        Ok(self.native.set_space_name(space, &name, display_id.get()))
    }

    /// Move a window to a space. `window` must come from
    /// [`windows`](Self::windows).
    #[instrument(level = "debug", skip(self))]
    pub fn move_window_to_space(&self, window: WindowId, space: u32, display_id: DisplayId) -> bool {
        self.native.move_window_to_space(window.0, space, display_id.get())
    }

    /// Move a space to another position within its display's grid.
    #[instrument(level = "debug", skip(self))]
    pub fn move_space_to_position(&self, space: u32, position: u32, display_id: DisplayId) -> bool {
        self.native.move_space_to_position(space, position, display_id.get())
    }

    /// Move a space to a position on another display. Requires "Displays
    /// have separate Spaces".
    #[instrument(level = "debug", skip(self))]
    pub fn move_space_to_display(
        &self,
        space: u32,
        from: DisplayId,
        position: u32,
        to: DisplayId,
    ) -> bool {
        self.native
            .move_space_to_display(space, from.get(), position, to.get())
    }

    /// Add desktops to a display. Returns how many were added; `0` when
    /// `count` is zero or the display is already full.
    #[instrument(level = "debug", skip(self))]
    pub fn add_desktops(&self, count: u32, display_id: DisplayId) -> u32 {
        self.native.add_desktops(count, display_id.get())
    }

    /// Remove the highest-numbered desktops. Windows on them move to a
    /// remaining desktop. Returns `false` if `count` is zero or would leave
    /// no desktop.
    #[instrument(level = "debug", skip(self))]
    pub fn remove_desktops(&self, count: u32, display_id: DisplayId) -> bool {
        self.native.remove_desktops(count, display_id.get())
    }

    /// Bring a window to the front and activate it.
    #[instrument(level = "debug", skip(self))]
    pub fn set_front_window(&self, window: WindowId) {
        self.native.set_front_window(window.0);
    }

    /// Move a window's origin to `(x, y)`. There is no validation; windows
    /// can be placed off-screen.
    #[instrument(level = "debug", skip(self))]
    pub fn move_window(&self, window: WindowId, x: f32, y: f32) {
        self.native.move_window(window.0, x, y);
    }

    /// Pin an application to a space, to every space, or remove its pin.
    ///
    /// `bundle_id` is usually in reverse-DNS form, e.g. `com.apple.mail`.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if `bundle_id` or the UUID contains a NUL byte.
    #[instrument(level = "debug", skip(self))]
    pub fn bind_app_to_space(&self, bundle_id: &str, binding: &AppBinding) -> Result<()> {
        let bundle = CString::new(bundle_id)
            .map_err(|_| Error::invalid_input("bundle id contains a NUL byte"))?;
        let uuid = binding
            .native_uuid()
            .map(CString::new)
            .transpose()
            .map_err(|_| Error::invalid_input("space UUID contains a NUL byte"))?;
        self.native.bind_app_to_space(&bundle, uuid.as_deref());
        Ok(())
    }

    /// Snapshot of every display.
    #[instrument(level = "debug", skip(self))]
    #[must_use]
    pub fn displays(&self) -> Vec<Display> {
        let displays: Vec<Display> = self
            .native
            .display_list()
            .into_iter()
            .map(Display::from)
            .collect();
        debug!(count = displays.len(), "fetched displays");
        displays
    }

    /// Snapshot of every window, front to back within each space.
    #[instrument(level = "debug", skip(self))]
    #[must_use]
    pub fn windows(&self) -> Vec<Window> {
        let windows: Vec<Window> = self
            .native
            .window_list()
            .into_iter()
            .map(Window::from)
            .collect();
        debug!(count = windows.len(), "fetched windows");
        windows
    }

    /// Windows on one space, front to back.
    ///
    /// Windows report concrete display ids, so [`DisplayId::MAIN`] matches
    /// nothing here; take the id from [`displays`](Self::displays).
    #[must_use]
    pub fn windows_on(&self, space: SpaceRef) -> Vec<Window> {
        self.windows()
            .into_iter()
            .filter(|w| w.space_number == space.number && w.display_id == space.display)
            .collect()
    }

    /// UUIDs of spaces `1..=number_of_spaces(display_id)`, in order.
    #[must_use]
    pub fn space_uuids(&self, display_id: DisplayId) -> Vec<String> {
        (1..=self.number_of_spaces(display_id))
            .map(|space| self.space_uuid(space, display_id))
            .collect()
    }

    /// Gather name, custom name, type and UUID of one space.
    #[must_use]
    pub fn space_info(&self, space: SpaceRef) -> SpaceInfo {
        SpaceInfo {
            space,
            name: self.space_name(space.number, space.display),
            custom_name: self.custom_space_name(space.number, space.display),
            space_type: self.space_type(space.number, space.display),
            uuid: self.space_uuid(space.number, space.display),
        }
    }

    /// Find the space with `uuid` on any connected display.
    ///
    /// Space numbers change as spaces are added, removed and reordered; the
    /// UUID does not. Displays are searched in the order
    /// [`displays`](Self::displays) reports them.
    #[must_use]
    pub fn locate_space(&self, uuid: &str) -> Option<SpaceRef> {
        if uuid.is_empty() {
            return None;
        }
        self.displays().into_iter().find_map(|display| {
            (1..=self.number_of_spaces(display.id))
                .find(|&number| self.space_uuid(number, display.id) == uuid)
                .map(|number| SpaceRef::new(number, display.id))
        })
    }

    /// Call `handler` just before the visible space changes.
    ///
    /// Replaces any handler registered earlier, from any handle.
    pub fn on_space_will_change<F>(&self, handler: F)
    where
        F: Fn(SpaceChange) + Send + Sync + 'static,
    {
        callbacks::register_space_will_change(&self.native, Arc::new(handler));
    }

    /// Stop space-will-change notifications.
    pub fn cancel_space_will_change(&self) {
        callbacks::cancel_space_will_change(&self.native);
    }

    /// Call `handler` whenever the space layout changes (a fullscreen app
    /// appears, a space is renamed, the grid is resized). Re-fetch any
    /// space information you hold when it fires.
    ///
    /// Replaces any handler registered earlier, from any handle.
    pub fn on_layout_changed<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        callbacks::register_layout_changed(&self.native, Arc::new(handler));
    }

    /// Stop layout-changed notifications.
    pub fn cancel_layout_changed(&self) {
        callbacks::cancel_layout_changed(&self.native);
    }
}

//! Runtime-loaded TotalSpaces2 symbol table and marshalling.
//!
//! # Safety
//!
//! Every function pointer in [`Symbols`] is resolved from the dylib with the
//! prototype declared in [`super::sys`]. Strings and lists handed out by the
//! library are copied into Rust memory and then released through the matching
//! `tsapi_free*` entry point exactly once. NULL results are never released.
//!
//! # Thread Safety
//!
//! The symbol table is plain function pointers and the `Library` handle is
//! `Send + Sync`, so [`NativeLibrary`] can be shared behind an `Arc`.

use super::sys::{
    self, tsapi_display, tsapi_displays, tsapi_window, tsapi_windows, CGDirectDisplayID,
};
use crate::config::LibraryConfig;
use crate::error::{Error, Result};
use libloading::Library;
use std::ffi::{c_char, c_uint, CStr};
use std::path::Path;
use std::{ptr, slice};
use tracing::{debug, trace, warn};

/// Every `tsapi_*` entry point the bindings use.
pub struct Symbols {
    pub api_version: sys::StringFn,
    pub total_spaces_version: sys::StringFn,
    pub lib_total_spaces_version: sys::StringFn,
    pub free_string: sys::FreeStringFn,
    pub current_space_number_on_display: sys::DisplayCountFn,
    pub space_name_for_space_number_on_display: sys::SpaceStringFn,
    pub custom_name_for_space_number_on_display: sys::SpaceStringFn,
    pub space_type_for_space_number_on_display: sys::SpaceTypeFn,
    pub uuid_for_space_number_on_display: sys::SpaceStringFn,
    pub number_of_spaces_on_display: sys::DisplayCountFn,
    pub defined_columns_on_display: sys::DisplayCountFn,
    pub set_defined_columns_on_display: sys::DisplayActionFn,
    pub move_to_space_on_display: sys::DisplayActionFn,
    pub set_name_for_space_on_display: sys::SetNameFn,
    pub move_window_to_space_on_display: sys::MoveWindowToSpaceFn,
    pub move_space_to_position_on_display: sys::MoveSpaceToPositionFn,
    pub move_space_on_display_to_position_on_display: sys::MoveSpaceToDisplayFn,
    pub add_desktops_on_display: sys::AddDesktopsFn,
    pub remove_desktops_on_display: sys::DisplayActionFn,
    pub set_front_window: sys::SetFrontWindowFn,
    pub move_window: sys::MoveWindowFn,
    pub bind_app_to_space: sys::BindAppToSpaceFn,
    pub display_list: sys::DisplayListFn,
    pub free_display_list: sys::FreeDisplayListFn,
    pub window_list: sys::WindowListFn,
    pub free_window_list: sys::FreeWindowListFn,
    pub set_space_will_change_callback: sys::SetSpaceChangeCallbackFn,
    pub unset_space_will_change_callback: sys::UnsetCallbackFn,
    pub set_layout_changed_callback: sys::SetLayoutChangedCallbackFn,
    pub unset_layout_changed_callback: sys::UnsetCallbackFn,
}

impl Symbols {
    /// Resolve every entry point from an opened library.
    fn resolve(library: &Library) -> Result<Self> {
        macro_rules! symbol {
            ($name:literal) => {{
                // SAFETY: the field receiving this symbol is typed with the
                // prototype TSLib.h declares for it, and the pointer is copied
                // out while `library` is alive. NativeLibrary keeps the
                // Library alongside the copied pointers.
                let sym = unsafe { library.get(concat!($name, "\0").as_bytes()) }
                    .map_err(|_| Error::missing_symbol($name))?;
                *sym
            }};
        }

        Ok(Self {
            api_version: symbol!("tsapi_apiVersion"),
            total_spaces_version: symbol!("tsapi_totalSpacesVersion"),
            lib_total_spaces_version: symbol!("tsapi_libTotalSpacesVersion"),
            free_string: symbol!("tsapi_freeString"),
            current_space_number_on_display: symbol!("tsapi_currentSpaceNumberOnDisplay"),
            space_name_for_space_number_on_display: symbol!(
                "tsapi_spaceNameForSpaceNumberOnDisplay"
            ),
            custom_name_for_space_number_on_display: symbol!(
                "tsapi_customNameForSpaceNumberOnDisplay"
            ),
            space_type_for_space_number_on_display: symbol!(
                "tsapi_spaceTypeForSpaceNumberOnDisplay"
            ),
            uuid_for_space_number_on_display: symbol!("tsapi_uuidForSpaceNumberOnDisplay"),
            number_of_spaces_on_display: symbol!("tsapi_numberOfSpacesOnDisplay"),
            defined_columns_on_display: symbol!("tsapi_definedColumnsOnDisplay"),
            set_defined_columns_on_display: symbol!("tsapi_setDefinedColumnsOnDisplay"),
            move_to_space_on_display: symbol!("tsapi_moveToSpaceOnDisplay"),
            set_name_for_space_on_display: symbol!("tsapi_setNameForSpaceOnDisplay"),
            move_window_to_space_on_display: symbol!("tsapi_moveWindowToSpaceOnDisplay"),
            move_space_to_position_on_display: symbol!("tsapi_moveSpaceToPositionOnDisplay"),
            move_space_on_display_to_position_on_display: symbol!(
                "tsapi_moveSpaceOnDisplayToPositionOnDisplay"
            ),
            add_desktops_on_display: symbol!("tsapi_addDesktopsOnDisplay"),
            remove_desktops_on_display: symbol!("tsapi_removeDesktopsOnDisplay"),
            set_front_window: symbol!("tsapi_setFrontWindow"),
            move_window: symbol!("tsapi_moveWindow"),
            bind_app_to_space: symbol!("tsapi_bindAppToSpace"),
            display_list: symbol!("tsapi_displayList"),
            free_display_list: symbol!("tsapi_freeDisplayList"),
            window_list: symbol!("tsapi_windowList"),
            free_window_list: symbol!("tsapi_freeWindowList"),
            set_space_will_change_callback: symbol!("tsapi_setSpaceWillChangeCallback"),
            unset_space_will_change_callback: symbol!("tsapi_unsetSpaceWillChangeCallback"),
            set_layout_changed_callback: symbol!("tsapi_setLayoutChangedCallback"),
            unset_layout_changed_callback: symbol!("tsapi_unsetLayoutChangedCallback"),
        })
    }
}

/// A display as copied out of `tsapi_displayList`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayRecord {
    pub id: CGDirectDisplayID,
    pub name: String,
    pub width: usize,
    pub height: usize,
}

/// A window as copied out of `tsapi_windowList`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WindowRecord {
    pub app_name: String,
    pub window_id: u32,
    pub is_on_all_spaces: bool,
    pub title: String,
    pub frame: String,
    pub display_id: CGDirectDisplayID,
    pub space_number: u32,
}

/// The loaded dylib together with its resolved entry points.
pub struct NativeLibrary {
    symbols: Symbols,
    // Declared after `symbols` so the pointers never outlive the image.
    library: Option<Library>,
}

impl std::fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("loaded", &self.library.is_some())
            .finish_non_exhaustive()
    }
}

impl NativeLibrary {
    /// Open the dylib described by `config`.
    ///
    /// With the default search, candidates that fail to open are skipped and
    /// `NotAvailable` is returned once all are exhausted. An explicit path is
    /// reported as `LibraryLoad` on failure.
    pub fn open(config: &LibraryConfig) -> Result<Self> {
        if !cfg!(target_os = "macos") {
            return Err(Error::not_available("TotalSpaces2 only runs on macOS"));
        }

        let mut tried = Vec::new();
        for candidate in config.candidates() {
            match Self::open_path(&candidate) {
                Ok(library) => return Ok(library),
                Err(Error::LibraryLoad { path, message }) if !config.is_explicit() => {
                    debug!(%path, %message, "library candidate rejected");
                    tried.push(path);
                }
                Err(e) => return Err(e),
            }
        }

        Err(Error::not_available(format!(
            "libtotalspaces2api.dylib not found (tried {})",
            tried.join(", ")
        )))
    }

    fn open_path(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "opening TotalSpaces2 library");
        // SAFETY: opening the dylib runs its load-time initialisers, which
        // only register Objective-C classes. No Rust state is touched.
        let library = unsafe { Library::new(path) }
            .map_err(|e| Error::library_load(path.display().to_string(), e.to_string()))?;
        let symbols = Symbols::resolve(&library)?;
        debug!(path = %path.display(), "TotalSpaces2 library loaded");
        Ok(Self {
            symbols,
            library: Some(library),
        })
    }

    /// Wrap a symbol table that is not backed by a loaded image.
    #[cfg(test)]
    pub const fn from_symbols(symbols: Symbols) -> Self {
        Self {
            symbols,
            library: None,
        }
    }

    fn take(&self, ptr: *mut c_char) -> Option<String> {
        // SAFETY: every caller passes a pointer just returned by a tsapi_*
        // function documented as "call tsapi_freeString when finished".
        unsafe { take_string(ptr, self.symbols.free_string) }
    }

    pub fn api_version(&self) -> String {
        // SAFETY: no arguments; returns an owned C string or NULL.
        self.take(unsafe { (self.symbols.api_version)() })
            .unwrap_or_default()
    }

    pub fn total_spaces_version(&self) -> String {
        // SAFETY: no arguments; returns an owned C string or NULL.
        self.take(unsafe { (self.symbols.total_spaces_version)() })
            .unwrap_or_default()
    }

    pub fn lib_total_spaces_version(&self) -> String {
        // SAFETY: no arguments; returns an owned C string or NULL.
        self.take(unsafe { (self.symbols.lib_total_spaces_version)() })
            .unwrap_or_default()
    }

    pub fn current_space_number(&self, display: CGDirectDisplayID) -> u32 {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.current_space_number_on_display)(display) }
    }

    pub fn space_name(&self, space: u32, display: CGDirectDisplayID) -> String {
        // SAFETY: scalar arguments; returns an owned C string or NULL.
        self.take(unsafe { (self.symbols.space_name_for_space_number_on_display)(space, display) })
            .unwrap_or_default()
    }

    pub fn custom_space_name(&self, space: u32, display: CGDirectDisplayID) -> Option<String> {
        // SAFETY: scalar arguments; NULL means no custom name is set.
        self.take(unsafe {
            (self.symbols.custom_name_for_space_number_on_display)(space, display)
        })
    }

    pub fn space_type(&self, space: u32, display: CGDirectDisplayID) -> c_uint {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.space_type_for_space_number_on_display)(space, display) }
    }

    pub fn space_uuid(&self, space: u32, display: CGDirectDisplayID) -> String {
        // SAFETY: scalar arguments; returns an owned C string or NULL.
        self.take(unsafe { (self.symbols.uuid_for_space_number_on_display)(space, display) })
            .unwrap_or_default()
    }

    pub fn number_of_spaces(&self, display: CGDirectDisplayID) -> u32 {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.number_of_spaces_on_display)(display) }
    }

    pub fn defined_columns(&self, display: CGDirectDisplayID) -> u32 {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.defined_columns_on_display)(display) }
    }

    pub fn set_defined_columns(&self, columns: u32, display: CGDirectDisplayID) -> bool {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.set_defined_columns_on_display)(columns, display) }
    }

    pub fn move_to_space(&self, space: u32, display: CGDirectDisplayID) -> bool {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.move_to_space_on_display)(space, display) }
    }

    pub fn set_space_name(&self, space: u32, name: &CStr, display: CGDirectDisplayID) -> bool {
        // SAFETY: `name` is NUL-terminated and outlives the call. The library
        // copies the name and never writes through the pointer.
        unsafe {
            (self.symbols.set_name_for_space_on_display)(space, name.as_ptr().cast_mut(), display)
        }
    }

    pub fn move_window_to_space(
        &self,
        window: u32,
        space: u32,
        display: CGDirectDisplayID,
    ) -> bool {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.move_window_to_space_on_display)(window, space, display) }
    }

    pub fn move_space_to_position(
        &self,
        space: u32,
        position: u32,
        display: CGDirectDisplayID,
    ) -> bool {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.move_space_to_position_on_display)(space, position, display) }
    }

    pub fn move_space_to_display(
        &self,
        space: u32,
        from: CGDirectDisplayID,
        position: u32,
        to: CGDirectDisplayID,
    ) -> bool {
        // SAFETY: scalar arguments only.
        unsafe {
            (self.symbols.move_space_on_display_to_position_on_display)(space, from, position, to)
        }
    }

    pub fn add_desktops(&self, count: u32, display: CGDirectDisplayID) -> u32 {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.add_desktops_on_display)(count, display) }
    }

    pub fn remove_desktops(&self, count: u32, display: CGDirectDisplayID) -> bool {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.remove_desktops_on_display)(count, display) }
    }

    pub fn set_front_window(&self, window: u32) {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.set_front_window)(window) }
    }

    pub fn move_window(&self, window: u32, x: f32, y: f32) {
        // SAFETY: scalar arguments only.
        unsafe { (self.symbols.move_window)(window, x, y) }
    }

    pub fn bind_app_to_space(&self, bundle_id: &CStr, space_uuid: Option<&CStr>) {
        let uuid = space_uuid.map_or(ptr::null_mut(), |u| u.as_ptr().cast_mut());
        // SAFETY: both strings are NUL-terminated and outlive the call; NULL
        // for the UUID is the documented way to delete a binding.
        unsafe { (self.symbols.bind_app_to_space)(bundle_id.as_ptr().cast_mut(), uuid) }
    }

    pub fn display_list(&self) -> Vec<DisplayRecord> {
        // SAFETY: no arguments; returns an owned list or NULL.
        let list = unsafe { (self.symbols.display_list)() };
        if list.is_null() {
            warn!("tsapi_displayList returned NULL");
            return Vec::new();
        }
        // SAFETY: `list` is non-null and stays valid until it is freed below.
        let records = unsafe { copy_displays(&*list) };
        // SAFETY: `list` came from tsapi_displayList and is released once.
        unsafe { (self.symbols.free_display_list)(list) };
        trace!(count = records.len(), "released native display list");
        records
    }

    pub fn window_list(&self) -> Vec<WindowRecord> {
        // SAFETY: no arguments; returns an owned list or NULL.
        let list = unsafe { (self.symbols.window_list)() };
        if list.is_null() {
            warn!("tsapi_windowList returned NULL");
            return Vec::new();
        }
        // SAFETY: `list` is non-null and stays valid until it is freed below.
        let records = unsafe { copy_windows(&*list) };
        // SAFETY: `list` came from tsapi_windowList and is released once.
        unsafe { (self.symbols.free_window_list)(list) };
        trace!(count = records.len(), "released native window list");
        records
    }

    pub fn set_space_will_change_callback(&self, callback: sys::space_change_callback_t) {
        // SAFETY: `callback` is a 'static extern "C" fn with the expected
        // signature; it stays valid for the whole process.
        unsafe { (self.symbols.set_space_will_change_callback)(callback) }
    }

    pub fn unset_space_will_change_callback(&self) {
        // SAFETY: no arguments.
        unsafe { (self.symbols.unset_space_will_change_callback)() }
    }

    pub fn set_layout_changed_callback(&self, callback: sys::space_layout_changed_callback_t) {
        // SAFETY: `callback` is a 'static extern "C" fn with the expected
        // signature; it stays valid for the whole process.
        unsafe { (self.symbols.set_layout_changed_callback)(callback) }
    }

    pub fn unset_layout_changed_callback(&self) {
        // SAFETY: no arguments.
        unsafe { (self.symbols.unset_layout_changed_callback)() }
    }
}

/// Copy a native string into Rust memory and release it.
///
/// # Safety
///
/// `ptr` must be NULL or a NUL-terminated string that `free` accepts and that
/// nobody else will release.
unsafe fn take_string(ptr: *mut c_char, free: sys::FreeStringFn) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let owned = borrow_string(ptr);
    free(ptr);
    trace!("released native string");
    Some(owned)
}

/// Copy a string field of a native struct. NULL becomes empty.
///
/// # Safety
///
/// `ptr` must be NULL or a valid NUL-terminated string.
unsafe fn borrow_string(ptr: *const c_char) -> String {
    if ptr.is_null() {
        return String::new();
    }
    CStr::from_ptr(ptr).to_string_lossy().into_owned()
}

/// View a native array as a slice.
///
/// # Safety
///
/// When `ptr` is non-null it must point to `count` initialised elements that
/// outlive `'a`.
unsafe fn native_slice<'a, T>(ptr: *const T, count: c_uint) -> &'a [T] {
    if count == 0 {
        return &[];
    }
    if ptr.is_null() {
        warn!(count, "native list reports entries but has no storage");
        return &[];
    }
    slice::from_raw_parts(ptr, count as usize)
}

/// # Safety
///
/// `list` must be a live `tsapi_displays` returned by the library.
unsafe fn copy_displays(list: &tsapi_displays) -> Vec<DisplayRecord> {
    native_slice(list.displays, list.displaysCount)
        .iter()
        .map(|d: &tsapi_display| DisplayRecord {
            id: d.displayId,
            name: borrow_string(d.displayName),
            width: d.width,
            height: d.height,
        })
        .collect()
}

/// # Safety
///
/// `list` must be a live `tsapi_windows` returned by the library.
unsafe fn copy_windows(list: &tsapi_windows) -> Vec<WindowRecord> {
    native_slice(list.windows, list.windowCount)
        .iter()
        .map(|w: &tsapi_window| WindowRecord {
            app_name: borrow_string(w.appName),
            window_id: w.windowId,
            is_on_all_spaces: w.isOnAllSpaces,
            title: borrow_string(w.title),
            frame: borrow_string(w.frame),
            display_id: w.displayID,
            space_number: w.spaceNumber,
        })
        .collect()
}

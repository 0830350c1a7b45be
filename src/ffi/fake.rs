//! In-process stand-in for `libtotalspaces2api.dylib`, used by unit tests.
//!
//! Every entry point allocates the way the real library does (strings and
//! lists owned by the caller until the matching free) and records what it
//! handed out, so tests can assert that each allocation is released exactly
//! once.

use super::library::Symbols;
use super::sys::{
    space_change_callback_t, space_layout_changed_callback_t, tsapi_display, tsapi_displays,
    tsapi_window, tsapi_windows, CGDirectDisplayID,
};
use std::collections::{HashMap, HashSet};
use std::ffi::{c_char, c_float, c_uint, CStr, CString};
use std::ptr;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};

/// A display the fake reports.
#[derive(Debug, Clone, Default)]
pub struct FakeDisplay {
    pub id: CGDirectDisplayID,
    pub name: String,
    pub width: usize,
    pub height: usize,
}

impl FakeDisplay {
    pub fn new(id: CGDirectDisplayID, name: &str, width: usize, height: usize) -> Self {
        Self {
            id,
            name: name.to_string(),
            width,
            height,
        }
    }
}

/// A window the fake reports.
#[derive(Debug, Clone, Default)]
pub struct FakeWindow {
    pub app_name: String,
    pub window_id: u32,
    pub is_on_all_spaces: bool,
    pub title: String,
    pub frame: String,
    pub display_id: CGDirectDisplayID,
    pub space_number: u32,
}

/// Allocation bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Counters {
    pub strings_allocated: usize,
    pub strings_freed: usize,
    pub lists_allocated: usize,
    pub lists_freed: usize,
    /// Frees of pointers that are not live (double free or foreign pointer).
    pub invalid_frees: usize,
}

/// Everything the fake library answers with.
#[derive(Default)]
pub struct FakeState {
    pub api_version: Option<String>,
    pub raw_api_version: Option<Vec<u8>>,
    pub lib_version: Option<String>,
    pub total_spaces_version: Option<String>,
    pub current_space: u32,
    pub space_count: u32,
    pub columns: u32,
    pub space_names: HashMap<u32, String>,
    pub custom_names: HashMap<u32, String>,
    pub space_types: HashMap<u32, c_uint>,
    pub space_uuids: HashMap<u32, String>,
    /// Per-display space UUIDs in space order. A display listed here answers
    /// space counts and UUIDs from this table, and space moves between listed
    /// displays rearrange it.
    pub display_spaces: HashMap<CGDirectDisplayID, Vec<String>>,
    /// Number of upcoming space moves to reject even when mutations are
    /// accepted.
    pub failing_moves: u32,
    pub accept_mutations: bool,
    pub desktops_added: u32,
    pub displays: Vec<FakeDisplay>,
    pub windows: Vec<FakeWindow>,
    pub null_lists: bool,
    pub detach_window_storage: bool,
    pub calls: Vec<String>,
    pub bindings: Vec<(String, Option<String>)>,
    pub space_change_callback: Option<space_change_callback_t>,
    pub layout_changed_callback: Option<space_layout_changed_callback_t>,
    pub space_change_unsets: usize,
    pub layout_changed_unsets: usize,
    counters: Counters,
    live_strings: HashSet<usize>,
    live_lists: HashSet<usize>,
}

static TEST_LOCK: Mutex<()> = Mutex::new(());
static STATE: OnceLock<Mutex<FakeState>> = OnceLock::new();

fn state() -> MutexGuard<'static, FakeState> {
    STATE
        .get_or_init(|| Mutex::new(FakeState::default()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Serialise tests that use the fake and start from a clean state.
pub fn reset() -> MutexGuard<'static, ()> {
    let guard = TEST_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    *state() = FakeState::default();
    guard
}

/// Inspect or configure the fake.
pub fn with_state<R>(f: impl FnOnce(&mut FakeState) -> R) -> R {
    f(&mut state())
}

pub fn counters() -> Counters {
    state().counters
}

/// Deliver a space-will-change notification the way the native side would.
///
/// Returns `false` when no callback is installed.
pub fn fire_space_will_change(from: u32, to: u32, display: CGDirectDisplayID) -> bool {
    let callback = state().space_change_callback;
    callback.map_or(false, |cb| {
        cb(from, to, display);
        true
    })
}

/// Deliver a layout-changed notification the way the native side would.
pub fn fire_layout_changed() -> bool {
    let callback = state().layout_changed_callback;
    callback.map_or(false, |cb| {
        cb();
        true
    })
}

pub fn symbols() -> Symbols {
    Symbols {
        api_version,
        total_spaces_version,
        lib_total_spaces_version,
        free_string,
        current_space_number_on_display,
        space_name_for_space_number_on_display,
        custom_name_for_space_number_on_display,
        space_type_for_space_number_on_display,
        uuid_for_space_number_on_display,
        number_of_spaces_on_display,
        defined_columns_on_display,
        set_defined_columns_on_display,
        move_to_space_on_display,
        set_name_for_space_on_display,
        move_window_to_space_on_display,
        move_space_to_position_on_display,
        move_space_on_display_to_position_on_display,
        add_desktops_on_display,
        remove_desktops_on_display,
        set_front_window,
        move_window,
        bind_app_to_space,
        display_list,
        free_display_list,
        window_list,
        free_window_list,
        set_space_will_change_callback,
        unset_space_will_change_callback,
        set_layout_changed_callback,
        unset_layout_changed_callback,
    }
}

fn alloc_string(s: &mut FakeState, bytes: Vec<u8>) -> *mut c_char {
    let ptr = CString::new(bytes).unwrap_or_default().into_raw();
    s.counters.strings_allocated += 1;
    s.live_strings.insert(ptr as usize);
    ptr
}

fn alloc_optional(s: &mut FakeState, value: Option<String>) -> *mut c_char {
    value.map_or(ptr::null_mut(), |v| alloc_string(s, v.into_bytes()))
}

fn field_string(value: &str) -> *mut c_char {
    CString::new(value).unwrap_or_default().into_raw()
}

/// # Safety
///
/// `ptr` must come from [`field_string`] and not have been reclaimed.
unsafe fn reclaim_field(ptr: *mut c_char) {
    if !ptr.is_null() {
        drop(CString::from_raw(ptr));
    }
}

/// # Safety
///
/// `ptr` must be NULL or a valid NUL-terminated string.
unsafe fn read_arg(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy().into_owned())
    }
}

extern "C" fn api_version() -> *mut c_char {
    let mut s = state();
    if let Some(raw) = s.raw_api_version.take() {
        return alloc_string(&mut s, raw);
    }
    let value = s.api_version.clone();
    alloc_optional(&mut s, value)
}

extern "C" fn total_spaces_version() -> *mut c_char {
    let mut s = state();
    let value = s.total_spaces_version.clone();
    alloc_optional(&mut s, value)
}

extern "C" fn lib_total_spaces_version() -> *mut c_char {
    let mut s = state();
    let value = s.lib_version.clone();
    alloc_optional(&mut s, value)
}

unsafe extern "C" fn free_string(ptr: *mut c_char) {
    let mut s = state();
    if s.live_strings.remove(&(ptr as usize)) {
        s.counters.strings_freed += 1;
        drop(CString::from_raw(ptr));
    } else {
        s.counters.invalid_frees += 1;
    }
}

extern "C" fn current_space_number_on_display(_display: CGDirectDisplayID) -> c_uint {
    state().current_space
}

extern "C" fn space_name_for_space_number_on_display(
    space: c_uint,
    _display: CGDirectDisplayID,
) -> *mut c_char {
    let mut s = state();
    let name = s.space_names.get(&space).cloned().unwrap_or_default();
    alloc_string(&mut s, name.into_bytes())
}

extern "C" fn custom_name_for_space_number_on_display(
    space: c_uint,
    _display: CGDirectDisplayID,
) -> *mut c_char {
    let mut s = state();
    let name = s.custom_names.get(&space).cloned();
    alloc_optional(&mut s, name)
}

extern "C" fn space_type_for_space_number_on_display(
    space: c_uint,
    _display: CGDirectDisplayID,
) -> c_uint {
    state().space_types.get(&space).copied().unwrap_or_default()
}

extern "C" fn uuid_for_space_number_on_display(
    space: c_uint,
    display: CGDirectDisplayID,
) -> *mut c_char {
    let mut s = state();
    let uuid = match s.display_spaces.get(&display) {
        Some(spaces) => space
            .checked_sub(1)
            .and_then(|index| spaces.get(index as usize))
            .cloned(),
        None => s.space_uuids.get(&space).cloned(),
    };
    alloc_string(&mut s, uuid.unwrap_or_default().into_bytes())
}

extern "C" fn number_of_spaces_on_display(display: CGDirectDisplayID) -> c_uint {
    let s = state();
    s.display_spaces
        .get(&display)
        .map_or(s.space_count, |spaces| spaces.len() as c_uint)
}

extern "C" fn defined_columns_on_display(_display: CGDirectDisplayID) -> c_uint {
    state().columns
}

fn record(call: String) -> bool {
    let mut s = state();
    s.calls.push(call);
    s.accept_mutations
}

extern "C" fn set_defined_columns_on_display(columns: c_uint, display: CGDirectDisplayID) -> bool {
    let accepted = record(format!("setDefinedColumns({columns}, {display})"));
    if accepted {
        state().columns = columns;
    }
    accepted
}

extern "C" fn move_to_space_on_display(space: c_uint, display: CGDirectDisplayID) -> bool {
    let accepted = record(format!("moveToSpace({space}, {display})"));
    if accepted {
        state().current_space = space;
    }
    accepted
}

unsafe extern "C" fn set_name_for_space_on_display(
    space: c_uint,
    name: *mut c_char,
    display: CGDirectDisplayID,
) -> bool {
    let name = read_arg(name).unwrap_or_default();
    let accepted = record(format!("setNameForSpace({space}, {name:?}, {display})"));
    if accepted {
        state().space_names.insert(space, name);
    }
    accepted
}

extern "C" fn move_window_to_space_on_display(
    window: c_uint,
    space: c_uint,
    display: CGDirectDisplayID,
) -> bool {
    record(format!("moveWindowToSpace({window}, {space}, {display})"))
}

extern "C" fn move_space_to_position_on_display(
    space: c_uint,
    position: c_uint,
    display: CGDirectDisplayID,
) -> bool {
    record(format!("moveSpaceToPosition({space}, {position}, {display})"))
}

extern "C" fn move_space_on_display_to_position_on_display(
    space: c_uint,
    from: CGDirectDisplayID,
    position: c_uint,
    to: CGDirectDisplayID,
) -> bool {
    if !record(format!("moveSpaceToDisplay({space}, {from}, {position}, {to})")) {
        return false;
    }
    let mut s = state();
    if s.failing_moves > 0 {
        s.failing_moves -= 1;
        return false;
    }
    if !s.display_spaces.contains_key(&from) || !s.display_spaces.contains_key(&to) {
        return true;
    }
    let index = space as usize;
    let moved = match s.display_spaces.get_mut(&from) {
        Some(spaces) if index >= 1 && index <= spaces.len() => spaces.remove(index - 1),
        _ => return false,
    };
    if let Some(spaces) = s.display_spaces.get_mut(&to) {
        let at = (position as usize).saturating_sub(1).min(spaces.len());
        spaces.insert(at, moved);
    }
    true
}

extern "C" fn add_desktops_on_display(count: c_uint, display: CGDirectDisplayID) -> c_uint {
    if record(format!("addDesktops({count}, {display})")) {
        state().desktops_added
    } else {
        0
    }
}

extern "C" fn remove_desktops_on_display(count: c_uint, display: CGDirectDisplayID) -> bool {
    record(format!("removeDesktops({count}, {display})"))
}

extern "C" fn set_front_window(window: c_uint) {
    record(format!("setFrontWindow({window})"));
}

extern "C" fn move_window(window: c_uint, x: c_float, y: c_float) {
    record(format!("moveWindow({window}, {x}, {y})"));
}

unsafe extern "C" fn bind_app_to_space(bundle_id: *mut c_char, space_uuid: *mut c_char) {
    let bundle = read_arg(bundle_id).unwrap_or_default();
    let uuid = read_arg(space_uuid);
    state().bindings.push((bundle, uuid));
}

extern "C" fn display_list() -> *mut tsapi_displays {
    let mut s = state();
    if s.null_lists {
        return ptr::null_mut();
    }
    let entries: Box<[tsapi_display]> = s
        .displays
        .iter()
        .map(|d| tsapi_display {
            displayId: d.id,
            displayName: field_string(&d.name),
            width: d.width,
            height: d.height,
        })
        .collect();
    let count = entries.len() as c_uint;
    let list = Box::into_raw(Box::new(tsapi_displays {
        displaysCount: count,
        displays: Box::into_raw(entries).cast::<tsapi_display>(),
    }));
    s.counters.lists_allocated += 1;
    s.live_lists.insert(list as usize);
    list
}

unsafe extern "C" fn free_display_list(list: *mut tsapi_displays) {
    let mut s = state();
    if !s.live_lists.remove(&(list as usize)) {
        s.counters.invalid_frees += 1;
        return;
    }
    s.counters.lists_freed += 1;
    let list = Box::from_raw(list);
    let entries = Box::from_raw(ptr::slice_from_raw_parts_mut(
        list.displays,
        list.displaysCount as usize,
    ));
    for entry in entries.iter() {
        reclaim_field(entry.displayName);
    }
}

extern "C" fn window_list() -> *mut tsapi_windows {
    let mut s = state();
    if s.null_lists {
        return ptr::null_mut();
    }
    let count = s.windows.len() as c_uint;
    let windows = if s.detach_window_storage {
        ptr::null_mut()
    } else {
        let entries: Box<[tsapi_window]> = s
            .windows
            .iter()
            .map(|w| tsapi_window {
                appName: field_string(&w.app_name),
                windowId: w.window_id,
                isOnAllSpaces: w.is_on_all_spaces,
                title: field_string(&w.title),
                frame: field_string(&w.frame),
                displayID: w.display_id,
                spaceNumber: w.space_number,
            })
            .collect();
        Box::into_raw(entries).cast::<tsapi_window>()
    };
    let list = Box::into_raw(Box::new(tsapi_windows {
        windowCount: count,
        windows,
    }));
    s.counters.lists_allocated += 1;
    s.live_lists.insert(list as usize);
    list
}

unsafe extern "C" fn free_window_list(list: *mut tsapi_windows) {
    let mut s = state();
    if !s.live_lists.remove(&(list as usize)) {
        s.counters.invalid_frees += 1;
        return;
    }
    s.counters.lists_freed += 1;
    let list = Box::from_raw(list);
    if list.windows.is_null() {
        return;
    }
    let entries = Box::from_raw(ptr::slice_from_raw_parts_mut(
        list.windows,
        list.windowCount as usize,
    ));
    for entry in entries.iter() {
        reclaim_field(entry.appName);
        reclaim_field(entry.title);
        reclaim_field(entry.frame);
    }
}

extern "C" fn set_space_will_change_callback(callback: space_change_callback_t) {
    state().space_change_callback = Some(callback);
}

extern "C" fn unset_space_will_change_callback() {
    let mut s = state();
    s.space_change_callback = None;
    s.space_change_unsets += 1;
}

extern "C" fn set_layout_changed_callback(callback: space_layout_changed_callback_t) {
    state().layout_changed_callback = Some(callback);
}

extern "C" fn unset_layout_changed_callback() {
    let mut s = state();
    s.layout_changed_callback = None;
    s.layout_changed_unsets += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_double_free_is_detected() {
        let _guard = reset();
        with_state(|s| s.api_version = Some("2.0".into()));

        let ptr = api_version();
        // SAFETY: the second free only touches the bookkeeping because the
        // pointer is no longer live.
        unsafe {
            free_string(ptr);
            free_string(ptr);
        }

        let counters = counters();
        assert_eq!(counters.strings_freed, 1);
        assert_eq!(counters.invalid_frees, 1);
    }

    #[test]
    fn test_fire_without_callback_reports_nothing() {
        let _guard = reset();
        assert!(!fire_space_will_change(1, 2, 0));
        assert!(!fire_layout_changed());
    }
}

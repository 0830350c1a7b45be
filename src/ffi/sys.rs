//! Raw C ABI of `libtotalspaces2api.dylib`.
//!
//! Layouts mirror `TSLib.h` as shipped with TotalSpaces2. Nothing in here
//! performs a call; see [`super::library`] for the loaded symbol table.

#![allow(non_camel_case_types, non_snake_case)]

use std::ffi::{c_char, c_float, c_uint};

/// `CGDirectDisplayID` from CoreGraphics.
pub type CGDirectDisplayID = u32;

/// `SpaceTypeDesktop`
pub const SPACE_TYPE_DESKTOP: c_uint = 0;
/// `SpaceTypeFullScreen`
pub const SPACE_TYPE_FULL_SCREEN: c_uint = 1;
/// `SpaceTypeDashboard`
pub const SPACE_TYPE_DASHBOARD: c_uint = 2;

/// Value of `spaceUUID` that binds an app to every space.
pub const ALL_SPACES_UUID: &str = "AllSpaces";

/// `struct tsapi_display`
#[repr(C)]
#[derive(Debug)]
pub struct tsapi_display {
    pub displayId: CGDirectDisplayID,
    pub displayName: *mut c_char,
    pub width: usize,
    pub height: usize,
}

/// `struct tsapi_displays`
#[repr(C)]
#[derive(Debug)]
pub struct tsapi_displays {
    pub displaysCount: c_uint,
    pub displays: *mut tsapi_display,
}

/// `struct tsapi_window`
#[repr(C)]
#[derive(Debug)]
pub struct tsapi_window {
    pub appName: *mut c_char,
    pub windowId: c_uint,
    pub isOnAllSpaces: bool,
    pub title: *mut c_char,
    pub frame: *mut c_char,
    pub displayID: CGDirectDisplayID,
    pub spaceNumber: c_uint,
}

/// `struct tsapi_windows`
#[repr(C)]
#[derive(Debug)]
pub struct tsapi_windows {
    pub windowCount: c_uint,
    pub windows: *mut tsapi_window,
}

/// `space_change_callback_t`
pub type space_change_callback_t =
    extern "C" fn(fromSpaceNumber: c_uint, toSpaceNumber: c_uint, displayID: CGDirectDisplayID);

/// `space_layout_changed_callback_t`
pub type space_layout_changed_callback_t = extern "C" fn();

pub type StringFn = unsafe extern "C" fn() -> *mut c_char;
pub type FreeStringFn = unsafe extern "C" fn(str: *mut c_char);
pub type DisplayCountFn = unsafe extern "C" fn(displayID: CGDirectDisplayID) -> c_uint;
pub type SpaceStringFn =
    unsafe extern "C" fn(spaceNumber: c_uint, displayID: CGDirectDisplayID) -> *mut c_char;
pub type SpaceTypeFn =
    unsafe extern "C" fn(spaceNumber: c_uint, displayID: CGDirectDisplayID) -> c_uint;
pub type SetNameFn = unsafe extern "C" fn(
    spaceNumber: c_uint,
    name: *mut c_char,
    displayID: CGDirectDisplayID,
) -> bool;
pub type MoveWindowToSpaceFn = unsafe extern "C" fn(
    windowId: c_uint,
    spaceNumber: c_uint,
    displayID: CGDirectDisplayID,
) -> bool;
pub type MoveSpaceToPositionFn = unsafe extern "C" fn(
    spaceNumber: c_uint,
    positionNumber: c_uint,
    displayID: CGDirectDisplayID,
) -> bool;
pub type MoveSpaceToDisplayFn = unsafe extern "C" fn(
    spaceNumber: c_uint,
    fromDisplayID: CGDirectDisplayID,
    positionNumber: c_uint,
    toDisplayID: CGDirectDisplayID,
) -> bool;
pub type AddDesktopsFn =
    unsafe extern "C" fn(numberToAdd: c_uint, displayID: CGDirectDisplayID) -> c_uint;
pub type DisplayActionFn =
    unsafe extern "C" fn(value: c_uint, displayID: CGDirectDisplayID) -> bool;
pub type SetFrontWindowFn = unsafe extern "C" fn(windowId: c_uint);
pub type MoveWindowFn = unsafe extern "C" fn(windowId: c_uint, x: c_float, y: c_float);
pub type BindAppToSpaceFn = unsafe extern "C" fn(bundleId: *mut c_char, spaceUUID: *mut c_char);
pub type DisplayListFn = unsafe extern "C" fn() -> *mut tsapi_displays;
pub type FreeDisplayListFn = unsafe extern "C" fn(displayList: *mut tsapi_displays);
pub type WindowListFn = unsafe extern "C" fn() -> *mut tsapi_windows;
pub type FreeWindowListFn = unsafe extern "C" fn(windowList: *mut tsapi_windows);
pub type SetSpaceChangeCallbackFn = unsafe extern "C" fn(callback: space_change_callback_t);
pub type SetLayoutChangedCallbackFn =
    unsafe extern "C" fn(callback: space_layout_changed_callback_t);
pub type UnsetCallbackFn = unsafe extern "C" fn();

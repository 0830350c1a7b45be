//! Notification callbacks.
//!
//! TotalSpaces2 keeps one callback per notification kind for the whole
//! process. The bindings mirror that: each kind has a single slot holding the
//! current Rust handler, and the library is handed a fixed `extern "C"`
//! trampoline that forwards into whatever the slot holds.
//!
//! - Registering replaces the previous handler.
//! - Cancelling clears the slot and tells the library to stop calling.
//! - Handlers run synchronously on the library's notification thread.
//! - A handler may register or cancel handlers itself; the slot lock is not
//!   held while it runs.
//! - A panicking handler is logged and contained at the trampoline.
//! - When the last handle to a loaded library is dropped, its handlers are
//!   cancelled. A handler that owns a handle keeps the library loaded.

use crate::display::DisplayId;
use crate::ffi::sys::CGDirectDisplayID;
use crate::ffi::NativeLibrary;
use crate::space::SpaceChange;
use std::ffi::c_uint;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, error, trace, warn};

/// Handler for space-will-change notifications.
pub type SpaceChangeHandler = dyn Fn(SpaceChange) + Send + Sync + 'static;

/// Handler for layout-changed notifications.
pub type LayoutChangedHandler = dyn Fn() + Send + Sync + 'static;

struct CallbackSlot<H: ?Sized> {
    handler: Mutex<Option<Arc<H>>>,
}

impl<H: ?Sized> CallbackSlot<H> {
    const fn new() -> Self {
        Self {
            handler: Mutex::new(None),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Option<Arc<H>>> {
        self.handler.lock().unwrap_or_else(|poisoned| {
            warn!("callback slot lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }

    fn current(&self) -> Option<Arc<H>> {
        self.lock().clone()
    }
}

static SPACE_WILL_CHANGE: CallbackSlot<SpaceChangeHandler> = CallbackSlot::new();
static LAYOUT_CHANGED: CallbackSlot<LayoutChangedHandler> = CallbackSlot::new();

// The slot lock is held across the native set/unset calls so the slot and
// the library's registration change together. The library delivers
// notifications from its own run loop, never from inside these calls.
// Replaced handlers are dropped after the lock is released.

pub(crate) fn register_space_will_change(native: &NativeLibrary, handler: Arc<SpaceChangeHandler>) {
    let previous = {
        let mut slot = SPACE_WILL_CHANGE.lock();
        native.set_space_will_change_callback(space_will_change_trampoline);
        slot.replace(handler)
    };
    debug!(replaced = previous.is_some(), "space-will-change handler registered");
}

pub(crate) fn cancel_space_will_change(native: &NativeLibrary) {
    let previous = {
        let mut slot = SPACE_WILL_CHANGE.lock();
        native.unset_space_will_change_callback();
        slot.take()
    };
    debug!(removed = previous.is_some(), "space-will-change handler cancelled");
}

pub(crate) fn register_layout_changed(native: &NativeLibrary, handler: Arc<LayoutChangedHandler>) {
    let previous = {
        let mut slot = LAYOUT_CHANGED.lock();
        native.set_layout_changed_callback(layout_changed_trampoline);
        slot.replace(handler)
    };
    debug!(replaced = previous.is_some(), "layout-changed handler registered");
}

pub(crate) fn cancel_layout_changed(native: &NativeLibrary) {
    let previous = {
        let mut slot = LAYOUT_CHANGED.lock();
        native.unset_layout_changed_callback();
        slot.take()
    };
    debug!(removed = previous.is_some(), "layout-changed handler cancelled");
}

/// Withdraw every registered handler from `native` before it is unloaded.
///
/// Kinds with an empty slot are left alone, so nothing is unset that was
/// never set.
pub(crate) fn detach(native: &NativeLibrary) {
    let space_change = {
        let mut slot = SPACE_WILL_CHANGE.lock();
        let previous = slot.take();
        if previous.is_some() {
            native.unset_space_will_change_callback();
        }
        previous
    };
    let layout_changed = {
        let mut slot = LAYOUT_CHANGED.lock();
        let previous = slot.take();
        if previous.is_some() {
            native.unset_layout_changed_callback();
        }
        previous
    };
    if space_change.is_some() || layout_changed.is_some() {
        debug!(
            space_change = space_change.is_some(),
            layout_changed = layout_changed.is_some(),
            "handlers detached from unloading library"
        );
    }
}

/// Whether a space-will-change handler is registered.
#[must_use]
pub fn has_space_will_change_handler() -> bool {
    SPACE_WILL_CHANGE.lock().is_some()
}

/// Whether a layout-changed handler is registered.
#[must_use]
pub fn has_layout_changed_handler() -> bool {
    LAYOUT_CHANGED.lock().is_some()
}

extern "C" fn space_will_change_trampoline(
    from: c_uint,
    to: c_uint,
    display_id: CGDirectDisplayID,
) {
    let Some(handler) = SPACE_WILL_CHANGE.current() else {
        trace!(from, to, display_id, "space change with no handler registered");
        return;
    };
    let change = SpaceChange {
        from,
        to,
        display: DisplayId(display_id),
    };
    dispatch("space-will-change", || handler(change));
}

extern "C" fn layout_changed_trampoline() {
    let Some(handler) = LAYOUT_CHANGED.current() else {
        trace!("layout change with no handler registered");
        return;
    };
    dispatch("layout-changed", || handler());
}

fn dispatch(kind: &str, call: impl FnOnce()) {
    if panic::catch_unwind(AssertUnwindSafe(call)).is_err() {
        error!(kind, "notification handler panicked");
    }
}

/// Empty both slots without touching the library.
#[cfg(test)]
pub(crate) fn clear_slots() {
    *SPACE_WILL_CHANGE.lock() = None;
    *LAYOUT_CHANGED.lock() = None;
}

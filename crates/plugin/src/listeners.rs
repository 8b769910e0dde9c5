//! C button listeners
//!
//! Button changes produced by the kit each frame are fanned out to callbacks
//! registered through [`cs2kit_on_buttons`](crate::ffi::exports::cs2kit_on_buttons).
//! Dispatch happens after the kit lock is released, so a callback may call
//! back into any `cs2kit_*` export.

use std::ffi::{c_int, c_void};
use std::sync::LazyLock;

use parking_lot::RwLock;
use slotmap::{new_key_type, Key, KeyData, SlotMap};

use cs2kit_core::ButtonEvent;

new_key_type! {
    /// Key for registered C button listeners
    pub struct ButtonListenerKey;
}

/// `(slot, pressed, released, held, user)`
pub type ButtonCallback =
    unsafe extern "C" fn(slot: c_int, pressed: u64, released: u64, held: u64, user: *mut c_void);

#[derive(Clone, Copy)]
struct ButtonListener {
    callback: ButtonCallback,
    user: *mut c_void,
}

// SAFETY: `user` is opaque to the kit and only handed back to its owner's callback
unsafe impl Send for ButtonListener {}
unsafe impl Sync for ButtonListener {}

static BUTTON_LISTENERS: LazyLock<RwLock<SlotMap<ButtonListenerKey, ButtonListener>>> =
    LazyLock::new(|| RwLock::new(SlotMap::with_key()));

/// Register a callback, returning its key as a non-zero integer
pub(crate) fn add(callback: ButtonCallback, user: *mut c_void) -> u64 {
    let key = BUTTON_LISTENERS
        .write()
        .insert(ButtonListener { callback, user });
    key.data().as_ffi()
}

/// Remove a callback by the key [`add`] returned
pub(crate) fn remove(key: u64) -> bool {
    let key = ButtonListenerKey::from(KeyData::from_ffi(key));
    BUTTON_LISTENERS.write().remove(key).is_some()
}

/// Drop every registered callback
pub(crate) fn clear() {
    BUTTON_LISTENERS.write().clear();
}

/// Invoke every callback for every event
pub(crate) fn dispatch(events: &[ButtonEvent]) {
    if events.is_empty() {
        return;
    }

    // Copied out so callbacks can register or remove listeners
    let listeners: Vec<ButtonListener> = BUTTON_LISTENERS.read().values().copied().collect();

    for event in events {
        let Ok(slot) = c_int::try_from(event.slot) else {
            continue;
        };
        for listener in &listeners {
            // SAFETY: the registrant promised a callback with this signature
            unsafe {
                (listener.callback)(
                    slot,
                    event.pressed.bits(),
                    event.released.bits(),
                    event.held.bits(),
                    listener.user,
                )
            };
        }
    }
}

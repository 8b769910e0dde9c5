//! CS2Kit plugin - FFI layer
//!
//! The C ABI boundary between the host loader and [`cs2kit_core`]. Compiles
//! to a cdylib (.so/.dll) and owns the single process-wide [`Kit`].

pub mod ffi;
mod listeners;
mod logging;

use parking_lot::Mutex;

use cs2kit_core::Kit;

/// The loaded kit, `None` outside load..unload
static KIT: Mutex<Option<Kit>> = Mutex::new(None);

/// Run `f` against the loaded kit, or return `default` when not loaded
pub(crate) fn with_kit<R>(default: R, f: impl FnOnce(&Kit) -> R) -> R {
    KIT.lock().as_ref().map_or(default, f)
}

/// Mutable variant of [`with_kit`]
pub(crate) fn with_kit_mut<R>(default: R, f: impl FnOnce(&mut Kit) -> R) -> R {
    KIT.lock().as_mut().map_or(default, f)
}

/// Install `kit`, shutting down any previous one
pub(crate) fn install(kit: Kit) {
    if let Some(previous) = KIT.lock().replace(kit) {
        tracing::warn!("Replacing an already loaded kit");
        previous.shutdown();
    }
}

/// Tear down the loaded kit, if any, and forget registered listeners
pub fn shutdown() {
    let kit = KIT.lock().take();
    if let Some(kit) = kit {
        kit.shutdown();
    }
    listeners::clear();
}

//! C-compatible exports called by the host loader

use std::ffi::{c_char, c_int, c_void, CStr};

use tracing::instrument;

use cs2kit_core::{CoreConfig, InitParams, Kit, Paths};
use cs2kit_engine::load_interfaces;
use cs2kit_sdk::CreateInterfaceFn;

use crate::listeners::{self, ButtonCallback};
use crate::logging;

/// Called once when the host loads the plugin
///
/// `base_dir` is the kit's install directory; config and gamedata paths are
/// resolved against it.
///
/// # Safety
/// - `base_dir` must be a valid null-terminated C string
/// - `engine_factory` must be a CreateInterface function or null
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn cs2kit_load(
    base_dir: *const c_char,
    engine_factory: *mut c_void,
    error: *mut c_char,
    maxlen: usize,
) -> bool {
    let Some(base_dir) = c_str(base_dir) else {
        write_error(error, maxlen, "Base directory is null or not UTF-8");
        return false;
    };

    let paths = Paths::new(base_dir);
    let config = CoreConfig::load_or_default(&paths);
    logging::init(&config);

    let span = tracing::info_span!("kit", prefix = %config.log_prefix);
    let _guard = span.enter();

    tracing::info!("CS2Kit loading from {}...", paths.base_dir().display());

    if engine_factory.is_null() {
        write_error(error, maxlen, "Engine factory is null");
        return false;
    }

    let engine_factory: CreateInterfaceFn = std::mem::transmute(engine_factory);
    let interfaces = load_interfaces(engine_factory);

    let kit = Kit::initialize(InitParams {
        paths,
        config: Some(config),
        interfaces,
    });
    crate::install(kit);

    tracing::info!("CS2Kit loaded successfully!");
    true
}

/// Called when the host unloads the plugin
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn cs2kit_unload() -> bool {
    tracing::info!("CS2Kit unloading...");

    match std::panic::catch_unwind(crate::shutdown) {
        Ok(()) => true,
        Err(_) => {
            tracing::error!("Panic during shutdown");
            false
        }
    }
}

/// Called by the host once per server frame
///
/// Button changes found this frame are passed to the listeners registered
/// with [`cs2kit_on_buttons`].
#[no_mangle]
pub extern "C" fn cs2kit_on_game_frame() {
    let events = crate::with_kit_mut(Vec::new(), Kit::on_game_frame);
    listeners::dispatch(&events);
}

/// Re-read the core config and gamedata from disk
///
/// Returns whether the gamedata file loaded.
#[no_mangle]
#[instrument(skip_all)]
pub extern "C" fn cs2kit_reload() -> bool {
    crate::with_kit_mut(false, Kit::reload)
}

/// Register a callback for player button changes
///
/// The callback runs on the frame thread, once per changed player, with the
/// raw button masks and `user` passed through untouched. Returns a non-zero
/// key for [`cs2kit_remove_button_listener`], or 0 when `callback` is null.
#[no_mangle]
pub extern "C" fn cs2kit_on_buttons(callback: Option<ButtonCallback>, user: *mut c_void) -> u64 {
    match callback {
        Some(callback) => listeners::add(callback, user),
        None => 0,
    }
}

/// Remove a button listener, returning whether it was registered
#[no_mangle]
pub extern "C" fn cs2kit_remove_button_listener(key: u64) -> bool {
    listeners::remove(key)
}

/// Called by the host when the client in `slot` disconnects
#[no_mangle]
pub extern "C" fn cs2kit_on_player_disconnect(slot: c_int) {
    let Ok(slot) = usize::try_from(slot) else {
        return;
    };
    crate::with_kit_mut((), |kit| kit.on_player_disconnect(slot));
}

/// Gamedata offset by name, -1 when unknown
///
/// # Safety
/// `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn cs2kit_get_offset(name: *const c_char) -> i32 {
    let Some(name) = c_str(name) else {
        return -1;
    };
    crate::with_kit(None, |kit| kit.offset(name))
        .and_then(|offset| i32::try_from(offset).ok())
        .unwrap_or(-1)
}

/// Resolved signature address by name, null when unresolved
///
/// # Safety
/// `name` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn cs2kit_resolve_signature(name: *const c_char) -> *mut c_void {
    let Some(name) = c_str(name) else {
        return std::ptr::null_mut();
    };
    crate::with_kit(None, |kit| kit.resolve_signature(name))
        .map_or(std::ptr::null_mut(), |addr| addr as *mut c_void)
}

/// Schema field offset, -1 when unresolved
///
/// # Safety
/// `class_name` and `field_name` must be valid null-terminated C strings or null
#[no_mangle]
pub unsafe extern "C" fn cs2kit_get_schema_offset(
    class_name: *const c_char,
    field_name: *const c_char,
) -> i32 {
    let (Some(class_name), Some(field_name)) = (c_str(class_name), c_str(field_name)) else {
        return -1;
    };
    crate::with_kit(None, |kit| kit.schema_offset(class_name, field_name)).unwrap_or(-1)
}

/// Controller instance for a player slot, null when absent
#[no_mangle]
pub extern "C" fn cs2kit_get_player_controller(slot: c_int) -> *mut c_void {
    let Ok(slot) = usize::try_from(slot) else {
        return std::ptr::null_mut();
    };
    crate::with_kit(std::ptr::null_mut(), |kit| kit.player_controller_ptr(slot))
}

/// Button mask for a player slot, 0 when unavailable
#[no_mangle]
pub extern "C" fn cs2kit_get_player_buttons(slot: c_int) -> u64 {
    let Ok(slot) = usize::try_from(slot) else {
        return 0;
    };
    crate::with_kit(0, |kit| kit.player_buttons(slot))
}

/// Borrow a C string argument as UTF-8
///
/// # Safety
/// `ptr` must be a valid null-terminated C string or null
unsafe fn c_str<'a>(ptr: *const c_char) -> Option<&'a str> {
    if ptr.is_null() {
        return None;
    }
    CStr::from_ptr(ptr).to_str().ok()
}

/// Helper to write an error message to a C buffer
///
/// # Safety
/// - `error` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    tracing::error!("{}", msg);
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}

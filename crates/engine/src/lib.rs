//! CS2Kit Engine - Interface Loading and Raw Memory Access
//!
//! This crate is the narrow unsafe boundary of the kit:
//! - Loading Source 2 engine interfaces via CreateInterface
//! - Locating loaded modules in the current process
//! - Typed reads/writes at offsets, null-checked pointer hops and
//!   RIP-relative resolution
//! - Calling virtual functions by table slot
//!
//! # Architecture
//!
//! Interfaces are acquired once during plugin load via [`loader::load_interfaces`]
//! and handed to the caller as a [`HostInterfaces`] value. Nothing here is
//! stored globally; the core crate threads these values through its services.
//!
//! # Thread Safety
//!
//! All interface pointers are valid for the plugin's lifetime. The host calls
//! into the kit from its game-update thread only.

pub mod error;
pub mod interfaces;
pub mod loader;
pub mod memory;
pub mod module;
pub mod vcall;

pub use error::InterfaceError;
pub use interfaces::HostInterfaces;
pub use loader::{load_interfaces, InterfaceFactory};
pub use module::{ModuleImage, ModuleLocator, ProcessModules};
pub use vcall::{call_virtual, virtual_function, VirtualArgs};

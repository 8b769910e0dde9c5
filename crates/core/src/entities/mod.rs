//! Entity lookup and player wrappers
//!
//! [`EntityDirectory`] turns table indices, handles and player slots into
//! live instance pointers. The wrappers in [`player`] read fields through
//! the schema resolver:
//!
//! ```ignore
//! if let Some(controller) = entities.player_controller(0) {
//!     let controller = unsafe { PlayerController::from_ptr(controller.as_ptr().cast()) };
//! }
//! ```

pub mod handle;
pub mod player;
pub mod system;

pub use handle::{EntityHandle, ENTITY_INDEX_BITS, ENTITY_INDEX_MASK, INVALID_EHANDLE_INDEX};
pub use player::{BaseEntity, Player, PlayerController, PlayerPawn, LIFE_ALIVE};
pub use system::{EntityDirectory, BUTTON_CHAIN_FIELDS, GAME_ENTITY_SYSTEM_KEY};

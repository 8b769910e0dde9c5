//! Entity directory over CGameEntitySystem
//!
//! The entity system pointer lives inside the game resource service at a
//! gamedata offset. Entities are stored in a chunked identity table:
//!
//! ```text
//! CGameResourceService
//! └── +gamedata["GameEntitySystem"]: CGameEntitySystem*
//!     └── +0x10: chunk pointers [64]
//!         └── CEntityIdentity [512], 0x78 bytes each
//!             └── +0x00: m_pInstance (CEntityInstance*)
//! ```
//!
//! Every lookup here degrades to `None` (or `0` for buttons) instead of
//! failing: a null chunk, an empty identity or an unresolved offset simply
//! means "no entity".

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::{Arc, OnceLock};

use cs2kit_engine::memory;
use cs2kit_sdk::layout::{
    ENTITY_LIST_OFFSET, INSTANCE_OFFSET, MAX_ENTITIES_IN_LIST, MAX_PLAYERS, MAX_TOTAL_ENTITIES,
    SIZE_OF_ENTITY_IDENTITY,
};
use cs2kit_sdk::{CEntityIdentity, CEntityInstance, CGameEntitySystem, CGameResourceService};
use parking_lot::RwLock;
use tracing::{info, warn};

use super::handle::EntityHandle;
use crate::gamedata::GameData;
use crate::schema::SchemaOffsets;

/// Gamedata key of the entity system offset inside the resource service
pub const GAME_ENTITY_SYSTEM_KEY: &str = "GameEntitySystem";

/// Schema fields along the controller -> pawn -> movement services -> buttons chain
pub const BUTTON_CHAIN_FIELDS: [(&str, &str); 4] = [
    ("CCSPlayerController", "m_hPlayerPawn"),
    ("CBasePlayerPawn", "m_pMovementServices"),
    ("CPlayer_MovementServices", "m_nButtons"),
    ("CInButtonState", "m_pButtonStates"),
];

/// Offsets of the controller -> pawn -> movement services -> buttons chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ButtonChain {
    /// CCSPlayerController::m_hPlayerPawn
    pawn_handle: usize,
    /// CBasePlayerPawn::m_pMovementServices
    movement_services: usize,
    /// CPlayer_MovementServices::m_nButtons + CInButtonState::m_pButtonStates
    button_states: usize,
}

impl ButtonChain {
    fn resolve(schema: &SchemaOffsets) -> Option<Self> {
        let [pawn, movement, buttons, states] =
            BUTTON_CHAIN_FIELDS.map(|(class, field)| schema.get_offset(class, field));

        let chain = (|| {
            Some(Self {
                pawn_handle: usize::try_from(pawn?).ok()?,
                movement_services: usize::try_from(movement?).ok()?,
                button_states: usize::try_from(buttons?).ok()?
                    + usize::try_from(states?).ok()?,
            })
        })();

        match chain {
            Some(_) => {
                info!("Button access chain resolved via schema:");
                info!(
                    "  Controller + {:#X} -> Pawn + {:#X} -> MovementServices + {:#X} -> Buttons + {:#X}",
                    pawn.unwrap_or(-1),
                    movement.unwrap_or(-1),
                    buttons.unwrap_or(-1),
                    states.unwrap_or(-1)
                );
            }
            None => warn!("Some schema offsets not resolved. Button detection may not work."),
        }

        chain
    }
}

/// Lookup of live entities by table index, handle or player slot
pub struct EntityDirectory {
    resource_service: Option<NonNull<CGameResourceService>>,
    entity_system_offset: Option<usize>,
    entity_system: RwLock<Option<NonNull<CGameEntitySystem>>>,
    schema: Arc<SchemaOffsets>,
    button_chain: OnceLock<Option<ButtonChain>>,
}

// SAFETY: the pointers are engine objects that outlive the directory and are
// only dereferenced from the game-update thread.
unsafe impl Send for EntityDirectory {}
unsafe impl Sync for EntityDirectory {}

impl EntityDirectory {
    /// Create a directory over the host's game resource service
    ///
    /// # Safety
    /// `resource_service`, when present, must be the engine's
    /// IGameResourceService and stay valid for the lifetime of the directory.
    /// Everything reachable through it is trusted to follow the engine layout.
    pub unsafe fn new(
        resource_service: Option<NonNull<CGameResourceService>>,
        schema: Arc<SchemaOffsets>,
    ) -> Self {
        Self {
            resource_service,
            entity_system_offset: None,
            entity_system: RwLock::new(None),
            schema,
            button_chain: OnceLock::new(),
        }
    }

    /// Schema resolver used for field offsets
    pub fn schema(&self) -> &SchemaOffsets {
        &self.schema
    }

    /// Read the entity system offset from gamedata and try to derive the pointer
    ///
    /// Always succeeds; a missing piece only disables entity lookups until it
    /// becomes available. Calling it again after a gamedata reload drops the
    /// previously derived pointer.
    pub fn initialize(&mut self, gamedata: &GameData) -> bool {
        *self.entity_system.get_mut() = None;

        if self.resource_service.is_none() {
            warn!("IGameResourceService not available.");
        }

        self.entity_system_offset = match gamedata.offset(GAME_ENTITY_SYSTEM_KEY) {
            Some(offset) => match usize::try_from(offset) {
                Ok(offset) => {
                    info!("Gamedata loaded (entity system offset: {}).", offset);
                    Some(offset)
                }
                Err(_) => {
                    warn!("GameEntitySystem offset {} is negative.", offset);
                    None
                }
            },
            None => {
                warn!("GameEntitySystem offset not found in gamedata.");
                None
            }
        };

        if self.entity_system().is_some() {
            info!("Entity system initialized.");
        } else {
            warn!("Entity system not available. Menu button detection disabled.");
        }

        true
    }

    /// The entity system pointer, re-deriving it if it was not available yet
    pub fn entity_system(&self) -> Option<NonNull<CGameEntitySystem>> {
        if let Some(system) = *self.entity_system.read() {
            return Some(system);
        }

        let service = self.resource_service?;
        let offset = self.entity_system_offset?;

        // SAFETY: service is valid per `new`; the offset comes from gamedata
        let system = unsafe { memory::read_ptr::<CGameEntitySystem>(service.cast(), offset) }?;
        *self.entity_system.write() = Some(system);
        Some(system)
    }

    /// The identity at `index` of the chunked table
    ///
    /// Returns `None` for an out-of-range index or an unallocated chunk.
    ///
    /// # Safety
    /// `system` must point to a CGameEntitySystem.
    pub unsafe fn identity_by_index(
        system: NonNull<CGameEntitySystem>,
        index: usize,
    ) -> Option<NonNull<CEntityIdentity>> {
        if index >= MAX_TOTAL_ENTITIES {
            return None;
        }

        let chunk_index = index / MAX_ENTITIES_IN_LIST;
        let entry_index = index % MAX_ENTITIES_IN_LIST;

        let chunk = memory::read_ptr::<c_void>(
            system.cast(),
            ENTITY_LIST_OFFSET + chunk_index * std::mem::size_of::<usize>(),
        )?;

        Some(chunk.byte_add(entry_index * SIZE_OF_ENTITY_IDENTITY).cast())
    }

    /// The live instance stored at `index`, if any
    pub fn entity_by_index(&self, index: usize) -> Option<NonNull<CEntityInstance>> {
        let system = self.entity_system()?;

        // SAFETY: system came from the resource service per `new`
        unsafe {
            let identity = Self::identity_by_index(system, index)?;
            memory::read_ptr::<CEntityInstance>(identity.cast(), INSTANCE_OFFSET)
        }
    }

    /// Resolve a handle to its live instance
    ///
    /// Only the index bits are used.
    pub fn resolve_handle(&self, handle: EntityHandle) -> Option<NonNull<CEntityInstance>> {
        if !handle.is_valid() {
            return None;
        }
        self.entity_by_index(handle.index())
    }

    /// The controller of player `slot` (table index `slot + 1`)
    pub fn player_controller(&self, slot: usize) -> Option<NonNull<CEntityInstance>> {
        if slot >= MAX_PLAYERS {
            return None;
        }
        self.entity_by_index(slot + 1)
    }

    /// Check if a controller exists for `slot`
    pub fn is_player_slot_valid(&self, slot: usize) -> bool {
        self.player_controller(slot).is_some()
    }

    /// Read the input button mask of player `slot`
    ///
    /// Returns 0 if any offset in the chain is unresolved or any pointer
    /// along it is null. The chain offsets are resolved once, on first use.
    pub fn player_buttons(&self, slot: usize) -> u64 {
        let chain = self
            .button_chain
            .get_or_init(|| ButtonChain::resolve(&self.schema));

        let Some(chain) = chain else {
            return 0;
        };

        self.read_buttons(slot, chain).unwrap_or(0)
    }

    fn read_buttons(&self, slot: usize, chain: &ButtonChain) -> Option<u64> {
        let controller = self.player_controller(slot)?;

        // SAFETY: each hop is an engine object reached through a null-checked
        // pointer, at a schema-provided offset.
        unsafe {
            let handle = memory::read::<EntityHandle>(controller.cast(), chain.pawn_handle);
            let pawn = self.resolve_handle(handle)?;
            let services = memory::read_ptr::<c_void>(pawn.cast(), chain.movement_services)?;
            Some(memory::read::<u64>(services, chain.button_states))
        }
    }
}

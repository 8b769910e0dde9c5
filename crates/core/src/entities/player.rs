//! Player entity wrappers
//!
//! [`Player`] is a per-slot view combining the entity directory, schema
//! fields and gamedata vtable slots:
//!
//! ```ignore
//! let player = kit.player(0);
//! if player.is_alive() {
//!     tracing::info!("slot 0 has {:?} HP", player.health());
//!     player.slay();
//! }
//! ```

use std::ffi::c_void;
use std::marker::PhantomData;
use std::ptr::NonNull;

use cs2kit_engine::call_virtual;
use cs2kit_macros::SchemaClass;
use cs2kit_sdk::CEntityInstance;

use super::handle::EntityHandle;
use super::system::EntityDirectory;
use crate::gamedata::GameData;
use crate::input::InputButtons;
use crate::schema::{SchemaField, SchemaObject};

/// Wrapper for CBaseEntity
///
/// Base class for all entities in the game.
#[derive(SchemaClass)]
#[schema(class = "CBaseEntity")]
pub struct BaseEntity {
    ptr: *mut c_void,

    #[schema(field = "m_iHealth")]
    _health: PhantomData<i32>,

    #[schema(field = "m_iTeamNum")]
    _team_num: PhantomData<u8>,

    #[schema(field = "m_lifeState")]
    _life_state: PhantomData<u8>,
}

/// Wrapper for CCSPlayerPawn
#[derive(SchemaClass)]
#[schema(class = "CCSPlayerPawn")]
pub struct PlayerPawn {
    ptr: *mut c_void,

    #[schema(field = "m_ArmorValue")]
    _armor: PhantomData<i32>,
}

/// Wrapper for CCSPlayerController
///
/// The controller persists across respawns; the pawn it points to does not.
#[derive(SchemaClass)]
#[schema(class = "CCSPlayerController")]
pub struct PlayerController {
    ptr: *mut c_void,

    #[schema(field = "m_hPlayerPawn", readonly)]
    _player_pawn: PhantomData<EntityHandle>,
}

/// Life state value of a living pawn
pub const LIFE_ALIVE: u8 = 0;

/// A player slot
///
/// The controller is looked up once when the view is created; everything
/// else is read on demand.
pub struct Player<'a> {
    slot: usize,
    controller: Option<NonNull<CEntityInstance>>,
    entities: &'a EntityDirectory,
    gamedata: &'a GameData,
}

impl<'a> Player<'a> {
    pub fn new(slot: usize, entities: &'a EntityDirectory, gamedata: &'a GameData) -> Self {
        Self {
            slot,
            controller: entities.player_controller(slot),
            entities,
            gamedata,
        }
    }

    pub fn slot(&self) -> usize {
        self.slot
    }

    /// Check if the slot holds a controller
    pub fn is_valid(&self) -> bool {
        self.controller.is_some()
    }

    pub fn controller(&self) -> Option<PlayerController> {
        // SAFETY: the directory only hands out live instances from the table
        unsafe { PlayerController::from_ptr(self.controller?.as_ptr().cast()) }
    }

    fn pawn_instance(&self) -> Option<NonNull<CEntityInstance>> {
        let handle = self.controller()?.player_pawn(self.entities.schema())?;
        self.entities.resolve_handle(handle)
    }

    pub fn pawn(&self) -> Option<PlayerPawn> {
        // SAFETY: a controller's m_hPlayerPawn refers to a CCSPlayerPawn
        unsafe { PlayerPawn::from_ptr(self.pawn_instance()?.as_ptr().cast()) }
    }

    fn pawn_entity(&self) -> Option<BaseEntity> {
        // SAFETY: every pawn is a CBaseEntity
        unsafe { BaseEntity::from_ptr(self.pawn_instance()?.as_ptr().cast()) }
    }

    pub fn health(&self) -> Option<i32> {
        self.pawn_entity()?.health(self.entities.schema())
    }

    pub fn team(&self) -> Option<u8> {
        self.pawn_entity()?.team_num(self.entities.schema())
    }

    pub fn life_state(&self) -> Option<u8> {
        self.pawn_entity()?.life_state(self.entities.schema())
    }

    /// Check for a pawn whose life state is alive
    pub fn is_alive(&self) -> bool {
        self.life_state() == Some(LIFE_ALIVE)
    }

    pub fn armor(&self) -> Option<i32> {
        self.pawn()?.armor(self.entities.schema())
    }

    /// Read any controller field by schema name
    ///
    /// # Safety
    /// `T` must match the field's declared type.
    pub unsafe fn field<T: Copy>(
        &self,
        class_name: &'static str,
        field_name: &'static str,
    ) -> Option<T> {
        let controller = self.controller?;
        SchemaField::<T>::new(class_name, field_name)
            .get(self.entities.schema(), controller.as_ptr().cast())
    }

    /// Read any pawn field by schema name
    ///
    /// # Safety
    /// `T` must match the field's declared type.
    pub unsafe fn pawn_field<T: Copy>(
        &self,
        class_name: &'static str,
        field_name: &'static str,
    ) -> Option<T> {
        let pawn = self.pawn_instance()?;
        SchemaField::<T>::new(class_name, field_name)
            .get(self.entities.schema(), pawn.as_ptr().cast())
    }

    /// Buttons held this tick
    pub fn buttons(&self) -> InputButtons {
        InputButtons::from_bits_retain(self.entities.player_buttons(self.slot))
    }

    /// Kill the player's pawn
    pub fn slay(&self) {
        let Some(pawn) = self.pawn_instance() else {
            return;
        };
        let Some(index) = self.vtable_index("CommitSuicide") else {
            return;
        };

        // SAFETY: the gamedata slot is CBasePlayerPawn::CommitSuicide(bool explode, bool force)
        unsafe { call_virtual::<(), _>(index, pawn.cast(), (false, true)) }
    }

    /// Move the player to `team`
    pub fn change_team(&self, team: i32) {
        let Some(controller) = self.controller else {
            return;
        };
        let Some(index) = self.vtable_index("ChangeTeam") else {
            return;
        };

        // SAFETY: the gamedata slot is CCSPlayerController::ChangeTeam(int team)
        unsafe { call_virtual::<(), _>(index, controller.cast(), (team,)) }
    }

    /// Respawn the player
    pub fn respawn(&self) {
        let Some(controller) = self.controller else {
            return;
        };
        let Some(index) = self.vtable_index("Respawn") else {
            return;
        };

        // SAFETY: the gamedata slot is CCSPlayerController::Respawn()
        unsafe { call_virtual::<(), _>(index, controller.cast(), ()) }
    }

    fn vtable_index(&self, name: &str) -> Option<usize> {
        let index = self
            .gamedata
            .offset(name)
            .and_then(|offset| usize::try_from(offset).ok());
        if index.is_none() {
            tracing::warn!("{} vtable offset not found in gamedata.", name);
        }
        index
    }
}

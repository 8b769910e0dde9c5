//! The kit context
//!
//! [`Kit`] owns every service and is threaded explicitly to callers; there
//! is no process-wide state in this crate. Initialization order matters:
//!
//! 1. paths and core config
//! 2. gamedata (failure leaves lookups unresolved)
//! 3. schema resolver (needs the host's schema system)
//! 4. entity directory (needs gamedata, schema and the resource service)

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use cs2kit_engine::HostInterfaces;
use cs2kit_sdk::CEntityInstance;
use tracing::{info, warn};

use crate::config::{CoreConfig, Paths};
use crate::entities::{EntityDirectory, Player, BUTTON_CHAIN_FIELDS};
use crate::gamedata::{GameData, SignatureCache};
use crate::input::{ButtonEvent, InputTracker};
use crate::schema::SchemaOffsets;

/// Everything the host provides at load time
pub struct InitParams {
    /// Directory the kit is installed in
    pub paths: Paths,
    /// Already-loaded core config; read from disk when `None`
    pub config: Option<CoreConfig>,
    /// Engine interfaces acquired from the host
    pub interfaces: HostInterfaces,
}

/// Owner of all kit services
pub struct Kit {
    paths: Paths,
    config: CoreConfig,
    gamedata: GameData,
    signatures: SignatureCache,
    schema: Arc<SchemaOffsets>,
    entities: EntityDirectory,
    input: InputTracker,
}

impl Kit {
    /// Bring up every service
    ///
    /// Never fails: each missing piece only disables what depends on it.
    ///
    /// # Safety
    /// The interface pointers in `params` must be the engine's and stay
    /// valid until the kit is dropped.
    #[tracing::instrument(skip_all)]
    pub unsafe fn initialize(params: InitParams) -> Self {
        let InitParams {
            paths,
            config,
            interfaces,
        } = params;

        let config = config.unwrap_or_else(|| CoreConfig::load_or_default(&paths));

        let mut gamedata = GameData::default();
        let gamedata_path = paths.resolve(&config.gamedata);
        info!("Loading game data from {}...", gamedata_path.display());
        if !gamedata.load(&gamedata_path) {
            warn!("Continuing without gamedata; offsets and signatures are unavailable.");
        }

        let schema = Arc::new(SchemaOffsets::from_host(&interfaces));
        if !schema.initialize() {
            warn!("SchemaService initialization failed.");
        }

        let entities = EntityDirectory::new(interfaces.game_resource_service, schema.clone());

        Self::from_parts(paths, config, gamedata, schema, entities)
    }

    /// Assemble a kit from already-built services
    pub fn from_parts(
        paths: Paths,
        config: CoreConfig,
        gamedata: GameData,
        schema: Arc<SchemaOffsets>,
        mut entities: EntityDirectory,
    ) -> Self {
        let unresolved = schema
            .prefetch(&BUTTON_CHAIN_FIELDS)
            .iter()
            .filter(|offset| offset.is_none())
            .count();
        if unresolved > 0 {
            warn!("{} button chain field(s) not resolved yet.", unresolved);
        }

        entities.initialize(&gamedata);

        info!("CS2Kit initialized.");

        Self {
            paths,
            config,
            gamedata,
            signatures: SignatureCache::new(),
            schema,
            entities,
            input: InputTracker::new(),
        }
    }

    /// Per-frame work: poll player input
    ///
    /// Returns the button changes dispatched this frame.
    pub fn on_game_frame(&mut self) -> Vec<ButtonEvent> {
        self.input.poll(&self.entities)
    }

    /// Forget per-slot state of a leaving player
    pub fn on_player_disconnect(&mut self, slot: usize) {
        self.input.reset_slot(slot);
    }

    /// Re-read the core config, then the gamedata it points to
    pub fn reload(&mut self) -> bool {
        if let Err(e) = self.config.reload(&self.paths) {
            warn!("Keeping current core config: {}", e);
        }
        self.reload_gamedata()
    }

    /// Reload the gamedata file
    ///
    /// Memoized signatures are dropped either way. On success the entity
    /// directory picks up the new entity system offset.
    pub fn reload_gamedata(&mut self) -> bool {
        let path = self.paths.resolve(&self.config.gamedata);
        let loaded = self.gamedata.load(&path);
        self.signatures.clear();
        if loaded {
            self.entities.initialize(&self.gamedata);
        }
        loaded
    }

    /// Release cached state
    pub fn shutdown(self) {
        self.signatures.clear();
        self.schema.clear_cache();
        info!("CS2Kit shut down.");
    }

    pub fn paths(&self) -> &Paths {
        &self.paths
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    pub fn gamedata(&self) -> &GameData {
        &self.gamedata
    }

    pub fn schema(&self) -> &SchemaOffsets {
        &self.schema
    }

    pub fn entities(&self) -> &EntityDirectory {
        &self.entities
    }

    pub fn input(&mut self) -> &mut InputTracker {
        &mut self.input
    }

    /// Gamedata offset by name
    pub fn offset(&self, name: &str) -> Option<i64> {
        self.gamedata.offset(name)
    }

    /// Memoized signature address, following its relative displacement
    pub fn resolve_signature(&self, name: &str) -> Option<usize> {
        self.signatures.resolve(&self.gamedata, name)
    }

    /// Memoized raw signature match
    pub fn find_signature(&self, name: &str) -> Option<usize> {
        self.signatures.find(&self.gamedata, name)
    }

    /// Schema field offset
    pub fn schema_offset(&self, class_name: &str, field_name: &str) -> Option<i32> {
        self.schema.get_offset(class_name, field_name)
    }

    /// Controller instance of a player slot
    pub fn player_controller(&self, slot: usize) -> Option<NonNull<CEntityInstance>> {
        self.entities.player_controller(slot)
    }

    /// Raw button mask of a player slot, 0 when unavailable
    pub fn player_buttons(&self, slot: usize) -> u64 {
        self.entities.player_buttons(slot)
    }

    /// Player view of a slot
    pub fn player(&self, slot: usize) -> Player<'_> {
        Player::new(slot, &self.entities, &self.gamedata)
    }

    /// Controller pointer as an untyped address, null when absent
    pub fn player_controller_ptr(&self, slot: usize) -> *mut c_void {
        self.player_controller(slot)
            .map_or(std::ptr::null_mut(), |p| p.as_ptr().cast())
    }
}

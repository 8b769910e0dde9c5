//! Fixed engine layout constants
//!
//! CGameEntitySystem stores entities in a chunked array:
//!
//! ```text
//! CGameEntitySystem
//! └── +0x10: m_EntityList.m_pIdentityChunks (64 chunk pointers)
//!     ├── Chunk 0 (512 CEntityIdentity entries)
//!     ├── Chunk 1 (512 CEntityIdentity entries)
//!     └── ...
//!
//! CEntityIdentity (0x78 bytes each)
//! ├── +0x00: m_pInstance (CEntityInstance*)
//! ├── +0x08: m_pClass (CEntityClass*)
//! └── +0x10: m_EHandle (CEntityHandle)
//! ```

/// Number of entities per chunk (512)
pub const MAX_ENTITIES_IN_LIST: usize = 512;

/// Number of chunk pointers (64)
pub const MAX_ENTITY_LISTS: usize = 64;

/// Maximum number of entities (2^15 = 32768)
pub const MAX_TOTAL_ENTITIES: usize = MAX_ENTITIES_IN_LIST * MAX_ENTITY_LISTS;

/// Offset to the chunk pointer array in CGameEntitySystem
pub const ENTITY_LIST_OFFSET: usize = 0x10;

/// Size of CEntityIdentity
pub const SIZE_OF_ENTITY_IDENTITY: usize = 0x78;

/// Offset to m_pInstance (entity pointer) within CEntityIdentity
pub const INSTANCE_OFFSET: usize = 0x00;

/// Maximum number of player slots
pub const MAX_PLAYERS: usize = 64;

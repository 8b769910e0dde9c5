//! Schema offset resolver
//!
//! Resolves `(class, field)` pairs to byte offsets through a
//! [`SchemaReflection`] backend. Hits are cached for the process lifetime;
//! misses are not, so a lookup that failed because the reflection service was
//! not ready yet succeeds on a later call.

use std::collections::HashMap;

use cs2kit_engine::HostInterfaces;
use cs2kit_sdk::Platform;
use parking_lot::RwLock;
use tracing::{debug, error, info, trace, warn};

use super::reflection::{NativeSchemaSystem, SchemaReflection};

/// Error type for schema operations
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("Schema system not initialized")]
    NotInitialized,

    #[error("Type scope not found for module: {0}")]
    TypeScopeNotFound(String),

    #[error("Class not found: {0}")]
    ClassNotFound(String),

    #[error("Field not found: {class}.{field}")]
    FieldNotFound { class: String, field: String },

    #[error("FFI error: {0}")]
    FfiError(String),
}

/// Cached field offsets: class -> field -> offset
type OffsetCache = HashMap<String, HashMap<String, i32>>;

/// Field offset lookup with a per-process cache
pub struct SchemaOffsets {
    reflection: Option<Box<dyn SchemaReflection>>,
    module: String,
    cache: RwLock<OffsetCache>,
}

impl SchemaOffsets {
    /// Create a resolver over `reflection`, querying the server module's type scope
    pub fn new(reflection: Option<Box<dyn SchemaReflection>>) -> Self {
        Self {
            reflection,
            module: Platform::current().module_file_name("server"),
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Create a resolver over the host's schema system, if it provided one
    pub fn from_host(interfaces: &HostInterfaces) -> Self {
        let reflection = interfaces.schema_system.map(|ss| {
            // SAFETY: host interfaces stay valid for the plugin lifetime
            Box::new(unsafe { NativeSchemaSystem::new(ss) }) as Box<dyn SchemaReflection>
        });
        Self::new(reflection)
    }

    /// Check that a reflection backend is available
    pub fn initialize(&self) -> bool {
        if self.reflection.is_none() {
            warn!("ISchemaSystem not available.");
            return false;
        }

        info!("Schema system initialized.");
        true
    }

    /// Get a field offset, or `None` if it cannot be resolved right now
    pub fn get_offset(&self, class_name: &str, field_name: &str) -> Option<i32> {
        match self.try_get_offset(class_name, field_name) {
            Ok(offset) => Some(offset),
            Err(SchemaError::NotInitialized) => None,
            Err(e @ SchemaError::FieldNotFound { .. }) => {
                warn!("Schema: {}", e);
                None
            }
            Err(e) => {
                error!("Schema: {}", e);
                None
            }
        }
    }

    /// Get a field offset, reporting why it could not be resolved
    pub fn try_get_offset(&self, class_name: &str, field_name: &str) -> Result<i32, SchemaError> {
        if let Some(offset) = self.cached(class_name, field_name) {
            trace!("Cache hit for {}.{}: offset={}", class_name, field_name, offset);
            return Ok(offset);
        }

        let reflection = self.reflection.as_ref().ok_or(SchemaError::NotInitialized)?;
        let class = reflection.find_declared_class(&self.module, class_name)?;

        let offset = class
            .fields
            .iter()
            .find(|field| field.name == field_name)
            .map(|field| field.offset)
            .ok_or_else(|| SchemaError::FieldNotFound {
                class: class_name.to_string(),
                field: field_name.to_string(),
            })?;

        self.cache
            .write()
            .entry(class_name.to_string())
            .or_default()
            .insert(field_name.to_string(), offset);

        info!("Schema: {}::{} = {:#X} ({})", class_name, field_name, offset, offset);
        Ok(offset)
    }

    fn cached(&self, class_name: &str, field_name: &str) -> Option<i32> {
        self.cache
            .read()
            .get(class_name)
            .and_then(|fields| fields.get(field_name))
            .copied()
    }

    /// Resolve a batch of offsets up front
    ///
    /// Useful during load to surface missing fields early.
    pub fn prefetch(&self, pairs: &[(&str, &str)]) -> Vec<Option<i32>> {
        pairs
            .iter()
            .map(|(class, field)| self.get_offset(class, field))
            .collect()
    }

    /// Number of cached offsets
    pub fn cache_size(&self) -> usize {
        self.cache.read().values().map(HashMap::len).sum()
    }

    /// Drop every cached offset
    pub fn clear_cache(&self) {
        self.cache.write().clear();
        debug!("Schema offset cache cleared");
    }
}


#[cfg(test)]
mod tests {
    use super::testing::FakeReflection;
    use super::*;

    fn resolver(reflection: &FakeReflection) -> SchemaOffsets {
        SchemaOffsets::new(Some(Box::new(reflection.clone())))
    }

    #[test]
    fn test_initialize_requires_backend() {
        assert!(!SchemaOffsets::new(None).initialize());
        assert!(resolver(&FakeReflection::default()).initialize());
    }

    #[test]
    fn test_without_backend_everything_misses() {
        let schema = SchemaOffsets::new(None);
        assert_eq!(schema.get_offset("CBaseEntity", "m_iHealth"), None);
        assert!(matches!(
            schema.try_get_offset("CBaseEntity", "m_iHealth"),
            Err(SchemaError::NotInitialized)
        ));
    }

    #[test]
    fn test_hit_is_cached() {
        let reflection = FakeReflection::default().with_field("CBaseEntity", "m_iHealth", 0x344);
        let schema = resolver(&reflection);

        assert_eq!(schema.get_offset("CBaseEntity", "m_iHealth"), Some(0x344));
        assert_eq!(schema.get_offset("CBaseEntity", "m_iHealth"), Some(0x344));
        assert_eq!(schema.get_offset("CBaseEntity", "m_iHealth"), Some(0x344));
        assert_eq!(reflection.lookups(), 1);
        assert_eq!(schema.cache_size(), 1);
    }

    #[test]
    fn test_miss_is_retried_and_later_succeeds() {
        let reflection = FakeReflection::default().with_field("CBaseEntity", "m_iHealth", 0x344);
        let schema = resolver(&reflection);

        assert_eq!(schema.get_offset("CBaseEntity", "m_iTeamNum"), None);
        assert_eq!(schema.get_offset("CBaseEntity", "m_iTeamNum"), None);
        assert_eq!(reflection.lookups(), 2);
        assert_eq!(schema.cache_size(), 0);

        reflection.add_field("CBaseEntity", "m_iTeamNum", 0x3E3);
        assert_eq!(schema.get_offset("CBaseEntity", "m_iTeamNum"), Some(0x3E3));
        assert_eq!(reflection.lookups(), 3);
    }

    #[test]
    fn test_unknown_class_is_not_cached() {
        let reflection = FakeReflection::default();
        let schema = resolver(&reflection);

        assert!(matches!(
            schema.try_get_offset("CMissing", "m_x"),
            Err(SchemaError::ClassNotFound(_))
        ));

        reflection.add_field("CMissing", "m_x", 8);
        assert_eq!(schema.get_offset("CMissing", "m_x"), Some(8));
    }

    #[test]
    fn test_first_declared_duplicate_wins() {
        let reflection = FakeReflection::default()
            .with_field("CWeird", "m_a", 0x10)
            .with_field("CWeird", "m_dup", 0x20)
            .with_field("CWeird", "m_dup", 0x30);
        let schema = resolver(&reflection);

        assert_eq!(schema.get_offset("CWeird", "m_dup"), Some(0x20));
    }

    #[test]
    fn test_same_field_name_in_different_classes() {
        let reflection = FakeReflection::default()
            .with_field("CBaseEntity", "m_iHealth", 0x344)
            .with_field("COther", "m_iHealth", 0x10);
        let schema = resolver(&reflection);

        assert_eq!(schema.get_offset("CBaseEntity", "m_iHealth"), Some(0x344));
        assert_eq!(schema.get_offset("COther", "m_iHealth"), Some(0x10));
    }

    #[test]
    fn test_prefetch_and_clear() {
        let reflection = FakeReflection::default()
            .with_field("CBaseEntity", "m_iHealth", 0x344)
            .with_field("CBaseEntity", "m_iTeamNum", 0x3E3);
        let schema = resolver(&reflection);

        let results = schema.prefetch(&[
            ("CBaseEntity", "m_iHealth"),
            ("CBaseEntity", "m_iTeamNum"),
            ("CBaseEntity", "m_nope"),
        ]);
        assert_eq!(results, vec![Some(0x344), Some(0x3E3), None]);
        assert_eq!(schema.cache_size(), 2);

        schema.clear_cache();
        assert_eq!(schema.cache_size(), 0);
        assert_eq!(schema.get_offset("CBaseEntity", "m_iHealth"), Some(0x344));
        assert_eq!(reflection.lookups(), 4);
    }
}

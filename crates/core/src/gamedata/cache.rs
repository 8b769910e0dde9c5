//! Process-lifetime memo for signature resolution
//!
//! Pattern scans walk a whole module image, and the image does not move for
//! the life of the process. The first result for a name is kept, misses
//! included: a signature that failed to match stays unavailable until
//! [`SignatureCache::clear`] is called.

use dashmap::DashMap;

use super::catalog::GameData;

/// Memoized signature lookups, keyed by gamedata name
#[derive(Debug, Default)]
pub struct SignatureCache {
    found: DashMap<String, Option<usize>>,
    resolved: DashMap<String, Option<usize>>,
}

impl SignatureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Memoized [`GameData::find_signature`]
    pub fn find(&self, gamedata: &GameData, name: &str) -> Option<usize> {
        Self::memoize(&self.found, name, || gamedata.find_signature(name))
    }

    /// Memoized [`GameData::resolve_signature`]
    pub fn resolve(&self, gamedata: &GameData, name: &str) -> Option<usize> {
        Self::memoize(&self.resolved, name, || gamedata.resolve_signature(name))
    }

    fn memoize(
        map: &DashMap<String, Option<usize>>,
        name: &str,
        compute: impl FnOnce() -> Option<usize>,
    ) -> Option<usize> {
        if let Some(cached) = map.get(name) {
            return *cached;
        }

        let value = compute();
        if value.is_none() {
            tracing::debug!("Signature {} unavailable for the rest of this session", name);
        }
        *map.entry(name.to_string()).or_insert(value)
    }

    /// Number of memoized names across both lookups
    pub fn len(&self) -> usize {
        self.found.len() + self.resolved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.found.is_empty() && self.resolved.is_empty()
    }

    /// Forget every memoized result, e.g. after the catalog is reloaded
    pub fn clear(&self) {
        self.found.clear();
        self.resolved.clear();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use cs2kit_sdk::Platform;

    use super::super::scanner::testing::FakeModules;
    use super::super::scanner::SignatureScanner;
    use super::*;

    const JSON: &str = r#"{"signatures":{
        "Hit": { "linux": { "pattern": "AB CD" } },
        "Miss": { "linux": { "pattern": "EE FF" } }
    }}"#;

    fn setup() -> (GameData, std::sync::Arc<std::sync::atomic::AtomicUsize>, usize) {
        let modules = FakeModules::default().with("libserver.so", vec![0x00, 0xAB, 0xCD, 0x00]);
        let lookups = modules.lookups.clone();
        let base = modules.base_of("libserver.so");

        let mut gd = GameData::new(SignatureScanner::new(Box::new(modules), Platform::Linux));
        gd.load_from_str(JSON).unwrap();
        (gd, lookups, base)
    }

    #[test]
    fn test_hit_is_scanned_once() {
        let (gd, lookups, base) = setup();
        let cache = SignatureCache::new();

        assert_eq!(cache.resolve(&gd, "Hit"), Some(base + 1));
        assert_eq!(cache.resolve(&gd, "Hit"), Some(base + 1));
        assert_eq!(cache.resolve(&gd, "Hit"), Some(base + 1));
        assert_eq!(lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_miss_is_permanent() {
        let (gd, lookups, _) = setup();
        let cache = SignatureCache::new();

        assert_eq!(cache.resolve(&gd, "Miss"), None);
        assert_eq!(cache.resolve(&gd, "Miss"), None);
        assert_eq!(lookups.load(Ordering::SeqCst), 1);

        // Unknown names never reach the scanner, but are still remembered
        assert_eq!(cache.resolve(&gd, "Unknown"), None);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_find_and_resolve_are_separate() {
        let (gd, lookups, base) = setup();
        let cache = SignatureCache::new();

        assert_eq!(cache.find(&gd, "Hit"), Some(base + 1));
        assert_eq!(cache.resolve(&gd, "Hit"), Some(base + 1));
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clear_rescans() {
        let (gd, lookups, _) = setup();
        let cache = SignatureCache::new();

        cache.resolve(&gd, "Hit");
        cache.clear();
        assert!(cache.is_empty());
        cache.resolve(&gd, "Hit");
        assert_eq!(lookups.load(Ordering::SeqCst), 2);
    }
}

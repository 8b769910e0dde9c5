//! Entity handles
//!
//! Source 2 refers to entities by a 32-bit handle combining a table index
//! with a serial number:
//!
//! ```text
//! ┌─────────────────────────────┬───────────────────────────────────┐
//! │    Serial Number (17 bits)  │      Entity Index (15 bits)       │
//! │         bits 15-31          │           bits 0-14               │
//! └─────────────────────────────┴───────────────────────────────────┘
//! ```
//!
//! The all-ones value marks "no entity". Resolution only uses the index;
//! the serial is carried for display and comparison.

use std::fmt;

/// Number of index bits (15 bits = 32768 entities)
pub const ENTITY_INDEX_BITS: u32 = 15;

/// Mask extracting the index from a raw handle
pub const ENTITY_INDEX_MASK: u32 = (1 << ENTITY_INDEX_BITS) - 1;

/// Invalid handle sentinel value
pub const INVALID_EHANDLE_INDEX: u32 = 0xFFFF_FFFF;

/// A raw entity handle as stored in engine memory
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityHandle(u32);

impl EntityHandle {
    /// The "no entity" handle
    pub const INVALID: Self = Self(INVALID_EHANDLE_INDEX);

    #[inline]
    pub const fn from_raw(value: u32) -> Self {
        Self(value)
    }

    #[inline]
    pub const fn raw(&self) -> u32 {
        self.0
    }

    /// Entity table index (lower 15 bits)
    #[inline]
    pub const fn index(&self) -> usize {
        (self.0 & ENTITY_INDEX_MASK) as usize
    }

    /// Serial number (upper 17 bits)
    #[inline]
    pub const fn serial(&self) -> u32 {
        self.0 >> ENTITY_INDEX_BITS
    }

    /// Check that this is not the sentinel
    ///
    /// A valid handle may still point at an empty slot.
    #[inline]
    pub const fn is_valid(&self) -> bool {
        self.0 != INVALID_EHANDLE_INDEX
    }
}

impl Default for EntityHandle {
    fn default() -> Self {
        Self::INVALID
    }
}

impl From<u32> for EntityHandle {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl fmt::Debug for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "EntityHandle(index={}, serial={})", self.index(), self.serial())
        } else {
            write!(f, "EntityHandle(invalid)")
        }
    }
}

impl fmt::Display for EntityHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}:{}", self.index(), self.serial())
        } else {
            write!(f, "invalid")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_index_extraction() {
        assert_eq!(EntityHandle::from_raw(0x0000_1234).index(), 0x1234);
        assert_eq!(EntityHandle::from_raw(0x7FFF).index(), 0x7FFF);
        assert_eq!(EntityHandle::from_raw(0xABCD_8001).index(), 1);
    }

    #[test]
    fn test_handle_serial_extraction() {
        let handle = EntityHandle::from_raw(0xABCD_8000);
        assert_eq!(handle.serial(), 0xABCD_8000 >> 15);
        assert_eq!(handle.index(), 0);
    }

    #[test]
    fn test_handle_validity() {
        assert!(EntityHandle::from_raw(0x0000_1234).is_valid());
        assert!(EntityHandle::from_raw(0x7FFF).is_valid());
        assert!(!EntityHandle::INVALID.is_valid());
        assert!(!EntityHandle::default().is_valid());
    }

    #[test]
    fn test_handle_display() {
        let handle = EntityHandle::from_raw(0x0001_8001); // index=1, serial=3
        assert_eq!(handle.to_string(), "1:3");
        assert_eq!(EntityHandle::INVALID.to_string(), "invalid");
    }

    #[test]
    fn test_handle_debug() {
        let debug = format!("{:?}", EntityHandle::from_raw(0x0001_8001));
        assert!(debug.contains("index=1"));
        assert!(debug.contains("serial=3"));
    }
}

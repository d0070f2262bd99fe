//! Entity identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

/// An entity identifier, unique within one loaded course.
///
/// Ids are session identity: they are handed out when entities are loaded or
/// added and are not written to course files. Zero is never allocated, so it
/// stays free as the "no entity" value in pick buffers.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Create an EntityId from a raw value (for decoding/testing)
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id counter owned by a course graph.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next: u32,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next unused id
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId(self.next);
        self.next += 1;
        id
    }

    /// Make sure ids allocated from now on are greater than `id`
    pub fn ensure_above(&mut self, id: EntityId) {
        if self.next <= id.0 {
            self.next = id.0 + 1;
        }
    }

    /// Peek at the id the next `allocate` call will return
    pub fn peek(&self) -> EntityId {
        EntityId(self.next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_generation() {
        let mut ids = IdAllocator::new();
        let id1 = ids.allocate();
        let id2 = ids.allocate();
        assert_ne!(id1, id2);
        assert!(id2.0 > id1.0);
        assert_eq!(id1.raw(), 1);
    }

    #[test]
    fn test_from_raw() {
        let id = EntityId::from_raw(42);
        assert_eq!(id.raw(), 42);
    }

    #[test]
    fn test_ensure_above() {
        let mut ids = IdAllocator::new();
        ids.ensure_above(EntityId(100));
        let id = ids.allocate();
        assert!(id.0 > 100);

        // never moves backwards
        ids.ensure_above(EntityId(5));
        assert_eq!(ids.peek(), EntityId(102));
    }
}

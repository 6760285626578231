//! Ordered occupant cells.
//!
//! A [`Cell`] is the ordered multiset of occupants at one tile coordinate.
//! Slots are kept sorted descending by priority value so the sequence reads
//! background-first: iterating a cell gives the paint order, and the same
//! order is used when fanning out arrival notifications.

use serde::{Deserialize, Serialize};

/// One occupant entry in a [`Cell`]: the handle plus the priority it was
/// filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot<T> {
    /// Blocking/paint rank. Smaller values block more and paint on top.
    pub priority: i32,
    /// The occupant handle.
    pub occupant: T,
}

/// The ordered multiset of occupants at one tile.
///
/// # Ordering invariant
///
/// Slots are sorted descending by priority value. A new slot is inserted
/// immediately before the first existing slot whose priority is less than
/// or equal to the new slot's priority, so equal priorities read
/// newest-first. Insertion is stable and O(occupants).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Default for Cell<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Copy + PartialEq> Cell<T> {
    /// Creates an empty cell.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Files `occupant` under `priority`, keeping the ordering invariant.
    pub fn insert(&mut self, occupant: T, priority: i32) {
        let at = self
            .slots
            .iter()
            .position(|slot| slot.priority <= priority)
            .unwrap_or(self.slots.len());
        self.slots.insert(at, Slot { priority, occupant });
    }

    /// Removes the slot holding `occupant`.
    ///
    /// Returns `false` when the occupant was not filed here (the call is a
    /// no-op in that case).
    pub fn remove(&mut self, occupant: T) -> bool {
        match self.slots.iter().position(|slot| slot.occupant == occupant) {
            Some(at) => {
                self.slots.remove(at);
                true
            }
            None => false,
        }
    }

    /// Returns `true` when `occupant` is filed in this cell.
    #[must_use]
    pub fn contains(&self, occupant: T) -> bool {
        self.slots.iter().any(|slot| slot.occupant == occupant)
    }

    /// Returns `true` iff some occupant's priority is strictly below
    /// `threshold`.
    ///
    /// Equal ranks do not block each other; that is what lets actors share
    /// a tile and collide.
    #[must_use]
    pub fn blocks(&self, threshold: i32) -> bool {
        self.slots.iter().any(|slot| slot.priority < threshold)
    }

    /// The slots in stored (paint / fan-out) order.
    #[must_use]
    pub fn slots(&self) -> &[Slot<T>] {
        &self.slots
    }

    /// Number of occupants filed here.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` when no occupant is filed here.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================

//! The arena: entity storage, board occupancy, and the tick roster.
//!
//! The [`Arena`] is the container for one level's worth of state. It keeps
//! every [`Entity`] in a `BTreeMap` so all scans run in id order (the
//! deterministic order everything else relies on), mirrors each entity's
//! position into the [`loam::Board`], and owns the [`SessionState`].
//!
//! # Occupancy discipline
//!
//! Spawning places an entity on the board atomically and despawning removes
//! it, so there is no such thing as a live-but-unplaced entity. Position
//! changes go through exactly one crate-private primitive,
//! [`Arena::relocate`]; outside the crate the board is reachable read-only.
//! That funnel is what upholds the core invariant: every entity is filed in
//! exactly one cell, the one matching its recorded coordinate.

use std::collections::BTreeMap;

use glam::IVec2;
use loam::{Board, OffBoard, Slot};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::entity::{Caps, Entity, EntityId, EntityKind, KindState};
use crate::session::SessionState;

/// Container for all entities, occupancy, and session state of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    /// Monotonically increasing entity id counter.
    next_id: u64,
    /// Entity storage; `BTreeMap` keeps every scan in id order.
    entities: BTreeMap<EntityId, Entity>,
    /// Tile occupancy, keyed by entity id.
    board: Board<EntityId>,
    /// Tick subscription list, in enrollment order.
    roster: Vec<EntityId>,
    /// Fuel counter and terminal flags.
    session: SessionState,
    /// Current tick number.
    tick: u64,
}

impl Arena {
    /// Creates an empty arena with the given board size and starting fuel.
    ///
    /// # Panics
    ///
    /// Panics when either board dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32, initial_fuel: i32) -> Self {
        Self {
            next_id: 0,
            entities: BTreeMap::new(),
            board: Board::new(width, height),
            roster: Vec::new(),
            session: SessionState::new(initial_fuel),
            tick: 0,
        }
    }

    /// Board width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.board.width()
    }

    /// Board height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.board.height()
    }

    /// Read-only view of the occupancy board.
    #[must_use]
    pub const fn board(&self) -> &Board<EntityId> {
        &self.board
    }

    /// Spawns an entity of the given state at `at` and files it on the
    /// board. Kinds with [`Caps::ANIMATE`] are enrolled for ticks; an
    /// entity spawned mid-tick is only seen by later passes.
    ///
    /// # Errors
    ///
    /// Returns [`OffBoard`] when `at` lies outside the board; nothing is
    /// created in that case.
    pub fn spawn(&mut self, state: KindState, at: IVec2) -> Result<EntityId, OffBoard> {
        let id = EntityId::new(self.next_id);
        let entity = Entity::new(id, state, at);
        self.board.place(id, entity.priority(), at)?;
        self.next_id += 1;
        if entity.caps().contains(Caps::ANIMATE) {
            self.roster.push(id);
        }
        debug!(%id, kind = %entity.kind(), x = at.x, y = at.y, "entity spawned");
        self.entities.insert(id, entity);
        Ok(id)
    }

    /// Removes an entity from the arena, its board cell, and the roster.
    ///
    /// Returns the removed entity, or `None` when the id is unknown (a
    /// no-op, so collision handlers may despawn freely).
    pub fn despawn(&mut self, id: EntityId) -> Option<Entity> {
        let entity = self.entities.remove(&id)?;
        self.board.remove(id, entity.at());
        self.roster.retain(|enrolled| *enrolled != id);
        debug!(%id, kind = %entity.kind(), "entity despawned");
        Some(entity)
    }

    /// Returns a reference to an entity by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    /// Returns a mutable reference to an entity by id.
    #[must_use]
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    /// Iterates entity ids in sorted (deterministic) order.
    pub fn entity_ids_sorted(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.keys().copied()
    }

    /// Iterates entities in id order.
    pub fn entities_sorted(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.values()
    }

    /// Number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns `true` when no entity is live.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns `true` iff `at` is off the board or held by an occupant
    /// ranked strictly below `threshold`.
    #[must_use]
    pub fn is_blocked(&self, at: IVec2, threshold: i32) -> bool {
        self.board.is_blocked(at, threshold)
    }

    /// Moves an entity to `to`, updating board and record together.
    ///
    /// Returns the destination cell's pre-arrival snapshot for the caller
    /// to fan out collision notifications; a same-cell move returns an
    /// empty snapshot. This is the single authoritative move path; all
    /// movement validation sits in [`crate::movement`] in front of it.
    ///
    /// # Errors
    ///
    /// Returns [`OffBoard`] when `to` lies outside the board; the entity
    /// stays where it was.
    pub(crate) fn relocate(
        &mut self,
        id: EntityId,
        to: IVec2,
    ) -> Result<Vec<Slot<EntityId>>, OffBoard> {
        let Some(entity) = self.entities.get_mut(&id) else {
            debug_assert!(false, "relocate on unknown entity {id}");
            return Ok(Vec::new());
        };
        let from = entity.at();
        let priority = entity.priority();
        let snapshot = self.board.relocate(id, priority, from, to)?;
        entity.set_at(to);
        Ok(snapshot)
    }

    /// The tick subscription list, in enrollment order.
    #[must_use]
    pub fn roster(&self) -> &[EntityId] {
        &self.roster
    }

    /// A copy of the roster for one dispatch pass. The scheduler iterates
    /// the copy so entities enrolled mid-pass wait for the next tick.
    #[must_use]
    pub fn roster_snapshot(&self) -> Vec<EntityId> {
        self.roster.clone()
    }

    /// The session state.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        &self.session
    }

    /// Mutable session state.
    pub fn session_mut(&mut self) -> &mut SessionState {
        &mut self.session
    }

    /// Current tick number.
    #[must_use]
    pub const fn current_tick(&self) -> u64 {
        self.tick
    }

    /// Advances the tick counter.
    pub fn advance_tick(&mut self) {
        self.tick += 1;
    }

    /// Positions of every live entity of `kind`, in id order.
    #[must_use]
    pub fn positions_of(&self, kind: EntityKind) -> Vec<IVec2> {
        self.entities_sorted()
            .filter(|entity| entity.kind() == kind)
            .map(Entity::at)
            .collect()
    }

    /// Position of the exit, when one is placed.
    #[must_use]
    pub fn exit_position(&self) -> Option<IVec2> {
        self.entities_sorted()
            .find(|entity| entity.kind() == EntityKind::Exit)
            .map(Entity::at)
    }

    /// Id of the forager, when one is placed.
    #[must_use]
    pub fn forager_id(&self) -> Option<EntityId> {
        self.entities_sorted()
            .find(|entity| entity.kind() == EntityKind::Forager)
            .map(Entity::id)
    }
}

// =============================================================================
// Tests
// =============================================================================

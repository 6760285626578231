//! The simulation: clock dispatch and the outer control surface.
//!
//! One [`Simulation`] owns the arena, the behavior table, the attached
//! scripted controllers, and a seeded random stream. Scheduling is
//! single-threaded and cooperative: each [`Simulation::step`] snapshots
//! the roster, then runs every enrolled entity's hook to completion in
//! enrollment order. Entities spawned inside a pass are enrolled for the
//! next one; entities despawned inside a pass are skipped when their turn
//! comes. Given the same seed, the same level, and the same sequence of
//! calls, a run is reproducible byte for byte.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use glam::IVec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::arena::Arena;
use crate::behavior::{BehaviorRegistry, TickCtx};
use crate::control::{self, ControlPort, Controller};
use crate::entity::{Caps, Entity, EntityId};
use crate::movement::{self, MoveError};
use crate::session::SessionState;

/// An attached controller plus its replenishment meter.
struct ControllerSlot {
    brain: Box<dyn Controller>,
    meter: u32,
}

/// Owner of one running level: arena, behaviors, controllers, clock.
pub struct Simulation {
    arena: Arena,
    behaviors: BehaviorRegistry,
    controllers: BTreeMap<EntityId, ControllerSlot>,
    rng: ChaCha8Rng,
    master_seed: u64,
}

impl fmt::Debug for Simulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Simulation")
            .field("arena", &self.arena)
            .field("behaviors", &self.behaviors)
            .field(
                "controllers",
                &format!("[{} attached]", self.controllers.len()),
            )
            .field("master_seed", &self.master_seed)
            .finish()
    }
}

impl Simulation {
    /// Creates a simulation over an empty board with the stock behaviors.
    ///
    /// # Panics
    ///
    /// Panics when either board dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32, initial_fuel: i32, seed: u64) -> Self {
        Self {
            arena: Arena::new(width, height, initial_fuel),
            behaviors: BehaviorRegistry::standard(),
            controllers: BTreeMap::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            master_seed: seed,
        }
    }

    /// Read-only arena access.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Mutable arena access, for level setup and tests. Avoid mutating
    /// mid-step; in-step effects belong in behaviors and controllers.
    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// The behavior table.
    #[must_use]
    pub const fn behaviors(&self) -> &BehaviorRegistry {
        &self.behaviors
    }

    /// Mutable behavior table, for swapping in custom behaviors before a
    /// run.
    pub fn behaviors_mut(&mut self) -> &mut BehaviorRegistry {
        &mut self.behaviors
    }

    /// The master seed this simulation's random stream started from.
    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.master_seed
    }

    /// Convenience passthrough to the session state.
    #[must_use]
    pub const fn session(&self) -> &SessionState {
        self.arena.session()
    }

    /// The current tick number.
    #[must_use]
    pub const fn tick(&self) -> u64 {
        self.arena.current_tick()
    }

    /// Attaches a scripted controller to an entity. The controller runs
    /// instead of the entity's kind tick hook and receives the fixed
    /// fuel replenishment cadence.
    pub fn attach_controller(&mut self, id: EntityId, brain: Box<dyn Controller>) {
        self.controllers.insert(id, ControllerSlot { brain, meter: 0 });
    }

    /// Detaches a controller, returning it when one was attached.
    pub fn detach_controller(&mut self, id: EntityId) -> Option<Box<dyn Controller>> {
        self.controllers.remove(&id).map(|slot| slot.brain)
    }

    /// Delivers one tick event carrying `(rate, elapsed)` to every
    /// enrolled entity, in enrollment order.
    ///
    /// The roster is snapshotted first: entities enrolled mid-pass wait
    /// for the next tick, entities despawned mid-pass are skipped. Each
    /// hook runs to completion before the next starts; the only
    /// suspension point in the core is between calls to this function.
    pub fn step(&mut self, rate: u32, elapsed: u32) {
        let roster = self.arena.roster_snapshot();
        for id in roster {
            let Some(kind) = self.arena.get(id).map(Entity::kind) else {
                continue;
            };
            if let Some(mut slot) = self.controllers.remove(&id) {
                slot.meter += elapsed;
                if slot.meter > control::REFILL_CADENCE {
                    self.arena.session_mut().refill(control::REFILL_AMOUNT);
                    slot.meter -= control::REFILL_CADENCE;
                }
                let mut port = ControlPort::new(&mut self.arena, &self.behaviors, id);
                slot.brain.tick(&mut port);
                self.controllers.insert(id, slot);
            } else if let Some(behavior) = self.behaviors.get(kind) {
                let behavior = Arc::clone(behavior);
                let mut ctx = TickCtx {
                    rate,
                    elapsed,
                    rng: &mut self.rng,
                };
                behavior.on_tick(&mut self.arena, &self.behaviors, id, &mut ctx);
            }
        }
        self.arena.advance_tick();
    }

    /// Direct steering for the human-driven convention: one validated
    /// step, charged `|dx| + |dy|` fuel on success. On success the
    /// forager's heading follows the step. Callers wiring this to key
    /// events typically discard the rejection.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`] or [`MoveError::Blocked`]; nothing
    /// changes on a rejection.
    pub fn steer(&mut self, id: EntityId, delta: IVec2) -> Result<(), MoveError> {
        debug_assert!(
            self.arena
                .get(id)
                .map_or(true, |entity| entity.caps().contains(Caps::STEERABLE)),
            "steer on an entity without the STEERABLE capability"
        );
        movement::attempt_move(&mut self.arena, &self.behaviors, id, delta)?;
        self.arena.session_mut().spend(movement::manhattan(delta));
        if delta != IVec2::ZERO {
            if let Some(forager) = self
                .arena
                .get_mut(id)
                .and_then(|entity| entity.as_forager_mut())
            {
                forager.heading = delta;
            }
        }
        Ok(())
    }

    /// Launches a bolt in an explicit direction, charged
    /// `3 × (|dx| + |dy|)` fuel on success.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`] or [`MoveError::Blocked`]; nothing
    /// changes (and nothing is charged) on a rejection.
    pub fn launch(&mut self, id: EntityId, direction: IVec2) -> Result<EntityId, MoveError> {
        let bolt = movement::launch(&mut self.arena, id, direction)?;
        self.arena
            .session_mut()
            .spend(control::LAUNCH_COST_FACTOR * movement::manhattan(direction));
        Ok(bolt)
    }

    /// Launches a bolt along the forager's current heading.
    ///
    /// # Errors
    ///
    /// As [`Simulation::launch`].
    pub fn launch_heading(&mut self, id: EntityId) -> Result<EntityId, MoveError> {
        let direction = self
            .arena
            .get(id)
            .and_then(Entity::as_forager)
            .map_or(IVec2::X, |forager| forager.heading);
        self.launch(id, direction)
    }

    /// Searches for a shortest route from the entity's tile to `goal`,
    /// using the entity's own priority as the blocking threshold. The
    /// result is a snapshot against current occupancy; `None` means no
    /// route exists right now.
    #[must_use]
    pub fn route(&self, id: EntityId, goal: IVec2) -> Option<loam::Path> {
        let entity = self.arena.get(id)?;
        loam::find_path(self.arena.board(), entity.at(), goal, entity.priority())
    }

    /// Replays a route through the steering protocol, one charged step at
    /// a time, stopping at the first rejection. Proving a level solvable
    /// and auto-walking its solution use the same occupancy query as live
    /// movement.
    ///
    /// # Errors
    ///
    /// The first [`MoveError`] hit while replaying; earlier steps stay
    /// applied.
    pub fn walk(&mut self, id: EntityId, path: &loam::Path) -> Result<(), MoveError> {
        for step in path.steps() {
            self.steer(id, *step)?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================

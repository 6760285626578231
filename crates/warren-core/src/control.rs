//! The scripted-controller sandbox.
//!
//! A [`Controller`] is user-written steering logic for the forager. It is
//! invoked once per tick by the scheduler and can only touch the arena
//! through a [`ControlPort`], a scoped handle exposing the costed
//! operations and a few free reads, nothing else. The relocation primitive
//! and the session counter are out of reach, so a controller cannot cheat
//! its way past occupancy checks or refund its own fuel.
//!
//! # Costs
//!
//! Charges land only when an operation succeeds; a rejected move or launch
//! costs nothing. The queries always succeed and always charge.

use glam::IVec2;
use tracing::warn;

use crate::arena::Arena;
use crate::behavior::BehaviorRegistry;
use crate::entity::{Entity, EntityId, EntityKind};
use crate::movement::{self, MoveError};
use crate::session::SessionState;

/// Fuel cost multiplier for launching a bolt: `3 × (|dx| + |dy|)`.
pub const LAUNCH_COST_FACTOR: i32 = 3;
/// Fuel cost of one hostile-positions query.
pub const HOSTILE_QUERY_COST: i32 = 5;
/// Fuel cost of one cache-positions query.
pub const CACHE_QUERY_COST: i32 = 20;
/// Fuel cost of one exit-position query.
pub const EXIT_QUERY_COST: i32 = 30;
/// Fuel granted on each replenishment.
pub const REFILL_AMOUNT: i32 = 3;
/// Tick units that must accumulate between replenishments. At most one
/// refill lands per tick, however far the meter overshot.
pub const REFILL_CADENCE: u32 = 5;

/// User-written steering logic, invoked once per tick.
pub trait Controller: Send {
    /// One decision step. Everything the controller may do goes through
    /// the port.
    fn tick(&mut self, port: &mut ControlPort<'_>);
}

/// Scoped arena access for one controller, one tick.
pub struct ControlPort<'a> {
    arena: &'a mut Arena,
    behaviors: &'a BehaviorRegistry,
    id: EntityId,
}

impl<'a> ControlPort<'a> {
    pub(crate) fn new(
        arena: &'a mut Arena,
        behaviors: &'a BehaviorRegistry,
        id: EntityId,
    ) -> Self {
        Self {
            arena,
            behaviors,
            id,
        }
    }

    /// The controlled entity's current tile. Free.
    #[must_use]
    pub fn position(&self) -> IVec2 {
        self.arena.get(self.id).map_or(IVec2::ZERO, Entity::at)
    }

    /// Remaining session fuel. Free.
    #[must_use]
    pub fn fuel(&self) -> i32 {
        self.arena.session().fuel()
    }

    /// Read-only session state (won/over flags included). Free.
    #[must_use]
    pub fn session(&self) -> &SessionState {
        self.arena.session()
    }

    /// Whether a step by `delta` would currently be accepted. Free; call
    /// it as often as you like.
    #[must_use]
    pub fn can_step(&self, delta: IVec2) -> bool {
        if delta.x.abs() > 1 || delta.y.abs() > 1 {
            return false;
        }
        let Some(entity) = self.arena.get(self.id) else {
            return false;
        };
        !self
            .arena
            .is_blocked(entity.at() + delta, entity.priority())
    }

    /// Requests a one-tile step. Costs `|dx| + |dy|` fuel on success.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`] for a non-unit delta,
    /// [`MoveError::Blocked`] for an occupied or off-board destination.
    /// Rejections cost nothing and are safe to catch and branch on.
    pub fn step(&mut self, delta: IVec2) -> Result<(), MoveError> {
        match movement::attempt_move(self.arena, self.behaviors, self.id, delta) {
            Ok(()) => {
                self.arena.session_mut().spend(movement::manhattan(delta));
                Ok(())
            }
            Err(err) => {
                warn!(controller = %self.id, %err, "scripted step rejected");
                Err(err)
            }
        }
    }

    /// Launches a bolt one tile out in `delta`, flying onward. Costs
    /// `3 × (|dx| + |dy|)` fuel on success.
    ///
    /// # Errors
    ///
    /// [`MoveError::OutOfRange`] for a non-unit delta,
    /// [`MoveError::Blocked`] when the spawn tile is occupied or off the
    /// board. Rejections cost nothing.
    pub fn launch(&mut self, delta: IVec2) -> Result<EntityId, MoveError> {
        match movement::launch(self.arena, self.id, delta) {
            Ok(bolt) => {
                self.arena
                    .session_mut()
                    .spend(LAUNCH_COST_FACTOR * movement::manhattan(delta));
                Ok(bolt)
            }
            Err(err) => {
                warn!(controller = %self.id, %err, "scripted launch rejected");
                Err(err)
            }
        }
    }

    /// Current positions of every sentry. Costs 5 fuel, always succeeds.
    pub fn hostiles(&mut self) -> Vec<IVec2> {
        self.arena.session_mut().spend(HOSTILE_QUERY_COST);
        self.arena.positions_of(EntityKind::Sentry)
    }

    /// Positions of every uncollected cache. Costs 20 fuel, always
    /// succeeds.
    pub fn caches(&mut self) -> Vec<IVec2> {
        self.arena.session_mut().spend(CACHE_QUERY_COST);
        self.arena.positions_of(EntityKind::Cache)
    }

    /// Position of the exit. Costs 30 fuel, always succeeds.
    pub fn exit_position(&mut self) -> Option<IVec2> {
        self.arena.session_mut().spend(EXIT_QUERY_COST);
        self.arena.exit_position()
    }
}

// =============================================================================
// Tests
// =============================================================================

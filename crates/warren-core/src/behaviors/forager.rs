//! The controllable actor.
//!
//! The forager does not move itself: steering comes from outside, either
//! keyboard-style through [`Simulation::steer`](crate::Simulation::steer)
//! or a scripted controller through the sandbox port. Its behavior here is
//! purely reactive: paying the fuel toll when something hostile lands on
//! its tile.

use tracing::debug;

use crate::arena::Arena;
use crate::behavior::Behavior;
use crate::entity::{Entity, EntityId, EntityKind};

/// Fuel drained when a sentry walks onto the forager's tile.
pub const SENTRY_CONTACT_DRAIN: i32 = 15;
/// Fuel drained when a bolt lands on the forager's tile.
pub const BOLT_CONTACT_DRAIN: i32 = 10;

/// Stock behavior for [`EntityKind::Forager`].
pub struct ForagerBehavior;

impl Behavior for ForagerBehavior {
    fn kind(&self) -> EntityKind {
        EntityKind::Forager
    }

    // on_tick: default kinematics. The forager's velocity is normally zero;
    // it only matters if the embedding program gives it one.

    fn on_collision(&self, arena: &mut Arena, me: EntityId, mover: EntityId) {
        let Some(kind) = arena.get(mover).map(Entity::kind) else {
            return;
        };
        let drain = match kind {
            EntityKind::Sentry => SENTRY_CONTACT_DRAIN,
            EntityKind::Bolt => BOLT_CONTACT_DRAIN,
            _ => return,
        };
        debug!(forager = %me, %mover, drain, "forager struck");
        arena.session_mut().spend(drain);
    }
}

// =============================================================================
// Tests
// =============================================================================

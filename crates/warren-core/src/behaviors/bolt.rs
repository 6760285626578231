//! The thrown projectile.
//!
//! A bolt is pure motion: launched with a fixed velocity, it rides the
//! shared kinematics until a step is rejected (a wall or the board edge)
//! and then removes itself from the arena. What it does to whatever it
//! lands on is the victim's collision handler's business, not the bolt's.

use tracing::debug;

use crate::arena::Arena;
use crate::behavior::{Behavior, BehaviorRegistry, TickCtx};
use crate::entity::{EntityId, EntityKind};
use crate::movement;

/// Stock behavior for [`EntityKind::Bolt`].
pub struct BoltBehavior;

impl Behavior for BoltBehavior {
    fn kind(&self) -> EntityKind {
        EntityKind::Bolt
    }

    fn on_tick(
        &self,
        arena: &mut Arena,
        behaviors: &BehaviorRegistry,
        id: EntityId,
        ctx: &mut TickCtx<'_>,
    ) {
        movement::kinematic_step(arena, behaviors, id, ctx.rate, ctx.elapsed);
        let grounded = arena
            .get(id)
            .is_some_and(|entity| !entity.motion().last_step_ok);
        if grounded {
            debug!(bolt = %id, "bolt grounded");
            arena.despawn(id);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

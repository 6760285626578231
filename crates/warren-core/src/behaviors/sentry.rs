//! The patrolling hostile.
//!
//! A sentry walks a square beat and periodically throws a bolt in a random
//! direction. Its movement rule wraps the shared kinematics: the patrol
//! bookkeeping (leg counting, quarter turns, launch cadence) advances only
//! when an actual unblocked move is attempted, so a sentry pressed against
//! a wall stalls rather than spinning its counters.

use glam::{IVec2, Vec2};
use rand::Rng;
use tracing::debug;

use crate::arena::Arena;
use crate::behavior::{Behavior, BehaviorRegistry, TickCtx};
use crate::entity::{Caps, Entity, EntityId, EntityKind};
use crate::movement;

/// Hit points a sentry starts with.
pub const STARTING_VIGOR: i32 = 30;
/// Damage one bolt landing on the sentry's tile deals.
pub const BOLT_DAMAGE: i32 = 15;
/// Patrol speed, tiles per time unit.
pub const PATROL_SPEED: f32 = 5.0;
/// Attempted moves per patrol leg before the quarter turn.
pub const PATROL_LEG: u32 = 5;
/// A bolt is thrown on every `LAUNCH_PERIOD`-th attempted move.
pub const LAUNCH_PERIOD: u32 = 7;

/// The eight unit directions a thrown bolt may take.
const LAUNCH_DIRECTIONS: [IVec2; 8] = [
    IVec2::new(1, 0),
    IVec2::new(0, 1),
    IVec2::new(-1, 0),
    IVec2::new(0, -1),
    IVec2::new(-1, -1),
    IVec2::new(1, 1),
    IVec2::new(1, -1),
    IVec2::new(-1, 1),
];

/// Stock behavior for [`EntityKind::Sentry`].
pub struct SentryBehavior;

impl Behavior for SentryBehavior {
    fn kind(&self) -> EntityKind {
        EntityKind::Sentry
    }

    fn on_tick(
        &self,
        arena: &mut Arena,
        behaviors: &BehaviorRegistry,
        id: EntityId,
        ctx: &mut TickCtx<'_>,
    ) {
        let Some(entity) = arena.get_mut(id) else {
            return;
        };
        let step = movement::accrue(entity.motion_mut(), ctx.rate, ctx.elapsed);
        if step == IVec2::ZERO {
            return;
        }
        let to = entity.at() + step;
        let priority = entity.priority();
        if arena.is_blocked(to, priority) {
            if let Some(entity) = arena.get_mut(id) {
                entity.motion_mut().last_step_ok = false;
            }
            return;
        }

        // Patrol bookkeeping, once per unblocked attempt.
        let mut launch_now = false;
        if let Some(entity) = arena.get_mut(id) {
            let mut quarter_turn = false;
            if let Some(sentry) = entity.as_sentry_mut() {
                if sentry.leg_steps % PATROL_LEG == 0 {
                    quarter_turn = true;
                    sentry.leg_steps = 0;
                }
                sentry.leg_steps += 1;
                sentry.since_launch += 1;
                launch_now = sentry.since_launch % LAUNCH_PERIOD == 1;
            }
            if quarter_turn {
                let velocity = entity.motion().velocity;
                entity.motion_mut().velocity = Vec2::new(velocity.y, -velocity.x);
            }
        }
        if launch_now {
            let direction = LAUNCH_DIRECTIONS[ctx.rng.gen_range(0..LAUNCH_DIRECTIONS.len())];
            // A blocked throw is simply skipped.
            let _ = movement::launch(arena, id, direction);
        }

        let ok = movement::attempt_move(arena, behaviors, id, step).is_ok();
        if let Some(entity) = arena.get_mut(id) {
            entity.motion_mut().last_step_ok = ok;
        }
    }

    fn on_collision(&self, arena: &mut Arena, me: EntityId, mover: EntityId) {
        if arena.get(mover).map(Entity::kind) != Some(EntityKind::Bolt) {
            return;
        }
        let mut destroyed = false;
        if let Some(entity) = arena.get_mut(me) {
            let ephemeral = entity.caps().contains(Caps::EPHEMERAL);
            if let Some(sentry) = entity.as_sentry_mut() {
                sentry.vigor -= BOLT_DAMAGE;
                destroyed = ephemeral && sentry.vigor <= 0;
            }
        }
        if destroyed {
            debug!(sentry = %me, "sentry destroyed");
            arena.despawn(me);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

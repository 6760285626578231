//! Movement validation, collision fan-out, and shared kinematics.
//!
//! Every position change in the arena funnels through [`attempt_move`]:
//! a magnitude check on the requested delta, the shared blocking query
//! with the mover's own priority, the arena's relocation primitive, and
//! finally the collision fan-out over the destination's prior residents.
//! Rejections are values, not events: human-driven callers discard them,
//! scripted callers catch them and branch, and nothing changes on a
//! rejected request: not the coordinate, not the fuel.
//!
//! The kinematics here are plain free functions rather than methods on
//! some base type; each behavior calls them explicitly, which keeps the
//! accumulate-then-step rule in one place while leaving kinds free to
//! wrap it.

use glam::IVec2;
use loam::Slot;
use thiserror::Error;
use tracing::{debug, trace};

use crate::arena::Arena;
use crate::behavior::BehaviorRegistry;
use crate::entity::{Entity, EntityId, KindState, Motion};

/// Velocity of a freshly launched bolt, in tiles per time unit.
pub const BOLT_SPEED: f32 = 8.0;

/// A movement request that could not be carried out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The requested delta had a component outside `[-1, 1]`. A caller
    /// error; never worth retrying as-is.
    #[error("step delta ({0}, {1}) is outside the unit range")]
    OutOfRange(i32, i32),
    /// The destination is off the board or held by a strictly more
    /// blocking occupant. Recoverable: pick another direction.
    #[error("destination ({0}, {1}) is blocked")]
    Blocked(i32, i32),
}

/// The Manhattan magnitude `|dx| + |dy|`, the unit for movement and
/// launch costs.
#[must_use]
pub fn manhattan(delta: IVec2) -> i32 {
    delta.x.abs() + delta.y.abs()
}

fn in_unit_range(delta: IVec2) -> bool {
    delta.x.abs() <= 1 && delta.y.abs() <= 1
}

/// Requests a one-step move for `id` by `delta`.
///
/// On success the entity stands on the new tile and every prior resident
/// of that tile ranked equal-or-looser than the mover has been notified,
/// in stored cell order. On failure nothing has changed. Costs are the
/// caller's business: this function never touches the fuel counter.
///
/// # Errors
///
/// - [`MoveError::OutOfRange`] when a delta component is outside `[-1, 1]`
/// - [`MoveError::Blocked`] when the destination is off the board or held
///   by a strictly more blocking occupant
pub fn attempt_move(
    arena: &mut Arena,
    behaviors: &BehaviorRegistry,
    id: EntityId,
    delta: IVec2,
) -> Result<(), MoveError> {
    if !in_unit_range(delta) {
        return Err(MoveError::OutOfRange(delta.x, delta.y));
    }
    let Some(entity) = arena.get(id) else {
        debug_assert!(false, "attempt_move on unknown entity {id}");
        return Ok(());
    };
    let priority = entity.priority();
    let to = entity.at() + delta;
    if arena.is_blocked(to, priority) {
        trace!(%id, x = to.x, y = to.y, "move rejected: destination blocked");
        return Err(MoveError::Blocked(to.x, to.y));
    }
    let snapshot = arena
        .relocate(id, to)
        .map_err(|off| MoveError::Blocked(off.at.x, off.at.y))?;
    fan_out(arena, behaviors, id, priority, &snapshot);
    Ok(())
}

/// Delivers one collision notification to each snapshotted resident whose
/// priority is numerically `>=` the mover's, in stored (largest-first)
/// order.
///
/// The list is a snapshot taken before the mover arrived, so handlers may
/// despawn themselves or the mover without corrupting the pass; residents
/// despawned by an earlier handler are skipped rather than notified
/// post-mortem.
fn fan_out(
    arena: &mut Arena,
    behaviors: &BehaviorRegistry,
    mover: EntityId,
    mover_priority: i32,
    snapshot: &[Slot<EntityId>],
) {
    for slot in snapshot {
        if slot.priority < mover_priority {
            continue;
        }
        let Some(kind) = arena.get(slot.occupant).map(Entity::kind) else {
            continue;
        };
        if let Some(behavior) = behaviors.get(kind) {
            trace!(resident = %slot.occupant, %mover, "collision");
            behavior.on_collision(arena, slot.occupant, mover);
        }
    }
}

/// Advances the per-axis accumulators by one tick and returns the unit
/// step they produce.
///
/// Each axis meter grows by `velocity * elapsed / rate`. When a meter's
/// magnitude exceeds 1, exactly one signed unit is taken on that axis and
/// exactly one signed unit is paid back, at most one step per axis per
/// tick no matter how far the meter overshot, so a slow clock never
/// causes catch-up bursts.
pub fn accrue(motion: &mut Motion, rate: u32, elapsed: u32) -> IVec2 {
    #[allow(clippy::cast_precision_loss)]
    let dt = elapsed as f32 / rate as f32;
    motion.accrued += motion.velocity * dt;

    let mut step = IVec2::ZERO;
    if motion.accrued.x.abs() > 1.0 {
        let sign = unit_sign(motion.velocity.x);
        motion.accrued.x -= sign;
        step.x = sign as i32;
    }
    if motion.accrued.y.abs() > 1.0 {
        let sign = unit_sign(motion.velocity.y);
        motion.accrued.y -= sign;
        step.y = sign as i32;
    }
    step
}

fn unit_sign(value: f32) -> f32 {
    if value >= 0.0 {
        1.0
    } else {
        -1.0
    }
}

/// The shared default tick kinematics: accrue, then route any produced
/// step through [`attempt_move`], recording the outcome in the motion's
/// `last_step_ok` flag for kind-specific logic to inspect.
pub fn kinematic_step(
    arena: &mut Arena,
    behaviors: &BehaviorRegistry,
    id: EntityId,
    rate: u32,
    elapsed: u32,
) {
    let Some(entity) = arena.get_mut(id) else {
        return;
    };
    let step = accrue(entity.motion_mut(), rate, elapsed);
    if step == IVec2::ZERO {
        return;
    }
    let ok = attempt_move(arena, behaviors, id, step).is_ok();
    if let Some(entity) = arena.get_mut(id) {
        entity.motion_mut().last_step_ok = ok;
    }
}

/// Launches a bolt one tile from `id` in `direction`, flying onward at
/// [`BOLT_SPEED`].
///
/// The spawn tile is vetted with the firer's own priority, so there is no
/// launching into walls. Placement is silent (no collision fan-out); the
/// bolt makes
/// itself felt on its first flight step. Costs are the caller's business.
///
/// # Errors
///
/// - [`MoveError::OutOfRange`] when a direction component is outside `[-1, 1]`
/// - [`MoveError::Blocked`] when the spawn tile is off the board or held
///   by a strictly more blocking occupant
pub fn launch(arena: &mut Arena, id: EntityId, direction: IVec2) -> Result<EntityId, MoveError> {
    if !in_unit_range(direction) {
        return Err(MoveError::OutOfRange(direction.x, direction.y));
    }
    let Some(firer) = arena.get(id) else {
        debug_assert!(false, "launch from unknown entity {id}");
        return Err(MoveError::Blocked(0, 0));
    };
    debug_assert!(
        firer.caps().contains(crate::entity::Caps::FIRES),
        "launch from an entity without the FIRES capability"
    );
    let spawn_at = firer.at() + direction;
    if arena.is_blocked(spawn_at, firer.priority()) {
        return Err(MoveError::Blocked(spawn_at.x, spawn_at.y));
    }
    let bolt = arena
        .spawn(KindState::Bolt, spawn_at)
        .map_err(|off| MoveError::Blocked(off.at.x, off.at.y))?;
    if let Some(entity) = arena.get_mut(bolt) {
        entity.motion_mut().velocity = direction.as_vec2() * BOLT_SPEED;
    }
    debug!(firer = %id, %bolt, x = spawn_at.x, y = spawn_at.y, "bolt launched");
    Ok(bolt)
}

// =============================================================================
// Tests
// =============================================================================

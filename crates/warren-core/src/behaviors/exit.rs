//! The goal tile.

use tracing::info;

use crate::arena::Arena;
use crate::behavior::Behavior;
use crate::entity::{Entity, EntityId, EntityKind};

/// Stock behavior for [`EntityKind::Exit`]: the forager arriving on the
/// exit tile wins the session.
pub struct ExitBehavior;

impl Behavior for ExitBehavior {
    fn kind(&self) -> EntityKind {
        EntityKind::Exit
    }

    fn on_collision(&self, arena: &mut Arena, me: EntityId, mover: EntityId) {
        if arena.get(mover).map(Entity::kind) != Some(EntityKind::Forager) {
            return;
        }
        info!(exit = %me, "exit reached");
        arena.session_mut().set_won();
    }
}

// =============================================================================
// Tests
// =============================================================================

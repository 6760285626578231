//! The fuel cache.
//!
//! A cache sits still until the forager arrives on its tile, then pays its
//! yield into the session and removes itself. Order matters: the refill
//! lands before the despawn, so a cache that ends up being the session's
//! last action still counts.

use tracing::debug;

use crate::arena::Arena;
use crate::behavior::Behavior;
use crate::entity::{Entity, EntityId, EntityKind};

/// Fuel a freshly spawned cache yields when collected.
pub const STANDARD_YIELD: i32 = 15;

/// Stock behavior for [`EntityKind::Cache`].
pub struct CacheBehavior;

impl Behavior for CacheBehavior {
    fn kind(&self) -> EntityKind {
        EntityKind::Cache
    }

    fn on_collision(&self, arena: &mut Arena, me: EntityId, mover: EntityId) {
        if arena.get(mover).map(Entity::kind) != Some(EntityKind::Forager) {
            return;
        }
        let fuel_yield = arena
            .get(me)
            .and_then(|entity| entity.state().as_cache())
            .map_or(STANDARD_YIELD, |cache| cache.fuel_yield);
        debug!(cache = %me, fuel_yield, "cache collected");
        arena.session_mut().refill(fuel_yield);
        arena.despawn(me);
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Behavior dispatch for entity kinds.
//!
//! Behaviors are how kinds differ without an inheritance tree: each
//! [`EntityKind`] maps to one [`Behavior`] in the [`BehaviorRegistry`], and
//! the scheduler and the collision fan-out dispatch through that table.
//! A behavior carries no per-entity state (that lives in the entity's
//! [`KindState`](crate::entity::KindState)), so one instance serves every
//! entity of its kind.
//!
//! # Hooks
//!
//! - [`Behavior::on_tick`]: runs once per tick for enrolled entities. The
//!   default is the shared kinematics free function; kinds with their own
//!   movement rules wrap or replace it.
//! - [`Behavior::on_collision`]: runs when a mover arrives on the tile the
//!   entity occupies. The default does nothing.
//!
//! Hooks receive `&mut Arena` directly: the whole core is single-threaded
//! and every handler runs to completion before the next one starts, so
//! there is no staged command buffer between a decision and its effect.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use rand_chacha::ChaCha8Rng;

use crate::arena::Arena;
use crate::behaviors;
use crate::entity::{EntityId, EntityKind};
use crate::movement;

/// Context handed to tick hooks.
pub struct TickCtx<'a> {
    /// Ticks per time unit, as announced by the clock.
    pub rate: u32,
    /// Time units elapsed since the previous tick event.
    pub elapsed: u32,
    /// The simulation's deterministic random stream.
    pub rng: &'a mut ChaCha8Rng,
}

/// Kind-level behavior: a tick hook and a collision hook.
pub trait Behavior: Send + Sync {
    /// The kind this behavior drives.
    fn kind(&self) -> EntityKind;

    /// Per-tick hook for enrolled entities.
    ///
    /// The default applies the shared kinematics: accumulate velocity into
    /// the per-axis meters, take at most one signed unit step per axis,
    /// and route the step through the movement protocol.
    fn on_tick(
        &self,
        arena: &mut Arena,
        behaviors: &BehaviorRegistry,
        id: EntityId,
        ctx: &mut TickCtx<'_>,
    ) {
        movement::kinematic_step(arena, behaviors, id, ctx.rate, ctx.elapsed);
    }

    /// Collision hook: `mover` has just arrived on the tile `me` occupies.
    ///
    /// Notification is one-way: the mover is not told about `me` unless
    /// some handler turns around and tells it. `me` was captured in the
    /// destination snapshot before the arrival, so handlers are free to
    /// despawn themselves or the mover.
    fn on_collision(&self, arena: &mut Arena, me: EntityId, mover: EntityId) {
        let _ = (arena, me, mover);
    }
}

/// One behavior per entity kind.
///
/// Registration is keyed by [`Behavior::kind`]; registering a second
/// behavior for the same kind replaces the first, which is how embedders
/// swap a stock behavior for a custom one. Kinds without an entry (the
/// static terrain) simply have no hooks.
#[derive(Default)]
pub struct BehaviorRegistry {
    table: HashMap<EntityKind, Arc<dyn Behavior>>,
}

impl BehaviorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry loaded with the stock behaviors for every kind
    /// that has one.
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(behaviors::forager::ForagerBehavior));
        registry.register(Arc::new(behaviors::sentry::SentryBehavior));
        registry.register(Arc::new(behaviors::bolt::BoltBehavior));
        registry.register(Arc::new(behaviors::cache::CacheBehavior));
        registry.register(Arc::new(behaviors::exit::ExitBehavior));
        registry
    }

    /// Registers `behavior` for its declared kind, replacing any previous
    /// entry for that kind.
    pub fn register(&mut self, behavior: Arc<dyn Behavior>) {
        self.table.insert(behavior.kind(), behavior);
    }

    /// The behavior registered for `kind`, if any.
    #[must_use]
    pub fn get(&self, kind: EntityKind) -> Option<&Arc<dyn Behavior>> {
        self.table.get(&kind)
    }

    /// Number of registered behaviors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table.len()
    }

    /// Returns `true` when no behavior is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }
}

impl fmt::Debug for BehaviorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorRegistry")
            .field("kinds", &self.table.keys().collect::<Vec<_>>())
            .finish()
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Entity types for the arena.
//!
//! An [`Entity`] is one occupant of the board, moving or static, built
//! from four orthogonal pieces:
//!
//! - [`EntityId`]: stable identity, also the board occupant handle
//! - [`EntityKind`]: the kind tag that selects behaviors and defaults
//! - [`Caps`]: the capability flags (steerable, fires, ...)
//! - [`KindState`]: kind-specific mutable state
//!
//! There is no inheritance tree: every occupant is the same record, and
//! what differs between kinds lives in the tag, the flags, and the state
//! variant, dispatched through the behavior table in [`crate::behavior`].

pub mod state;

use std::fmt;

use bitflags::bitflags;
use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

pub use state::{CacheState, ForagerState, KindState, SentryState};

/// Priority ranks shared by every kind.
///
/// Smaller values block more and paint on top; larger values paint first
/// (background). A traveller is blocked by any resident ranked strictly
/// below its own priority, so equals can share a tile, which is exactly
/// how collisions happen.
pub mod rank {
    /// Walls and other solids.
    pub const SOLID: i32 = 1;
    /// The forager, sentries, and bolts.
    pub const ACTOR: i32 = 2;
    /// Caches and the exit.
    pub const ITEM: i32 = 3;
    /// Background floor.
    pub const FIELD: i32 = 4;
}

/// Unique identifier for an entity.
///
/// Ids are assigned monotonically by the arena and never reused within a
/// session. Their numeric ordering is the deterministic iteration order
/// for all entity scans.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates an `EntityId` from a raw value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// The raw value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Entity kind tag.
///
/// The tag selects the behavior bundle, the default priority rank, and the
/// capability flags. It always matches the [`KindState`] variant carried by
/// the entity.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// The controllable actor.
    Forager,
    /// Patrolling hostile.
    Sentry,
    /// Thrown projectile.
    Bolt,
    /// Stationary fuel pickup.
    Cache,
    /// The goal tile occupant.
    Exit,
    /// Impassable terrain.
    Wall,
    /// Background terrain.
    Floor,
}

impl EntityKind {
    /// The priority rank entities of this kind are filed under.
    #[must_use]
    pub const fn priority(self) -> i32 {
        match self {
            Self::Wall => rank::SOLID,
            Self::Forager | Self::Sentry | Self::Bolt => rank::ACTOR,
            Self::Cache | Self::Exit => rank::ITEM,
            Self::Floor => rank::FIELD,
        }
    }

    /// The capability flags entities of this kind start with.
    #[must_use]
    pub const fn caps(self) -> Caps {
        match self {
            Self::Forager => Caps::STEERABLE.union(Caps::FIRES).union(Caps::ANIMATE),
            Self::Sentry => Caps::FIRES.union(Caps::EPHEMERAL).union(Caps::ANIMATE),
            Self::Bolt => Caps::EPHEMERAL.union(Caps::ANIMATE),
            Self::Cache => Caps::EPHEMERAL,
            Self::Exit | Self::Wall | Self::Floor => Caps::empty(),
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Forager => write!(f, "forager"),
            Self::Sentry => write!(f, "sentry"),
            Self::Bolt => write!(f, "bolt"),
            Self::Cache => write!(f, "cache"),
            Self::Exit => write!(f, "exit"),
            Self::Wall => write!(f, "wall"),
            Self::Floor => write!(f, "floor"),
        }
    }
}

bitflags! {
    /// Capability flags.
    ///
    /// Capabilities gate what the embedding program may do with an entity;
    /// they do not carry behavior themselves.
    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
    pub struct Caps: u8 {
        /// May be moved from outside (keys or a scripted controller).
        const STEERABLE = 1;
        /// May launch bolts.
        const FIRES = 1 << 1;
        /// Removed from the arena on death rather than lingering.
        const EPHEMERAL = 1 << 2;
        /// Enrolled for tick events when spawned.
        const ANIMATE = 1 << 3;
    }
}

/// Kinematic state: velocity, per-axis tick accumulators, and the outcome
/// flag of the most recent accumulated step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Motion {
    /// Velocity in tiles per time unit; components may be fractional.
    pub velocity: Vec2,
    /// Per-axis fraction accumulated from ticks, spent one unit at a time.
    pub accrued: Vec2,
    /// Cleared when the last accumulated step was rejected.
    pub last_step_ok: bool,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            velocity: Vec2::ZERO,
            accrued: Vec2::ZERO,
            last_step_ok: true,
        }
    }
}

/// One occupant of the arena.
///
/// # Invariants
///
/// - `kind` always matches the [`KindState`] variant in `state`.
/// - `at` always names the one board cell the entity is filed in; the
///   arena's relocation primitive is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    id: EntityId,
    kind: EntityKind,
    priority: i32,
    caps: Caps,
    at: IVec2,
    motion: Motion,
    state: KindState,
}

impl Entity {
    pub(crate) fn new(id: EntityId, state: KindState, at: IVec2) -> Self {
        let kind = state.kind();
        Self {
            id,
            kind,
            priority: kind.priority(),
            caps: kind.caps(),
            at,
            motion: Motion::default(),
            state,
        }
    }

    /// The entity's unique identifier.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The entity's kind tag.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// The priority rank this entity is filed under.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// The entity's capability flags.
    #[must_use]
    pub const fn caps(&self) -> Caps {
        self.caps
    }

    /// The tile this entity currently stands on.
    #[must_use]
    pub const fn at(&self) -> IVec2 {
        self.at
    }

    /// Only the arena's relocation path may move an entity.
    pub(crate) fn set_at(&mut self, at: IVec2) {
        self.at = at;
    }

    /// The entity's kinematic state.
    #[must_use]
    pub const fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Mutable kinematic state. Velocity changes are fair game for the
    /// embedding program; positions are not (see [`Entity::at`]).
    pub fn motion_mut(&mut self) -> &mut Motion {
        &mut self.motion
    }

    /// The kind-specific state.
    #[must_use]
    pub const fn state(&self) -> &KindState {
        &self.state
    }

    /// Mutable kind-specific state.
    pub fn state_mut(&mut self) -> &mut KindState {
        &mut self.state
    }

    /// Forager state, when this is the forager.
    #[must_use]
    pub const fn as_forager(&self) -> Option<&ForagerState> {
        self.state.as_forager()
    }

    /// Mutable forager state, when this is the forager.
    pub fn as_forager_mut(&mut self) -> Option<&mut ForagerState> {
        self.state.as_forager_mut()
    }

    /// Sentry state, when this is a sentry.
    #[must_use]
    pub const fn as_sentry(&self) -> Option<&SentryState> {
        self.state.as_sentry()
    }

    /// Mutable sentry state, when this is a sentry.
    pub fn as_sentry_mut(&mut self) -> Option<&mut SentryState> {
        self.state.as_sentry_mut()
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod entity_id_tests {
        use super::*;

        #[test]
        fn ordering_follows_raw_value() {
            let a = EntityId::new(1);
            let b = EntityId::new(2);
            assert!(a < b);

            let mut ids = vec![b, a];
            ids.sort();
            assert_eq!(ids, vec![a, b]);
        }

        #[test]
        fn display_and_debug_formats() {
            let id = EntityId::new(42);
            assert_eq!(format!("{id}"), "42");
            assert_eq!(format!("{id:?}"), "EntityId(42)");
        }
    }

    mod kind_tests {
        use super::*;

        #[test]
        fn ranks_follow_the_shared_table() {
            assert_eq!(EntityKind::Wall.priority(), rank::SOLID);
            assert_eq!(EntityKind::Forager.priority(), rank::ACTOR);
            assert_eq!(EntityKind::Sentry.priority(), rank::ACTOR);
            assert_eq!(EntityKind::Bolt.priority(), rank::ACTOR);
            assert_eq!(EntityKind::Cache.priority(), rank::ITEM);
            assert_eq!(EntityKind::Exit.priority(), rank::ITEM);
            assert_eq!(EntityKind::Floor.priority(), rank::FIELD);
        }

        #[test]
        fn only_the_forager_is_steerable() {
            for kind in [
                EntityKind::Sentry,
                EntityKind::Bolt,
                EntityKind::Cache,
                EntityKind::Exit,
                EntityKind::Wall,
                EntityKind::Floor,
            ] {
                assert!(!kind.caps().contains(Caps::STEERABLE), "{kind}");
            }
            assert!(EntityKind::Forager.caps().contains(Caps::STEERABLE));
        }

        #[test]
        fn terrain_is_not_animate() {
            assert!(!EntityKind::Wall.caps().contains(Caps::ANIMATE));
            assert!(!EntityKind::Floor.caps().contains(Caps::ANIMATE));
            assert!(EntityKind::Bolt.caps().contains(Caps::ANIMATE));
        }
    }

    mod entity_tests {
        use super::*;

        #[test]
        fn new_derives_tag_rank_and_caps_from_state() {
            let entity = Entity::new(
                EntityId::new(7),
                KindState::sentry(),
                IVec2::new(3, 4),
            );

            assert_eq!(entity.kind(), EntityKind::Sentry);
            assert_eq!(entity.priority(), rank::ACTOR);
            assert!(entity.caps().contains(Caps::ANIMATE));
            assert_eq!(entity.at(), IVec2::new(3, 4));
            assert!(entity.as_sentry().is_some());
            assert!(entity.as_forager().is_none());
        }

        #[test]
        fn motion_defaults_to_rest() {
            let entity = Entity::new(EntityId::new(0), KindState::Bolt, IVec2::ZERO);
            assert_eq!(entity.motion().velocity, Vec2::ZERO);
            assert_eq!(entity.motion().accrued, Vec2::ZERO);
            assert!(entity.motion().last_step_ok);
        }

        #[test]
        fn serialization_roundtrip() {
            let entity = Entity::new(
                EntityId::new(3),
                KindState::forager(),
                IVec2::new(1, 2),
            );
            let json = serde_json::to_string(&entity).unwrap();
            let back: Entity = serde_json::from_str(&json).unwrap();
            assert_eq!(entity, back);
        }
    }
}

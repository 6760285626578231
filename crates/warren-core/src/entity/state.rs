//! Kind-specific entity state.
//!
//! Each [`KindState`] variant carries the mutable state that only one kind
//! needs; shared state (position, motion, priority) lives on the entity
//! record itself. Static occupants carry no state at all.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use super::EntityKind;

/// State for the controllable actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForagerState {
    /// Direction of the last successful steer; bolts launched without an
    /// explicit direction fly this way.
    pub heading: IVec2,
}

impl Default for ForagerState {
    fn default() -> Self {
        Self {
            heading: IVec2::new(1, 0),
        }
    }
}

/// State for a patrolling hostile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentryState {
    /// Remaining hit points; the sentry despawns at zero or below.
    pub vigor: i32,
    /// Attempted moves on the current patrol leg.
    pub leg_steps: u32,
    /// Attempted moves since the last bolt launch.
    pub since_launch: u32,
}

impl Default for SentryState {
    fn default() -> Self {
        Self {
            vigor: crate::behaviors::sentry::STARTING_VIGOR,
            leg_steps: 0,
            since_launch: 0,
        }
    }
}

/// State for a stationary fuel pickup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheState {
    /// Fuel granted to the session when the forager collects this cache.
    pub fuel_yield: i32,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            fuel_yield: crate::behaviors::cache::STANDARD_YIELD,
        }
    }
}

/// Kind-specific state storage.
///
/// The variant always matches the entity's [`EntityKind`] tag; use the
/// constructors here (or [`KindState::kind`]) rather than pairing them by
/// hand.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindState {
    /// Controllable actor state.
    Forager(ForagerState),
    /// Patrolling hostile state.
    Sentry(SentryState),
    /// Thrown projectile; everything it needs is in the motion record.
    Bolt,
    /// Fuel pickup state.
    Cache(CacheState),
    /// Goal tile occupant.
    Exit,
    /// Impassable terrain.
    Wall,
    /// Background terrain.
    Floor,
}

impl KindState {
    /// A forager with the default heading.
    #[must_use]
    pub fn forager() -> Self {
        Self::Forager(ForagerState::default())
    }

    /// A sentry at full vigor.
    #[must_use]
    pub fn sentry() -> Self {
        Self::Sentry(SentryState::default())
    }

    /// A cache with the standard fuel yield.
    #[must_use]
    pub fn cache() -> Self {
        Self::Cache(CacheState::default())
    }

    /// The kind tag this state belongs to.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Forager(_) => EntityKind::Forager,
            Self::Sentry(_) => EntityKind::Sentry,
            Self::Bolt => EntityKind::Bolt,
            Self::Cache(_) => EntityKind::Cache,
            Self::Exit => EntityKind::Exit,
            Self::Wall => EntityKind::Wall,
            Self::Floor => EntityKind::Floor,
        }
    }

    /// Forager state, when this is the forager.
    #[must_use]
    pub const fn as_forager(&self) -> Option<&ForagerState> {
        match self {
            Self::Forager(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable forager state, when this is the forager.
    pub fn as_forager_mut(&mut self) -> Option<&mut ForagerState> {
        match self {
            Self::Forager(state) => Some(state),
            _ => None,
        }
    }

    /// Sentry state, when this is a sentry.
    #[must_use]
    pub const fn as_sentry(&self) -> Option<&SentryState> {
        match self {
            Self::Sentry(state) => Some(state),
            _ => None,
        }
    }

    /// Mutable sentry state, when this is a sentry.
    pub fn as_sentry_mut(&mut self) -> Option<&mut SentryState> {
        match self {
            Self::Sentry(state) => Some(state),
            _ => None,
        }
    }

    /// Cache state, when this is a cache.
    #[must_use]
    pub const fn as_cache(&self) -> Option<&CacheState> {
        match self {
            Self::Cache(state) => Some(state),
            _ => None,
        }
    }
}

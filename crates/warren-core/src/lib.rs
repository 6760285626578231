//! # Warren Core
//!
//! Grid arena core simulation for Warren.
//!
//! This crate implements the deterministic tile-arena engine: one
//! controllable actor, scripted hostiles, and thrown bolts sharing a
//! priority-ordered occupancy board, with movement gated by a single
//! blocking query and a breadth-first router to prove and replay level
//! solutions.
//!
//! ## Architecture
//!
//! - **Entities** ([`entity`]): one record per occupant (id, kind tag,
//!   capability flags, motion, kind-specific state
//! - **Arena** ([`arena`]): id-ordered entity storage glued to the
//!   [`loam`] occupancy board, plus roster and session state
//! - **Behaviors** ([`behavior`], [`behaviors`]): per-kind tick and
//!   collision hooks dispatched through a registry
//! - **Movement** ([`movement`]): the validated one-step protocol, the
//!   collision fan-out, and the shared tick kinematics
//! - **Simulation** ([`simulation`]): the cooperative single-threaded
//!   scheduler and the outer steering/launch/routing surface
//! - **Control** ([`control`]): the costed sandbox scripted controllers
//!   drive the forager through
//! - **Levels** ([`level`]): JSON configuration and glyph-map loading
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warren_core::Config;
//!
//! let config = Config::from_str(&std::fs::read_to_string("config.json")?)?;
//! let mut sim = config.build_level(0)?;
//! while !sim.session().over() {
//!     sim.step(config.tick_rate, 1);
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

// Re-export the occupancy substrate for callers that work with the board
// or the router directly.
pub use loam;

pub mod arena;
pub mod behavior;
pub mod behaviors;
pub mod control;
pub mod entity;
pub mod level;
pub mod movement;
pub mod session;
pub mod simulation;

pub use arena::Arena;
pub use behavior::{Behavior, BehaviorRegistry, TickCtx};
pub use control::{ControlPort, Controller};
pub use entity::{Caps, Entity, EntityId, EntityKind, KindState};
pub use level::{Config, LevelError};
pub use movement::MoveError;
pub use session::SessionState;
pub use simulation::Simulation;

#[cfg(test)]
mod tests;

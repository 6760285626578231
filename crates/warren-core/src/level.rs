//! Level and configuration loading.
//!
//! Configuration is one JSON document: session defaults, a glyph palette
//! for the map rows, and a list of level descriptors. Loading validates
//! everything up front (row counts, row widths, glyph membership, and
//! every coordinate) and only then starts spawning, so a malformed file
//! is a clean error and never a half-built arena. This is the one
//! component that feeds untrusted coordinates into the arena.
//!
//! ```
//! use warren_core::Config;
//!
//! let config = Config::from_str(r##"{
//!     "initial_fuel": 30,
//!     "palette": [
//!         { "glyph": "#", "terrain": "wall" },
//!         { "glyph": ".", "terrain": "floor" }
//!     ],
//!     "levels": [{
//!         "name": "first",
//!         "width": 4,
//!         "height": 3,
//!         "start": [0, 0],
//!         "exit": [3, 0],
//!         "rows": ["....", ".##.", "...."]
//!     }]
//! }"##).unwrap();
//!
//! let sim = config.build_level(0).unwrap();
//! assert!(sim.arena().forager_id().is_some());
//! ```

use std::collections::HashMap;

use glam::{IVec2, Vec2};
use loam::OffBoard;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::behaviors::sentry::PATROL_SPEED;
use crate::entity::KindState;
use crate::simulation::Simulation;

/// Default starting fuel when the configuration leaves it out.
const DEFAULT_INITIAL_FUEL: i32 = 30;
/// Default clock rate (ticks per time unit).
const DEFAULT_TICK_RATE: u32 = 10;

fn default_initial_fuel() -> i32 {
    DEFAULT_INITIAL_FUEL
}

fn default_tick_rate() -> u32 {
    DEFAULT_TICK_RATE
}

/// Why a configuration or level failed to load.
#[derive(Debug, Error)]
pub enum LevelError {
    /// The JSON document did not parse or did not match the schema.
    #[error("configuration is invalid: {0}")]
    ConfigInvalid(#[from] serde_json::Error),
    /// The requested level index does not exist.
    #[error("no level at index {0}")]
    UnknownLevel(usize),
    /// The map has the wrong number of rows for its declared height.
    #[error("map has {found} rows, expected {expected}")]
    RowCountMismatch {
        /// Rows present in the document.
        found: usize,
        /// Rows the declared height requires.
        expected: usize,
    },
    /// A map row is unusable (1-based row number).
    #[error("map row {row} is malformed: {reason}")]
    MapMalformed {
        /// 1-based row number.
        row: usize,
        /// What was wrong with it.
        reason: String,
    },
    /// A map row used a glyph the palette does not define.
    #[error("unknown map glyph '{glyph}' in row {row}")]
    UnknownGlyph {
        /// The offending character.
        glyph: char,
        /// 1-based row number.
        row: usize,
    },
    /// A declared coordinate falls outside the level.
    #[error("{what} at ({x}, {y}) is outside the {width}x{height} level")]
    OutOfBounds {
        /// Which declaration carried the coordinate.
        what: &'static str,
        /// Declared x.
        x: i32,
        /// Declared y.
        y: i32,
        /// Level width.
        width: u32,
        /// Level height.
        height: u32,
    },
}

/// What a map glyph paints on its tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terrain {
    /// An impassable wall occupant.
    Wall,
    /// A background floor occupant.
    Floor,
    /// Nothing at all.
    Gap,
}

/// One palette entry: a map character and the terrain it paints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlyphRule {
    /// The character as it appears in map rows.
    pub glyph: char,
    /// What it paints.
    pub terrain: Terrain,
}

/// A placed non-terrain actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKind {
    /// A patrolling sentry, spawned on its rightward leg.
    Sentry,
    /// A fuel cache with the standard yield.
    Cache,
}

/// One actor placement in a level descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActorSpec {
    /// What to place.
    pub kind: ActorKind,
    /// Where to place it, `[x, y]`.
    pub at: [i32; 2],
}

/// One level descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSpec {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Level width in tiles.
    pub width: u32,
    /// Level height in tiles.
    pub height: u32,
    /// Forager start tile, `[x, y]`.
    pub start: [i32; 2],
    /// Exit tile, `[x, y]`.
    pub exit: [i32; 2],
    /// Placed actors.
    #[serde(default)]
    pub actors: Vec<ActorSpec>,
    /// Map rows, top to bottom; each row at least `width` glyphs wide
    /// (extra glyphs are ignored).
    pub rows: Vec<String>,
}

/// The whole configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Starting fuel for every level.
    #[serde(default = "default_initial_fuel")]
    pub initial_fuel: i32,
    /// Clock rate the embedding program should drive ticks at.
    #[serde(default = "default_tick_rate")]
    pub tick_rate: u32,
    /// Master seed for the simulation's random stream.
    #[serde(default)]
    pub seed: u64,
    /// Glyph palette shared by every level's map rows.
    pub palette: Vec<GlyphRule>,
    /// The levels, in play order.
    pub levels: Vec<LevelSpec>,
}

impl Config {
    /// Parses a configuration document from JSON text.
    ///
    /// # Errors
    ///
    /// [`LevelError::ConfigInvalid`] when the text is not valid JSON or
    /// does not match the schema.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(text: &str) -> Result<Self, LevelError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Number of levels in the document.
    #[must_use]
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Builds a ready [`Simulation`] for the level at `index`: terrain
    /// from the map rows, then the exit, the forager, and the placed
    /// actors.
    ///
    /// # Errors
    ///
    /// Any [`LevelError`] describing the first problem found; no partial
    /// simulation escapes.
    pub fn build_level(&self, index: usize) -> Result<Simulation, LevelError> {
        let level = self
            .levels
            .get(index)
            .ok_or(LevelError::UnknownLevel(index))?;
        let palette: HashMap<char, Terrain> = self
            .palette
            .iter()
            .map(|rule| (rule.glyph, rule.terrain))
            .collect();

        if level.rows.len() != level.height as usize {
            return Err(LevelError::RowCountMismatch {
                found: level.rows.len(),
                expected: level.height as usize,
            });
        }

        let mut sim = Simulation::new(level.width, level.height, self.initial_fuel, self.seed);
        let arena = sim.arena_mut();

        for (y, row) in level.rows.iter().enumerate() {
            let glyphs: Vec<char> = row.chars().collect();
            if glyphs.len() < level.width as usize {
                return Err(LevelError::MapMalformed {
                    row: y + 1,
                    reason: format!(
                        "row is {} glyphs wide, expected at least {}",
                        glyphs.len(),
                        level.width
                    ),
                });
            }
            for x in 0..level.width as usize {
                let glyph = glyphs[x];
                let terrain = *palette
                    .get(&glyph)
                    .ok_or(LevelError::UnknownGlyph { glyph, row: y + 1 })?;
                #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
                let at = IVec2::new(x as i32, y as i32);
                let state = match terrain {
                    Terrain::Wall => KindState::Wall,
                    Terrain::Floor => KindState::Floor,
                    Terrain::Gap => continue,
                };
                arena
                    .spawn(state, at)
                    .map_err(|off| out_of_bounds("map tile", &off))?;
            }
        }

        arena
            .spawn(KindState::Exit, coord(level.exit))
            .map_err(|off| out_of_bounds("exit tile", &off))?;
        arena
            .spawn(KindState::forager(), coord(level.start))
            .map_err(|off| out_of_bounds("start tile", &off))?;

        for actor in &level.actors {
            let at = coord(actor.at);
            match actor.kind {
                ActorKind::Sentry => {
                    let id = arena
                        .spawn(KindState::sentry(), at)
                        .map_err(|off| out_of_bounds("sentry", &off))?;
                    if let Some(entity) = arena.get_mut(id) {
                        entity.motion_mut().velocity = Vec2::new(PATROL_SPEED, 0.0);
                    }
                }
                ActorKind::Cache => {
                    arena
                        .spawn(KindState::cache(), at)
                        .map_err(|off| out_of_bounds("cache", &off))?;
                }
            }
        }

        info!(
            level = %level.name,
            width = level.width,
            height = level.height,
            entities = arena.entity_count(),
            "level built"
        );
        Ok(sim)
    }
}

fn coord(at: [i32; 2]) -> IVec2 {
    IVec2::new(at[0], at[1])
}

fn out_of_bounds(what: &'static str, off: &OffBoard) -> LevelError {
    LevelError::OutOfBounds {
        what,
        x: off.at.x,
        y: off.at.y,
        width: off.width,
        height: off.height,
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Test setup utilities.

use glam::{IVec2, Vec2};

use crate::arena::Arena;
use crate::behaviors::sentry::PATROL_SPEED;
use crate::entity::{EntityId, KindState};
use crate::simulation::Simulation;

/// A fresh simulation over an open board.
pub fn open_simulation(width: u32, height: u32, fuel: i32) -> Simulation {
    Simulation::new(width, height, fuel, 7)
}

/// Spawns the forager at `at` and returns its id.
pub fn spawn_forager(sim: &mut Simulation, at: IVec2) -> EntityId {
    sim.arena_mut()
        .spawn(KindState::forager(), at)
        .expect("forager spawn in bounds")
}

/// Spawns a sentry at `at` on its rightward patrol leg.
pub fn spawn_sentry(sim: &mut Simulation, at: IVec2) -> EntityId {
    let id = sim
        .arena_mut()
        .spawn(KindState::sentry(), at)
        .expect("sentry spawn in bounds");
    sim.arena_mut()
        .get_mut(id)
        .expect("sentry just spawned")
        .motion_mut()
        .velocity = Vec2::new(PATROL_SPEED, 0.0);
    id
}

/// Lays a straight wall segment from `from`, `len` tiles along `step`.
pub fn lay_wall(sim: &mut Simulation, from: IVec2, step: IVec2, len: u32) {
    let mut at = from;
    for _ in 0..len {
        sim.arena_mut()
            .spawn(KindState::Wall, at)
            .expect("wall spawn in bounds");
        at += step;
    }
}

/// Audits the occupancy invariant: every live entity is filed in exactly
/// one cell, and that cell matches its recorded coordinate.
pub fn audit_occupancy(arena: &Arena) {
    for entity in arena.entities_sorted() {
        let mut appearances = 0;
        #[allow(clippy::cast_possible_wrap)]
        for y in 0..arena.height() as i32 {
            #[allow(clippy::cast_possible_wrap)]
            for x in 0..arena.width() as i32 {
                let at = IVec2::new(x, y);
                let cell = arena.board().cell(at).expect("coordinate in bounds");
                if cell.contains(entity.id()) {
                    appearances += 1;
                    assert_eq!(
                        at,
                        entity.at(),
                        "entity {} filed at ({x}, {y}) but records {:?}",
                        entity.id(),
                        entity.at(),
                    );
                }
            }
        }
        assert_eq!(
            appearances,
            1,
            "entity {} appears in {appearances} cells",
            entity.id(),
        );
    }
}

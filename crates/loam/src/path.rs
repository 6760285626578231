//! Breadth-first routing over the board's blocking predicate.
//!
//! The router answers one question: is there a walkable route from tile A
//! to tile B for a traveller of a given priority rank, and if so, what is
//! a shortest one? It uses exactly the same [`Board::is_blocked`] query as
//! live movement, so a returned [`Path`] is a snapshot of the occupancy at
//! search time; it is not re-validated against movers during replay (use
//! [`validate`] for that).

use std::collections::VecDeque;

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::board::Board;

/// Neighbor expansion order: `+x, -x, +y, -y`.
///
/// This order decides the tie-break among equal-length routes and is part
/// of the observable contract: tests rely on it.
pub const EXPANSION_ORDER: [IVec2; 4] = [
    IVec2::new(1, 0),
    IVec2::new(-1, 0),
    IVec2::new(0, 1),
    IVec2::new(0, -1),
];

/// A replayable route: the absolute start tile plus a list of unit steps.
///
/// Replaying the steps in order reconstructs the full tile sequence from
/// start to goal. An unreachable goal is represented by the absence of a
/// `Path` (`find_path` returns `None`), not by a special value in here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    start: IVec2,
    steps: Vec<IVec2>,
}

impl Path {
    /// The absolute start tile.
    #[must_use]
    pub const fn start(&self) -> IVec2 {
        self.start
    }

    /// The unit steps, in walk order. Each component is in `{-1, 0, 1}`.
    #[must_use]
    pub fn steps(&self) -> &[IVec2] {
        &self.steps
    }

    /// Number of steps in the route.
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// Returns `true` when start and goal coincide.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// The final tile reached by replaying every step.
    #[must_use]
    pub fn end(&self) -> IVec2 {
        self.steps.iter().fold(self.start, |at, step| at + *step)
    }

    /// Replays the route: yields the start tile, then every successive
    /// tile in walk order.
    pub fn replay(&self) -> impl Iterator<Item = IVec2> + '_ {
        let mut at = self.start;
        std::iter::once(self.start).chain(self.steps.iter().map(move |step| {
            at += *step;
            at
        }))
    }
}

/// Searches for a shortest 4-connected route from `from` to `to` for a
/// traveller of priority `threshold`.
///
/// Frontier tiles are processed first-in-first-out and neighbors are tried
/// in [`EXPANSION_ORDER`], so each tile is discovered at most once and the
/// first route found to any tile uses the minimum number of steps. The
/// search stops the moment the goal is discovered; `None` means the
/// frontier drained without reaching it.
#[must_use]
#[allow(clippy::cast_sign_loss)]
pub fn find_path<T: Copy + PartialEq>(
    board: &Board<T>,
    from: IVec2,
    to: IVec2,
    threshold: i32,
) -> Option<Path> {
    if !board.in_bounds(from) {
        return None;
    }
    if from == to {
        return Some(Path {
            start: from,
            steps: Vec::new(),
        });
    }

    let width = board.width() as usize;
    let height = board.height() as usize;
    let index = |at: IVec2| at.y as usize * width + at.x as usize;

    // Predecessor tile and the step taken from it, recorded on first visit.
    let mut came_from: Vec<Option<(IVec2, IVec2)>> = vec![None; width * height];
    let mut seen = vec![false; width * height];
    seen[index(from)] = true;

    let mut frontier = VecDeque::new();
    frontier.push_back(from);

    while let Some(at) = frontier.pop_front() {
        for step in EXPANSION_ORDER {
            let next = at + step;
            if board.is_blocked(next, threshold) {
                continue;
            }
            let slot = index(next);
            if seen[slot] {
                continue;
            }
            seen[slot] = true;
            came_from[slot] = Some((at, step));
            if next == to {
                return Some(rebuild(from, to, &came_from, index));
            }
            frontier.push_back(next);
        }
    }

    None
}

/// Walks the predecessor chain backwards from the goal and reverses it
/// into a start-to-goal step list.
fn rebuild(
    from: IVec2,
    to: IVec2,
    came_from: &[Option<(IVec2, IVec2)>],
    index: impl Fn(IVec2) -> usize,
) -> Path {
    let mut steps = Vec::new();
    let mut at = to;
    while at != from {
        let (previous, step) =
            came_from[index(at)].expect("every tile on the chain was recorded on first visit");
        steps.push(step);
        at = previous;
    }
    steps.reverse();
    Path { start: from, steps }
}

/// Re-checks a route against the board's current occupancy.
///
/// Returns `true` when the start tile and every tile reached by replaying
/// the steps are passable for a traveller of priority `threshold`.
#[must_use]
pub fn validate<T: Copy + PartialEq>(board: &Board<T>, threshold: i32, path: &Path) -> bool {
    path.replay().all(|at| !board.is_blocked(at, threshold))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn at(x: i32, y: i32) -> IVec2 {
        IVec2::new(x, y)
    }

    fn open_board(width: u32, height: u32) -> Board<u32> {
        Board::new(width, height)
    }

    /// Surrounds `center` with rank-1 occupants (blocking for rank 2).
    fn wall_in(board: &mut Board<u32>, center: IVec2) {
        let mut handle = 100;
        for step in EXPANSION_ORDER {
            board.place(handle, 1, center + step).unwrap();
            handle += 1;
        }
    }

    mod search_tests {
        use super::*;

        #[test]
        fn open_grid_route_has_minimal_length() {
            let board = open_board(5, 4);
            let path = find_path(&board, at(0, 0), at(4, 3), 2).unwrap();

            assert_eq!(path.len(), 4 + 3);
            assert_eq!(path.end(), at(4, 3));
            let total = path
                .steps()
                .iter()
                .fold(IVec2::ZERO, |sum, step| sum + *step);
            assert_eq!(total, at(4, 3));
        }

        #[test]
        fn start_equals_goal_yields_empty_route() {
            let board = open_board(3, 3);
            let path = find_path(&board, at(1, 1), at(1, 1), 2).unwrap();
            assert!(path.is_empty());
            assert_eq!(path.start(), at(1, 1));
            assert_eq!(path.end(), at(1, 1));
        }

        #[test]
        fn expansion_order_decides_tie_breaks() {
            // On an open 3x3 board the route to (2, 2) must explore +x
            // before +y: two steps right, then two steps down.
            let board = open_board(3, 3);
            let path = find_path(&board, at(0, 0), at(2, 2), 2).unwrap();

            assert_eq!(
                path.steps(),
                &[at(1, 0), at(1, 0), at(0, 1), at(0, 1)]
            );
        }

        #[test]
        fn enclosed_goal_yields_none() {
            let mut board = open_board(7, 7);
            wall_in(&mut board, at(3, 3));

            assert!(find_path(&board, at(0, 0), at(3, 3), 2).is_none());
        }

        #[test]
        fn enclosed_start_can_still_route_to_itself() {
            let mut board = open_board(7, 7);
            wall_in(&mut board, at(3, 3));

            let path = find_path(&board, at(3, 3), at(3, 3), 2).unwrap();
            assert!(path.is_empty());
        }

        #[test]
        fn route_detours_around_a_wall_line() {
            // A vertical rank-1 wall with one gap at the bottom.
            let mut board = open_board(5, 5);
            for y in 0..4u32 {
                #[allow(clippy::cast_possible_wrap)]
                board.place(50 + y, 1, at(2, y as i32)).unwrap();
            }

            let path = find_path(&board, at(0, 2), at(4, 2), 2).unwrap();

            assert_eq!(path.end(), at(4, 2));
            assert!(path
                .replay()
                .all(|tile| !board.is_blocked(tile, 2)));
            // Forced through the gap row.
            assert!(path.replay().any(|tile| tile.y == 4));
        }

        #[test]
        fn lower_rank_traveller_ignores_the_wall() {
            let mut board = open_board(5, 5);
            for y in 0..5u32 {
                #[allow(clippy::cast_possible_wrap)]
                board.place(50 + y, 1, at(2, y as i32)).unwrap();
            }

            // Rank 1 is not blocked by rank-1 residents: straight line.
            let path = find_path(&board, at(0, 2), at(4, 2), 1).unwrap();
            assert_eq!(path.len(), 4);
        }

        #[test]
        fn start_off_board_yields_none() {
            let board = open_board(3, 3);
            assert!(find_path(&board, at(-1, 0), at(2, 2), 2).is_none());
        }
    }

    mod replay_tests {
        use super::*;

        #[test]
        fn replay_visits_every_tile_in_order() {
            let board = open_board(3, 3);
            let path = find_path(&board, at(0, 0), at(2, 0), 2).unwrap();

            let tiles: Vec<IVec2> = path.replay().collect();
            assert_eq!(tiles, vec![at(0, 0), at(1, 0), at(2, 0)]);
        }

        #[test]
        fn validate_accepts_a_fresh_route() {
            let board = open_board(4, 4);
            let path = find_path(&board, at(0, 0), at(3, 3), 2).unwrap();
            assert!(validate(&board, 2, &path));
        }

        #[test]
        fn validate_rejects_a_route_blocked_after_the_search() {
            let mut board = open_board(4, 4);
            let path = find_path(&board, at(0, 0), at(3, 0), 2).unwrap();

            board.place(9, 1, at(2, 0)).unwrap();
            assert!(!validate(&board, 2, &path));
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn serialization_roundtrip() {
            let board = open_board(3, 3);
            let path = find_path(&board, at(0, 0), at(2, 2), 2).unwrap();

            let json = serde_json::to_string(&path).unwrap();
            let back: Path = serde_json::from_str(&json).unwrap();
            assert_eq!(path, back);
        }
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// On an open board every route replays to the goal with the
            /// Manhattan-minimal number of steps.
            #[test]
            fn open_board_routes_are_manhattan_minimal(
                width in 1u32..9,
                height in 1u32..9,
            ) {
                let board = open_board(width, height);
                #[allow(clippy::cast_possible_wrap)]
                let goal = at(width as i32 - 1, height as i32 - 1);
                let path = find_path(&board, at(0, 0), goal, 2).unwrap();
                prop_assert_eq!(path.end(), goal);
                prop_assert_eq!(path.len() as i32, goal.x + goal.y);
            }
        }
    }
}

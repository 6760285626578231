//! The board: a width×height lattice of ordered cells.
//!
//! The [`Board`] owns the canonical coordinate-to-cell mapping. All
//! occupancy changes go through three operations ([`Board::place`],
//! [`Board::remove`], and [`Board::relocate`]) and all passability
//! questions go through one predicate, [`Board::is_blocked`], which is
//! shared by movement validation and the router in [`crate::path`].

use glam::IVec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::cell::{Cell, Slot};

/// Error returned when a coordinate falls outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("coordinate ({x}, {y}) falls outside the {width}x{height} board", x = .at.x, y = .at.y)]
pub struct OffBoard {
    /// The rejected coordinate.
    pub at: IVec2,
    /// Board width in tiles.
    pub width: u32,
    /// Board height in tiles.
    pub height: u32,
}

/// A dense `width × height` lattice of occupant [`Cell`]s.
///
/// The board stores occupant *handles* plus the priority each was filed
/// under; it does not interpret them. Every handle is expected to sit in at
/// most one cell at a time; the caller upholds that by funnelling all
/// moves through [`Board::relocate`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board<T> {
    width: u32,
    height: u32,
    cells: Vec<Cell<T>>,
}

impl<T: Copy + PartialEq> Board<T> {
    /// Creates an empty board.
    ///
    /// # Panics
    ///
    /// Panics when either dimension is zero.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "board dimensions must be nonzero");
        let cells = vec![Cell::default(); (width * height) as usize];
        Self {
            width,
            height,
            cells,
        }
    }

    /// Board width in tiles.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Board height in tiles.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Returns `true` when `at` lies on the board.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub const fn in_bounds(&self, at: IVec2) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as u32) < self.width && (at.y as u32) < self.height
    }

    #[allow(clippy::cast_sign_loss)]
    fn index(&self, at: IVec2) -> usize {
        debug_assert!(self.in_bounds(at));
        (at.y as u32 * self.width + at.x as u32) as usize
    }

    /// The cell at `at`, or `None` off the board.
    #[must_use]
    pub fn cell(&self, at: IVec2) -> Option<&Cell<T>> {
        if self.in_bounds(at) {
            let index = self.index(at);
            Some(&self.cells[index])
        } else {
            None
        }
    }

    /// Files `occupant` into the cell at `at` under `priority`.
    ///
    /// Placement is silent: no snapshot is taken and nothing is notified.
    ///
    /// # Errors
    ///
    /// Returns [`OffBoard`] when `at` lies outside the board; the board is
    /// left untouched.
    pub fn place(&mut self, occupant: T, priority: i32, at: IVec2) -> Result<(), OffBoard> {
        if !self.in_bounds(at) {
            return Err(self.off_board(at));
        }
        let index = self.index(at);
        self.cells[index].insert(occupant, priority);
        trace!(x = at.x, y = at.y, priority, "occupant placed");
        Ok(())
    }

    /// Removes `occupant` from the cell at `at`.
    ///
    /// Returns `false` when the coordinate is off the board or the occupant
    /// was not filed there; both are no-ops.
    pub fn remove(&mut self, occupant: T, at: IVec2) -> bool {
        if !self.in_bounds(at) {
            return false;
        }
        let index = self.index(at);
        let removed = self.cells[index].remove(occupant);
        if removed {
            trace!(x = at.x, y = at.y, "occupant removed");
        }
        removed
    }

    /// Returns `true` iff `at` is off the board, or some occupant there has
    /// priority strictly below `threshold`.
    ///
    /// This is the single passability predicate: movement validation and
    /// the breadth-first router both ask exactly this question.
    #[must_use]
    pub fn is_blocked(&self, at: IVec2, threshold: i32) -> bool {
        match self.cell(at) {
            Some(cell) => cell.blocks(threshold),
            None => true,
        }
    }

    /// Moves `occupant` from the cell at `from` to the cell at `to`.
    ///
    /// This is the sole occupancy-move primitive. For a cross-cell move it
    /// removes the occupant from the source cell, captures the destination
    /// cell's slot list **as it stood before the arrival**, inserts the
    /// occupant, and returns the snapshot so the caller can notify the
    /// prior residents. A same-cell move is a complete no-op and returns an
    /// empty snapshot: nothing is reordered and nobody is notified.
    ///
    /// # Errors
    ///
    /// Returns [`OffBoard`] when `to` lies outside the board; the board is
    /// left untouched (the occupant stays in its source cell).
    pub fn relocate(
        &mut self,
        occupant: T,
        priority: i32,
        from: IVec2,
        to: IVec2,
    ) -> Result<Vec<Slot<T>>, OffBoard> {
        if !self.in_bounds(to) {
            return Err(self.off_board(to));
        }
        if from == to {
            return Ok(Vec::new());
        }
        if self.in_bounds(from) {
            let index = self.index(from);
            self.cells[index].remove(occupant);
        }
        let index = self.index(to);
        let snapshot = self.cells[index].slots().to_vec();
        self.cells[index].insert(occupant, priority);
        trace!(
            from_x = from.x,
            from_y = from.y,
            to_x = to.x,
            to_y = to.y,
            residents = snapshot.len(),
            "occupant relocated"
        );
        Ok(snapshot)
    }

    const fn off_board(&self, at: IVec2) -> OffBoard {
        OffBoard {
            at,
            width: self.width,
            height: self.height,
        }
    }
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

    mod bounds_tests {
        use super::*;

        #[test]
        fn in_bounds_covers_the_whole_board() {
            let board: Board<u32> = Board::new(3, 2);
            assert!(board.in_bounds(at(0, 0)));
            assert!(board.in_bounds(at(2, 1)));
            assert!(!board.in_bounds(at(3, 0)));
            assert!(!board.in_bounds(at(0, 2)));
            assert!(!board.in_bounds(at(-1, 0)));
            assert!(!board.in_bounds(at(0, -1)));
        }

        #[test]
        fn place_off_board_is_rejected() {
            let mut board: Board<u32> = Board::new(3, 3);
            let err = board.place(1, 2, at(3, 0)).unwrap_err();
            assert_eq!(err.at, at(3, 0));
            assert_eq!(err.width, 3);
        }

        #[test]
        #[should_panic(expected = "nonzero")]
        fn zero_dimension_panics() {
            let _board: Board<u32> = Board::new(0, 4);
        }
    }

    mod blocking_tests {
        use super::*;

        #[test]
        fn off_board_is_blocked() {
            let board: Board<u32> = Board::new(3, 3);
            assert!(board.is_blocked(at(-1, 0), 2));
            assert!(board.is_blocked(at(0, 3), 2));
        }

        #[test]
        fn empty_tile_is_open() {
            let board: Board<u32> = Board::new(3, 3);
            assert!(!board.is_blocked(at(1, 1), 2));
        }

        #[test]
        fn strictly_lower_rank_blocks() {
            let mut board: Board<u32> = Board::new(3, 3);
            board.place(1, 1, at(1, 1)).unwrap();
            assert!(board.is_blocked(at(1, 1), 2));
            // A rank-1 traveller is not blocked by a rank-1 resident.
            assert!(!board.is_blocked(at(1, 1), 1));
        }
    }

    mod relocate_tests {
        use super::*;

        #[test]
        fn relocate_moves_the_occupant() {
            let mut board: Board<u32> = Board::new(4, 4);
            board.place(1, 2, at(0, 0)).unwrap();

            board.relocate(1, 2, at(0, 0), at(1, 0)).unwrap();

            assert!(!board.cell(at(0, 0)).unwrap().contains(1));
            assert!(board.cell(at(1, 0)).unwrap().contains(1));
        }

        #[test]
        fn snapshot_excludes_the_arriving_occupant() {
            let mut board: Board<u32> = Board::new(4, 4);
            board.place(1, 2, at(0, 0)).unwrap();
            board.place(2, 3, at(1, 0)).unwrap();
            board.place(3, 4, at(1, 0)).unwrap();

            let snapshot = board.relocate(1, 2, at(0, 0), at(1, 0)).unwrap();

            let occupants: Vec<u32> =
                snapshot.iter().map(|slot| slot.occupant).collect();
            assert_eq!(occupants, vec![3, 2]);
        }

        #[test]
        fn snapshot_preserves_stored_order() {
            let mut board: Board<u32> = Board::new(4, 4);
            board.place(10, 1, at(2, 2)).unwrap();
            board.place(11, 4, at(2, 2)).unwrap();
            board.place(12, 3, at(2, 2)).unwrap();
            board.place(1, 2, at(0, 0)).unwrap();

            let snapshot = board.relocate(1, 2, at(0, 0), at(2, 2)).unwrap();

            let ranks: Vec<i32> = snapshot.iter().map(|slot| slot.priority).collect();
            assert_eq!(ranks, vec![4, 3, 1]);
        }

        #[test]
        fn same_cell_relocate_is_a_noop() {
            let mut board: Board<u32> = Board::new(4, 4);
            board.place(1, 2, at(2, 2)).unwrap();
            board.place(2, 2, at(2, 2)).unwrap();
            let before = board.cell(at(2, 2)).unwrap().clone();

            let snapshot = board.relocate(1, 2, at(2, 2), at(2, 2)).unwrap();

            assert!(snapshot.is_empty());
            assert_eq!(board.cell(at(2, 2)).unwrap(), &before);
        }

        #[test]
        fn relocate_off_board_leaves_source_in_place() {
            let mut board: Board<u32> = Board::new(4, 4);
            board.place(1, 2, at(3, 3)).unwrap();

            let err = board.relocate(1, 2, at(3, 3), at(4, 3));

            assert!(err.is_err());
            assert!(board.cell(at(3, 3)).unwrap().contains(1));
        }
    }

    mod serde_tests {
        use super::*;

        #[test]
        fn serialization_roundtrip() {
            let mut board: Board<u32> = Board::new(3, 3);
            board.place(1, 2, at(0, 0)).unwrap();
            board.place(2, 4, at(2, 1)).unwrap();

            let json = serde_json::to_string(&board).unwrap();
            let back: Board<u32> = serde_json::from_str(&json).unwrap();
            assert_eq!(board, back);
        }
    }
}

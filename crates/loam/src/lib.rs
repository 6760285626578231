//! # Loam
//!
//! Tile occupancy substrate for grid arenas.
//!
//! Loam represents a playfield as a dense lattice of [`Cell`]s, each holding
//! the ordered multiset of occupants standing on one tile. The ordering is
//! by an integer priority rank, larger values sitting earlier (background,
//! painted first) and smaller values blocking more, and doubles as
//! the notification order when something new arrives on a tile.
//!
//! The crate is deliberately small and generic: it knows occupant *handles*,
//! not what they mean. Three capabilities are exposed:
//!
//! - **Occupancy**: place, remove, and relocate handles on the [`Board`];
//!   relocation is the single primitive that moves a handle between tiles
//!   and hands back the destination's pre-arrival snapshot.
//! - **Blocking queries**: [`Board::is_blocked`] answers whether a tile is
//!   off the board or held by a strictly more blocking occupant.
//! - **Routing**: [`find_path`] runs a breadth-first search over the same
//!   blocking query and returns a replayable [`Path`].
//!
//! ## Quick start
//!
//! ```
//! use glam::IVec2;
//! use loam::Board;
//!
//! let mut board: Board<u32> = Board::new(8, 8);
//! board.place(7, 1, IVec2::new(3, 3)).unwrap();
//!
//! // Priority 1 occupants block anything ranked above 1.
//! assert!(board.is_blocked(IVec2::new(3, 3), 2));
//! assert!(!board.is_blocked(IVec2::new(4, 3), 2));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod board;
pub mod cell;
pub mod path;

pub use board::{Board, OffBoard};
pub use cell::{Cell, Slot};
pub use path::{find_path, validate, Path, EXPANSION_ORDER};

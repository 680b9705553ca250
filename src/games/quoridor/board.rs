//! 9x9 Quoridor board: cell coordinates and wall-aware adjacency.

use serde::{Deserialize, Serialize};

use super::wall::WallIndex;

/// Number of cells along each board edge.
pub const BOARD_SIZE: u8 = 9;

/// Number of valid wall anchor coordinates along each axis.
pub const WALL_POSITIONS: u8 = 8;

/// Player 1 starting cell (bottom center).
pub const PLAYER1_START: Position = Position { row: 8, col: 4 };

/// Player 2 starting cell (top center).
pub const PLAYER2_START: Position = Position { row: 0, col: 4 };

/// Row player 1 must reach to win.
pub const PLAYER1_GOAL_ROW: u8 = 0;

/// Row player 2 must reach to win.
pub const PLAYER2_GOAL_ROW: u8 = 8;

/// Orthogonal step directions in fixed order: up, right, down, left.
///
/// Every enumeration in the engine (neighbor listing, BFS expansion,
/// move tie-breaking) walks directions in this order, so identical
/// states always produce identical results.
pub const DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (0, 1), (1, 0), (0, -1)];

/// A cell on the 9x9 board.
///
/// Both coordinates are always in `[0, 8]`; construction goes through
/// [`Position::new`] or [`Position::offset`], which reject anything else.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Position {
    /// Row index, 0 at the top.
    pub row: u8,
    /// Column index, 0 at the left.
    pub col: u8,
}

impl Position {
    /// Creates a position if `(row, col)` is on the board.
    pub fn new(row: u8, col: u8) -> Option<Self> {
        if row < BOARD_SIZE && col < BOARD_SIZE {
            Some(Self { row, col })
        } else {
            None
        }
    }

    /// Returns the cell one step away in `(dr, dc)`, if it is on the board.
    pub fn offset(self, dr: i8, dc: i8) -> Option<Self> {
        let row = self.row as i8 + dr;
        let col = self.col as i8 + dc;
        if (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col) {
            Some(Self {
                row: row as u8,
                col: col as u8,
            })
        } else {
            None
        }
    }

    /// The in-bounds orthogonal neighbors of this cell, walls ignored,
    /// in the fixed up/right/down/left order.
    pub fn adjacent(self) -> impl Iterator<Item = Position> {
        DIRECTIONS
            .into_iter()
            .filter_map(move |(dr, dc)| self.offset(dr, dc))
    }
}

/// The in-bounds orthogonal neighbors of `pos` that are not cut off by a
/// wall, in the fixed up/right/down/left order.
pub fn neighbors(pos: Position, walls: &WallIndex) -> Vec<Position> {
    pos.adjacent()
        .filter(|&next| !walls.is_blocked(pos, next))
        .collect()
}

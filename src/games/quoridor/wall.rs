//! Wall representation and the derived blocked-edge index.
//!
//! The index keeps the placed-wall list plus two derived structures: a
//! set of blocked directed edges for O(1) movement checks, and an anchor
//! map for overlap/crossing checks. Both are mutated only through
//! [`WallIndex::insert`] and [`WallIndex::remove`] so they stay
//! consistent with the wall list.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use super::board::{Position, WALL_POSITIONS};

/// Wall orientation.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Blocks vertical movement across the wall.
    Horizontal,
    /// Blocks horizontal movement across the wall.
    Vertical,
}

/// A two-cell wall anchored at a grid intersection.
///
/// The anchor `(row, col)` is the top-left intersection; both
/// coordinates must be in `[0, 7]`. A horizontal wall at `(r, c)` blocks
/// the edges `(r,c)↔(r+1,c)` and `(r,c+1)↔(r+1,c+1)`; a vertical wall
/// blocks `(r,c)↔(r,c+1)` and `(r+1,c)↔(r+1,c+1)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Wall {
    /// Anchor row, in `[0, 7]`.
    pub row: u8,
    /// Anchor column, in `[0, 7]`.
    pub col: u8,
    /// Wall orientation.
    pub orientation: Orientation,
}

impl Wall {
    /// Creates a wall without checking the anchor range.
    pub fn new(row: u8, col: u8, orientation: Orientation) -> Self {
        Self {
            row,
            col,
            orientation,
        }
    }

    /// Whether the anchor lies in the valid `[0, 7]²` range.
    pub fn in_bounds(&self) -> bool {
        self.row < WALL_POSITIONS && self.col < WALL_POSITIONS
    }

    /// The two undirected cell pairs this wall blocks.
    pub fn blocked_edges(&self) -> [(Position, Position); 2] {
        let cell = |row, col| Position { row, col };
        match self.orientation {
            Orientation::Horizontal => [
                (cell(self.row, self.col), cell(self.row + 1, self.col)),
                (cell(self.row, self.col + 1), cell(self.row + 1, self.col + 1)),
            ],
            Orientation::Vertical => [
                (cell(self.row, self.col), cell(self.row, self.col + 1)),
                (cell(self.row + 1, self.col), cell(self.row + 1, self.col + 1)),
            ],
        }
    }
}

/// Placed walls plus derived lookup structures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WallIndex {
    walls: Vec<Wall>,
    blocked: HashSet<(Position, Position)>,
    anchors: HashMap<(u8, u8), Orientation>,
}

impl WallIndex {
    /// Creates an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// The placed walls in insertion order.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// Number of placed walls.
    pub fn len(&self) -> usize {
        self.walls.len()
    }

    /// Whether no walls are placed.
    pub fn is_empty(&self) -> bool {
        self.walls.is_empty()
    }

    /// Whether movement between two adjacent cells is cut off by a wall.
    pub fn is_blocked(&self, from: Position, to: Position) -> bool {
        self.blocked.contains(&(from, to))
    }

    /// Whether `wall` shares a blocked edge with a placed wall, or sits
    /// on an anchor already occupied in the same orientation.
    pub fn would_overlap(&self, wall: Wall) -> bool {
        if self.anchors.get(&(wall.row, wall.col)) == Some(&wall.orientation) {
            return true;
        }
        wall.blocked_edges()
            .iter()
            .any(|&(a, b)| self.blocked.contains(&(a, b)))
    }

    /// Whether `wall`'s anchor is occupied by the opposite orientation.
    pub fn would_cross(&self, wall: Wall) -> bool {
        match self.anchors.get(&(wall.row, wall.col)) {
            Some(placed) => *placed != wall.orientation,
            None => false,
        }
    }

    /// Inserts a wall, updating the derived structures.
    ///
    /// Callers are expected to have checked bounds, overlap and crossing
    /// first; insertion itself does not validate.
    pub fn insert(&mut self, wall: Wall) {
        self.walls.push(wall);
        for (a, b) in wall.blocked_edges() {
            self.blocked.insert((a, b));
            self.blocked.insert((b, a));
        }
        self.anchors.insert((wall.row, wall.col), wall.orientation);
    }

    /// Removes a wall, restoring the derived structures exactly.
    ///
    /// Returns false if the wall was not present.
    pub fn remove(&mut self, wall: Wall) -> bool {
        let Some(idx) = self.walls.iter().position(|w| *w == wall) else {
            return false;
        };
        self.walls.remove(idx);
        for (a, b) in wall.blocked_edges() {
            self.blocked.remove(&(a, b));
            self.blocked.remove(&(b, a));
        }
        self.anchors.remove(&(wall.row, wall.col));
        true
    }

    /// Inserts `wall` behind a guard that removes it again on drop.
    ///
    /// Used for hypothetical placements during path-connectivity checks
    /// and opponent search; call [`SpeculativeWall::commit`] to keep the
    /// wall in place.
    pub fn speculate(&mut self, wall: Wall) -> SpeculativeWall<'_> {
        self.insert(wall);
        SpeculativeWall {
            index: self,
            wall,
            committed: false,
        }
    }
}

/// Scope guard for a speculative wall insertion.
///
/// Dropping the guard removes the wall, so every exit path of a
/// validation routine leaves the index unchanged unless the placement
/// was explicitly committed.
#[derive(Debug)]
pub struct SpeculativeWall<'a> {
    index: &'a mut WallIndex,
    wall: Wall,
    committed: bool,
}

impl SpeculativeWall<'_> {
    /// The index with the speculative wall in place.
    pub fn index(&self) -> &WallIndex {
        self.index
    }

    /// Keeps the wall in the index.
    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl Drop for SpeculativeWall<'_> {
    fn drop(&mut self) {
        if !self.committed {
            self.index.remove(self.wall);
        }
    }
}

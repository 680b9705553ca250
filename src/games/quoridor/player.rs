//! Player state: pawn position, wall stock, goal row.

use serde::{Deserialize, Serialize};

use super::board::{self, Position};

/// Walls each player starts with.
pub const INITIAL_WALLS: u8 = 10;

/// One of the two players.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    name: String,
    position: Position,
    walls_remaining: u8,
    goal_row: u8,
}

impl Player {
    /// Creates player 1 at the bottom center, aiming for row 0.
    pub fn player1(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: board::PLAYER1_START,
            walls_remaining: INITIAL_WALLS,
            goal_row: board::PLAYER1_GOAL_ROW,
        }
    }

    /// Creates player 2 at the top center, aiming for row 8.
    pub fn player2(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: board::PLAYER2_START,
            walls_remaining: INITIAL_WALLS,
            goal_row: board::PLAYER2_GOAL_ROW,
        }
    }

    /// Restores a player from serialized fields.
    pub(crate) fn restore(
        name: String,
        position: Position,
        walls_remaining: u8,
        goal_row: u8,
    ) -> Self {
        Self {
            name,
            position,
            walls_remaining,
            goal_row,
        }
    }

    /// Player name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current pawn position.
    pub fn position(&self) -> Position {
        self.position
    }

    /// Walls left to place.
    pub fn walls_remaining(&self) -> u8 {
        self.walls_remaining
    }

    /// The row this player must reach to win.
    pub fn goal_row(&self) -> u8 {
        self.goal_row
    }

    /// Whether the player still has walls to place.
    pub fn has_walls(&self) -> bool {
        self.walls_remaining > 0
    }

    /// Whether the pawn stands on the goal row.
    pub fn has_reached_goal(&self) -> bool {
        self.position.row == self.goal_row
    }

    /// Moves the pawn. Legality is the validator's concern.
    pub(crate) fn move_to(&mut self, position: Position) {
        self.position = position;
    }

    /// Consumes one wall from the stock.
    pub(crate) fn use_wall(&mut self) {
        debug_assert!(self.walls_remaining > 0);
        self.walls_remaining = self.walls_remaining.saturating_sub(1);
    }

    /// Returns one wall to the stock; undoes a speculative [`use_wall`].
    ///
    /// [`use_wall`]: Player::use_wall
    pub(crate) fn return_wall(&mut self) {
        debug_assert!(self.walls_remaining < INITIAL_WALLS);
        self.walls_remaining += 1;
    }
}

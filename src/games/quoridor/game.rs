//! Quoridor game state and the turn apply path.
//!
//! All mutation funnels through [`GameState::move_pawn`] and
//! [`GameState::place_wall`]; rule violations leave the state untouched.
//! The registry is the only caller that applies actions in production,
//! one at a time per game.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use super::board::Position;
use super::error::GameError;
use super::pathfinder::{self, row_goal};
use super::player::{Player, INITIAL_WALLS};
use super::validator;
use super::wall::{Orientation, Wall, WallIndex};

/// Whether the game is still accepting actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    /// Actions are accepted for the current-turn player.
    InProgress,
    /// A player reached their goal row; no further actions.
    Finished,
}

/// One applied or proposed turn action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Action {
    /// Advance the pawn to `(row, col)`.
    Move {
        /// Target row.
        row: u8,
        /// Target column.
        col: u8,
    },
    /// Place a wall anchored at `(row, col)`.
    Wall {
        /// Anchor row.
        row: u8,
        /// Anchor column.
        col: u8,
        /// Wall orientation.
        orientation: Orientation,
    },
}

/// Complete state of one Quoridor game.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub(crate) game_id: Uuid,
    pub(crate) status: GameStatus,
    pub(crate) current_turn: u8,
    pub(crate) turn_count: u32,
    pub(crate) player1: Player,
    pub(crate) player2: Player,
    pub(crate) walls: WallIndex,
    pub(crate) winner: Option<u8>,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl GameState {
    /// Creates a fresh game: player 1 at (8,4), player 2 at (0,4), ten
    /// walls each, player 1 to move.
    #[instrument(skip_all)]
    pub fn new(player1_name: impl Into<String>, player2_name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            game_id: Uuid::new_v4(),
            status: GameStatus::InProgress,
            current_turn: 1,
            turn_count: 0,
            player1: Player::player1(player1_name.into()),
            player2: Player::player2(player2_name.into()),
            walls: WallIndex::new(),
            winner: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Game identifier.
    pub fn game_id(&self) -> Uuid {
        self.game_id
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Player number (1 or 2) whose turn it is.
    pub fn current_turn(&self) -> u8 {
        self.current_turn
    }

    /// Number of successfully applied actions.
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// Player 1 record.
    pub fn player1(&self) -> &Player {
        &self.player1
    }

    /// Player 2 record.
    pub fn player2(&self) -> &Player {
        &self.player2
    }

    /// The placed walls.
    pub fn walls(&self) -> &WallIndex {
        &self.walls
    }

    /// Winning player number, once the game is finished.
    pub fn winner(&self) -> Option<u8> {
        self.winner
    }

    /// The player whose turn it is.
    pub fn current_player(&self) -> &Player {
        if self.current_turn == 1 {
            &self.player1
        } else {
            &self.player2
        }
    }

    /// The player waiting for their turn.
    pub fn opponent_player(&self) -> &Player {
        if self.current_turn == 1 {
            &self.player2
        } else {
            &self.player1
        }
    }

    /// Mutable split borrow of (current player, opponent).
    pub(crate) fn players_mut(&mut self) -> (&mut Player, &mut Player) {
        if self.current_turn == 1 {
            (&mut self.player1, &mut self.player2)
        } else {
            (&mut self.player2, &mut self.player1)
        }
    }

    /// Legal pawn destinations for the current-turn player.
    pub fn valid_pawn_moves(&self) -> Vec<Position> {
        validator::valid_pawn_moves(self.current_player(), self.opponent_player(), &self.walls)
    }

    /// Legal wall placements for the current-turn player.
    ///
    /// Runs the speculative path-connectivity check for every candidate
    /// anchor and orientation, hence `&mut self`; the wall index is
    /// unchanged on return.
    pub fn valid_wall_placements(&mut self) -> Vec<Wall> {
        let (player, opponent) = match self.current_turn {
            1 => (self.player1.clone(), self.player2.clone()),
            _ => (self.player2.clone(), self.player1.clone()),
        };
        validator::valid_wall_placements(&player, &opponent, &mut self.walls)
    }

    /// Moves the current player's pawn to `(row, col)`.
    ///
    /// On success the turn count advances; the turn toggles unless the
    /// move reached the goal row, which finishes the game instead.
    ///
    /// # Errors
    ///
    /// [`GameError::GameFinished`] on a terminal state,
    /// [`GameError::InvalidMove`] when the target is not in the legal
    /// destination set.
    #[instrument(skip(self), fields(game_id = %self.game_id, turn = self.current_turn))]
    pub fn move_pawn(&mut self, row: u8, col: u8) -> Result<(), GameError> {
        if self.status == GameStatus::Finished {
            return Err(GameError::GameFinished);
        }

        let target = Position::new(row, col).ok_or(GameError::InvalidMove)?;
        if !validator::is_valid_pawn_move(
            self.current_player(),
            self.opponent_player(),
            target,
            &self.walls,
        ) {
            return Err(GameError::InvalidMove);
        }

        let (player, _) = self.players_mut();
        player.move_to(target);
        self.finish_apply();
        Ok(())
    }

    /// Places a wall for the current player.
    ///
    /// # Errors
    ///
    /// [`GameError::GameFinished`], [`GameError::NoWallsRemaining`],
    /// [`GameError::InvalidWallPosition`] or [`GameError::PathBlocked`];
    /// the state (including the wall counter) is unchanged on error.
    #[instrument(skip(self), fields(game_id = %self.game_id, turn = self.current_turn))]
    pub fn place_wall(&mut self, row: u8, col: u8, orientation: Orientation) -> Result<(), GameError> {
        if self.status == GameStatus::Finished {
            return Err(GameError::GameFinished);
        }

        let wall = Wall::new(row, col, orientation);
        let (player, opponent) = match self.current_turn {
            1 => (self.player1.clone(), self.player2.clone()),
            _ => (self.player2.clone(), self.player1.clone()),
        };
        validator::check_wall_placement(wall, &player, &opponent, &mut self.walls)?;

        self.walls.insert(wall);
        let (player, _) = self.players_mut();
        player.use_wall();
        self.finish_apply();
        Ok(())
    }

    /// Applies a proposed [`Action`] through the same checked paths.
    pub fn apply_action(&mut self, action: Action) -> Result<(), GameError> {
        match action {
            Action::Move { row, col } => self.move_pawn(row, col),
            Action::Wall {
                row,
                col,
                orientation,
            } => self.place_wall(row, col, orientation),
        }
    }

    /// Post-apply bookkeeping: timestamps, win detection, turn toggle.
    fn finish_apply(&mut self) {
        self.updated_at = Utc::now();
        self.turn_count += 1;

        if self.current_player().has_reached_goal() {
            self.winner = Some(self.current_turn);
            self.status = GameStatus::Finished;
            return;
        }
        self.current_turn = if self.current_turn == 1 { 2 } else { 1 };
    }

    /// Checks the structural invariants that must hold after every
    /// applied action.
    ///
    /// A failure here is a programmer error, not a rule violation; the
    /// registry poisons the game rather than serve inconsistent state.
    pub fn verify_invariants(&self) -> bool {
        let distinct = self.player1.position() != self.player2.position();

        let wall_accounting = self.player1.walls_remaining() as usize
            + self.player2.walls_remaining() as usize
            + self.walls.len()
            == 2 * INITIAL_WALLS as usize;

        let connected = pathfinder::reachable(
            self.player1.position(),
            row_goal(self.player1.goal_row()),
            &self.walls,
        ) && pathfinder::reachable(
            self.player2.position(),
            row_goal(self.player2.goal_row()),
            &self.walls,
        );

        let someone_on_goal =
            self.player1.has_reached_goal() || self.player2.has_reached_goal();
        let terminal_consistent = match self.status {
            GameStatus::Finished => someone_on_goal && self.winner.is_some(),
            GameStatus::InProgress => !someone_on_goal && self.winner.is_none(),
        };

        distinct && wall_accounting && connected && terminal_consistent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_game_matches_initial_layout() {
        let game = GameState::new("Alice", "AI");
        assert_eq!(game.status(), GameStatus::InProgress);
        assert_eq!(game.current_turn(), 1);
        assert_eq!(game.turn_count(), 0);
        assert_eq!(game.player1().position(), Position { row: 8, col: 4 });
        assert_eq!(game.player2().position(), Position { row: 0, col: 4 });
        assert_eq!(game.player1().walls_remaining(), 10);
        assert!(game.walls().is_empty());
        assert!(game.verify_invariants());
    }

    #[test]
    fn successful_move_toggles_turn_and_counts() {
        let mut game = GameState::new("Alice", "AI");
        game.move_pawn(7, 4).expect("legal opening move");
        assert_eq!(game.current_turn(), 2);
        assert_eq!(game.turn_count(), 1);
        assert!(game.verify_invariants());
    }

    #[test]
    fn illegal_move_leaves_state_unchanged() {
        let mut game = GameState::new("Alice", "AI");
        let before = game.clone();
        assert_eq!(game.move_pawn(5, 5), Err(GameError::InvalidMove));
        assert_eq!(game, before);
    }

    #[test]
    fn wall_placement_decrements_stock() {
        let mut game = GameState::new("Alice", "AI");
        game.place_wall(4, 4, Orientation::Horizontal)
            .expect("legal wall");
        assert_eq!(game.player1().walls_remaining(), 9);
        assert_eq!(game.walls().len(), 1);
        assert_eq!(game.current_turn(), 2);
        assert!(game.verify_invariants());
    }

    #[test]
    fn winning_move_finishes_without_toggling() {
        let mut game = GameState::new("Alice", "AI");
        // Player 1 climbs column 4 while player 2 descends column 3, so
        // the pawns never contest a cell.
        let p1_path = [(7, 4), (6, 4), (5, 4), (4, 4), (3, 4), (2, 4), (1, 4)];
        let p2_path = [(0, 3), (1, 3), (2, 3), (3, 3), (4, 3), (5, 3), (6, 3)];
        for (&(r1, c1), &(r2, c2)) in p1_path.iter().zip(&p2_path) {
            game.move_pawn(r1, c1).expect("player 1 step");
            game.move_pawn(r2, c2).expect("player 2 step");
        }

        // Player 1 at (1,4); row 0 wins.
        game.move_pawn(0, 4).expect("winning move");
        assert_eq!(game.status(), GameStatus::Finished);
        assert_eq!(game.winner(), Some(1));
        assert_eq!(game.turn_count(), 15);
        assert_eq!(game.current_turn(), 1);
        assert!(game.verify_invariants());

        assert_eq!(game.move_pawn(7, 3), Err(GameError::GameFinished));
    }
}

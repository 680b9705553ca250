//! Wire-format game state matching the documented JSON schema.
//!
//! [`GameState::to_serializable`] and [`GameState::from_serializable`]
//! convert between the in-memory state and this schema losslessly. The
//! wall index is rebuilt from the wall list on restore, so the derived
//! structures can never drift from the serialized form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::board::Position;
use super::game::{GameState, GameStatus};
use super::player::{Player, INITIAL_WALLS};
use super::wall::{Wall, WallIndex};

/// Status field on the wire.
///
/// `player1_win`/`player2_win` are the status strings an earlier schema
/// revision wrote; they are accepted on input and normalized to
/// `finished` plus a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializedStatus {
    /// Game accepting actions.
    InProgress,
    /// Game over; `winner` names the winning player.
    Finished,
    /// Legacy spelling of a player-1 win.
    Player1Win,
    /// Legacy spelling of a player-2 win.
    Player2Win,
}

/// One player on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPlayer {
    /// Display name.
    pub name: String,
    /// Pawn position.
    pub position: Position,
    /// Walls left to place.
    pub walls_remaining: u8,
    /// Goal row for this player.
    pub goal_row: u8,
}

/// The two player records keyed as in the JSON schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPlayers {
    /// Player 1 (goal row 0).
    pub player1: SerializedPlayer,
    /// Player 2 (goal row 8).
    pub player2: SerializedPlayer,
}

/// Complete serialized game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedGame {
    /// Game identifier.
    pub game_id: Uuid,
    /// Game status.
    pub status: SerializedStatus,
    /// Player number whose turn it is.
    pub current_turn: u8,
    /// Applied action count.
    pub turn_count: u32,
    /// Both player records.
    pub players: SerializedPlayers,
    /// Placed walls in placement order.
    pub walls: Vec<Wall>,
    /// Winning player number, if finished.
    pub winner: Option<u8>,
    /// Creation timestamp (UTC).
    pub created_at: DateTime<Utc>,
    /// Last-update timestamp (UTC).
    pub updated_at: DateTime<Utc>,
}

/// Valid actions for the current-turn player, as served by the
/// valid-moves endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidActions {
    /// Legal pawn destinations.
    pub valid_pawn_moves: Vec<Position>,
    /// Legal wall placements.
    pub valid_wall_placements: Vec<Wall>,
    /// Walls the current player has left.
    pub walls_remaining: u8,
}

/// Rejected serialized states.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// `current_turn` outside {1, 2}.
    InvalidTurn(u8),
    /// A pawn position outside the board.
    PositionOutOfBounds {
        /// Offending row.
        row: u8,
        /// Offending column.
        col: u8,
    },
    /// Both pawns on the same cell.
    PawnsOverlap,
    /// A wall counter above the initial stock.
    TooManyWalls(u8),
    /// A wall out of range, overlapping or crossing an earlier wall.
    ConflictingWall(Wall),
    /// Finished status without a winner in {1, 2}.
    MissingWinner,
    /// Winner set on an in-progress game.
    UnexpectedWinner,
}

impl std::fmt::Display for StateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StateError::InvalidTurn(turn) => write!(f, "current_turn must be 1 or 2, got {}", turn),
            StateError::PositionOutOfBounds { row, col } => {
                write!(f, "position ({}, {}) is off the board", row, col)
            }
            StateError::PawnsOverlap => write!(f, "both pawns occupy the same cell"),
            StateError::TooManyWalls(count) => {
                write!(f, "walls_remaining {} exceeds the initial stock", count)
            }
            StateError::ConflictingWall(wall) => write!(
                f,
                "wall ({}, {}, {:?}) is out of range or conflicts with an earlier wall",
                wall.row, wall.col, wall.orientation
            ),
            StateError::MissingWinner => write!(f, "finished game without a winner"),
            StateError::UnexpectedWinner => write!(f, "in-progress game with a winner"),
        }
    }
}

impl std::error::Error for StateError {}

impl GameState {
    /// Produces the wire-format snapshot of this state.
    pub fn to_serializable(&self) -> SerializedGame {
        let player = |p: &Player| SerializedPlayer {
            name: p.name().to_string(),
            position: p.position(),
            walls_remaining: p.walls_remaining(),
            goal_row: p.goal_row(),
        };
        SerializedGame {
            game_id: self.game_id,
            status: match self.status {
                GameStatus::InProgress => SerializedStatus::InProgress,
                GameStatus::Finished => SerializedStatus::Finished,
            },
            current_turn: self.current_turn,
            turn_count: self.turn_count,
            players: SerializedPlayers {
                player1: player(&self.player1),
                player2: player(&self.player2),
            },
            walls: self.walls.walls().to_vec(),
            winner: self.winner,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Restores a state from its wire form.
    ///
    /// The goal rows are fixed by player slot (0 for player 1, 8 for
    /// player 2) rather than trusted from the wire.
    ///
    /// # Errors
    ///
    /// [`StateError`] when the serialized form violates the structural
    /// invariants; nothing is partially restored.
    pub fn from_serializable(serialized: SerializedGame) -> Result<Self, StateError> {
        if !(1..=2).contains(&serialized.current_turn) {
            return Err(StateError::InvalidTurn(serialized.current_turn));
        }

        let restore_player = |p: &SerializedPlayer, goal_row: u8| -> Result<Player, StateError> {
            let position = Position::new(p.position.row, p.position.col).ok_or(
                StateError::PositionOutOfBounds {
                    row: p.position.row,
                    col: p.position.col,
                },
            )?;
            if p.walls_remaining > INITIAL_WALLS {
                return Err(StateError::TooManyWalls(p.walls_remaining));
            }
            Ok(Player::restore(
                p.name.clone(),
                position,
                p.walls_remaining,
                goal_row,
            ))
        };

        let player1 = restore_player(&serialized.players.player1, 0)?;
        let player2 = restore_player(&serialized.players.player2, 8)?;
        if player1.position() == player2.position() {
            return Err(StateError::PawnsOverlap);
        }

        let mut walls = WallIndex::new();
        for wall in serialized.walls {
            if !wall.in_bounds() || walls.would_overlap(wall) || walls.would_cross(wall) {
                return Err(StateError::ConflictingWall(wall));
            }
            walls.insert(wall);
        }

        let (status, winner) = match serialized.status {
            SerializedStatus::InProgress => match serialized.winner {
                None => (GameStatus::InProgress, None),
                Some(_) => return Err(StateError::UnexpectedWinner),
            },
            SerializedStatus::Finished => match serialized.winner {
                Some(player @ 1..=2) => (GameStatus::Finished, Some(player)),
                _ => return Err(StateError::MissingWinner),
            },
            SerializedStatus::Player1Win => (GameStatus::Finished, Some(1)),
            SerializedStatus::Player2Win => (GameStatus::Finished, Some(2)),
        };

        Ok(Self {
            game_id: serialized.game_id,
            status,
            current_turn: serialized.current_turn,
            turn_count: serialized.turn_count,
            player1,
            player2,
            walls,
            winner,
            created_at: serialized.created_at,
            updated_at: serialized.updated_at,
        })
    }
}

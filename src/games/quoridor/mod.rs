//! Quoridor rule engine: board, walls, pathfinding, validation, game
//! state and the built-in opponent.

mod ai;
mod board;
mod error;
mod game;
mod pathfinder;
mod player;
mod serialize;
mod validator;
mod wall;

pub use ai::{Difficulty, HeuristicOpponent};
pub use board::{
    neighbors, Position, BOARD_SIZE, DIRECTIONS, PLAYER1_GOAL_ROW, PLAYER1_START,
    PLAYER2_GOAL_ROW, PLAYER2_START, WALL_POSITIONS,
};
pub use error::GameError;
pub use game::{Action, GameState, GameStatus};
pub use pathfinder::{reachable, row_goal, shortest_distance};
pub use player::{Player, INITIAL_WALLS};
pub use serialize::{
    SerializedGame, SerializedPlayer, SerializedPlayers, SerializedStatus, StateError,
    ValidActions,
};
pub use validator::{
    check_wall_placement, is_valid_pawn_move, valid_pawn_moves, valid_wall_placements,
};
pub use wall::{Orientation, SpeculativeWall, Wall, WallIndex};

//! Quoridor Server library - rule engine and game service
//!
//! This library implements a two-player Quoridor engine behind a
//! request/response service.
//!
//! # Architecture
//!
//! - **Rule engine**: board adjacency, wall index, jump rules and
//!   end-of-game detection
//! - **Pathfinder**: BFS over the wall-constrained grid, gating every
//!   wall placement on path connectivity
//! - **Opponent**: bounded heuristic action selection at three
//!   difficulty tiers
//! - **Registry**: per-game serialized turn application with optional
//!   write-through persistence
//! - **Server**: axum REST surface forwarding into the registry
//!
//! # Example
//!
//! ```no_run
//! use quoridor_server::{Difficulty, GameRegistry};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let registry = GameRegistry::in_memory();
//! let game = registry.create(Some("Alice".to_string()), Difficulty::Normal);
//!
//! // Player 1 opens by stepping toward row 0.
//! let state = registry.apply_pawn_move(game.game_id, 7, 4).await?;
//! assert_eq!(state.current_turn, 2);
//!
//! // The built-in opponent answers.
//! let (_action, state) = registry.apply_opponent_turn(game.game_id).await?;
//! assert_eq!(state.current_turn, 1);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod cli;
mod db;
mod games;
mod registry;
mod server;

// Crate-level exports - CLI
pub use cli::{Cli, Command};

// Crate-level exports - Database
pub use db::{DbError, GameRecord, GameRepository, NewGameRecord};

// Crate-level exports - Registry
pub use registry::{GameRegistry, GameStore, StoredGame};

// Crate-level exports - Server
pub use server::{
    router, serve, ActionResponse, AiActionResponse, CreateGameRequest, CreateGameResponse,
    MoveRequest, WallRequest,
};

// Crate-level exports - Rule engine
pub use games::quoridor::{
    check_wall_placement, is_valid_pawn_move, neighbors, reachable, row_goal, shortest_distance,
    valid_pawn_moves, valid_wall_placements, Action, Difficulty, GameError, GameState, GameStatus,
    HeuristicOpponent, Orientation, Player, Position, SerializedGame, SerializedPlayer,
    SerializedPlayers, SerializedStatus, StateError, ValidActions, Wall, WallIndex, BOARD_SIZE,
    DIRECTIONS, INITIAL_WALLS, PLAYER1_GOAL_ROW, PLAYER1_START, PLAYER2_GOAL_ROW, PLAYER2_START,
    WALL_POSITIONS,
};

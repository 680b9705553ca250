//! Rule-engine error kinds.

/// Errors produced by the rule engine and registry.
///
/// Each variant maps one-to-one to a stable identifier used in API
/// responses; see [`GameError::kind`]. Rule violations never mutate the
/// game state they were checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameError {
    /// No game with the requested identifier.
    GameNotFound,
    /// Action attempted on a finished game.
    GameFinished,
    /// Acting player is not the current-turn player.
    NotYourTurn,
    /// Pawn move target is not in the legal move set.
    InvalidMove,
    /// Wall anchor out of range, or the wall overlaps or crosses
    /// a placed wall.
    InvalidWallPosition,
    /// The acting player has no walls left.
    NoWallsRemaining,
    /// The wall would sever some player from their goal row.
    PathBlocked,
}

impl GameError {
    /// Stable machine-readable identifier for API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::GameNotFound => "game_not_found",
            GameError::GameFinished => "game_finished",
            GameError::NotYourTurn => "not_your_turn",
            GameError::InvalidMove => "invalid_move",
            GameError::InvalidWallPosition => "invalid_wall_position",
            GameError::NoWallsRemaining => "no_walls_remaining",
            GameError::PathBlocked => "path_blocked",
        }
    }
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            GameError::GameNotFound => "Game not found",
            GameError::GameFinished => "Game is already finished",
            GameError::NotYourTurn => "Not your turn",
            GameError::InvalidMove => "Invalid move",
            GameError::InvalidWallPosition => "Invalid wall placement",
            GameError::NoWallsRemaining => "No walls remaining",
            GameError::PathBlocked => "Wall would block a player's path to their goal",
        };
        write!(f, "{}", message)
    }
}

impl std::error::Error for GameError {}

//! REST surface for the Quoridor service.
//!
//! Thin axum handlers that parse the wire types, forward into the
//! [`GameRegistry`](crate::registry::GameRegistry) and map rule errors
//! to the documented `{success, error, message}` envelope. No rule logic
//! lives here.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

use crate::games::quoridor::{
    Action, Difficulty, GameError, Orientation, SerializedGame, SerializedStatus, ValidActions,
};
use crate::registry::GameRegistry;

/// Request body for creating a game.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateGameRequest {
    /// Display name for player 1. Defaults to "Player".
    pub player_name: Option<String>,
    /// Opponent difficulty tier. Defaults to normal.
    pub ai_difficulty: Option<Difficulty>,
}

/// Response body for a created game.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGameResponse {
    /// Identifier of the new game.
    pub game_id: Uuid,
    /// Initial status.
    pub status: SerializedStatus,
    /// Player number to move first.
    pub current_turn: u8,
    /// Human-readable confirmation.
    pub message: String,
}

/// Request body for a pawn move.
#[derive(Debug, Clone, Deserialize)]
pub struct MoveRequest {
    /// Target row.
    pub row: u8,
    /// Target column.
    pub col: u8,
}

/// Request body for a wall placement.
#[derive(Debug, Clone, Deserialize)]
pub struct WallRequest {
    /// Anchor row.
    pub row: u8,
    /// Anchor column.
    pub col: u8,
    /// Wall orientation.
    pub orientation: Orientation,
}

/// Response body for an applied action.
#[derive(Debug, Clone, Serialize)]
pub struct ActionResponse {
    /// Always true; failures use the error envelope instead.
    pub success: bool,
    /// State after the action.
    pub game_state: SerializedGame,
    /// Human-readable confirmation.
    pub message: String,
}

/// Response body for an opponent turn.
#[derive(Debug, Clone, Serialize)]
pub struct AiActionResponse {
    /// Always true; failures use the error envelope instead.
    pub success: bool,
    /// The action the opponent chose.
    pub action: Action,
    /// State after the action.
    pub game_state: SerializedGame,
    /// Human-readable confirmation.
    pub message: String,
}

impl IntoResponse for GameError {
    fn into_response(self) -> Response {
        let status = match self {
            GameError::GameNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        };
        let body = Json(serde_json::json!({
            "success": false,
            "error": self.kind(),
            "message": self.to_string(),
        }));
        (status, body).into_response()
    }
}

/// Builds the application router.
pub fn router(registry: Arc<GameRegistry>) -> Router {
    let api = Router::new()
        .route("/games", post(create_game))
        .route("/games/{game_id}", get(get_game).delete(delete_game))
        .route("/games/{game_id}/move", post(move_pawn))
        .route("/games/{game_id}/wall", post(place_wall))
        .route("/games/{game_id}/ai-move", post(ai_move))
        .route("/games/{game_id}/valid-moves", get(valid_moves))
        .with_state(registry);

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1/quoridor", api)
}

/// Binds and serves the application until shutdown.
///
/// # Errors
///
/// Returns an error if the listener cannot bind or the server fails.
pub async fn serve(host: &str, port: u16, registry: Arc<GameRegistry>) -> anyhow::Result<()> {
    let app = router(registry);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(host, port, "Server ready at http://{}:{}/", host, port);
    axum::serve(listener, app).await?;
    Ok(())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Parses a path segment as a game id; unknown shapes behave like
/// unknown games.
fn parse_game_id(raw: &str) -> Result<Uuid, GameError> {
    Uuid::parse_str(raw).map_err(|_| GameError::GameNotFound)
}

/// Win announcements replace the plain confirmation text.
fn outcome_message(state: &SerializedGame, applied: &str) -> String {
    match state.winner {
        Some(winner) => format!("Player {} wins!", winner),
        None => applied.to_string(),
    }
}

#[instrument(skip(registry, request))]
async fn create_game(
    State(registry): State<Arc<GameRegistry>>,
    request: Option<Json<CreateGameRequest>>,
) -> (StatusCode, Json<CreateGameResponse>) {
    let Json(request) = request.unwrap_or_default();
    let difficulty = request.ai_difficulty.unwrap_or_default();
    let state = registry.create(request.player_name, difficulty);

    info!(game_id = %state.game_id, "Game created via API");
    let response = CreateGameResponse {
        game_id: state.game_id,
        status: state.status,
        current_turn: state.current_turn,
        message: "Game created successfully".to_string(),
    };
    (StatusCode::CREATED, Json(response))
}

#[instrument(skip(registry))]
async fn get_game(
    State(registry): State<Arc<GameRegistry>>,
    Path(game_id): Path<String>,
) -> Result<Json<SerializedGame>, GameError> {
    let game_id = parse_game_id(&game_id)?;
    let state = registry.get(game_id).await?;
    Ok(Json(state))
}

#[instrument(skip(registry, request))]
async fn move_pawn(
    State(registry): State<Arc<GameRegistry>>,
    Path(game_id): Path<String>,
    Json(request): Json<MoveRequest>,
) -> Result<Json<ActionResponse>, GameError> {
    let game_id = parse_game_id(&game_id)?;
    let state = registry
        .apply_pawn_move(game_id, request.row, request.col)
        .await?;

    let message = outcome_message(&state, "Pawn moved successfully");
    Ok(Json(ActionResponse {
        success: true,
        game_state: state,
        message,
    }))
}

#[instrument(skip(registry, request))]
async fn place_wall(
    State(registry): State<Arc<GameRegistry>>,
    Path(game_id): Path<String>,
    Json(request): Json<WallRequest>,
) -> Result<Json<ActionResponse>, GameError> {
    let game_id = parse_game_id(&game_id)?;
    let state = registry
        .apply_wall(game_id, request.row, request.col, request.orientation)
        .await?;

    let message = outcome_message(&state, "Wall placed successfully");
    Ok(Json(ActionResponse {
        success: true,
        game_state: state,
        message,
    }))
}

#[instrument(skip(registry))]
async fn ai_move(
    State(registry): State<Arc<GameRegistry>>,
    Path(game_id): Path<String>,
) -> Result<Json<AiActionResponse>, GameError> {
    let game_id = parse_game_id(&game_id)?;
    let (action, state) = registry.apply_opponent_turn(game_id).await?;

    let applied = match action {
        Action::Move { .. } => "Pawn moved successfully",
        Action::Wall { .. } => "Wall placed successfully",
    };
    let message = outcome_message(&state, applied);
    Ok(Json(AiActionResponse {
        success: true,
        action,
        game_state: state,
        message,
    }))
}

#[instrument(skip(registry))]
async fn valid_moves(
    State(registry): State<Arc<GameRegistry>>,
    Path(game_id): Path<String>,
) -> Result<Json<ValidActions>, GameError> {
    let game_id = parse_game_id(&game_id)?;
    let actions = registry.list_valid_actions(game_id).await?;
    Ok(Json(actions))
}

#[instrument(skip(registry))]
async fn delete_game(
    State(registry): State<Arc<GameRegistry>>,
    Path(game_id): Path<String>,
) -> Result<StatusCode, GameError> {
    let game_id = parse_game_id(&game_id)?;
    registry.destroy(game_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

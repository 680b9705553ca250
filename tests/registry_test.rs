//! Registry behavior: lifecycle, turn gating, the opponent apply path,
//! and graceful degradation when the store misbehaves.

use std::sync::Arc;

use quoridor_server::{
    DbError, Difficulty, GameError, GameRegistry, GameRepository, GameStore, Orientation,
    SerializedGame, StoredGame,
};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// Store that fails every operation, for degradation tests.
struct BrokenStore;

impl GameStore for BrokenStore {
    fn upsert(&self, _state: &SerializedGame, _difficulty: Difficulty) -> Result<(), DbError> {
        Err(DbError::new("store is down"))
    }

    fn load(&self, _game_id: Uuid) -> Result<Option<StoredGame>, DbError> {
        Err(DbError::new("store is down"))
    }

    fn remove(&self, _game_id: Uuid) -> Result<bool, DbError> {
        Err(DbError::new("store is down"))
    }
}

fn file_backed_store() -> (NamedTempFile, Arc<GameRepository>) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Migrations failed");
    (db_file, Arc::new(repo))
}

#[tokio::test]
async fn create_then_get_returns_the_same_snapshot() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(Some("Alice".to_string()), Difficulty::Normal);

    assert_eq!(created.players.player1.name, "Alice");
    assert_eq!(created.players.player2.name, "AI");
    assert_eq!(created.current_turn, 1);

    let fetched = registry.get(created.game_id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn default_player_name_is_applied() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(None, Difficulty::Easy);
    assert_eq!(created.players.player1.name, "Player");

    let created = registry.create(Some("   ".to_string()), Difficulty::Easy);
    assert_eq!(created.players.player1.name, "Player");
}

#[tokio::test]
async fn unknown_game_is_not_found() {
    let registry = GameRegistry::in_memory();
    let missing = Uuid::new_v4();

    assert_eq!(registry.get(missing).await, Err(GameError::GameNotFound));
    assert_eq!(
        registry.apply_pawn_move(missing, 7, 4).await,
        Err(GameError::GameNotFound)
    );
}

#[tokio::test]
async fn apply_pawn_move_advances_the_game() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(None, Difficulty::Normal);

    let state = registry
        .apply_pawn_move(created.game_id, 7, 4)
        .await
        .unwrap();
    assert_eq!(state.players.player1.position.row, 7);
    assert_eq!(state.current_turn, 2);
    assert_eq!(state.turn_count, 1);
}

#[tokio::test]
async fn rejected_action_leaves_the_game_unchanged() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(None, Difficulty::Normal);

    assert_eq!(
        registry.apply_pawn_move(created.game_id, 4, 4).await,
        Err(GameError::InvalidMove)
    );
    let fetched = registry.get(created.game_id).await.unwrap();
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn opponent_turn_requires_player_two_to_move() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(None, Difficulty::Hard);

    assert_eq!(
        registry.apply_opponent_turn(created.game_id).await,
        Err(GameError::NotYourTurn)
    );

    registry
        .apply_pawn_move(created.game_id, 7, 4)
        .await
        .unwrap();
    let (_action, state) = registry.apply_opponent_turn(created.game_id).await.unwrap();
    assert_eq!(state.current_turn, 1);
    assert_eq!(state.turn_count, 2);
}

#[tokio::test]
async fn wall_apply_and_listing_agree() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(None, Difficulty::Normal);

    let actions = registry.list_valid_actions(created.game_id).await.unwrap();
    assert_eq!(actions.walls_remaining, 10);
    assert_eq!(actions.valid_pawn_moves.len(), 3);
    // Every anchor is open on an empty board.
    assert_eq!(actions.valid_wall_placements.len(), 128);

    let state = registry
        .apply_wall(created.game_id, 3, 3, Orientation::Horizontal)
        .await
        .unwrap();
    assert_eq!(state.walls.len(), 1);
    assert_eq!(state.players.player1.walls_remaining, 9);

    let actions = registry.list_valid_actions(created.game_id).await.unwrap();
    assert!(!actions
        .valid_wall_placements
        .iter()
        .any(|w| w.row == 3 && w.col == 3));
}

#[tokio::test]
async fn destroy_removes_the_game() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(None, Difficulty::Normal);

    registry.destroy(created.game_id).await.unwrap();
    assert_eq!(
        registry.get(created.game_id).await,
        Err(GameError::GameNotFound)
    );
    assert_eq!(
        registry.destroy(created.game_id).await,
        Err(GameError::GameNotFound)
    );
}

#[tokio::test]
async fn broken_store_degrades_to_memory_only() {
    let registry = GameRegistry::new(Some(Arc::new(BrokenStore)));
    let created = registry.create(Some("Alice".to_string()), Difficulty::Normal);

    // Applies succeed even though every persist fails.
    let state = registry
        .apply_pawn_move(created.game_id, 7, 4)
        .await
        .unwrap();
    assert_eq!(state.turn_count, 1);

    // Cold lookups fall through to the failing store and report
    // not-found rather than surfacing a storage error.
    assert_eq!(
        registry.get(Uuid::new_v4()).await,
        Err(GameError::GameNotFound)
    );
}

#[tokio::test]
async fn accepted_actions_are_written_through_and_reloadable() {
    let (_db, repo) = file_backed_store();

    let game_id = {
        let registry = GameRegistry::new(Some(repo.clone()));
        let created = registry.create(Some("Alice".to_string()), Difficulty::Hard);
        registry
            .apply_pawn_move(created.game_id, 7, 4)
            .await
            .unwrap();
        registry
            .apply_wall(created.game_id, 4, 4, Orientation::Vertical)
            .await
            .unwrap();
        created.game_id
    };

    // A fresh registry over the same store rehydrates the game.
    let registry = GameRegistry::new(Some(repo));
    let state = registry.get(game_id).await.unwrap();
    assert_eq!(state.turn_count, 2);
    assert_eq!(state.players.player1.position.row, 7);
    assert_eq!(state.walls.len(), 1);
    assert_eq!(state.players.player2.walls_remaining, 9);

    // The rehydrated game keeps playing.
    let next = registry.apply_pawn_move(game_id, 6, 4).await.unwrap();
    assert_eq!(next.turn_count, 3);
}

#[tokio::test]
async fn finished_games_list_no_valid_actions() {
    let registry = GameRegistry::in_memory();
    let created = registry.create(None, Difficulty::Normal);
    let id = created.game_id;

    // March player 1 up column 4 and player 2 down column 3.
    let p1_path = [(7, 4), (6, 4), (5, 4), (4, 4), (3, 4), (2, 4), (1, 4)];
    let p2_path = [(0, 3), (1, 3), (2, 3), (3, 3), (4, 3), (5, 3), (6, 3)];
    for (&(r1, c1), &(r2, c2)) in p1_path.iter().zip(&p2_path) {
        registry.apply_pawn_move(id, r1, c1).await.unwrap();
        registry.apply_pawn_move(id, r2, c2).await.unwrap();
    }
    let state = registry.apply_pawn_move(id, 0, 4).await.unwrap();
    assert_eq!(state.winner, Some(1));

    assert_eq!(
        registry.apply_pawn_move(id, 7, 3).await,
        Err(GameError::GameFinished)
    );
    assert_eq!(
        registry.apply_opponent_turn(id).await,
        Err(GameError::GameFinished)
    );

    let actions = registry.list_valid_actions(id).await.unwrap();
    assert!(actions.valid_pawn_moves.is_empty());
    assert!(actions.valid_wall_placements.is_empty());
}

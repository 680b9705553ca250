//! Tests for database repository operations.

use std::sync::Arc;

use quoridor_server::{Difficulty, GameRepository, GameState, GameStore, Orientation};
use tempfile::NamedTempFile;

/// Creates a temporary database file with schema applied, returns the
/// file handle (must stay in scope to keep the file alive) and a ready
/// repository.
fn setup_test_db() -> (NamedTempFile, GameRepository) {
    let db_file = NamedTempFile::new().expect("Failed to create temp file");
    let db_path = db_file.path().to_str().expect("Invalid path").to_string();

    let repo = GameRepository::new(db_path).expect("Failed to create repository");
    repo.ensure_schema().expect("Migrations failed");
    (db_file, repo)
}

#[test]
fn test_upsert_inserts_new_game() {
    let (_db, repo) = setup_test_db();
    let state = GameState::new("Alice", "AI").to_serializable();

    repo.upsert(&state, Difficulty::Normal).expect("Upsert failed");

    let stored = repo
        .load(state.game_id)
        .expect("Load failed")
        .expect("Game should exist");
    assert_eq!(stored.state, state);
    assert_eq!(stored.ai_difficulty, Difficulty::Normal);
}

#[test]
fn test_upsert_updates_existing_game() {
    let (_db, repo) = setup_test_db();
    let mut game = GameState::new("Alice", "AI");
    repo.upsert(&game.to_serializable(), Difficulty::Hard)
        .expect("Insert failed");

    game.move_pawn(7, 4).expect("Move failed");
    game.place_wall(2, 2, Orientation::Vertical).expect("Wall failed");
    let updated = game.to_serializable();
    repo.upsert(&updated, Difficulty::Hard).expect("Update failed");

    let stored = repo
        .load(updated.game_id)
        .expect("Load failed")
        .expect("Game should exist");
    assert_eq!(stored.state, updated);
    assert_eq!(stored.state.turn_count, 2);
    assert_eq!(stored.ai_difficulty, Difficulty::Hard);
}

#[test]
fn test_load_missing_game_returns_none() {
    let (_db, repo) = setup_test_db();
    let missing = uuid::Uuid::new_v4();
    let stored = repo.load(missing).expect("Load failed");
    assert!(stored.is_none());
}

#[test]
fn test_remove_deletes_row() {
    let (_db, repo) = setup_test_db();
    let state = GameState::new("Alice", "AI").to_serializable();
    repo.upsert(&state, Difficulty::Easy).expect("Upsert failed");

    assert!(repo.remove(state.game_id).expect("Delete failed"));
    assert!(repo.load(state.game_id).expect("Load failed").is_none());
    assert!(!repo.remove(state.game_id).expect("Second delete failed"));
}

#[test]
fn test_from_env_disabled_returns_none() {
    // DB_ENABLED unset (or not truthy) means memory-only operation.
    std::env::remove_var("DB_ENABLED");
    assert!(GameRepository::from_env().is_none());
}

#[test]
fn test_store_round_trip_preserves_finished_games() {
    let (_db, repo) = setup_test_db();
    let store: Arc<dyn GameStore> = Arc::new(repo);

    let mut snapshot = GameState::new("Alice", "AI").to_serializable();
    snapshot.status = quoridor_server::SerializedStatus::Finished;
    snapshot.winner = Some(2);
    snapshot.players.player2.position = quoridor_server::Position { row: 8, col: 4 };
    snapshot.players.player1.position = quoridor_server::Position { row: 4, col: 4 };

    store.upsert(&snapshot, Difficulty::Normal).expect("Upsert failed");
    let stored = store
        .load(snapshot.game_id)
        .expect("Load failed")
        .expect("Game should exist");
    assert_eq!(stored.state.winner, Some(2));
    assert_eq!(stored.state, snapshot);
}

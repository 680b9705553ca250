//! Game registry: lifecycle, per-game serialization of actions, and
//! write-through persistence.
//!
//! A global map lock protects only the `game_id → entry` lookup; every
//! state-mutating operation then runs under that game's own exclusive
//! guard. The in-memory state is authoritative for the process lifetime;
//! the store is a best-effort mirror, so persistence failures are logged
//! and never roll back an applied action.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::db::{DbError, GameRepository, NewGameRecord};
use crate::games::quoridor::{
    Action, Difficulty, GameError, GameState, GameStatus, HeuristicOpponent, Orientation,
    SerializedGame, SerializedStatus, ValidActions,
};

/// A snapshot loaded back from the store.
#[derive(Debug, Clone)]
pub struct StoredGame {
    /// The serialized game state.
    pub state: SerializedGame,
    /// Difficulty tier the game was created with.
    pub ai_difficulty: Difficulty,
}

/// Write-through persistence used by the registry.
///
/// Implementations mirror accepted actions; they are never the source of
/// truth while the process is alive. `load` is only consulted for games
/// the registry has no entry for.
pub trait GameStore: Send + Sync {
    /// Inserts or replaces the stored snapshot for a game.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the write fails; the registry logs and
    /// continues.
    fn upsert(&self, state: &SerializedGame, difficulty: Difficulty) -> Result<(), DbError>;

    /// Loads the stored snapshot for a game, if present.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the read fails.
    fn load(&self, game_id: Uuid) -> Result<Option<StoredGame>, DbError>;

    /// Removes the stored snapshot. Returns whether a row existed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the delete fails.
    fn remove(&self, game_id: Uuid) -> Result<bool, DbError>;
}

fn wire_status(status: SerializedStatus) -> &'static str {
    match status {
        SerializedStatus::InProgress => "in_progress",
        SerializedStatus::Finished
        | SerializedStatus::Player1Win
        | SerializedStatus::Player2Win => "finished",
    }
}

impl GameStore for GameRepository {
    fn upsert(&self, state: &SerializedGame, difficulty: Difficulty) -> Result<(), DbError> {
        let blob = serde_json::to_string(state)
            .map_err(|e| DbError::new(format!("State serialization failed: {}", e)))?;
        let record = NewGameRecord::new(
            state.game_id.to_string(),
            difficulty.as_str().to_string(),
            wire_status(state.status).to_string(),
            i32::from(state.current_turn),
            state.turn_count as i32,
            state.winner.map(i32::from),
            blob,
            state.created_at.naive_utc(),
            state.updated_at.naive_utc(),
        );
        self.upsert_game(record)?;
        Ok(())
    }

    fn load(&self, game_id: Uuid) -> Result<Option<StoredGame>, DbError> {
        let Some(record) = self.load_game(&game_id.to_string())? else {
            return Ok(None);
        };
        let state: SerializedGame = serde_json::from_str(record.state())
            .map_err(|e| DbError::new(format!("Stored state is unreadable: {}", e)))?;
        let ai_difficulty = Difficulty::parse(record.ai_difficulty()).unwrap_or_default();
        Ok(Some(StoredGame {
            state,
            ai_difficulty,
        }))
    }

    fn remove(&self, game_id: Uuid) -> Result<bool, DbError> {
        self.delete_game(&game_id.to_string())
    }
}

/// One registered game behind its exclusive guard.
#[derive(Debug)]
struct GameEntry {
    state: GameState,
    opponent: HeuristicOpponent,
    /// Set when a post-apply invariant check failed; a poisoned game
    /// answers `game_not_found` instead of serving inconsistent state.
    poisoned: bool,
}

impl GameEntry {
    fn new(state: GameState, difficulty: Difficulty) -> Self {
        Self {
            state,
            opponent: HeuristicOpponent::new(difficulty),
            poisoned: false,
        }
    }
}

/// Authoritative in-memory mapping from game id to game state.
pub struct GameRegistry {
    games: Mutex<HashMap<Uuid, Arc<AsyncMutex<GameEntry>>>>,
    store: Option<Arc<dyn GameStore>>,
}

impl GameRegistry {
    /// Creates a registry mirroring accepted actions into `store`.
    #[instrument(skip(store))]
    pub fn new(store: Option<Arc<dyn GameStore>>) -> Self {
        info!(persistent = store.is_some(), "Creating game registry");
        Self {
            games: Mutex::new(HashMap::new()),
            store,
        }
    }

    /// Creates a memory-only registry.
    pub fn in_memory() -> Self {
        Self::new(None)
    }

    /// Creates a new game and returns its initial snapshot.
    ///
    /// `player_name` defaults to "Player"; player 2 is the built-in
    /// opponent at the requested tier.
    #[instrument(skip(self))]
    pub fn create(&self, player_name: Option<String>, difficulty: Difficulty) -> SerializedGame {
        let name = player_name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| "Player".to_string());
        let state = GameState::new(name, "AI");
        let snapshot = state.to_serializable();
        let game_id = state.game_id();

        {
            let mut games = self.games.lock().unwrap();
            games.insert(game_id, Arc::new(AsyncMutex::new(GameEntry::new(state, difficulty))));
        }
        info!(game_id = %game_id, difficulty = %difficulty, "Game created");

        self.persist(&snapshot, difficulty);
        snapshot
    }

    /// Returns the current snapshot of a game.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`] for unknown or poisoned games.
    #[instrument(skip(self))]
    pub async fn get(&self, game_id: Uuid) -> Result<SerializedGame, GameError> {
        let entry = self.entry(game_id)?;
        let guard = entry.lock().await;
        if guard.poisoned {
            return Err(GameError::GameNotFound);
        }
        Ok(guard.state.to_serializable())
    }

    /// Moves the current player's pawn; returns the new snapshot.
    ///
    /// # Errors
    ///
    /// [`GameError`] rule violations; the state is unchanged on error.
    #[instrument(skip(self))]
    pub async fn apply_pawn_move(
        &self,
        game_id: Uuid,
        row: u8,
        col: u8,
    ) -> Result<SerializedGame, GameError> {
        let entry = self.entry(game_id)?;
        let mut guard = entry.lock().await;
        if guard.poisoned {
            return Err(GameError::GameNotFound);
        }
        guard.state.move_pawn(row, col)?;
        self.post_apply(&mut guard)
    }

    /// Places a wall for the current player; returns the new snapshot.
    ///
    /// # Errors
    ///
    /// [`GameError`] rule violations; the state is unchanged on error.
    #[instrument(skip(self))]
    pub async fn apply_wall(
        &self,
        game_id: Uuid,
        row: u8,
        col: u8,
        orientation: Orientation,
    ) -> Result<SerializedGame, GameError> {
        let entry = self.entry(game_id)?;
        let mut guard = entry.lock().await;
        if guard.poisoned {
            return Err(GameError::GameNotFound);
        }
        guard.state.place_wall(row, col, orientation)?;
        self.post_apply(&mut guard)
    }

    /// Lets the built-in opponent take the current turn.
    ///
    /// The policy's choice routes through the same apply path as a
    /// human action, so no rule check is bypassed.
    ///
    /// # Errors
    ///
    /// [`GameError::GameFinished`] on terminal games,
    /// [`GameError::NotYourTurn`] when it is not the opponent's turn.
    #[instrument(skip(self))]
    pub async fn apply_opponent_turn(
        &self,
        game_id: Uuid,
    ) -> Result<(Action, SerializedGame), GameError> {
        let entry = self.entry(game_id)?;
        let mut guard = entry.lock().await;
        if guard.poisoned {
            return Err(GameError::GameNotFound);
        }
        if guard.state.status() == GameStatus::Finished {
            return Err(GameError::GameFinished);
        }
        if guard.state.current_turn() != 2 {
            return Err(GameError::NotYourTurn);
        }

        let opponent = guard.opponent;
        let action = opponent
            .select_action(&mut guard.state)
            .ok_or(GameError::InvalidMove)?;
        debug!(game_id = %game_id, ?action, "Applying opponent action");
        guard.state.apply_action(action)?;

        let snapshot = self.post_apply(&mut guard)?;
        Ok((action, snapshot))
    }

    /// Lists the actions the current player could take, exactly as the
    /// validator would accept them individually.
    ///
    /// Finished games have no acceptable actions, so both lists are
    /// empty once a game is over.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`] for unknown or poisoned games.
    #[instrument(skip(self))]
    pub async fn list_valid_actions(&self, game_id: Uuid) -> Result<ValidActions, GameError> {
        let entry = self.entry(game_id)?;
        let mut guard = entry.lock().await;
        if guard.poisoned {
            return Err(GameError::GameNotFound);
        }

        let walls_remaining = guard.state.current_player().walls_remaining();
        if guard.state.status() == GameStatus::Finished {
            return Ok(ValidActions {
                valid_pawn_moves: Vec::new(),
                valid_wall_placements: Vec::new(),
                walls_remaining,
            });
        }
        Ok(ValidActions {
            valid_pawn_moves: guard.state.valid_pawn_moves(),
            valid_wall_placements: guard.state.valid_wall_placements(),
            walls_remaining,
        })
    }

    /// Removes a game from the registry and the store.
    ///
    /// # Errors
    ///
    /// [`GameError::GameNotFound`] when neither holds the game.
    #[instrument(skip(self))]
    pub async fn destroy(&self, game_id: Uuid) -> Result<(), GameError> {
        let removed = self.games.lock().unwrap().remove(&game_id).is_some();

        let removed_from_store = match &self.store {
            Some(store) => match store.remove(game_id) {
                Ok(removed) => removed,
                Err(e) => {
                    warn!(game_id = %game_id, error = %e, "Store delete failed");
                    false
                }
            },
            None => false,
        };

        if removed || removed_from_store {
            info!(game_id = %game_id, "Game destroyed");
            Ok(())
        } else {
            Err(GameError::GameNotFound)
        }
    }

    /// Looks up a game entry, consulting the store on a cold miss.
    fn entry(&self, game_id: Uuid) -> Result<Arc<AsyncMutex<GameEntry>>, GameError> {
        if let Some(entry) = self.games.lock().unwrap().get(&game_id) {
            return Ok(entry.clone());
        }

        let store = self.store.as_ref().ok_or(GameError::GameNotFound)?;
        let stored = match store.load(game_id) {
            Ok(Some(stored)) => stored,
            Ok(None) => return Err(GameError::GameNotFound),
            Err(e) => {
                warn!(game_id = %game_id, error = %e, "Store load failed");
                return Err(GameError::GameNotFound);
            }
        };

        let state = match GameState::from_serializable(stored.state) {
            Ok(state) => state,
            Err(e) => {
                warn!(game_id = %game_id, error = %e, "Stored state is invalid");
                return Err(GameError::GameNotFound);
            }
        };
        debug!(game_id = %game_id, "Rehydrated game from store");

        let mut games = self.games.lock().unwrap();
        let entry = games
            .entry(game_id)
            .or_insert_with(|| {
                Arc::new(AsyncMutex::new(GameEntry::new(state, stored.ai_difficulty)))
            })
            .clone();
        Ok(entry)
    }

    /// Post-apply invariant check, snapshot and best-effort persist.
    fn post_apply(&self, entry: &mut GameEntry) -> Result<SerializedGame, GameError> {
        if !entry.state.verify_invariants() {
            entry.poisoned = true;
            error!(
                game_id = %entry.state.game_id(),
                "Invariant violation after apply; poisoning game"
            );
            return Err(GameError::GameNotFound);
        }

        let snapshot = entry.state.to_serializable();
        self.persist(&snapshot, entry.opponent.difficulty());
        Ok(snapshot)
    }

    /// Mirrors a snapshot into the store, logging failures.
    fn persist(&self, snapshot: &SerializedGame, difficulty: Difficulty) {
        if let Some(store) = &self.store {
            if let Err(e) = store.upsert(snapshot, difficulty) {
                warn!(
                    game_id = %snapshot.game_id,
                    error = %e,
                    "Persist failed; in-memory state remains authoritative"
                );
            }
        }
    }
}

impl std::fmt::Debug for GameRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameRegistry")
            .field("persistent", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

//! Database repository for persisted game sessions.

use diesel::prelude::*;
use diesel::upsert::excluded;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use tracing::{debug, info, instrument, warn};

use crate::db::{schema, DbError, GameRecord, NewGameRecord};

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for game session rows.
#[derive(Debug, Clone)]
pub struct GameRepository {
    database_url: String,
}

impl GameRepository {
    /// Creates a new repository connected to the database at the given
    /// URL or path.
    ///
    /// Use `":memory:"` for an in-memory database (useful for tests).
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the URL is invalid.
    #[instrument(skip(database_url))]
    pub fn new(database_url: String) -> Result<Self, DbError> {
        info!(url = %database_url, "Creating GameRepository");
        Ok(Self { database_url })
    }

    /// Builds a repository from `DB_ENABLED` and `DATABASE_URL`,
    /// verifying the connection and applying pending migrations.
    ///
    /// Returns `None` when persistence is disabled or the database is
    /// unreachable; the caller is expected to run memory-only in that
    /// case.
    #[instrument]
    pub fn from_env() -> Option<Self> {
        let enabled = std::env::var("DB_ENABLED")
            .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        if !enabled {
            info!("DB_ENABLED not set, running memory-only");
            return None;
        }

        let database_url =
            std::env::var("DATABASE_URL").unwrap_or_else(|_| "quoridor.db".to_string());
        let repo = match Self::new(database_url) {
            Ok(repo) => repo,
            Err(e) => {
                warn!(error = %e, "Repository setup failed, running memory-only");
                return None;
            }
        };

        match repo.ensure_schema() {
            Ok(()) => Some(repo),
            Err(e) => {
                warn!(error = %e, "Database unreachable, running memory-only");
                None
            }
        }
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, DbError> {
        debug!(url = %self.database_url, "Establishing connection");
        SqliteConnection::establish(&self.database_url).map_err(|e| {
            DbError::new(format!(
                "Failed to connect to '{}': {}",
                self.database_url, e
            ))
        })
    }

    /// Applies pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if the connection or a migration fails.
    #[instrument(skip(self))]
    pub fn ensure_schema(&self) -> Result<(), DbError> {
        let mut conn = self.connection()?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|e| DbError::new(format!("Migration failed: {}", e)))?;
        debug!("Schema up to date");
        Ok(())
    }

    /// Inserts or updates the row for a game session.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self, record), fields(game_id = %record.game_id(), status = %record.status()))]
    pub fn upsert_game(&self, record: NewGameRecord) -> Result<GameRecord, DbError> {
        debug!("Upserting game session");
        let mut conn = self.connection()?;

        let saved = diesel::insert_into(schema::games::table)
            .values(&record)
            .on_conflict(schema::games::game_id)
            .do_update()
            .set((
                schema::games::ai_difficulty.eq(excluded(schema::games::ai_difficulty)),
                schema::games::status.eq(excluded(schema::games::status)),
                schema::games::current_turn.eq(excluded(schema::games::current_turn)),
                schema::games::turn_count.eq(excluded(schema::games::turn_count)),
                schema::games::winner.eq(excluded(schema::games::winner)),
                schema::games::state.eq(excluded(schema::games::state)),
                schema::games::updated_at.eq(excluded(schema::games::updated_at)),
            ))
            .returning(GameRecord::as_returning())
            .get_result(&mut conn)?;

        info!(game_id = %saved.game_id(), turn_count = saved.turn_count(), "Game session saved");
        Ok(saved)
    }

    /// Loads a game session by identifier. Returns `None` if not found.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_game(&self, game_id: &str) -> Result<Option<GameRecord>, DbError> {
        debug!(game_id = %game_id, "Loading game session");
        let mut conn = self.connection()?;

        let record = schema::games::table
            .filter(schema::games::game_id.eq(game_id))
            .first::<GameRecord>(&mut conn)
            .optional()?;

        if record.is_some() {
            debug!(game_id = %game_id, "Game session found");
        } else {
            debug!(game_id = %game_id, "Game session not found");
        }

        Ok(record)
    }

    /// Deletes a game session row. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns [`DbError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn delete_game(&self, game_id: &str) -> Result<bool, DbError> {
        debug!(game_id = %game_id, "Deleting game session");
        let mut conn = self.connection()?;

        let removed =
            diesel::delete(schema::games::table.filter(schema::games::game_id.eq(game_id)))
                .execute(&mut conn)?;

        info!(game_id = %game_id, removed, "Game session delete finished");
        Ok(removed > 0)
    }
}

//! Database models for persisted game sessions.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;

use crate::db::schema;

/// Persisted game session row.
///
/// The full serialized state lives in the `state` JSON blob; the scalar
/// columns mirror the fields operators filter on.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::games)]
pub struct GameRecord {
    id: i32,
    game_id: String,
    ai_difficulty: String,
    status: String,
    current_turn: i32,
    turn_count: i32,
    winner: Option<i32>,
    state: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

/// Insertable game session model for creates and upserts.
#[derive(Debug, Clone, Insertable, new, Getters)]
#[diesel(table_name = schema::games)]
pub struct NewGameRecord {
    game_id: String,
    ai_difficulty: String,
    status: String,
    current_turn: i32,
    turn_count: i32,
    winner: Option<i32>,
    state: String,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

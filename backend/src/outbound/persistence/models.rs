//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{admin_logs, admins, attempts, game_settings, users};

/// Row struct for reading from the users table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub name: String,
    pub phone: String,
    pub attempts_left: i32,
    pub best_result: Option<i64>,
    pub discount: i32,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for registering players.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = users)]
pub(crate) struct NewUserRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub phone: &'a str,
    pub attempts_left: i32,
    pub best_result: Option<i64>,
    pub discount: i32,
    pub created_at: DateTime<Utc>,
}

/// Changeset applied after an attempt.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = users)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct UserGameUpdate {
    pub attempts_left: i32,
    pub best_result: Option<i64>,
    pub discount: i32,
}

/// Insertable struct for attempt history.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = attempts)]
pub(crate) struct NewAttemptRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub difference: i64,
    pub created_at: DateTime<Utc>,
}

/// Row struct for the game settings singleton.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = game_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct GameSettingsRow {
    pub attempts_number: i32,
    pub discount_ranges: serde_json::Value,
}

/// Row struct for admin accounts.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = admins)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AdminRow {
    pub id: Uuid,
    pub password_hash: String,
    pub failed_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

/// Changeset persisting lockout state.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = admins)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct AdminLockoutUpdate {
    pub failed_attempts: i32,
    pub locked_until: Option<DateTime<Utc>>,
}

/// Insertable struct for audit entries.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = admin_logs)]
pub(crate) struct NewAdminLogRow<'a> {
    pub id: Uuid,
    pub action: &'a str,
    pub details: Option<&'a serde_json::Value>,
    pub ip_address: Option<&'a str>,
    pub created_at: DateTime<Utc>,
}

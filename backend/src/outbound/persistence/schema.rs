//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Registered players.
    ///
    /// `phone` carries the `users_phone_key` unique constraint that arbitrates
    /// concurrent registrations.
    users (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Display name (max 64 characters).
        name -> Varchar,
        /// Normalised E.164 phone number.
        phone -> Varchar,
        /// Remaining attempts; never negative.
        attempts_left -> Int4,
        /// Lowest difference achieved so far.
        best_result -> Nullable<Int8>,
        /// Discount percentage earned by `best_result`.
        discount -> Int4,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only attempt history.
    attempts (id) {
        id -> Uuid,
        /// Owning player.
        user_id -> Uuid,
        /// Whole-number distance from the target; lower is better.
        difference -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Singleton game configuration row (`id = 1`).
    game_settings (id) {
        id -> Int4,
        /// Attempts granted to new players.
        attempts_number -> Int4,
        /// JSON array of `{min, max, discount}` tiers.
        discount_ranges -> Jsonb,
    }
}

diesel::table! {
    /// Admin accounts with lockout state.
    admins (id) {
        id -> Uuid,
        /// Argon2 PHC string.
        password_hash -> Text,
        failed_attempts -> Int4,
        locked_until -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only admin audit trail.
    admin_logs (id) {
        id -> Uuid,
        action -> Varchar,
        details -> Nullable<Jsonb>,
        ip_address -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(attempts -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(admin_logs, admins, attempts, game_settings, users,);

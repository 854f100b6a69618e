//! PostgreSQL-backed `GameSettingsRepository`.
//!
//! The settings row is read inside every transaction that needs it; the
//! helpers here are shared with the player repository for that purpose.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::{AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{GameSettingsRepository, GameSettingsRepositoryError};
use crate::domain::{DiscountRanges, GameSettings};

use super::diesel_helpers::{
    StoreFailure, classify_diesel_error, map_pool_error_message, to_domain_count,
};
use super::models::GameSettingsRow;
use super::pool::DbPool;
use super::schema::game_settings;

/// Primary key of the singleton settings row.
pub(crate) const SETTINGS_ROW_ID: i32 = 1;

/// Diesel-backed implementation of the game settings port.
#[derive(Clone)]
pub struct DieselGameSettingsRepository {
    pool: DbPool,
}

impl DieselGameSettingsRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

/// Read the settings row on an open connection.
pub(crate) async fn load_settings_row(
    conn: &mut AsyncPgConnection,
) -> Result<Option<GameSettingsRow>, diesel::result::Error> {
    game_settings::table
        .find(SETTINGS_ROW_ID)
        .select(GameSettingsRow::as_select())
        .first(conn)
        .await
        .optional()
}

/// Decode a settings row into the domain type.
pub(crate) fn decode_settings(row: GameSettingsRow) -> Result<GameSettings, String> {
    let attempts_number = to_domain_count(row.attempts_number, "attempts_number")?;
    let ranges: DiscountRanges = serde_json::from_value(row.discount_ranges)
        .map_err(|err| format!("invalid discount_ranges: {err}"))?;
    Ok(GameSettings::new(attempts_number, ranges))
}

fn map_diesel_error(error: &diesel::result::Error) -> GameSettingsRepositoryError {
    match classify_diesel_error(error, "load game settings") {
        StoreFailure::Transient(message) => GameSettingsRepositoryError::connection(message),
        StoreFailure::Permanent(message) => GameSettingsRepositoryError::query(message),
    }
}

#[async_trait]
impl GameSettingsRepository for DieselGameSettingsRepository {
    async fn load(&self) -> Result<GameSettings, GameSettingsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(|err| {
            GameSettingsRepositoryError::connection(map_pool_error_message(err))
        })?;

        let row = load_settings_row(&mut conn)
            .await
            .map_err(|err| map_diesel_error(&err))?
            .ok_or_else(|| GameSettingsRepositoryError::query("game settings row is missing"))?;

        decode_settings(row).map_err(GameSettingsRepositoryError::malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn decodes_seeded_settings() {
        let row = GameSettingsRow {
            attempts_number: 3,
            discount_ranges: json!([
                { "min": 0, "max": 10, "discount": 20 },
                { "min": 11, "max": null, "discount": 10 },
            ]),
        };

        let settings = decode_settings(row).expect("valid settings");

        assert_eq!(settings.attempts_number(), 3);
        assert_eq!(settings.discount_ranges().resolve(4.0).map(|d| d.value()), Ok(20));
    }

    #[rstest]
    #[case(GameSettingsRow { attempts_number: -1, discount_ranges: json!([]) })]
    #[case(GameSettingsRow { attempts_number: 3, discount_ranges: json!({ "min": 0 }) })]
    #[case(GameSettingsRow {
        attempts_number: 3,
        discount_ranges: json!([{ "min": 0, "max": 10, "discount": 250 }]),
    })]
    fn rejects_malformed_rows(#[case] row: GameSettingsRow) {
        assert!(decode_settings(row).is_err());
    }
}

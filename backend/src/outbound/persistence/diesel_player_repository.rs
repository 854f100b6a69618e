//! PostgreSQL-backed `PlayerRepository` implementation using Diesel ORM.
//!
//! # Atomicity
//!
//! - Registration reads the settings row and inserts with
//!   `ON CONFLICT (phone) DO NOTHING` in one transaction; the unique index
//!   decides concurrent races and the loser observes no row.
//! - Attempt recording locks the player row with `SELECT ... FOR UPDATE`, so
//!   concurrent attempts for one player serialise and the budget can never
//!   go negative. Rejected attempts roll the transaction back.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::AsyncConnection as _;
use diesel_async::RunQueryDsl;
use diesel_async::scoped_futures::ScopedFutureExt as _;

use crate::domain::ports::{AttemptWrite, PlayerRepository, PlayerRepositoryError};
use crate::domain::{
    Attempt, AttemptReceipt, AttemptRejection, Difference, DiscountPercent, PhoneNumber,
    PlayerName, User, UserId, UserSnapshot,
};

use super::diesel_game_settings_repository::{decode_settings, load_settings_row};
use super::diesel_helpers::{
    StoreFailure, apply_local_timeouts, classify_diesel_error, map_pool_error_message,
    to_db_count, to_domain_count,
};
use super::models::{NewAttemptRow, NewUserRow, UserGameUpdate, UserRow};
use super::pool::DbPool;
use super::schema::{attempts, users};

/// Diesel-backed implementation of the player repository port.
#[derive(Clone)]
pub struct DieselPlayerRepository {
    pool: DbPool,
}

impl DieselPlayerRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

/// Failures raised inside a player transaction.
#[derive(Debug)]
enum PlayerTxError {
    Diesel(diesel::result::Error),
    Corrupt(String),
    Rejected(AttemptRejection),
}

impl From<diesel::result::Error> for PlayerTxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_diesel_error(error: &diesel::result::Error, operation: &str) -> PlayerRepositoryError {
    match classify_diesel_error(error, operation) {
        StoreFailure::Transient(message) => PlayerRepositoryError::connection(message),
        StoreFailure::Permanent(message) => PlayerRepositoryError::query(message),
    }
}

fn map_tx_error(error: PlayerTxError, operation: &str) -> PlayerRepositoryError {
    match error {
        PlayerTxError::Diesel(err) => map_diesel_error(&err, operation),
        PlayerTxError::Corrupt(message) => PlayerRepositoryError::query(message),
        PlayerTxError::Rejected(rejection) => {
            PlayerRepositoryError::query(format!("{operation}: unexpected rejection {rejection}"))
        }
    }
}

/// Convert a database row into a domain player.
fn row_to_user(row: UserRow) -> Result<User, String> {
    let phone = PhoneNumber::parse(&row.phone)
        .map_err(|err| format!("corrupt phone for user {}: {err}", row.id))?;
    let name = PlayerName::new(&row.name)
        .map_err(|err| format!("corrupt name for user {}: {err}", row.id))?;
    let best_result = row
        .best_result
        .map(|raw| u32::try_from(raw).map(Difference::from))
        .transpose()
        .map_err(|err| format!("corrupt best_result for user {}: {err}", row.id))?;
    let discount = DiscountPercent::new(i64::from(row.discount))
        .map_err(|err| format!("corrupt discount for user {}: {err}", row.id))?;

    Ok(User::restore(UserSnapshot {
        id: UserId::from_uuid(row.id),
        name,
        phone,
        attempts_left: to_domain_count(row.attempts_left, "attempts_left")?,
        best_result,
        discount,
        created_at: row.created_at,
    }))
}

fn game_update(user: &User) -> Result<UserGameUpdate, String> {
    Ok(UserGameUpdate {
        attempts_left: to_db_count(user.attempts_left(), "attempts_left")?,
        best_result: user.best_result().map(|best| i64::from(best.value())),
        discount: i32::from(user.discount().value()),
    })
}

async fn register_in_tx(
    conn: &mut diesel_async::AsyncPgConnection,
    timeout: std::time::Duration,
    name: &PlayerName,
    phone: &PhoneNumber,
    registered_at: DateTime<Utc>,
) -> Result<Option<User>, PlayerTxError> {
    apply_local_timeouts(conn, timeout).await?;
    let settings = load_settings_row(conn)
        .await?
        .ok_or_else(|| PlayerTxError::Corrupt("game settings row is missing".to_owned()))
        .and_then(|row| decode_settings(row).map_err(PlayerTxError::Corrupt))?;

    let user = User::register(
        name.clone(),
        phone.clone(),
        settings.attempts_number(),
        registered_at,
    );
    let new_row = NewUserRow {
        id: *user.id().as_uuid(),
        name: user.name().as_str(),
        phone: user.phone().as_str(),
        attempts_left: to_db_count(user.attempts_left(), "attempts_left")
            .map_err(PlayerTxError::Corrupt)?,
        best_result: None,
        discount: i32::from(user.discount().value()),
        created_at: user.created_at(),
    };

    let inserted: Option<UserRow> = diesel::insert_into(users::table)
        .values(&new_row)
        .on_conflict(users::phone)
        .do_nothing()
        .returning(UserRow::as_returning())
        .get_result(conn)
        .await
        .optional()?;

    inserted
        .map(row_to_user)
        .transpose()
        .map_err(PlayerTxError::Corrupt)
}

async fn attempt_in_tx(
    conn: &mut diesel_async::AsyncPgConnection,
    timeout: std::time::Duration,
    user_id: &UserId,
    difference: Difference,
    recorded_at: DateTime<Utc>,
) -> Result<AttemptWrite, PlayerTxError> {
    apply_local_timeouts(conn, timeout).await?;
    let settings = load_settings_row(conn)
        .await?
        .ok_or_else(|| PlayerTxError::Corrupt("game settings row is missing".to_owned()))
        .and_then(|row| decode_settings(row).map_err(PlayerTxError::Corrupt))?;

    let locked: Option<UserRow> = users::table
        .find(*user_id.as_uuid())
        .select(UserRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(row) = locked else {
        return Ok(AttemptWrite::UserNotFound);
    };

    let mut user = row_to_user(row).map_err(PlayerTxError::Corrupt)?;
    user.apply_attempt(difference, settings.discount_ranges())
        .map_err(PlayerTxError::Rejected)?;

    let attempt = Attempt::new(*user_id, difference, recorded_at);
    diesel::insert_into(attempts::table)
        .values(&NewAttemptRow {
            id: *attempt.id.as_uuid(),
            user_id: *user_id.as_uuid(),
            difference: i64::from(difference.value()),
            created_at: attempt.created_at,
        })
        .execute(conn)
        .await?;

    let update = game_update(&user).map_err(PlayerTxError::Corrupt)?;
    diesel::update(users::table.find(*user_id.as_uuid()))
        .set(&update)
        .execute(conn)
        .await?;

    Ok(AttemptWrite::Committed(AttemptReceipt::new(&attempt, &user)))
}

#[async_trait]
impl PlayerRepository for DieselPlayerRepository {
    async fn find_by_phone(
        &self,
        phone: &PhoneNumber,
    ) -> Result<Option<User>, PlayerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PlayerRepositoryError::connection(map_pool_error_message(err)))?;

        let row: Option<UserRow> = users::table
            .filter(users::phone.eq(phone.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(&err, "find player by phone"))?;

        row.map(row_to_user)
            .transpose()
            .map_err(PlayerRepositoryError::query)
    }

    async fn insert_if_absent(
        &self,
        name: &PlayerName,
        phone: &PhoneNumber,
        registered_at: DateTime<Utc>,
    ) -> Result<Option<User>, PlayerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PlayerRepositoryError::connection(map_pool_error_message(err)))?;
        let timeout = self.pool.statement_timeout();

        conn.transaction(|conn| {
            async move { register_in_tx(conn, timeout, name, phone, registered_at).await }
                .scope_boxed()
        })
        .await
        .map_err(|err| map_tx_error(err, "register player"))
    }

    async fn record_attempt(
        &self,
        user_id: &UserId,
        difference: Difference,
        recorded_at: DateTime<Utc>,
    ) -> Result<AttemptWrite, PlayerRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| PlayerRepositoryError::connection(map_pool_error_message(err)))?;
        let timeout = self.pool.statement_timeout();

        let result = conn
            .transaction(|conn| {
                async move { attempt_in_tx(conn, timeout, user_id, difference, recorded_at).await }
                    .scope_boxed()
            })
            .await;

        match result {
            Ok(write) => Ok(write),
            Err(PlayerTxError::Rejected(rejection)) => Ok(AttemptWrite::Rejected(rejection)),
            Err(err) => Err(map_tx_error(err, "record attempt")),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Row conversion and error mapping coverage.
    use super::*;
    use diesel::result::DatabaseErrorKind;
    use rstest::{fixture, rstest};
    use uuid::Uuid;

    fn base_row() -> UserRow {
        UserRow {
            id: Uuid::new_v4(),
            name: "Dana".to_owned(),
            phone: "+972501234567".to_owned(),
            attempts_left: 2,
            best_result: Some(4),
            discount: 20,
            created_at: Utc::now(),
        }
    }

    #[fixture]
    fn row() -> UserRow {
        base_row()
    }

    #[rstest]
    fn valid_row_converts(row: UserRow) {
        let id = row.id;
        let user = row_to_user(row).expect("valid row");
        assert_eq!(user.id(), UserId::from_uuid(id));
        assert_eq!(user.attempts_left(), 2);
        assert_eq!(user.best_result().map(Difference::value), Some(4));
        assert_eq!(user.discount().value(), 20);
    }

    #[rstest]
    #[case::bad_phone(UserRow { phone: "12".to_owned(), ..base_row() })]
    #[case::negative_attempts(UserRow { attempts_left: -1, ..base_row() })]
    #[case::negative_best(UserRow { best_result: Some(-2), ..base_row() })]
    #[case::oversized_best(UserRow { best_result: Some(i64::MAX), ..base_row() })]
    #[case::discount_over_100(UserRow { discount: 150, ..base_row() })]
    fn corrupt_rows_are_reported(#[case] corrupt: UserRow) {
        assert!(row_to_user(corrupt).is_err());
    }

    #[rstest]
    fn game_update_mirrors_user(row: UserRow) {
        let user = row_to_user(row).expect("valid row");
        let update = game_update(&user).expect("update");
        assert_eq!(update.attempts_left, 2);
        assert_eq!(update.best_result, Some(4));
        assert_eq!(update.discount, 20);
    }

    #[rstest]
    fn closed_connection_inside_transaction_is_retryable() {
        let err = PlayerTxError::Diesel(diesel::result::Error::DatabaseError(
            DatabaseErrorKind::ClosedConnection,
            Box::new("server closed the connection".to_owned()),
        ));
        assert!(matches!(
            map_tx_error(err, "record attempt"),
            PlayerRepositoryError::Connection { .. }
        ));
    }

    #[rstest]
    fn corrupt_transaction_state_is_a_query_error() {
        let err = PlayerTxError::Corrupt("game settings row is missing".to_owned());
        assert_eq!(
            map_tx_error(err, "register player"),
            PlayerRepositoryError::query("game settings row is missing")
        );
    }
}

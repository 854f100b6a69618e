//! PostgreSQL-backed `AdminRepository`.
//!
//! Each login locks the admin row, runs the domain lockout state machine and
//! writes the counter and lock back before committing, so concurrent wrong
//! guesses cannot slip past the threshold.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{AdminRepository, AdminRepositoryError};
use crate::domain::{Admin, AdminId, LockoutPolicy, LoginDecision, PasswordDigest};

use super::diesel_helpers::{
    StoreFailure, apply_local_timeouts, classify_diesel_error, map_pool_error_message,
    to_db_count, to_domain_count,
};
use super::models::{AdminLockoutUpdate, AdminRow};
use super::pool::DbPool;
use super::schema::admins;

/// Diesel-backed implementation of the admin repository port.
#[derive(Clone)]
pub struct DieselAdminRepository {
    pool: DbPool,
}

impl DieselAdminRepository {
    /// Create a new repository with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

#[derive(Debug)]
enum AdminTxError {
    Diesel(diesel::result::Error),
    Corrupt(String),
    Credential(String),
}

impl From<diesel::result::Error> for AdminTxError {
    fn from(value: diesel::result::Error) -> Self {
        Self::Diesel(value)
    }
}

fn map_tx_error(error: AdminTxError) -> AdminRepositoryError {
    match error {
        AdminTxError::Diesel(err) => match classify_diesel_error(&err, "admin login") {
            StoreFailure::Transient(message) => AdminRepositoryError::connection(message),
            StoreFailure::Permanent(message) => AdminRepositoryError::query(message),
        },
        AdminTxError::Corrupt(message) => AdminRepositoryError::query(message),
        AdminTxError::Credential(message) => AdminRepositoryError::corrupt_credential(message),
    }
}

fn row_to_admin(row: AdminRow) -> Result<Admin, AdminTxError> {
    let password = PasswordDigest::from_phc(row.password_hash)
        .map_err(|err| AdminTxError::Credential(format!("admin {}: {err}", row.id)))?;
    let failed_attempts =
        to_domain_count(row.failed_attempts, "failed_attempts").map_err(AdminTxError::Corrupt)?;
    Ok(Admin::new(
        AdminId::from_uuid(row.id),
        password,
        failed_attempts,
        row.locked_until,
    ))
}

fn lockout_update(admin: &Admin) -> Result<AdminLockoutUpdate, AdminTxError> {
    Ok(AdminLockoutUpdate {
        failed_attempts: to_db_count(admin.failed_attempts(), "failed_attempts")
            .map_err(AdminTxError::Corrupt)?,
        locked_until: admin.locked_until(),
    })
}

async fn evaluate_in_tx(
    conn: &mut AsyncPgConnection,
    timeout: Duration,
    admin_id: &AdminId,
    password: &str,
    policy: LockoutPolicy,
    now: DateTime<Utc>,
) -> Result<Option<LoginDecision>, AdminTxError> {
    apply_local_timeouts(conn, timeout).await?;

    let locked: Option<AdminRow> = admins::table
        .find(*admin_id.as_uuid())
        .select(AdminRow::as_select())
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(row) = locked else {
        return Ok(None);
    };

    let mut admin = row_to_admin(row)?;
    let decision = admin
        .authenticate(password, now, policy)
        .map_err(|err| AdminTxError::Credential(err.to_string()))?;

    if decision.mutates_account() {
        diesel::update(admins::table.find(*admin_id.as_uuid()))
            .set(&lockout_update(&admin)?)
            .execute(conn)
            .await?;
    }
    Ok(Some(decision))
}

#[async_trait]
impl AdminRepository for DieselAdminRepository {
    async fn evaluate_login(
        &self,
        admin_id: &AdminId,
        password: &str,
        policy: LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<Option<LoginDecision>, AdminRepositoryError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| AdminRepositoryError::connection(map_pool_error_message(err)))?;
        let timeout = self.pool.statement_timeout();

        conn.transaction(|conn| {
            async move { evaluate_in_tx(conn, timeout, admin_id, password, policy, now).await }
                .scope_boxed()
        })
        .await
        .map_err(map_tx_error)
    }
}

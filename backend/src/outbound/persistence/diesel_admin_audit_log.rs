//! PostgreSQL-backed `AdminAuditLog`.

use async_trait::async_trait;
use diesel_async::RunQueryDsl;

use crate::domain::AdminAuditEntry;
use crate::domain::ports::{AdminAuditLog, AdminAuditLogError};

use super::diesel_helpers::{StoreFailure, classify_diesel_error, map_pool_error_message};
use super::models::NewAdminLogRow;
use super::pool::DbPool;
use super::schema::admin_logs;

/// Appends audit entries to `admin_logs`.
#[derive(Clone)]
pub struct DieselAdminAuditLog {
    pool: DbPool,
}

impl DieselAdminAuditLog {
    /// Create a new audit log with the given connection pool.
    #[rustfmt::skip]
    pub fn new(pool: DbPool) -> Self { Self { pool } }
}

#[async_trait]
impl AdminAuditLog for DieselAdminAuditLog {
    async fn append(&self, entry: &AdminAuditEntry) -> Result<(), AdminAuditLogError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| AdminAuditLogError::connection(map_pool_error_message(err)))?;

        let row = NewAdminLogRow {
            id: entry.id,
            action: entry.action.as_str(),
            details: entry.details.as_ref(),
            ip_address: entry.ip_address.as_deref(),
            created_at: entry.created_at,
        };

        diesel::insert_into(admin_logs::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| match classify_diesel_error(&err, "append admin audit entry") {
                StoreFailure::Transient(message) => AdminAuditLogError::connection(message),
                StoreFailure::Permanent(message) => AdminAuditLogError::query(message),
            })
    }
}

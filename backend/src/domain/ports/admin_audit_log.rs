//! Port for the append-only admin audit trail.

use async_trait::async_trait;

use crate::domain::AdminAuditEntry;

use super::define_port_error;

define_port_error! {
    /// Errors raised while appending audit entries.
    pub enum AdminAuditLogError {
        /// Repository connection could not be established.
        Connection { message: String } => "audit log connection failed: {message}",
        /// Insert failed.
        Query { message: String } => "audit log write failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminAuditLog: Send + Sync {
    /// Append one entry.
    async fn append(&self, entry: &AdminAuditEntry) -> Result<(), AdminAuditLogError>;
}

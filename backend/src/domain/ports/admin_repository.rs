//! Port for admin accounts and lockout state.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AdminId, LockoutPolicy, LoginDecision};

use super::define_port_error;

define_port_error! {
    /// Errors raised by admin repository adapters.
    pub enum AdminRepositoryError {
        /// Store unreachable, timed out or aborted the transaction; retryable.
        Connection { message: String } => "admin repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "admin repository query failed: {message}",
        /// The stored password hash cannot be used for verification.
        CorruptCredential { message: String } => "admin credential is unusable: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminRepository: Send + Sync {
    /// Evaluate a login against the stored account.
    ///
    /// Adapters lock the admin row, run [`crate::domain::Admin::authenticate`]
    /// and persist the account in the same transaction whenever the decision
    /// mutates it. Returns `None` for an unknown admin.
    async fn evaluate_login(
        &self,
        admin_id: &AdminId,
        password: &str,
        policy: LockoutPolicy,
        now: DateTime<Utc>,
    ) -> Result<Option<LoginDecision>, AdminRepositoryError>;
}

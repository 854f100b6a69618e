//! Admin authentication service with lockout and audit trail.
//!
//! Lockout evaluation happens in the admin repository under a row lock. This
//! service translates the decision into a login outcome and appends one audit
//! entry per login. Audit failures are logged and never change the outcome.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::{Value, json};
use tracing::{error, info, warn};

use crate::domain::ports::{
    AdminAuditLog, AdminLoginOutcome, AdminLoginService, AdminRepository, AdminRepositoryError,
};
use crate::domain::{
    AdminAction, AdminAuditEntry, AdminCredentials, AdminId, Error, LockoutPolicy, LoginDecision,
};

/// Admin login service implementing the lockout state machine.
#[derive(Clone)]
pub struct AdminAuthService<A, L> {
    admins: Arc<A>,
    audit_log: Arc<L>,
    clock: Arc<dyn Clock>,
    policy: LockoutPolicy,
}

impl<A, L> AdminAuthService<A, L> {
    pub fn new(
        admins: Arc<A>,
        audit_log: Arc<L>,
        clock: Arc<dyn Clock>,
        policy: LockoutPolicy,
    ) -> Self {
        Self {
            admins,
            audit_log,
            clock,
            policy,
        }
    }
}

fn map_admin_repository_error(error: AdminRepositoryError) -> Error {
    match error {
        AdminRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("admin store unavailable: {message}"))
        }
        AdminRepositoryError::Query { message } => {
            Error::internal(format!("admin store error: {message}"))
        }
        AdminRepositoryError::CorruptCredential { message } => {
            error!(%message, "stored admin credential cannot be verified");
            Error::internal("admin credential cannot be verified")
        }
    }
}

/// Outcome, audit action and audit details for a decision.
fn classify(
    admin_id: AdminId,
    decision: Option<LoginDecision>,
) -> (AdminLoginOutcome, AdminAction, Value) {
    match decision {
        None => (
            AdminLoginOutcome::InvalidCredentials,
            AdminAction::AdminLoginFailed,
            json!({ "adminId": admin_id, "reason": "unknown_admin" }),
        ),
        Some(LoginDecision::Success) => (
            AdminLoginOutcome::Success,
            AdminAction::AdminLoginSuccess,
            json!({ "adminId": admin_id }),
        ),
        Some(LoginDecision::Rejected { failed_attempts }) => (
            AdminLoginOutcome::InvalidCredentials,
            AdminAction::AdminLoginFailed,
            json!({ "adminId": admin_id, "failedAttempts": failed_attempts }),
        ),
        Some(LoginDecision::LockedOut { until }) => (
            AdminLoginOutcome::InvalidCredentials,
            AdminAction::AdminLockedOut,
            json!({ "adminId": admin_id, "lockedUntil": until }),
        ),
        Some(LoginDecision::Locked { until }) => (
            AdminLoginOutcome::Locked { retry_after: until },
            AdminAction::AdminLoginLocked,
            json!({ "adminId": admin_id, "lockedUntil": until }),
        ),
    }
}

impl<A, L> AdminAuthService<A, L>
where
    L: AdminAuditLog,
{
    async fn append_audit(&self, entry: AdminAuditEntry) {
        if let Err(err) = self.audit_log.append(&entry).await {
            error!(
                action = %entry.action,
                error = %err,
                "failed to append admin audit entry"
            );
        }
    }
}

#[async_trait]
impl<A, L> AdminLoginService for AdminAuthService<A, L>
where
    A: AdminRepository,
    L: AdminAuditLog,
{
    async fn authenticate(
        &self,
        credentials: &AdminCredentials,
        ip_address: Option<String>,
    ) -> Result<AdminLoginOutcome, Error> {
        let admin_id = credentials.admin_id();
        let now = self.clock.utc();
        let decision = self
            .admins
            .evaluate_login(&admin_id, credentials.password(), self.policy, now)
            .await
            .map_err(map_admin_repository_error)?;

        let (outcome, action, details) = classify(admin_id, decision);
        match action {
            AdminAction::AdminLockedOut => {
                warn!(%admin_id, "admin account locked after repeated failures");
            }
            AdminAction::AdminLoginSuccess => info!(%admin_id, "admin logged in"),
            AdminAction::AdminLoginFailed | AdminAction::AdminLoginLocked => {
                info!(%admin_id, %action, "admin login refused");
            }
        }

        self.append_audit(AdminAuditEntry::new(action, Some(details), ip_address, now))
            .await;
        Ok(outcome)
    }
}

#[cfg(test)]
#[path = "admin_auth_tests.rs"]
mod tests;

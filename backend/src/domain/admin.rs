//! Admin accounts and the login lockout state machine.
//!
//! An account is `Open` until `threshold` consecutive failed logins, then
//! `LockedUntil(t)`. While locked every login is refused without checking
//! the password. The failure counter stays at the threshold for the whole
//! lock; once `t` has passed the account reopens and the counter is cleared.

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use uuid::Uuid;

use super::password::{PasswordDigest, PasswordDigestError};

/// Default consecutive failures before an account locks.
pub const DEFAULT_LOCKOUT_THRESHOLD: u32 = 5;
/// Default lock duration in minutes.
pub const DEFAULT_LOCKOUT_MINUTES: i64 = 15;

/// Validation errors for admin identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdminValidationError {
    #[error("admin id must be a valid UUID")]
    InvalidId,
}

/// Stable admin identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdminId(Uuid);

impl AdminId {
    pub fn new(id: impl AsRef<str>) -> Result<Self, AdminValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| AdminValidationError::InvalidId)
    }

    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AdminId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// How many failures lock an account, and for how long.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutPolicy {
    threshold: u32,
    duration: Duration,
}

impl LockoutPolicy {
    /// Build a policy; a zero threshold is raised to one.
    pub fn new(threshold: u32, duration: Duration) -> Self {
        Self {
            threshold: threshold.max(1),
            duration,
        }
    }

    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Default for LockoutPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_LOCKOUT_THRESHOLD,
            Duration::minutes(DEFAULT_LOCKOUT_MINUTES),
        )
    }
}

/// Result of evaluating one login against an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginDecision {
    /// Password matched; failures cleared.
    Success,
    /// Password did not match; the failure was counted.
    Rejected { failed_attempts: u32 },
    /// Password did not match and the account is now locked.
    LockedOut { until: DateTime<Utc> },
    /// The account was already locked; nothing was evaluated.
    Locked { until: DateTime<Utc> },
}

impl LoginDecision {
    /// Whether the account row changed and must be written back.
    pub fn mutates_account(self) -> bool {
        !matches!(self, Self::Locked { .. })
    }
}

/// Persisted admin account.
#[derive(Debug, Clone, PartialEq)]
pub struct Admin {
    id: AdminId,
    password: PasswordDigest,
    failed_attempts: u32,
    locked_until: Option<DateTime<Utc>>,
}

impl Admin {
    pub fn new(
        id: AdminId,
        password: PasswordDigest,
        failed_attempts: u32,
        locked_until: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            id,
            password,
            failed_attempts,
            locked_until,
        }
    }

    pub fn id(&self) -> AdminId {
        self.id
    }

    pub fn password(&self) -> &PasswordDigest {
        &self.password
    }

    pub fn failed_attempts(&self) -> u32 {
        self.failed_attempts
    }

    pub fn locked_until(&self) -> Option<DateTime<Utc>> {
        self.locked_until
    }

    /// Run one login through the lockout state machine.
    ///
    /// Mutates the failure counter and lock in place; callers persist the
    /// account when [`LoginDecision::mutates_account`] is true. A digest that
    /// cannot be read is returned as an error and leaves the account as it
    /// was after any expired lock was cleared.
    pub fn authenticate(
        &mut self,
        candidate: &str,
        now: DateTime<Utc>,
        policy: LockoutPolicy,
    ) -> Result<LoginDecision, PasswordDigestError> {
        if let Some(until) = self.locked_until {
            if until > now {
                return Ok(LoginDecision::Locked { until });
            }
            self.locked_until = None;
            self.failed_attempts = 0;
        }

        if self.password.verify(candidate)? {
            self.failed_attempts = 0;
            return Ok(LoginDecision::Success);
        }

        let failed = self.failed_attempts.saturating_add(1);
        if failed >= policy.threshold() {
            let until = now + policy.duration();
            self.locked_until = Some(until);
            self.failed_attempts = failed;
            return Ok(LoginDecision::LockedOut { until });
        }
        self.failed_attempts = failed;
        Ok(LoginDecision::Rejected {
            failed_attempts: failed,
        })
    }
}

/// Audit actions written for admin logins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdminAction {
    AdminLoginSuccess,
    AdminLoginFailed,
    AdminLoginLocked,
    AdminLockedOut,
}

impl AdminAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AdminLoginSuccess => "admin_login_success",
            Self::AdminLoginFailed => "admin_login_failed",
            Self::AdminLoginLocked => "admin_login_locked",
            Self::AdminLockedOut => "admin_locked_out",
        }
    }
}

impl fmt::Display for AdminAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Append-only audit record.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminAuditEntry {
    pub id: Uuid,
    pub action: AdminAction,
    pub details: Option<Value>,
    pub ip_address: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl AdminAuditEntry {
    pub fn new(
        action: AdminAction,
        details: Option<Value>,
        ip_address: Option<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            action,
            details,
            ip_address,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for the lockout state machine.
    use super::*;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    const PASSWORD: &str = "open sesame";

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn policy() -> LockoutPolicy {
        LockoutPolicy::new(3, Duration::minutes(15))
    }

    #[fixture]
    fn admin() -> Admin {
        let digest = PasswordDigest::hash(PASSWORD).expect("hash");
        Admin::new(AdminId::random(), digest, 0, None)
    }

    #[rstest]
    fn correct_password_succeeds_and_clears_failures(
        mut admin: Admin,
        now: DateTime<Utc>,
        policy: LockoutPolicy,
    ) {
        admin
            .authenticate("nope", now, policy)
            .expect("verify");
        let decision = admin.authenticate(PASSWORD, now, policy).expect("verify");

        assert_eq!(decision, LoginDecision::Success);
        assert_eq!(admin.failed_attempts(), 0);
        assert_eq!(admin.locked_until(), None);
    }

    #[rstest]
    fn threshold_failures_lock_and_keep_counter(
        mut admin: Admin,
        now: DateTime<Utc>,
        policy: LockoutPolicy,
    ) {
        assert_eq!(
            admin.authenticate("a", now, policy).expect("verify"),
            LoginDecision::Rejected { failed_attempts: 1 }
        );
        assert_eq!(
            admin.authenticate("b", now, policy).expect("verify"),
            LoginDecision::Rejected { failed_attempts: 2 }
        );
        let until = now + Duration::minutes(15);
        assert_eq!(
            admin.authenticate("c", now, policy).expect("verify"),
            LoginDecision::LockedOut { until }
        );
        assert_eq!(admin.failed_attempts(), 3);
        assert_eq!(admin.locked_until(), Some(until));
    }

    #[rstest]
    fn success_after_lock_expiry_clears_counter(
        mut admin: Admin,
        now: DateTime<Utc>,
        policy: LockoutPolicy,
    ) {
        for candidate in ["a", "b", "c"] {
            admin.authenticate(candidate, now, policy).expect("verify");
        }
        let during = now + Duration::minutes(5);
        assert!(matches!(
            admin.authenticate(PASSWORD, during, policy).expect("no verify"),
            LoginDecision::Locked { .. }
        ));
        assert_eq!(admin.failed_attempts(), 3);

        let after = now + Duration::minutes(15);
        let decision = admin.authenticate(PASSWORD, after, policy).expect("verify");

        assert_eq!(decision, LoginDecision::Success);
        assert_eq!(admin.failed_attempts(), 0);
        assert_eq!(admin.locked_until(), None);
    }

    #[rstest]
    fn locked_account_refuses_even_correct_password(
        mut admin: Admin,
        now: DateTime<Utc>,
        policy: LockoutPolicy,
    ) {
        let until = now + Duration::minutes(5);
        admin.locked_until = Some(until);
        admin.failed_attempts = 2;

        let decision = admin.authenticate(PASSWORD, now, policy).expect("no verify");

        assert_eq!(decision, LoginDecision::Locked { until });
        assert!(!decision.mutates_account());
        assert_eq!(admin.failed_attempts(), 2);
    }

    #[rstest]
    fn expired_lock_reopens_with_clean_counter(
        mut admin: Admin,
        now: DateTime<Utc>,
        policy: LockoutPolicy,
    ) {
        admin.locked_until = Some(now - Duration::seconds(1));
        admin.failed_attempts = 3;

        let decision = admin.authenticate("wrong", now, policy).expect("verify");

        assert_eq!(decision, LoginDecision::Rejected { failed_attempts: 1 });
        assert_eq!(admin.locked_until(), None);
    }

    #[rstest]
    fn lock_ending_exactly_now_has_expired(
        mut admin: Admin,
        now: DateTime<Utc>,
        policy: LockoutPolicy,
    ) {
        admin.locked_until = Some(now);
        let decision = admin.authenticate(PASSWORD, now, policy).expect("verify");
        assert_eq!(decision, LoginDecision::Success);
    }

    #[rstest]
    fn zero_threshold_is_clamped() {
        let policy = LockoutPolicy::new(0, Duration::minutes(1));
        assert_eq!(policy.threshold(), 1);
    }

    #[rstest]
    #[case(AdminAction::AdminLoginSuccess, "admin_login_success")]
    #[case(AdminAction::AdminLoginFailed, "admin_login_failed")]
    #[case(AdminAction::AdminLoginLocked, "admin_login_locked")]
    #[case(AdminAction::AdminLockedOut, "admin_locked_out")]
    fn audit_actions_have_stable_names(#[case] action: AdminAction, #[case] expected: &str) {
        assert_eq!(action.as_str(), expected);
        assert_eq!(
            serde_json::to_value(action).expect("serialise"),
            serde_json::Value::String(expected.to_owned())
        );
    }
}

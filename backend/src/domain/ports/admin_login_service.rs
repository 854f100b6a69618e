//! Driving port for admin authentication.
//!
//! Inbound adapters authenticate credentials through this port without
//! knowing how lockout state is stored, which keeps handler tests free of
//! persistence wiring.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AdminCredentials, Error};

/// Outcome of an admin login.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminLoginOutcome {
    Success,
    /// Unknown admin or wrong password.
    InvalidCredentials,
    /// The account is locked until `retry_after`.
    Locked { retry_after: DateTime<Utc> },
}

/// Domain use-case port for admin authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AdminLoginService: Send + Sync {
    /// Authenticate `credentials`, recording `ip_address` in the audit log.
    async fn authenticate(
        &self,
        credentials: &AdminCredentials,
        ip_address: Option<String>,
    ) -> Result<AdminLoginOutcome, Error>;
}

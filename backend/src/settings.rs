//! Server configuration loaded via OrthoConfig.
//!
//! Values layer from configuration files, `PROMO_*` environment variables
//! and command-line flags. Every field is optional; accessors fall back to
//! the defaults below and reject values the game cannot run with.

use std::net::SocketAddr;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{DEFAULT_LOCKOUT_MINUTES, DEFAULT_LOCKOUT_THRESHOLD, LockoutPolicy};
use crate::outbound::persistence::PoolConfig;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_POOL_CONNECTION_TIMEOUT_SECS: u64 = 30;
const DEFAULT_STATEMENT_TIMEOUT_MS: u64 = 5_000;

/// Configuration values rejected at startup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("bind address {value:?} is not a socket address")]
    InvalidBindAddr { value: String },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
}

/// Runtime configuration for the HTTP server.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PROMO")]
pub struct ServerSettings {
    /// PostgreSQL URL. The in-memory store is used when absent.
    pub database_url: Option<String>,
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Maximum pooled database connections.
    pub pool_max_size: Option<u32>,
    /// Seconds to wait for a pooled connection.
    pub pool_connection_timeout_secs: Option<u64>,
    /// Statement and lock timeout applied to every game transaction.
    pub statement_timeout_ms: Option<u64>,
    /// Consecutive wrong passwords before an admin is locked.
    pub admin_lockout_threshold: Option<u32>,
    /// Minutes an admin stays locked.
    pub admin_lockout_minutes: Option<i64>,
}

fn non_zero<T: Default + PartialEq>(value: T, field: &'static str) -> Result<T, SettingsError> {
    if value == T::default() {
        return Err(SettingsError::Zero { field });
    }
    Ok(value)
}

impl ServerSettings {
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
        })
    }

    pub fn statement_timeout(&self) -> Result<Duration, SettingsError> {
        let millis = self
            .statement_timeout_ms
            .unwrap_or(DEFAULT_STATEMENT_TIMEOUT_MS);
        non_zero(millis, "statement_timeout_ms").map(Duration::from_millis)
    }

    /// Pool configuration, when a database is configured.
    pub fn pool_config(&self) -> Result<Option<PoolConfig>, SettingsError> {
        let Some(url) = self.database_url.as_deref().filter(|url| !url.trim().is_empty()) else {
            return Ok(None);
        };
        let max_size = non_zero(
            self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE),
            "pool_max_size",
        )?;
        let connection_timeout = non_zero(
            self.pool_connection_timeout_secs
                .unwrap_or(DEFAULT_POOL_CONNECTION_TIMEOUT_SECS),
            "pool_connection_timeout_secs",
        )?;
        Ok(Some(
            PoolConfig::new(url)
                .with_max_size(max_size)
                .with_min_idle(Some(max_size.min(2)))
                .with_connection_timeout(Duration::from_secs(connection_timeout))
                .with_statement_timeout(self.statement_timeout()?),
        ))
    }

    pub fn lockout_policy(&self) -> Result<LockoutPolicy, SettingsError> {
        let threshold = non_zero(
            self.admin_lockout_threshold
                .unwrap_or(DEFAULT_LOCKOUT_THRESHOLD),
            "admin_lockout_threshold",
        )?;
        let minutes = self.admin_lockout_minutes.unwrap_or(DEFAULT_LOCKOUT_MINUTES);
        if minutes <= 0 {
            return Err(SettingsError::Zero {
                field: "admin_lockout_minutes",
            });
        }
        Ok(LockoutPolicy::new(
            threshold,
            chrono::Duration::minutes(minutes),
        ))
    }

    /// Check every derived value once so startup fails early.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.bind_addr()?;
        self.statement_timeout()?;
        self.pool_config()?;
        self.lockout_policy()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for server configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "PROMO_DATABASE_URL",
        "PROMO_BIND_ADDR",
        "PROMO_POOL_MAX_SIZE",
        "PROMO_POOL_CONNECTION_TIMEOUT_SECS",
        "PROMO_STATEMENT_TIMEOUT_MS",
        "PROMO_ADMIN_LOCKOUT_THRESHOLD",
        "PROMO_ADMIN_LOCKOUT_MINUTES",
    ];

    fn load_from_empty_args() -> ServerSettings {
        ServerSettings::load_from_iter([OsString::from("promo-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_addr(),
            Ok(DEFAULT_BIND_ADDR.parse().expect("default addr"))
        );
        assert_eq!(settings.pool_config(), Ok(None));
        assert_eq!(
            settings.statement_timeout(),
            Ok(Duration::from_millis(DEFAULT_STATEMENT_TIMEOUT_MS))
        );
        assert_eq!(settings.lockout_policy(), Ok(LockoutPolicy::default()));
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("PROMO_DATABASE_URL", Some("postgres://localhost/promo".to_owned())),
            ("PROMO_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            ("PROMO_POOL_MAX_SIZE", Some("4".to_owned())),
            ("PROMO_POOL_CONNECTION_TIMEOUT_SECS", Some("2".to_owned())),
            ("PROMO_STATEMENT_TIMEOUT_MS", Some("750".to_owned())),
            ("PROMO_ADMIN_LOCKOUT_THRESHOLD", Some("3".to_owned())),
            ("PROMO_ADMIN_LOCKOUT_MINUTES", Some("30".to_owned())),
        ]);

        let settings = load_from_empty_args();
        let pool = settings
            .pool_config()
            .expect("valid pool")
            .expect("database configured");
        assert_eq!(pool.database_url(), "postgres://localhost/promo");
        assert_eq!(
            settings.bind_addr(),
            Ok("127.0.0.1:9000".parse().expect("addr"))
        );
        assert_eq!(settings.statement_timeout(), Ok(Duration::from_millis(750)));
        assert_eq!(
            settings.lockout_policy(),
            Ok(LockoutPolicy::new(3, chrono::Duration::minutes(30)))
        );
    }

    #[rstest]
    #[case::threshold(ServerSettings { admin_lockout_threshold: Some(0), ..ServerSettings::default() })]
    #[case::minutes(ServerSettings { admin_lockout_minutes: Some(0), ..ServerSettings::default() })]
    #[case::statement(ServerSettings { statement_timeout_ms: Some(0), ..ServerSettings::default() })]
    #[case::pool(ServerSettings {
        database_url: Some("postgres://localhost/promo".to_owned()),
        pool_max_size: Some(0),
        ..ServerSettings::default()
    })]
    #[case::bind(ServerSettings { bind_addr: Some("localhost".to_owned()), ..ServerSettings::default() })]
    fn unusable_values_are_rejected(#[case] settings: ServerSettings) {
        assert!(settings.validate().is_err());
    }
}

//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driving ports (`PlayerDirectory`, `AttemptLedger`, `AdminLoginService`,
//! `GameSettingsQuery`) are called by inbound adapters. Driven ports
//! (repositories and the audit log) are implemented by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod admin_audit_log;
mod admin_login_service;
mod admin_repository;
mod attempt_ledger;
mod game_settings_query;
mod game_settings_repository;
mod player_directory;
mod player_repository;

#[cfg(test)]
pub use admin_audit_log::MockAdminAuditLog;
pub use admin_audit_log::{AdminAuditLog, AdminAuditLogError};
#[cfg(test)]
pub use admin_login_service::MockAdminLoginService;
pub use admin_login_service::{AdminLoginOutcome, AdminLoginService};
#[cfg(test)]
pub use admin_repository::MockAdminRepository;
pub use admin_repository::{AdminRepository, AdminRepositoryError};
#[cfg(test)]
pub use attempt_ledger::MockAttemptLedger;
pub use attempt_ledger::{AttemptLedger, AttemptOutcome};
#[cfg(test)]
pub use game_settings_query::MockGameSettingsQuery;
pub use game_settings_query::GameSettingsQuery;
#[cfg(test)]
pub use game_settings_repository::MockGameSettingsRepository;
pub use game_settings_repository::{GameSettingsRepository, GameSettingsRepositoryError};
#[cfg(test)]
pub use player_directory::MockPlayerDirectory;
pub use player_directory::{LookupOutcome, PlayerDirectory, RegistrationOutcome};
#[cfg(test)]
pub use player_repository::MockPlayerRepository;
pub use player_repository::{AttemptWrite, PlayerRepository, PlayerRepositoryError};

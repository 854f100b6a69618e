//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repositories are thin adapters over `diesel-async` connections drawn from
//! a `bb8` pool. Every game write runs in a single transaction that locks the
//! rows it mutates, with local statement and lock timeouts applied first.
//!
//! # Example
//!
//! ```ignore
//! use promo_backend::outbound::persistence::{DbPool, DieselPlayerRepository, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/promo");
//! let pool = DbPool::new(config).await?;
//! let players = DieselPlayerRepository::new(pool);
//! ```

mod diesel_admin_audit_log;
mod diesel_admin_repository;
mod diesel_game_settings_repository;
pub(crate) mod diesel_helpers;
mod diesel_player_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_admin_audit_log::DieselAdminAuditLog;
pub use diesel_admin_repository::DieselAdminRepository;
pub use diesel_game_settings_repository::DieselGameSettingsRepository;
pub use diesel_player_repository::DieselPlayerRepository;
pub use migrations::{MigrationError, run_pending_migrations, run_pending_migrations_async};
pub use pool::{DbPool, PoolConfig, PoolError};

//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories using Diesel ORM
//! - **memory**: process-local store used when no database is configured and
//!   by the test suites
//!
//! Adapters translate between domain types and storage representations. Game
//! rules stay in the domain; adapters only guarantee atomicity.

pub mod memory;
pub mod persistence;

//! HTTP server configuration object.

use std::net::SocketAddr;

use promo_backend::domain::LockoutPolicy;
use promo_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) lockout: LockoutPolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(bind_addr: SocketAddr, lockout: LockoutPolicy) -> Self {
        Self {
            bind_addr,
            lockout,
            db_pool: None,
        }
    }

    /// Attach a database connection pool; without one the in-memory store
    /// backs every port.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }
}

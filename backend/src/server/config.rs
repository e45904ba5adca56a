//! What the bootstrap hands to [`super::create_server`].

use std::net::SocketAddr;

use rbac_api::outbound::persistence::DbPool;

/// Listener address, database pool and optional features of the server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
    pub(crate) swagger_ui: bool,
}

impl ServerConfig {
    /// Serve on `bind_addr` with repositories backed by `db_pool`.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self {
            bind_addr,
            db_pool,
            swagger_ui: cfg!(debug_assertions),
        }
    }

    /// Toggle Swagger UI at `/docs`. Release builds never serve it.
    #[must_use]
    pub fn with_swagger_ui(self, enabled: bool) -> Self {
        Self {
            swagger_ui: enabled && cfg!(debug_assertions),
            ..self
        }
    }
}

//! Builds the HTTP state from the configured user store.

use std::sync::Arc;

use actix_web::web;
use tracing::warn;

use backend::domain::UserService;
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryUserRepository;
use backend::outbound::persistence::DieselUserRepository;
use backend::outbound::security::Argon2PasswordHasher;

use super::ServerConfig;

/// Wire the user service over PostgreSQL when a pool is configured, otherwise
/// over an in-memory store that is lost on restart.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let hasher = Arc::new(Argon2PasswordHasher::new());
    let state = match &config.db_pool {
        Some(pool) => HttpState::from_service(Arc::new(UserService::new(
            Arc::new(DieselUserRepository::new(pool.clone())),
            hasher,
        ))),
        None => {
            warn!("no database configured; users are stored in memory");
            HttpState::from_service(Arc::new(UserService::new(
                Arc::new(InMemoryUserRepository::new()),
                hasher,
            )))
        }
    };
    web::Data::new(state)
}

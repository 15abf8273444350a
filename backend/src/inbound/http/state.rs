//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{LoginService, UserCommand, UserProfileQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub users: Arc<dyn UserCommand>,
    pub profile: Arc<dyn UserProfileQuery>,
}

impl HttpState {
    /// Construct state from individual port implementations.
    pub fn new(
        login: Arc<dyn LoginService>,
        users: Arc<dyn UserCommand>,
        profile: Arc<dyn UserProfileQuery>,
    ) -> Self {
        Self {
            login,
            users,
            profile,
        }
    }

    /// Construct state from one service implementing every user port.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use backend::domain::UserService;
    /// use backend::inbound::http::state::HttpState;
    /// use backend::outbound::memory::InMemoryUserRepository;
    /// use backend::outbound::security::Argon2PasswordHasher;
    ///
    /// let service = UserService::new(
    ///     Arc::new(InMemoryUserRepository::new()),
    ///     Arc::new(Argon2PasswordHasher::new()),
    /// );
    /// let state = HttpState::from_service(Arc::new(service));
    /// let _users = state.users.clone();
    /// ```
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: LoginService + UserCommand + UserProfileQuery + 'static,
    {
        Self {
            login: service.clone(),
            users: service.clone(),
            profile: service,
        }
    }
}

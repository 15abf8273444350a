//! Port through which the form reaches the user service.

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::model::{UserPayload, UserProfile};

/// Create, update, and read users on the service.
///
/// [`crate::ApiUserGateway`] talks HTTP; tests substitute a mock.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserGateway: Send + Sync {
    /// Register a new user.
    async fn create(&self, payload: &UserPayload) -> Result<(), GatewayError>;

    /// Update the user with the given id.
    async fn update(&self, id: &str, payload: &UserPayload) -> Result<(), GatewayError>;

    /// Fetch the signed-in user's profile.
    async fn current_profile(&self) -> Result<UserProfile, GatewayError>;
}

//! Driving port for reading the signed-in user's profile.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Use-case port backing `GET /auth/profile`.
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Fetch the user for an authenticated session; `NotFound` if it vanished.
    async fn fetch_profile(&self, id: &UserId) -> Result<User, Error>;
}

//! Driving port for registration and profile updates.

use async_trait::async_trait;

use crate::domain::{Error, UserCandidate, UserId};

/// Use-case port for creating and updating users.
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Register a new user and return its server-assigned id.
    ///
    /// Fails with `Conflict` when the login is taken and with
    /// `InvalidRequest` when the candidate carries no password.
    async fn create(&self, candidate: UserCandidate) -> Result<UserId, Error>;

    /// Update the user keyed by `id`.
    ///
    /// Fails with `Conflict` when a different user holds the login and with
    /// `NotFound` when `id` is unknown. A candidate without a password keeps
    /// the stored hash.
    async fn update(&self, id: &UserId, candidate: UserCandidate) -> Result<(), Error>;
}

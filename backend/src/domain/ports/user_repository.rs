//! Port abstraction for user persistence adapters and their errors.
//!
//! Login uniqueness is the adapter's responsibility: `insert` and `update`
//! must fail with [`UserPersistenceError::DuplicateLogin`] atomically rather
//! than relying on callers to look the login up first.

use async_trait::async_trait;

use crate::domain::{Login, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// Another user already holds the login.
        DuplicateLogin { login: String } => "login {login} is already taken",
        /// No user exists with the identifier being updated.
        NotFound { id: String } => "user {id} does not exist",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user; fails with `DuplicateLogin` if the login is taken.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Replace every mutable field of an existing user keyed by id.
    ///
    /// Fails with `DuplicateLogin` when a different user holds the new login
    /// and with `NotFound` when the id is unknown. A failed update leaves the
    /// stored record untouched.
    async fn update(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by login.
    async fn find_by_login(&self, login: &Login) -> Result<Option<User>, UserPersistenceError>;
}

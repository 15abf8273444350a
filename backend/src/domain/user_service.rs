//! Registration, profile update, profile lookup, and login use-cases.
//!
//! The service hashes passwords and translates repository failures into
//! domain errors. Login uniqueness is delegated to the repository, which must
//! reject duplicates atomically; the service never pre-checks it.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tokio::task;
use tracing::{error, info, warn};
use zeroize::Zeroizing;

use crate::domain::ports::{
    LoginService, PasswordHashError, PasswordHasher, UserCommand, UserPersistenceError,
    UserProfileQuery, UserRepository,
};
use crate::domain::{
    Error, Login, LoginCredentials, Password, PasswordHash, User, UserCandidate, UserId,
};

/// Message returned when a login collides with an existing user.
pub const LOGIN_TAKEN_MESSAGE: &str = "login is already taken";

/// User service implementing the user driving ports.
#[derive(Clone)]
pub struct UserService<R, H> {
    users: Arc<R>,
    hasher: Arc<H>,
}

impl<R, H> UserService<R, H> {
    /// Create a new service over a repository and a password hasher.
    pub fn new(users: Arc<R>, hasher: Arc<H>) -> Self {
        Self { users, hasher }
    }
}

impl<R, H> UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    fn map_persistence_error(error: UserPersistenceError) -> Error {
        match error {
            UserPersistenceError::DuplicateLogin { login } => Error::conflict(LOGIN_TAKEN_MESSAGE)
                .with_details(json!({
                    "field": "login",
                    "value": login,
                    "code": "login_taken",
                })),
            UserPersistenceError::NotFound { .. } => Error::not_found("user not found"),
            UserPersistenceError::Connection { message } => {
                Error::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                Error::internal(format!("user repository error: {message}"))
            }
        }
    }

    fn missing_password() -> Error {
        Error::invalid_request("password is required").with_details(json!({
            "field": "password",
            "code": "missing_field",
        }))
    }

    /// Hash on the blocking pool; Argon2 would otherwise stall the worker.
    async fn hash_password(&self, password: Password) -> Result<PasswordHash, Error> {
        let hasher = Arc::clone(&self.hasher);
        task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| {
                error!(error = %err, "password hashing task failed");
                Error::internal("password hashing failed")
            })?
            .map_err(|err: PasswordHashError| {
                error!(error = %err, "password hashing failed");
                Error::internal(format!("password hashing failed: {err}"))
            })
    }

    async fn verify_password(&self, user: &User, candidate: &str) -> Result<bool, Error> {
        let hasher = Arc::clone(&self.hasher);
        let candidate = Zeroizing::new(candidate.to_owned());
        let stored = user.password_hash().clone();
        task::spawn_blocking(move || hasher.verify(&candidate, &stored))
            .await
            .map_err(|err| {
                error!(user_id = %user.id(), error = %err, "password verification task failed");
                Error::internal("password verification failed")
            })?
            .map_err(|err| {
                error!(user_id = %user.id(), error = %err, "stored password hash unusable");
                Error::internal(format!("password verification failed: {err}"))
            })
    }
}

#[async_trait]
impl<R, H> UserCommand for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn create(&self, candidate: UserCandidate) -> Result<UserId, Error> {
        let UserCandidate {
            login,
            password,
            profile,
        } = candidate;
        let password = password.ok_or_else(Self::missing_password)?;
        let password_hash = self.hash_password(password).await?;
        let user = User::new(UserId::random(), login, password_hash, profile);

        self.users.insert(&user).await.map_err(|err| {
            match &err {
                UserPersistenceError::DuplicateLogin { login } => {
                    info!(%login, "registration rejected: login taken");
                }
                other => error!(error = %other, "failed to persist new user"),
            }
            Self::map_persistence_error(err)
        })?;

        info!(user_id = %user.id(), login = %user.login(), "user registered");
        Ok(*user.id())
    }

    async fn update(&self, id: &UserId, candidate: UserCandidate) -> Result<(), Error> {
        let existing = self
            .users
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| Error::not_found("user not found"))?;

        let UserCandidate {
            login,
            password,
            profile,
        } = candidate;
        let password_hash = match password {
            Some(password) => Some(self.hash_password(password).await?),
            None => None,
        };
        let rotated = password_hash.is_some();
        let updated = existing.with_changes(login, password_hash, profile);

        self.users.update(&updated).await.map_err(|err| {
            match &err {
                UserPersistenceError::DuplicateLogin { login } => {
                    info!(user_id = %id, %login, "profile update rejected: login taken");
                }
                other => error!(user_id = %id, error = %other, "failed to persist user update"),
            }
            Self::map_persistence_error(err)
        })?;

        info!(user_id = %id, password_rotated = rotated, "user updated");
        Ok(())
    }
}

#[async_trait]
impl<R, H> UserProfileQuery for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn fetch_profile(&self, id: &UserId) -> Result<User, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!(user_id = %id, "session refers to a missing user");
                Error::not_found("user not found")
            })
    }
}

#[async_trait]
impl<R, H> LoginService for UserService<R, H>
where
    R: UserRepository,
    H: PasswordHasher + 'static,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        // A login that fails validation cannot belong to any stored user.
        let Ok(login) = Login::new(credentials.login()) else {
            return Err(invalid_credentials());
        };
        let Some(user) = self
            .users
            .find_by_login(&login)
            .await
            .map_err(Self::map_persistence_error)?
        else {
            info!(%login, "login rejected: unknown user");
            return Err(invalid_credentials());
        };

        let matches = self.verify_password(&user, credentials.password()).await?;
        if !matches {
            info!(user_id = %user.id(), "login rejected: wrong password");
            return Err(invalid_credentials());
        }
        Ok(*user.id())
    }
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;

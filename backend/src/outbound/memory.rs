//! In-memory `UserRepository` used when no database is configured.
//!
//! Login uniqueness is checked and applied under a single write lock, so two
//! concurrent registrations for the same login cannot both succeed.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{Login, User, UserId};

/// Process-local user store keyed by id.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<UserId, User>>,
}

impl InMemoryUserRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored user, in no particular order.
    pub async fn snapshot(&self) -> Vec<User> {
        self.users.read().await.values().cloned().collect()
    }
}

fn login_taken_by_other(users: &HashMap<UserId, User>, user: &User) -> bool {
    users
        .values()
        .any(|existing| existing.login() == user.login() && existing.id() != user.id())
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if users.contains_key(user.id()) {
            return Err(UserPersistenceError::query(format!(
                "user id {} already stored",
                user.id()
            )));
        }
        if login_taken_by_other(&users, user) {
            return Err(UserPersistenceError::duplicate_login(user.login().as_ref()));
        }
        users.insert(*user.id(), user.clone());
        debug!(user_id = %user.id(), stored = users.len(), "user inserted in memory");
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), UserPersistenceError> {
        let mut users = self.users.write().await;
        if !users.contains_key(user.id()) {
            return Err(UserPersistenceError::not_found(user.id().to_string()));
        }
        if login_taken_by_other(&users, user) {
            return Err(UserPersistenceError::duplicate_login(user.login().as_ref()));
        }
        users.insert(*user.id(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn find_by_login(&self, login: &Login) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.login() == login)
            .cloned())
    }
}

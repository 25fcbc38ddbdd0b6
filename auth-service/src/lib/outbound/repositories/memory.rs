//! In-memory user store.
//!
//! Keeps users in a `HashMap` keyed by username behind a `tokio::sync::RwLock`.
//! Used when no database is configured and in tests. Nothing survives a restart.
//!
//! Uniqueness is enforced inside `create` while the write lock is held, so two
//! registrations racing past the service's existence checks cannot both insert.
use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<Username, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.username) {
            return Err(UserError::DuplicateUsername(user.username.to_string()));
        }

        if users.values().any(|existing| existing.email == user.email) {
            return Err(UserError::DuplicateEmail(user.email.to_string()));
        }

        users.insert(user.username.clone(), user.clone());

        Ok(user)
    }

    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        Ok(self.users.read().await.get(username).cloned())
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }
}

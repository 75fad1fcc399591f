//! User lookup
//!
//! The `UserStore` trait is the only view the authenticator has of user
//! accounts. `MemoryUserStore` is an in-process implementation.

use std::collections::HashMap;

use async_trait::async_trait;
use log::info;
use tokio::sync::RwLock;

use crate::error::UserStoreError;
use crate::utils::password::{hash_password, verify_password};
use crate::utils::validation::normalize_username;

/// A user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub hashed_password: String,
    pub super_user: bool,
}

impl User {
    /// Creates a user with a lowercased username and a hashed password.
    pub fn new(username: &str, password: &str, super_user: bool) -> Result<Self, UserStoreError> {
        let username = normalize_username(username);
        if username.is_empty() {
            return Err(UserStoreError::EmptyUsername);
        }

        let hashed_password =
            hash_password(password).map_err(|e| UserStoreError::PasswordHash(e.to_string()))?;

        Ok(Self {
            username,
            hashed_password,
            super_user,
        })
    }

    pub fn is_correct_password(&self, password: &str) -> bool {
        verify_password(password, &self.hashed_password)
    }
}

/// Read access to user accounts
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user_by_username(&self, username: &str) -> Result<User, UserStoreError>;
}

/// In-memory user store keyed by lowercased username
#[derive(Default)]
pub struct MemoryUserStore {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create_user(&self, user: User) -> Result<(), UserStoreError> {
        let key = normalize_username(&user.username);
        if key.is_empty() {
            return Err(UserStoreError::EmptyUsername);
        }

        let mut users = self.users.write().await;
        if users.contains_key(&key) {
            return Err(UserStoreError::UserExists(key));
        }

        info!("Created user {} (superuser: {})", user.username, user.super_user);
        users.insert(key, user);
        Ok(())
    }

    pub async fn delete_user(&self, username: &str) -> Result<(), UserStoreError> {
        let key = normalize_username(username);
        match self.users.write().await.remove(&key) {
            Some(_) => Ok(()),
            None => Err(UserStoreError::UserNotFound(key)),
        }
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_user_by_username(&self, username: &str) -> Result<User, UserStoreError> {
        let key = normalize_username(username);
        self.users
            .read()
            .await
            .get(&key)
            .cloned()
            .ok_or(UserStoreError::UserNotFound(key))
    }
}

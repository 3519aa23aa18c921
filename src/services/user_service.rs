//! Domain service for users.
//!
//! A thin façade over [`UserRepository`]: every call is forwarded unchanged.
//! HTTP handlers go through this type and never touch storage directly,
//! which lets tests swap in [`InMemoryUserRepository`](crate::db::InMemoryUserRepository).

use std::sync::Arc;

use crate::db::{RepositoryError, UserRepository};
use crate::models::User;

#[derive(Clone)]
pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    pub async fn list_all_users(&self) -> Result<Vec<User>, RepositoryError> {
        self.repository.list_all().await
    }

    /// Returns an empty user when `username` does not exist.
    pub async fn find_by_username(&self, username: &str) -> Result<User, RepositoryError> {
        self.repository.find(username).await
    }

    pub async fn add_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.repository.add(user).await
    }

    pub async fn update_user(&self, user: &User) -> Result<(), RepositoryError> {
        self.repository.update(user).await
    }

    pub async fn remove_user(&self, username: &str) -> Result<(), RepositoryError> {
        self.repository.remove(username).await
    }
}

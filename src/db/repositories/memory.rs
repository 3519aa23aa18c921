//! In-memory `UserRepository` for tests and ephemeral runs.
//!
//! Mirrors the row-count behaviour of the SQL repository: a duplicate insert
//! or a mutation of a missing user reports zero affected rows.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::user::{RepositoryError, UserRepository};
use crate::models::User;

#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    users: RwLock<BTreeMap<String, User>>,
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a repository pre-populated with `users`; later duplicates win.
    #[must_use]
    pub fn with_users(users: impl IntoIterator<Item = User>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.username.clone(), user))
            .collect();

        Self {
            users: RwLock::new(users),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.users.read().await.values().cloned().collect())
    }

    async fn find(&self, username: &str) -> Result<User, RepositoryError> {
        Ok(self
            .users
            .read()
            .await
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    async fn add(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(RepositoryError::NotInserted { rows: 0 });
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let mut users = self.users.write().await;
        let existing = users
            .get_mut(&user.username)
            .ok_or(RepositoryError::NotUpdated { rows: 0 })?;
        *existing = user.clone();
        Ok(())
    }

    async fn remove(&self, username: &str) -> Result<(), RepositoryError> {
        self.users
            .write()
            .await
            .remove(username)
            .map(|_| ())
            .ok_or(RepositoryError::NotDeleted { rows: 0 })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(username: &str) -> User {
        User {
            username: username.to_string(),
            first_name: "lou".to_string(),
            ..User::default()
        }
    }

    #[tokio::test]
    async fn behaves_like_the_sql_repository_on_misses() {
        let repo = InMemoryUserRepository::with_users([user("test")]);

        assert!(matches!(
            repo.add(&user("test")).await,
            Err(RepositoryError::NotInserted { rows: 0 })
        ));
        assert!(matches!(
            repo.update(&user("ghost")).await,
            Err(RepositoryError::NotUpdated { rows: 0 })
        ));
        assert!(matches!(
            repo.remove("ghost").await,
            Err(RepositoryError::NotDeleted { rows: 0 })
        ));
        assert_eq!(repo.find("ghost").await.unwrap(), User::default());
    }

    #[tokio::test]
    async fn remove_makes_find_return_empty_record() {
        let repo = InMemoryUserRepository::new();
        repo.add(&user("test")).await.unwrap();

        repo.remove("test").await.unwrap();

        assert!(repo.find("test").await.unwrap().is_empty());
        assert!(repo.list_all().await.unwrap().is_empty());
    }
}

use async_trait::async_trait;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QueryOrder,
    Schema, Set,
};
use sea_orm_migration::SchemaManager;
use thiserror::Error;
use tracing::debug;

use crate::entities::users;
use crate::models::User;

/// Errors raised by user storage.
///
/// The row-count variants cover every mutation that did not touch exactly
/// one row. A duplicate insert or a missing user on update/delete surfaces
/// here rather than as a separate conflict or not-found kind.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("user not inserted ({rows} rows affected)")]
    NotInserted { rows: u64 },

    #[error("user not updated ({rows} rows affected)")]
    NotUpdated { rows: u64 },

    #[error("wrong number of rows affected ({rows})")]
    NotDeleted { rows: u64 },

    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl RepositoryError {
    /// True when a mutation was rejected by the one-row rule, as opposed to
    /// the store itself failing.
    #[must_use]
    pub const fn is_violation(&self) -> bool {
        !matches!(self, Self::Database(_))
    }
}

/// Storage contract for users. The service layer only ever sees this trait.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError>;

    /// Returns `User::default()` when no row matches.
    async fn find(&self, username: &str) -> Result<User, RepositoryError>;

    async fn add(&self, user: &User) -> Result<(), RepositoryError>;

    /// Replaces every mutable field of the row keyed by `user.username`.
    async fn update(&self, user: &User) -> Result<(), RepositoryError>;

    async fn remove(&self, username: &str) -> Result<(), RepositoryError>;
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            username: model.username,
            password: model.password,
            first_name: model.first_name,
            last_name: model.last_name,
            email: model.email,
        }
    }
}

impl From<&User> for users::ActiveModel {
    fn from(user: &User) -> Self {
        Self {
            username: Set(user.username.clone()),
            password: Set(user.password.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            email: Set(user.email.clone()),
        }
    }
}

pub struct SeaOrmUserRepository {
    conn: DatabaseConnection,
}

impl SeaOrmUserRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Creates the `users` table if it does not exist yet.
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        let backend = self.conn.get_database_backend();
        let statement = Schema::new(backend)
            .create_table_from_entity(users::Entity)
            .if_not_exists()
            .to_owned();

        self.conn.execute(backend.build(&statement)).await?;
        Ok(())
    }

    pub async fn table_exists(&self) -> Result<bool, RepositoryError> {
        let manager = SchemaManager::new(&self.conn);
        Ok(manager.has_table("users").await?)
    }
}

#[async_trait]
impl UserRepository for SeaOrmUserRepository {
    async fn list_all(&self) -> Result<Vec<User>, RepositoryError> {
        let rows = users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(User::from).collect())
    }

    async fn find(&self, username: &str) -> Result<User, RepositoryError> {
        let row = users::Entity::find_by_id(username.to_owned())
            .one(&self.conn)
            .await?;

        Ok(row.map(User::from).unwrap_or_default())
    }

    async fn add(&self, user: &User) -> Result<(), RepositoryError> {
        // A clashing username inserts nothing instead of raising, so the
        // row count below is the single place duplicates are detected.
        let rows = users::Entity::insert(users::ActiveModel::from(user))
            .on_conflict(
                OnConflict::column(users::Column::Username)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        if rows != 1 {
            return Err(RepositoryError::NotInserted { rows });
        }

        debug!(username = %user.username, "Inserted user");
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), RepositoryError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Password, Expr::value(user.password.clone()))
            .col_expr(users::Column::FirstName, Expr::value(user.first_name.clone()))
            .col_expr(users::Column::LastName, Expr::value(user.last_name.clone()))
            .col_expr(users::Column::Email, Expr::value(user.email.clone()))
            .filter(users::Column::Username.eq(user.username.as_str()))
            .exec(&self.conn)
            .await?;

        if result.rows_affected != 1 {
            return Err(RepositoryError::NotUpdated {
                rows: result.rows_affected,
            });
        }

        debug!(username = %user.username, "Updated user");
        Ok(())
    }

    async fn remove(&self, username: &str) -> Result<(), RepositoryError> {
        let result = users::Entity::delete_many()
            .filter(users::Column::Username.eq(username))
            .exec(&self.conn)
            .await?;

        if result.rows_affected != 1 {
            return Err(RepositoryError::NotDeleted {
                rows: result.rows_affected,
            });
        }

        debug!(username, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Database;

    async fn setup() -> SeaOrmUserRepository {
        let conn = Database::connect("sqlite::memory:")
            .await
            .expect("failed to connect to DB");
        let repo = SeaOrmUserRepository::new(conn);
        repo.ensure_schema()
            .await
            .expect("failed to create user table");
        repo
    }

    fn user(username: &str, first_name: &str, last_name: &str) -> User {
        User {
            username: username.to_string(),
            password: "pwd".to_string(),
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: format!("{username}@mail.com"),
        }
    }

    #[tokio::test]
    async fn add_then_find_returns_the_same_user() {
        let repo = setup().await;
        let created = user("test", "lou", "garwood");

        repo.add(&created).await.unwrap();

        assert_eq!(repo.find("test").await.unwrap(), created);
    }

    #[tokio::test]
    async fn find_missing_user_returns_empty_record() {
        let repo = setup().await;

        let found = repo.find("nobody").await.unwrap();

        assert_eq!(found, User::default());
    }

    #[tokio::test]
    async fn list_all_on_empty_table_is_empty() {
        let repo = setup().await;

        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn list_all_returns_every_row() {
        let repo = setup().await;
        repo.add(&user("b", "brian", "boblan")).await.unwrap();
        repo.add(&user("a", "addison", "garwood")).await.unwrap();

        let names: Vec<String> = repo
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|u| u.username)
            .collect();

        assert_eq!(names, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn remove_then_find_returns_empty_record() {
        let repo = setup().await;
        repo.add(&user("test", "brian", "boblan")).await.unwrap();

        repo.remove("test").await.unwrap();

        assert_eq!(repo.find("test").await.unwrap(), User::default());
    }

    #[tokio::test]
    async fn update_replaces_fields_of_target_row_only() {
        let repo = setup().await;
        let mut target = user("test", "brian", "boblan");
        let other = user("other", "addison", "garwood");
        repo.add(&target).await.unwrap();
        repo.add(&other).await.unwrap();

        target.last_name = "updateski".to_string();
        repo.update(&target).await.unwrap();

        assert_eq!(repo.find("test").await.unwrap().last_name, "updateski");
        assert_eq!(repo.find("other").await.unwrap(), other);
    }

    #[tokio::test]
    async fn duplicate_add_is_rejected_and_leaves_row_intact() {
        let repo = setup().await;
        let original = user("test", "lou", "garwood");
        repo.add(&original).await.unwrap();

        let err = repo
            .add(&user("test", "someone", "else"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::NotInserted { rows: 0 }));
        assert!(err.is_violation());
        assert_eq!(repo.list_all().await.unwrap(), vec![original]);
    }

    #[tokio::test]
    async fn update_of_missing_user_affects_no_rows() {
        let repo = setup().await;

        let err = repo.update(&user("ghost", "g", "h")).await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotUpdated { rows: 0 }));
        assert!(repo.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn remove_of_missing_user_affects_no_rows() {
        let repo = setup().await;
        repo.add(&user("test", "lou", "garwood")).await.unwrap();

        let err = repo.remove("ghost").await.unwrap_err();

        assert!(matches!(err, RepositoryError::NotDeleted { rows: 0 }));
        assert_eq!(err.to_string(), "wrong number of rows affected (0)");
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn ensure_schema_is_idempotent() {
        let conn = Database::connect("sqlite::memory:").await.unwrap();
        let repo = SeaOrmUserRepository::new(conn);

        assert!(!repo.table_exists().await.unwrap());
        repo.ensure_schema().await.unwrap();
        repo.ensure_schema().await.unwrap();
        assert!(repo.table_exists().await.unwrap());
    }
}

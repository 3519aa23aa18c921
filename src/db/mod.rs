use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::config::GeneralConfig;

pub mod migrator;
pub mod repositories;

pub use repositories::{
    InMemoryUserRepository, RepositoryError, SeaOrmUserRepository, UserRepository,
};

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn from_config(config: &GeneralConfig) -> Result<Self> {
        Self::with_pool_options(
            &config.database_path,
            config.max_db_connections,
            config.min_db_connections,
        )
        .await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if let Some(path) = sqlite_file_path(db_url) {
            if let Some(parent) = path.parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !path.exists() {
                std::fs::File::create(path).with_context(|| {
                    format!("Failed to create database file: {}", path.display())
                })?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt)
            .await
            .context("Failed to connect to database")?;

        migrator::Migrator::up(&conn, None)
            .await
            .context("Failed to apply migrations")?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    #[must_use]
    pub fn user_repository(&self) -> SeaOrmUserRepository {
        SeaOrmUserRepository::new(self.conn.clone())
    }
}

/// On-disk path behind a `sqlite:` URL, or `None` for in-memory and
/// non-SQLite URLs.
fn sqlite_file_path(db_url: &str) -> Option<&Path> {
    let rest = db_url.strip_prefix("sqlite:")?;
    let rest = rest.trim_start_matches("//");
    let path = rest.split('?').next().unwrap_or(rest);

    if path.is_empty() || path.contains(":memory:") {
        return None;
    }

    Some(Path::new(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sqlite_file_path_skips_memory_urls() {
        assert_eq!(sqlite_file_path("sqlite::memory:"), None);
        assert_eq!(sqlite_file_path("sqlite://:memory:"), None);
        assert_eq!(sqlite_file_path("postgres://localhost/users"), None);
    }

    #[test]
    fn sqlite_file_path_strips_scheme_and_query() {
        assert_eq!(
            sqlite_file_path("sqlite:data/users.db?mode=rwc"),
            Some(Path::new("data/users.db"))
        );
        assert_eq!(
            sqlite_file_path("sqlite:///tmp/users.db"),
            Some(Path::new("/tmp/users.db"))
        );
    }

    #[tokio::test]
    async fn store_applies_migrations_and_answers_ping() {
        let store = Store::new("sqlite::memory:").await.unwrap();

        store.ping().await.unwrap();
        assert!(store.user_repository().table_exists().await.unwrap());
    }
}

//! SQLite connection pool.
//!
//! A thin wrapper over `sqlx::SqlitePool` that creates the database file on
//! first use and pins in-memory databases to a single connection.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

/// Used when nothing else is configured.
pub const DEFAULT_DATABASE_URL: &str = "sqlite://surveyor.db";

/// Pool-related errors.
#[derive(Debug, thiserror::Error)]
pub enum DbPoolError {
    #[error("Failed to open database: {0}")]
    ConnectFailed(String),

    #[error("Backend error: {0}")]
    Backend(String),

    #[error("Pool configuration error: {0}")]
    Configuration(String),
}

/// SQLite connection pool wrapper.
#[derive(Clone, Debug)]
pub struct SqlitePool {
    inner: sqlx::SqlitePool,
}

impl SqlitePool {
    /// Open (or create) the database at `url`.
    pub async fn connect(url: &str) -> Result<Self, DbPoolError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| DbPoolError::Configuration(e.to_string()))?
            .create_if_missing(true);

        // Every connection to `:memory:` is a separate database, so keep
        // exactly one alive for the lifetime of the pool.
        let pool_options = if is_memory_url(url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new()
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| DbPoolError::ConnectFailed(e.to_string()))?;
        tracing::debug!(url, "Opened SQLite pool");
        Ok(Self { inner: pool })
    }

    /// A private database that disappears with the pool.
    pub async fn in_memory() -> Result<Self, DbPoolError> {
        Self::connect("sqlite::memory:").await
    }

    /// Get the underlying `sqlx::SqlitePool`.
    pub fn inner(&self) -> &sqlx::SqlitePool {
        &self.inner
    }

    pub async fn ping(&self) -> Result<(), DbPoolError> {
        // SQLite has no ping, so run a trivial query
        sqlx::query("SELECT 1")
            .fetch_one(self.inner())
            .await
            .map_err(|e| DbPoolError::Backend(e.to_string()))?;
        Ok(())
    }

    pub async fn close(&self) {
        self.inner.close().await;
    }
}

fn is_memory_url(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_url_detection() {
        assert!(is_memory_url("sqlite::memory:"));
        assert!(is_memory_url("sqlite://file.db?mode=memory"));
        assert!(!is_memory_url(DEFAULT_DATABASE_URL));
    }

    #[tokio::test]
    async fn test_in_memory_pool_pings() {
        let pool = SqlitePool::in_memory().await.unwrap();
        pool.ping().await.unwrap();
        pool.close().await;
        assert!(pool.ping().await.is_err());
    }

    #[tokio::test]
    async fn test_missing_directory_fails_to_open() {
        let err = SqlitePool::connect("sqlite:///surveyor-missing-dir/nested/forms.db")
            .await
            .unwrap_err();
        assert!(matches!(err, DbPoolError::ConnectFailed(_)));
    }
}

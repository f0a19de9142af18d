//! Submission table.
//!
//! ```sql
//! submitted_forms(id INTEGER PRIMARY KEY AUTOINCREMENT,
//!                 answers_json TEXT NOT NULL,
//!                 created_at TEXT NOT NULL)
//! ```
//!
//! `AUTOINCREMENT` keeps ids strictly increasing even after deletes, which is
//! what the newest-first listing orders by.

use crate::pool::{DbPoolError, SqlitePool};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use surveyor_core::answer::AnswerSet;
use surveyor_core::sink::{SinkError, SubmissionFeed, SubmissionRecord, SubmissionSink};
use thiserror::Error;
use tokio::sync::watch;

const CREATE_TABLE: &str = "CREATE TABLE IF NOT EXISTS submitted_forms (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    answers_json TEXT NOT NULL,
    created_at TEXT NOT NULL
)";

const INSERT: &str = "INSERT INTO submitted_forms (answers_json, created_at) VALUES (?, ?)
    RETURNING id, answers_json, created_at";

const SELECT_ALL: &str = "SELECT id, answers_json, created_at FROM submitted_forms ORDER BY id DESC";

type Row = (i64, String, String);

#[derive(Debug, Error)]
pub enum DbError {
    #[error(transparent)]
    Pool(#[from] DbPoolError),

    #[error("Query failed: {0}")]
    Query(#[from] sqlx::Error),

    #[error("Corrupt submission {id}: {reason}")]
    Corrupt { id: i64, reason: String },
}

impl From<DbError> for SinkError {
    fn from(error: DbError) -> Self {
        SinkError::Backend(error.to_string())
    }
}

/// [`SubmissionSink`] backed by a SQLite table.
pub struct SqliteSubmissionStore {
    pool: SqlitePool,
    feed: watch::Sender<Vec<SubmissionRecord>>,
}

impl SqliteSubmissionStore {
    /// Open the database at `url`, create the table if needed and load the
    /// current listing.
    pub async fn connect(url: &str) -> Result<Self, DbError> {
        Self::from_pool(SqlitePool::connect(url).await?).await
    }

    pub async fn from_pool(pool: SqlitePool) -> Result<Self, DbError> {
        sqlx::query(CREATE_TABLE).execute(pool.inner()).await?;
        let records = fetch_all(&pool).await?;
        tracing::info!(submissions = records.len(), "Submission store ready");

        let (feed, _) = watch::channel(records);
        Ok(Self { pool, feed })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn insert(&self, answers: &AnswerSet) -> Result<SubmissionRecord, DbError> {
        let json = answers.to_json().map_err(|e| DbError::Corrupt {
            id: 0,
            reason: e.to_string(),
        })?;
        let created_at = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);

        let row: Row = sqlx::query_as(INSERT)
            .bind(json)
            .bind(created_at)
            .fetch_one(self.pool.inner())
            .await?;
        decode(row)
    }

    /// Re-read the table and push it to subscribers.
    async fn refresh(&self) {
        match fetch_all(&self.pool).await {
            Ok(records) => {
                self.feed.send_replace(records);
            }
            Err(error) => tracing::warn!(%error, "Failed to refresh submission feed"),
        }
    }
}

async fn fetch_all(pool: &SqlitePool) -> Result<Vec<SubmissionRecord>, DbError> {
    let rows: Vec<Row> = sqlx::query_as(SELECT_ALL).fetch_all(pool.inner()).await?;
    rows.into_iter().map(decode).collect()
}

fn decode((id, answers_json, created_at): Row) -> Result<SubmissionRecord, DbError> {
    let corrupt = |reason: String| DbError::Corrupt { id, reason };

    let answers = AnswerSet::from_json(&answers_json).map_err(|e| corrupt(e.to_string()))?;
    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| corrupt(e.to_string()))?
        .with_timezone(&Utc);

    Ok(SubmissionRecord {
        id,
        answers,
        created_at,
    })
}

#[async_trait]
impl SubmissionSink for SqliteSubmissionStore {
    async fn persist(&self, answers: &AnswerSet) -> Result<SubmissionRecord, SinkError> {
        let record = self.insert(answers).await?;
        tracing::debug!(submission = record.id, "Stored submission");
        self.refresh().await;
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<SubmissionRecord>, SinkError> {
        Ok(fetch_all(&self.pool).await?)
    }

    fn subscribe(&self) -> SubmissionFeed {
        self.feed.subscribe()
    }
}

use crate::answer::AnswerSet;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::watch;

/// A finished answer set as stored. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    /// Generated ordinal; later submissions have larger ids.
    pub id: i64,
    pub answers: AnswerSet,
    pub created_at: DateTime<Utc>,
}

/// Live, newest-first listing of every stored submission.
///
/// The receiver always holds the full list; it changes after each persist.
pub type SubmissionFeed = watch::Receiver<Vec<SubmissionRecord>>;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode answers: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("submission store error: {0}")]
    Backend(String),

    #[error("submission store is closed")]
    Closed,
}

/// Append-only store of finished answer sets.
#[async_trait]
pub trait SubmissionSink: Send + Sync + 'static {
    /// Store `answers` under a freshly generated id.
    async fn persist(&self, answers: &AnswerSet) -> Result<SubmissionRecord, SinkError>;

    /// Every stored submission, most recent first.
    async fn list_all(&self) -> Result<Vec<SubmissionRecord>, SinkError>;

    /// Subscribe to the live listing.
    fn subscribe(&self) -> SubmissionFeed;
}

#[async_trait]
impl<T: SubmissionSink + ?Sized> SubmissionSink for Arc<T> {
    async fn persist(&self, answers: &AnswerSet) -> Result<SubmissionRecord, SinkError> {
        (**self).persist(answers).await
    }

    async fn list_all(&self) -> Result<Vec<SubmissionRecord>, SinkError> {
        (**self).list_all().await
    }

    fn subscribe(&self) -> SubmissionFeed {
        (**self).subscribe()
    }
}

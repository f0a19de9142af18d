//! In-process submission store.
//!
//! Records live only as long as the store. Useful for tests and for running a
//! survey without a database.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use surveyor_core::answer::AnswerSet;
use surveyor_core::sink::{SinkError, SubmissionFeed, SubmissionRecord, SubmissionSink};
use tokio::sync::watch;

pub struct MemorySubmissionStore {
    inner: Mutex<Inner>,
    feed: watch::Sender<Vec<SubmissionRecord>>,
}

struct Inner {
    /// Newest first.
    records: Vec<SubmissionRecord>,
    next_id: i64,
}

impl MemorySubmissionStore {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self {
            inner: Mutex::new(Inner {
                records: Vec::new(),
                next_id: 1,
            }),
            feed,
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for MemorySubmissionStore {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemorySubmissionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySubmissionStore")
            .field("record_count", &self.len())
            .finish()
    }
}

#[async_trait]
impl SubmissionSink for MemorySubmissionStore {
    async fn persist(&self, answers: &AnswerSet) -> Result<SubmissionRecord, SinkError> {
        let (record, snapshot) = {
            let mut inner = self.inner.lock();
            let record = SubmissionRecord {
                id: inner.next_id,
                answers: answers.clone(),
                created_at: Utc::now(),
            };
            inner.next_id += 1;
            inner.records.insert(0, record.clone());
            (record, inner.records.clone())
        };

        self.feed.send_replace(snapshot);
        Ok(record)
    }

    async fn list_all(&self) -> Result<Vec<SubmissionRecord>, SinkError> {
        Ok(self.inner.lock().records.clone())
    }

    fn subscribe(&self) -> SubmissionFeed {
        self.feed.subscribe()
    }
}

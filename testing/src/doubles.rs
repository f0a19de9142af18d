use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use surveyor_core::answer::AnswerSet;
use surveyor_core::model::Catalog;
use surveyor_core::sink::{SinkError, SubmissionFeed, SubmissionRecord, SubmissionSink};
use surveyor_core::source::{FormSource, SourceError};
use tokio::sync::watch;

/// One scripted fetch result.
#[derive(Debug, Clone)]
pub enum Fetch {
    Catalog(Catalog),
    /// Fails with `SourceError::Transport(message)`.
    Fail(String),
}

/// A form source that plays back its script in order, then keeps repeating the
/// last entry.
#[derive(Debug)]
pub struct ScriptedSource {
    script: Mutex<VecDeque<Fetch>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    pub fn new(script: impl IntoIterator<Item = Fetch>) -> Self {
        Self {
            script: Mutex::new(script.into_iter().collect()),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn always(catalog: Catalog) -> Self {
        Self::new([Fetch::Catalog(catalog)])
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::new([Fetch::Fail(message.into())])
    }

    /// How many times `fetch` has been called.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FormSource for ScriptedSource {
    async fn fetch(&self) -> Result<Catalog, SourceError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        let next = {
            let mut script = self.script.lock();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };

        match next {
            Some(Fetch::Catalog(catalog)) => Ok(catalog),
            Some(Fetch::Fail(message)) => Err(SourceError::Transport(message)),
            None => Err(SourceError::Transport("script exhausted".to_string())),
        }
    }
}

/// A sink that rejects every write.
#[derive(Debug)]
pub struct FailingSink {
    attempts: AtomicUsize,
    feed: watch::Sender<Vec<SubmissionRecord>>,
}

impl FailingSink {
    pub fn new() -> Self {
        let (feed, _) = watch::channel(Vec::new());
        Self {
            attempts: AtomicUsize::new(0),
            feed,
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Default for FailingSink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubmissionSink for FailingSink {
    async fn persist(&self, _answers: &AnswerSet) -> Result<SubmissionRecord, SinkError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(SinkError::Backend("disk full".to_string()))
    }

    async fn list_all(&self) -> Result<Vec<SubmissionRecord>, SinkError> {
        Ok(Vec::new())
    }

    fn subscribe(&self) -> SubmissionFeed {
        self.feed.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalogs;

    #[tokio::test]
    async fn test_script_repeats_last_entry() {
        let source = ScriptedSource::new([
            Fetch::Fail("offline".into()),
            Fetch::Catalog(catalogs::two_step()),
        ]);

        assert!(source.fetch().await.is_err());
        assert_eq!(source.fetch().await.unwrap().len(), 2);
        assert_eq!(source.fetch().await.unwrap().len(), 2);
        assert_eq!(source.fetch_count(), 3);
    }
}

//! # Session: the form state machine
//!
//! A `FormSession` owns the current [`UiState`] and publishes every transition
//! on a `watch` channel. Each transition reads the whole state and replaces it
//! with a new value; nothing is mutated in place.
//!
//! ```text
//! Loading ──fetch ok──▶ InProgress ──advance/skip──▶ InProgress
//!    │                      │
//!    └──fetch err/empty──▶ Error        └──submit──▶ Submitted ──load──▶ Loading
//! ```
//!
//! Failures never escape as `Err`; they become `UiState::Error`.

use surveyor_core::outcome::Outcome;
use surveyor_core::sink::{SubmissionRecord, SubmissionSink};
use surveyor_core::source::FormSource;
use surveyor_core::state::UiState;
use tokio::sync::watch;
use tracing::Instrument;
use uuid::Uuid;

pub struct FormSession<S, K> {
    source: S,
    sink: K,
    state: watch::Sender<UiState>,
    session_id: Uuid,
    last_submission: Option<SubmissionRecord>,
}

impl<S, K> FormSession<S, K>
where
    S: FormSource,
    K: SubmissionSink,
{
    /// A session in `Loading`. Nothing is fetched until [`FormSession::load`].
    pub fn new(source: S, sink: K) -> Self {
        let (state, _) = watch::channel(UiState::Loading);
        Self {
            source,
            sink,
            state,
            session_id: Uuid::new_v4(),
            last_submission: None,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub fn last_submission(&self) -> Option<&SubmissionRecord> {
        self.last_submission.as_ref()
    }

    /// Start a fresh session: new id, empty answers, one fetch.
    pub async fn load(&mut self) -> UiState {
        self.session_id = Uuid::new_v4();
        let span = tracing::info_span!("session", surveyor.session = %self.session_id);

        async move {
            self.publish(UiState::Loading);

            let next = match self.source.fetch().await {
                Ok(catalog) => {
                    tracing::info!(questions = catalog.len(), "Form fetched");
                    UiState::from_catalog(catalog)
                }
                Err(error) => {
                    tracing::error!(%error, "Error fetching form");
                    UiState::error(error.to_string())
                }
            };

            self.publish(next.clone());
            next
        }
        .instrument(span)
        .await
    }

    /// Record `answer` for `question_id` and follow its `referTo`.
    ///
    /// Ignored unless the form is in progress.
    pub async fn advance(&mut self, question_id: &str, answer: impl Into<String>) -> UiState {
        let current = self.state();
        let Some(progress) = current.progress() else {
            tracing::debug!(state = current.name(), "Advance ignored");
            return current;
        };

        let outcome = progress.advance(question_id, answer);
        let span = self.action_span("advance");
        self.apply(outcome).instrument(span).await
    }

    /// Follow the current question's skip target.
    ///
    /// Ignored unless the form is in progress and the question is skippable.
    pub async fn skip(&mut self) -> UiState {
        let current = self.state();
        let Some(progress) = current.progress() else {
            tracing::debug!(state = current.name(), "Skip ignored");
            return current;
        };

        let outcome = progress.skip();
        let span = self.action_span("skip");
        self.apply(outcome).instrument(span).await
    }

    fn action_span(&self, action: &'static str) -> tracing::Span {
        tracing::info_span!("action", surveyor.session = %self.session_id, surveyor.action = action)
    }

    async fn apply(&mut self, outcome: Outcome) -> UiState {
        let next = match outcome {
            Outcome::Ignored => return self.state(),
            Outcome::Next(progress) => UiState::InProgress(progress),
            Outcome::Submit { answers, reason } => match self.sink.persist(&answers).await {
                Ok(record) => {
                    tracing::info!(
                        submission = record.id,
                        answers = answers.len(),
                        %reason,
                        "Form submitted"
                    );
                    self.last_submission = Some(record);
                    UiState::Submitted
                }
                Err(error) => {
                    tracing::error!(%error, "Failed to persist submission");
                    UiState::error(format!("Failed to save answers: {error}"))
                }
            },
        };

        self.publish(next.clone());
        next
    }

    fn publish(&self, next: UiState) {
        let previous = self.state.send_replace(next);
        tracing::debug!(
            from = previous.name(),
            to = self.state.borrow().name(),
            "State transition"
        );
    }
}

//! Driver - serialized action execution
//!
//! One tokio task owns the [`FormSession`]. User actions arrive over an mpsc
//! channel and run strictly one after another, so the session never sees
//! concurrent mutation and needs no locks.
//!
//! After a submission the driver waits `restart_delay` and starts a new
//! session. Actions that arrive while waiting belong to the finished form and
//! are dropped; an explicit restart cuts the wait short.

use crate::session::FormSession;
use std::time::Duration;
use surveyor_core::sink::SubmissionSink;
use surveyor_core::source::FormSource;
use surveyor_core::state::UiState;
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Delay between a submission and the next session, matching the time the
/// confirmation stays on screen.
pub const DEFAULT_RESTART_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub restart_delay: Duration,
    /// Capacity of the action queue.
    pub action_buffer: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            restart_delay: DEFAULT_RESTART_DELAY,
            action_buffer: 32,
        }
    }
}

impl SessionConfig {
    pub fn with_restart_delay(mut self, delay: Duration) -> Self {
        self.restart_delay = delay;
        self
    }
}

/// A user action, as queued for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Advance { question_id: String, answer: String },
    Skip,
    Restart,
}

#[derive(Debug, Error)]
pub enum DriverError {
    #[error("session driver has stopped")]
    Stopped,
}

/// Client side of a running session.
pub struct SessionHandle {
    actions: mpsc::Sender<Action>,
    state: watch::Receiver<UiState>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn advance(
        &self,
        question_id: impl Into<String>,
        answer: impl Into<String>,
    ) -> Result<(), DriverError> {
        self.send(Action::Advance {
            question_id: question_id.into(),
            answer: answer.into(),
        })
        .await
    }

    pub async fn skip(&self) -> Result<(), DriverError> {
        self.send(Action::Skip).await
    }

    /// Discard the current session and fetch the form again.
    pub async fn restart(&self) -> Result<(), DriverError> {
        self.send(Action::Restart).await
    }

    pub async fn send(&self, action: Action) -> Result<(), DriverError> {
        self.actions
            .send(action)
            .await
            .map_err(|_| DriverError::Stopped)
    }

    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.clone()
    }

    pub fn state(&self) -> UiState {
        self.state.borrow().clone()
    }

    /// Stop accepting actions and wait for the driver task to finish the one
    /// in flight.
    pub async fn shutdown(self) {
        drop(self.actions);
        if let Err(error) = self.task.await {
            tracing::warn!(%error, "Session driver task failed");
        }
    }
}

pub struct SessionDriver;

impl SessionDriver {
    /// Spawn the driver task. The first fetch starts immediately.
    pub fn spawn<S, K>(session: FormSession<S, K>, config: SessionConfig) -> SessionHandle
    where
        S: FormSource,
        K: SubmissionSink,
    {
        let (actions, receiver) = mpsc::channel(config.action_buffer.max(1));
        let state = session.subscribe();
        let task = tokio::spawn(run(session, receiver, config));

        SessionHandle {
            actions,
            state,
            task,
        }
    }
}

async fn run<S, K>(
    mut session: FormSession<S, K>,
    mut actions: mpsc::Receiver<Action>,
    config: SessionConfig,
) where
    S: FormSource,
    K: SubmissionSink,
{
    let mut state = session.load().await;

    loop {
        if state.is_submitted() {
            if !wait_for_restart(&mut actions, config.restart_delay).await {
                break;
            }
            state = session.load().await;
            continue;
        }

        let Some(action) = actions.recv().await else {
            break;
        };

        state = match action {
            Action::Advance {
                question_id,
                answer,
            } => session.advance(&question_id, answer).await,
            Action::Skip => session.skip().await,
            Action::Restart => session.load().await,
        };
    }

    tracing::debug!("Session driver stopped");
}

/// Sleep out the restart delay, dropping stale actions. Returns `false` when
/// every handle is gone.
async fn wait_for_restart(actions: &mut mpsc::Receiver<Action>, delay: Duration) -> bool {
    let deadline = tokio::time::sleep(delay);
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = &mut deadline => return true,
            action = actions.recv() => match action {
                None => return false,
                Some(Action::Restart) => return true,
                Some(stale) => tracing::debug!(?stale, "Dropping action for submitted form"),
            },
        }
    }
}

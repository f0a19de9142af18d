//! `surveyor take`: answer the form in the terminal.

use crate::prompt::{self, Command};
use anyhow::{Context, Result, bail};
use std::io::Write;
use surveyor_core::sink::SubmissionFeed;
use surveyor_core::state::UiState;
use surveyor_core::validation::{INVALID_INPUT_MESSAGE, Readiness, readiness};
use surveyor_runtime::SessionHandle;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

pub const SUBMITTED_MESSAGE: &str = "Form submitted successfully! Restarting...";

/// How a terminal session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exit {
    /// `--once` and the form was submitted.
    Submitted,
    /// `:quit` or end of input.
    Quit,
}

/// Render states from `handle` to `out` and feed typed lines back as actions.
pub async fn drive<R, W>(
    handle: &SessionHandle,
    feed: &SubmissionFeed,
    input: R,
    out: &mut W,
    once: bool,
) -> Result<Exit>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut states = handle.subscribe();
    let mut lines = input.lines();

    loop {
        let state = states.borrow_and_update().clone();
        match state {
            UiState::Loading => writeln!(out, "Loading form...")?,
            UiState::Submitted => {
                writeln!(out)?;
                writeln!(out, "{SUBMITTED_MESSAGE}")?;
                if let Some(latest) = feed.borrow().first() {
                    writeln!(out, "Saved as submission #{}", latest.id)?;
                }
                if once {
                    return Ok(Exit::Submitted);
                }
            }
            UiState::Error(message) => {
                writeln!(out, "Error: {message}")?;
                if once {
                    bail!("{message}");
                }
                write!(out, "Press Enter to retry, {} to exit: ", prompt::QUIT_COMMAND)?;
                out.flush()?;
                match lines.next_line().await? {
                    Some(line) if line.trim() != prompt::QUIT_COMMAND => handle.restart().await?,
                    _ => return Ok(Exit::Quit),
                }
            }
            UiState::InProgress(progress) => {
                let question = progress.current();
                writeln!(
                    out,
                    "{}",
                    prompt::render(question, progress.current_index(), progress.catalog().len())
                )?;

                loop {
                    write!(out, "> ")?;
                    out.flush()?;
                    let Some(line) = lines.next_line().await? else {
                        return Ok(Exit::Quit);
                    };

                    match prompt::parse(question, &line) {
                        Command::Quit => return Ok(Exit::Quit),
                        Command::Skip if !question.can_skip() => {
                            writeln!(out, "This question cannot be skipped.")?;
                        }
                        Command::Skip => {
                            handle.skip().await?;
                            break;
                        }
                        Command::Rejected(reason) => writeln!(out, "{reason}")?,
                        Command::Answer(answer) => match readiness(question, &answer) {
                            Readiness::Ready => {
                                handle.advance(question.id.clone(), answer.finalize()).await?;
                                break;
                            }
                            Readiness::Invalid => writeln!(out, "{INVALID_INPUT_MESSAGE}")?,
                            Readiness::Unanswered => writeln!(out, "An answer is required.")?,
                        },
                    }
                }
            }
        }

        states
            .changed()
            .await
            .context("Session stopped unexpectedly")?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use surveyor_core::sink::SubmissionSink;
    use surveyor_runtime::{FormSession, MemorySubmissionStore, SessionConfig, SessionDriver};
    use surveyor_test::{ScriptedSource, catalogs};

    async fn run(source: ScriptedSource, script: &str, once: bool) -> (Result<Exit>, String, Arc<MemorySubmissionStore>) {
        let store = Arc::new(MemorySubmissionStore::new());
        let feed = store.subscribe();
        let handle = SessionDriver::spawn(
            FormSession::new(source, Arc::clone(&store)),
            SessionConfig::default().with_restart_delay(Duration::from_millis(10)),
        );

        let mut out = Vec::new();
        let exit = drive(&handle, &feed, script.as_bytes(), &mut out, once).await;
        handle.shutdown().await;
        (exit, String::from_utf8(out).unwrap(), store)
    }

    #[tokio::test]
    async fn test_answers_two_step_form() {
        let (exit, out, store) = run(ScriptedSource::always(catalogs::two_step()), "foo\nbar\n", true).await;

        assert_eq!(exit.unwrap(), Exit::Submitted);
        assert!(out.contains("[1/2] Question Q1"));
        assert!(out.contains("[2/2] Question Q2"));
        assert!(out.contains(SUBMITTED_MESSAGE));
        assert!(out.contains("Saved as submission #1"));

        let records = store.list_all().await.unwrap();
        assert_eq!(records[0].answers.get("Q2"), Some("bar"));
    }

    #[tokio::test]
    async fn test_invalid_and_blank_input_reprompt() {
        let script = "Ada99\n\nAda\n1000\n:skip\n:quit\n";
        let (exit, out, store) = run(ScriptedSource::always(catalogs::branching()), script, true).await;

        assert_eq!(exit.unwrap(), Exit::Quit);
        assert!(out.contains(INVALID_INPUT_MESSAGE));
        assert!(out.contains("An answer is required."));
        // skipping the age question lands on pets
        assert!(out.contains("Question pets"));
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_unskippable_question_says_so() {
        let (exit, out, _) = run(ScriptedSource::always(catalogs::two_step()), ":skip\n", true).await;
        assert_eq!(exit.unwrap(), Exit::Quit);
        assert!(out.contains("This question cannot be skipped."));
    }

    #[tokio::test]
    async fn test_error_with_once_fails() {
        let (exit, out, _) = run(ScriptedSource::failing("offline"), "", true).await;
        assert!(exit.is_err());
        assert!(out.contains("Error: failed to reach form source: offline"));
    }

    #[tokio::test]
    async fn test_restarts_between_submissions() {
        let script = "x\ny\n:quit\n";
        let (exit, out, store) = run(ScriptedSource::always(catalogs::self_loop()), script, false).await;

        assert_eq!(exit.unwrap(), Exit::Quit);
        assert_eq!(out.matches(SUBMITTED_MESSAGE).count(), 2);
        assert_eq!(store.len(), 2);
    }
}

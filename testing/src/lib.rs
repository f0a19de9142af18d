//! # surveyor-test
//!
//! Fixtures for exercising Surveyor sessions without a network or database.
//!
//! - [`catalogs`]: small question catalogs, including malformed ones
//! - [`ScriptedSource`]: a form source that plays back a script of fetch results
//! - [`FailingSink`]: a submission sink whose writes always fail
//! - [`assert_in_progress!`], [`assert_submitted!`], [`assert_error!`]

pub mod catalogs;
mod doubles;
mod wait;

pub use doubles::{FailingSink, Fetch, ScriptedSource};
pub use wait::{DEFAULT_WAIT, wait_for};

/// Assert a [`UiState`](surveyor_core::UiState) is in progress at the given
/// question id.
#[macro_export]
macro_rules! assert_in_progress {
    ($state:expr, $question:expr) => {{
        let state = &$state;
        match state.current_question() {
            Some(question) => assert_eq!(
                question.id.as_str(),
                $question,
                "in progress at the wrong question"
            ),
            None => panic!("expected InProgress at `{}`, got {:?}", $question, state),
        }
    }};
}

#[macro_export]
macro_rules! assert_submitted {
    ($state:expr) => {{
        let state = &$state;
        assert!(state.is_submitted(), "expected Submitted, got {:?}", state);
    }};
}

/// Assert an error state, optionally with an exact message.
#[macro_export]
macro_rules! assert_error {
    ($state:expr) => {{
        let state = &$state;
        assert!(state.is_terminal(), "expected Error, got {:?}", state);
    }};
    ($state:expr, $message:expr) => {{
        let state = &$state;
        assert_eq!(state.error_message(), Some($message), "state was {:?}", state);
    }};
}

use std::time::Duration;
use surveyor_core::state::UiState;
use tokio::sync::watch;

/// Generous upper bound for a state to appear in tests.
pub const DEFAULT_WAIT: Duration = Duration::from_secs(5);

/// Wait until the published state satisfies `predicate`, then return it.
///
/// # Panics
///
/// Panics when the state does not appear within [`DEFAULT_WAIT`] or the
/// session is dropped.
pub async fn wait_for<F>(receiver: &mut watch::Receiver<UiState>, predicate: F) -> UiState
where
    F: FnMut(&UiState) -> bool,
{
    let waited = tokio::time::timeout(DEFAULT_WAIT, async {
        receiver.wait_for(predicate).await.map(|state| state.clone())
    })
    .await;

    match waited {
        Ok(Ok(state)) => state,
        Ok(Err(_)) => panic!("session dropped while waiting for state"),
        Err(_) => panic!("timed out waiting for state, last was {:?}", *receiver.borrow()),
    }
}

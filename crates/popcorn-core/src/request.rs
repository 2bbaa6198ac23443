//! Shared lifecycle for fetches whose latest request wins.
//!
//! Every request gets the next sequence number and its own cancellation token.
//! Issuing a new request cancels the previous token, and a finished request
//! only commits when its sequence number is still the current one. A cancelled
//! request exits without touching state.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// State plus the sequence number of the request allowed to commit to it.
pub struct Versioned<S> {
    pub state: S,
    pub sequence: u64,
}

pub type SharedState<S> = Arc<Mutex<Versioned<S>>>;

pub fn shared<S>(state: S) -> SharedState<S> {
    Arc::new(Mutex::new(Versioned { state, sequence: 0 }))
}

/// Lock the shared state. A panicked commit leaves plain data behind, so a
/// poisoned lock is recovered rather than propagated.
pub fn lock<S>(shared: &Mutex<Versioned<S>>) -> MutexGuard<'_, Versioned<S>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Handle to the one request a fetcher may have outstanding.
pub struct InFlight {
    sequence: u64,
    token: CancellationToken,
    handle: JoinHandle<()>,
}

impl InFlight {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Wait until the request committed, was discarded, or observed cancellation.
    pub async fn join(self) {
        if let Err(e) = self.handle.await {
            if !e.is_cancelled() {
                debug!(sequence = self.sequence, "Request task failed: {}", e);
            }
        }
    }
}

/// Spawn `request` as sequence number `sequence`.
///
/// When it resolves before its token is cancelled and `sequence` is still
/// current, `commit` runs under the state lock and `changed` is notified.
pub fn spawn_request<S, T, Fut, C>(
    shared: SharedState<S>,
    sequence: u64,
    changed: Arc<Notify>,
    request: Fut,
    commit: C,
) -> InFlight
where
    S: Send + 'static,
    T: Send + 'static,
    Fut: Future<Output = T> + Send + 'static,
    C: FnOnce(&mut S, T) + Send + 'static,
{
    let token = CancellationToken::new();
    let child = token.clone();

    let handle = tokio::spawn(async move {
        let outcome = tokio::select! {
            _ = child.cancelled() => {
                debug!(sequence, "Request cancelled before completion");
                return;
            }
            outcome = request => outcome,
        };

        {
            let mut guard = lock(&shared);
            if guard.sequence != sequence || child.is_cancelled() {
                debug!(sequence, current = guard.sequence, "Discarding superseded response");
                return;
            }
            commit(&mut guard.state, outcome);
        }
        changed.notify_one();
    });

    InFlight { sequence, token, handle }
}

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// `cancel()` was called.
    Requested,
    /// The deadline armed by `cancel_after` elapsed.
    DeadlineElapsed,
}

/// Cooperative cancellation shared between a caller and `RequestExecutor`.
///
/// Clones observe the same state. The first reason recorded wins; later
/// calls to `cancel` or an elapsing deadline do not overwrite it.
#[derive(Debug, Clone)]
pub struct CancellationToken {
    state: Arc<watch::Sender<Option<CancelReason>>>,
}

impl CancellationToken {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            state: Arc::new(tx),
        }
    }

    pub fn cancel(&self) {
        self.cancel_with(CancelReason::Requested);
    }

    /// Arms a deadline: once `after` elapses the token is cancelled with
    /// `CancelReason::DeadlineElapsed`. Aborting the returned handle disarms it.
    pub fn cancel_after(&self, after: Duration) -> JoinHandle<()> {
        let token = self.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(after) => token.cancel_with(CancelReason::DeadlineElapsed),
                _ = token.cancelled() => {}
            }
        })
    }

    fn cancel_with(&self, reason: CancelReason) {
        let changed = self.state.send_if_modified(|current| {
            if current.is_none() {
                *current = Some(reason);
                true
            } else {
                false
            }
        });
        if changed {
            tracing::debug!("Cancellation signalled: {:?}", reason);
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.state.borrow().is_some()
    }

    pub fn reason(&self) -> Option<CancelReason> {
        *self.state.borrow()
    }

    /// Resolves once the token is cancelled, immediately if it already is.
    pub async fn cancelled(&self) -> CancelReason {
        let mut rx = self.state.subscribe();
        loop {
            if let Some(reason) = *rx.borrow_and_update() {
                return reason;
            }
            // The sender lives as long as `self`, so this cannot fail.
            if rx.changed().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

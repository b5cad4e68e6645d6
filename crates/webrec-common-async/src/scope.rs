//! Scoped capture-stream handles.

use std::future::Future;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, Instrument};

/// Cancellation scope grouping every stream of one recording session.
///
/// Streams spawned through [`CaptureScope::spawn`] get a child token.
/// Cancelling the scope cancels all of them at once; releasing a single
/// [`StreamGuard`] only stops that stream.
#[derive(Debug)]
pub struct CaptureScope {
    name: String,
    token: CancellationToken,
}

impl CaptureScope {
    /// Create a new, live scope.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            token: CancellationToken::new(),
        }
    }

    /// Spawn a stream task bound to this scope.
    ///
    /// The closure receives the stream's own token and must return once it is
    /// cancelled.
    pub fn spawn<F, Fut>(&self, stream: &'static str, f: F) -> StreamGuard
    where
        F: FnOnce(CancellationToken) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let token = self.token.child_token();
        let span = tracing::debug_span!("stream", scope = %self.name, name = stream);
        let handle = tokio::spawn(f(token.clone()).instrument(span));
        debug!(scope = %self.name, stream, "capture stream started");

        StreamGuard {
            name: stream,
            token,
            handle: Some(handle),
        }
    }

    /// Cancel every stream in the scope.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Whether the scope has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for CaptureScope {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

/// Handle to one running capture stream.
///
/// Dropping the guard cancels the stream without waiting for it;
/// [`StreamGuard::release`] cancels and waits, which is what ordered
/// teardown needs.
#[derive(Debug)]
pub struct StreamGuard {
    name: &'static str,
    token: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl StreamGuard {
    /// Whether the underlying task has already exited.
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, |h| h.is_finished())
    }

    /// Cancel the stream and wait until its task has exited.
    pub async fn release(mut self) {
        self.token.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                error!(stream = self.name, "capture stream task failed: {}", e);
            }
        }
        debug!(stream = self.name, "capture stream released");
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

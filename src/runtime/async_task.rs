//! Async task handle for GitHub API operations.
//!
//! Each API call is spawned onto the tokio runtime and its result is handed
//! back through a oneshot channel, so dropping the handle abandons the call
//! without blocking the caller.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// A handle to an asynchronous task that produces a single result.
pub struct AsyncTask<T> {
    rx: oneshot::Receiver<T>,
    handle: tokio::task::JoinHandle<()>,
}

impl<T> AsyncTask<T>
where
    T: Send + 'static,
{
    /// Spawn an async operation.
    #[inline]
    pub fn spawn_async<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        let handle = tokio::task::spawn(async move {
            let _ = tx.send(future.await);
        });
        Self { rx, handle }
    }

    /// Abort the underlying task. Awaiting the handle afterwards yields
    /// a `RecvError`.
    pub fn abort(&self) {
        self.handle.abort();
    }
}

impl<T> Drop for AsyncTask<T> {
    fn drop(&mut self) {
        // In-flight requests are abandoned together with their handle.
        self.handle.abort();
    }
}

impl<T> Future for AsyncTask<T> {
    type Output = Result<T, oneshot::error::RecvError>;

    #[inline]
    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.rx).poll(cx)
    }
}

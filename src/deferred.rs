//! Single-delivery asynchronous results with cancellation and timeouts.
//!
//! Encoding a variant happens out of band, on whatever thread the producer
//! chooses (a rayon worker in the pipeline). A [`Deferred`] is the consumer
//! side of that work: a future that resolves once, with the produced value or
//! with a [`DeferredError`].
//!
//! ```text
//! let (resolver, deferred) = deferred::<u32>();
//! rayon::spawn(move || { resolver.resolve(42).ok(); });
//! let doubled = deferred.map(|v| v * 2).with_timeout(Duration::from_secs(5));
//! assert_eq!(doubled.await, Ok(84));
//! ```
//!
//! - `map` composes on the eventual value without blocking the producer.
//! - Cancelling the token resolves the deferred with [`DeferredError::Cancelled`];
//!   producers can poll [`Resolver::is_cancelled`] to skip work.
//! - A resolver dropped without a value resolves with [`DeferredError::Abandoned`].

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio_util::sync::CancellationToken;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeferredError {
    #[error("operation was cancelled")]
    Cancelled,
    #[error("operation timed out after {0:?}")]
    TimedOut(Duration),
    #[error("producer dropped without delivering a result")]
    Abandoned,
}

type BoxedResult<T> = Pin<Box<dyn Future<Output = Result<T, DeferredError>> + Send>>;

/// Consumer side of an asynchronous result.
#[must_use = "a Deferred does nothing unless awaited"]
pub struct Deferred<T> {
    inner: BoxedResult<T>,
    cancel: CancellationToken,
}

/// Producer side: delivers exactly one value.
#[derive(Debug)]
pub struct Resolver<T> {
    tx: oneshot::Sender<T>,
    cancel: CancellationToken,
}

/// Create a connected resolver/deferred pair.
pub fn deferred<T: Send + 'static>() -> (Resolver<T>, Deferred<T>) {
    let (tx, rx) = oneshot::channel();
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    let inner = async move {
        tokio::select! {
            biased;
            _ = token.cancelled() => Err(DeferredError::Cancelled),
            value = rx => value.map_err(|_| DeferredError::Abandoned),
        }
    };

    (
        Resolver {
            tx,
            cancel: cancel.clone(),
        },
        Deferred {
            inner: Box::pin(inner),
            cancel,
        },
    )
}

impl<T> Resolver<T> {
    /// Deliver the value. Returns it back if the consumer is gone.
    pub fn resolve(self, value: T) -> Result<(), T> {
        self.tx.send(value)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

impl<T: Send + 'static> Deferred<T> {
    /// Run `work` on the rayon pool and deliver its result.
    ///
    /// `work` is skipped entirely when the deferred was cancelled before a
    /// worker picked it up.
    pub fn spawn<F>(work: F) -> Deferred<T>
    where
        F: FnOnce() -> T + Send + 'static,
    {
        let (resolver, deferred) = deferred();
        rayon::spawn(move || {
            if resolver.is_cancelled() {
                return;
            }
            // The consumer may have been dropped meanwhile; nothing to deliver to.
            let _ = resolver.resolve(work());
        });
        deferred
    }

    /// Transform the eventual value.
    pub fn map<U, F>(self, f: F) -> Deferred<U>
    where
        U: Send + 'static,
        F: FnOnce(T) -> U + Send + 'static,
    {
        let inner = self.inner;
        Deferred {
            inner: Box::pin(async move { inner.await.map(f) }),
            cancel: self.cancel,
        }
    }

    /// Fail with [`DeferredError::TimedOut`] if no value arrives within `duration`.
    ///
    /// Expiry also cancels the token, so work that has not started yet is
    /// skipped. Requires a tokio runtime with the time driver enabled when
    /// awaited.
    pub fn with_timeout(self, duration: Duration) -> Deferred<T> {
        let inner = self.inner;
        let token = self.cancel.clone();
        Deferred {
            inner: Box::pin(async move {
                match tokio::time::timeout(duration, inner).await {
                    Ok(result) => result,
                    Err(_) => {
                        token.cancel();
                        Err(DeferredError::TimedOut(duration))
                    }
                }
            }),
            cancel: self.cancel,
        }
    }
}

impl<T> Deferred<T> {
    /// Token shared with the producer; cancelling it cancels this result.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn cancel(&self) {
        self.cancel.cancel();
    }
}

impl<T> Future for Deferred<T> {
    type Output = Result<T, DeferredError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().inner.as_mut().poll(cx)
    }
}

impl<T> std::fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deferred")
            .field("cancelled", &self.cancel.is_cancelled())
            .finish_non_exhaustive()
    }
}

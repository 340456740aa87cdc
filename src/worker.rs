use async_trait::async_trait;
use std::future::Future;

pub use crate::errors::BoxedWorkerError;

/// Message-processing capability supplied by the application.
///
/// The listener treats the worker as opaque: it hands over the message
/// body, and either the call returns `Ok` (the message is then deleted
/// from the queue) or it returns an error (the run terminates and the
/// message's lease is left to expire, producing redelivery). The listener
/// never retries a worker call and enforces no deadline on it; the lease
/// budget check happens *before* the worker is invoked, not during.
#[async_trait]
pub trait Worker: Send + Sync {
    async fn work(&self, body: String) -> Result<(), BoxedWorkerError>;
}

/// Adapter that turns an async function plus a cloneable shared resource
/// into a [`Worker`].
///
/// The shared resource is cloned for every invocation, so cheap handles
/// (`Arc`s, clients, counters) are the intended cargo.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU64, Ordering};
/// use sqs_lease_listener::worker::{BoxedWorkerError, FnWorker};
///
/// async fn record(body: String, seen: Arc<AtomicU64>) -> Result<(), BoxedWorkerError> {
///     seen.fetch_add(1, Ordering::Relaxed);
///     println!("processing: {body}");
///     Ok(())
/// }
///
/// let seen = Arc::new(AtomicU64::new(0));
/// let worker = FnWorker::new(record, seen);
/// ```
pub struct FnWorker<F, S> {
    work_fn: F,
    shared: S,
}

impl<F, S> FnWorker<F, S> {
    pub fn new(work_fn: F, shared: S) -> Self {
        FnWorker { work_fn, shared }
    }
}

#[async_trait]
impl<F, Fut, S> Worker for FnWorker<F, S>
where
    F: Fn(String, S) -> Fut + Send + Sync,
    Fut: Future<Output = Result<(), BoxedWorkerError>> + Send,
    S: Clone + Send + Sync,
{
    async fn work(&self, body: String) -> Result<(), BoxedWorkerError> {
        (self.work_fn)(body, self.shared.clone()).await
    }
}

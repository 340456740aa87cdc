use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures::future::try_join_all;

use crate::errors::SqsListenerError;
use crate::queue::MessageQueue;
use crate::worker::Worker;

mod budget;
mod config;
mod poll;

pub use config::ListenerConfig;

use budget::LeaseBudget;
use poll::RunnableListener;

/// A single-queue polling listener.
///
/// Owns one queue capability, one worker, one lease-budget tracker, and
/// one listening flag. Messages are processed strictly sequentially: the
/// budget accounting measures wall-clock gaps between messages and is not
/// meaningful under concurrent processing. For horizontal scaling, run
/// several listeners (see [`ListenerGroup`]) and let the queue's
/// visibility mechanism coordinate them.
pub struct SqsListener<Q, W>
where
    Q: MessageQueue,
    W: Worker,
{
    queue: Q,
    worker: W,
    config: ListenerConfig,
    budget: LeaseBudget,
    listening: Arc<AtomicBool>,
}

impl<Q, W> SqsListener<Q, W>
where
    Q: MessageQueue,
    W: Worker,
{
    /// Builds a listener over `queue`, feeding messages to `worker`.
    ///
    /// The configuration is validated here, eagerly: a missing or
    /// non-`https` queue URL (or an out-of-range batch size, zero
    /// visibility timeout, or over-long wait time) fails construction
    /// with [`SqsListenerError::Configuration`] before any network call
    /// is made.
    pub fn new(queue: Q, config: ListenerConfig, worker: W) -> Result<Self, SqsListenerError> {
        config.validate()?;

        let budget = LeaseBudget::new(config.visibility_timeout);
        Ok(SqsListener {
            queue,
            worker,
            config,
            budget,
            listening: Arc::new(AtomicBool::new(true)),
        })
    }

    /// Handle for requesting a graceful stop of this listener.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.listening))
    }

    /// The configuration this listener was built with.
    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }
}

/// Cloneable handle that requests a graceful stop of one listener.
///
/// The request is cooperative: the listener notices it at the next batch
/// boundary, so the batch in flight always completes first.
#[derive(Debug, Clone)]
pub struct ShutdownHandle(Arc<AtomicBool>);

impl ShutdownHandle {
    /// Asks the listener to stop after the batch currently in flight.
    pub fn shutdown(&self) {
        self.0.store(false, Ordering::Release);
    }

    /// Whether the listener still intends to poll again.
    pub fn is_listening(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Drives several independently configured listeners concurrently.
///
/// Each registered listener keeps its own configuration, budget tracker,
/// and shutdown flag; the group only fans them out and stops them
/// together.
///
/// # Example
///
/// ```rust,no_run
/// # use sqs_lease_listener::listener::{ListenerConfig, ListenerGroup, SqsListener};
/// # use sqs_lease_listener::queue::SqsQueue;
/// # use sqs_lease_listener::worker::{BoxedWorkerError, FnWorker};
/// # async fn handle(body: String, _shared: ()) -> Result<(), BoxedWorkerError> { Ok(()) }
/// # async fn example(client: aws_sdk_sqs::Client) -> Result<(), Box<dyn std::error::Error>> {
/// let mut group = ListenerGroup::new();
/// for queue_url in [
///     "https://sqs.us-east-1.amazonaws.com/123456789012/orders",
///     "https://sqs.us-east-1.amazonaws.com/123456789012/invoices",
/// ] {
///     let listener = SqsListener::new(
///         SqsQueue::new(client.clone()),
///         ListenerConfig::new(queue_url),
///         FnWorker::new(handle, ()),
///     )?;
///     group.add(listener);
/// }
/// group.listen_all().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct ListenerGroup {
    listeners: Vec<Box<dyn RunnableListener>>,
    handles: Vec<ShutdownHandle>,
}

impl ListenerGroup {
    pub fn new() -> Self {
        ListenerGroup {
            listeners: Vec::new(),
            handles: Vec::new(),
        }
    }

    /// Registers a listener, returning its shutdown handle.
    pub fn add<Q, W>(&mut self, listener: SqsListener<Q, W>) -> ShutdownHandle
    where
        Q: MessageQueue + 'static,
        W: Worker + 'static,
    {
        let handle = listener.shutdown_handle();
        self.handles.push(handle.clone());
        self.listeners.push(Box::new(listener));
        handle
    }

    /// Shutdown handles of every registered listener, for stopping the
    /// group from another task once [`listen_all`](Self::listen_all) has
    /// consumed it.
    pub fn shutdown_handles(&self) -> Vec<ShutdownHandle> {
        self.handles.clone()
    }

    /// Requests a graceful stop of every registered listener.
    pub fn shutdown_all(&self) {
        for handle in &self.handles {
            handle.shutdown();
        }
    }

    /// Runs all registered listeners concurrently until each has stopped
    /// or one fails.
    ///
    /// Fails fast: the first listener error tears down the remaining
    /// runs and is returned.
    pub async fn listen_all(self) -> Result<(), SqsListenerError> {
        try_join_all(self.listeners.into_iter().map(|listener| listener.run())).await?;
        Ok(())
    }
}

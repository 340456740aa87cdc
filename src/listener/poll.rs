use std::sync::atomic::Ordering;

use async_trait::async_trait;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::errors::SqsListenerError;
use crate::queue::{MessageQueue, QueueMessage};
use crate::worker::Worker;

use super::SqsListener;

impl<Q, W> SqsListener<Q, W>
where
    Q: MessageQueue,
    W: Worker,
{
    /// Runs the fetch/process cycle until a stop is requested or an error
    /// occurs.
    ///
    /// Each iteration fetches up to `batch_size` messages with a
    /// `wait_time` long poll and works through them strictly in queue
    /// order, gating every message on the remaining lease budget. The
    /// shutdown flag is read only after a batch has fully completed, so a
    /// [`ShutdownHandle::shutdown`](super::ShutdownHandle::shutdown)
    /// request always lets the in-flight batch finish and never aborts a
    /// message mid-extend or mid-delete; a flag cleared before `listen` is
    /// called still yields exactly one full poll.
    ///
    /// # Errors
    ///
    /// The first transport or worker error ends the run and is returned
    /// unmodified. Nothing is retried here; recovery is the supervisor's
    /// restart, and any message in flight at the time of the error is
    /// redelivered once its lease expires.
    pub async fn listen(&mut self) -> Result<(), SqsListenerError> {
        info!(queue_url = %self.config.queue_url, "listener started");

        loop {
            self.poll_once().await?;

            if !self.listening.load(Ordering::Acquire) {
                break;
            }
        }

        info!(queue_url = %self.config.queue_url, "listener stopped");
        Ok(())
    }

    async fn poll_once(&mut self) -> Result<(), SqsListenerError> {
        let messages = self
            .queue
            .fetch(
                &self.config.queue_url,
                self.config.batch_size,
                self.config.visibility_timeout,
                self.config.wait_time,
            )
            .await?;

        debug!(count = messages.len(), "fetched batch");

        for message in messages {
            if !self.budget.has_time_remaining(Instant::now()) {
                // The rest of the batch keeps its original lease: never
                // extended, so it reappears once the fetch-time timeout
                // elapses.
                warn!(
                    queue_url = %self.config.queue_url,
                    "visibility window nearly spent, deferring remaining messages"
                );
                break;
            }

            self.process_message(message).await?;
        }

        self.budget.reset();
        Ok(())
    }

    async fn process_message(&self, message: QueueMessage) -> Result<(), SqsListenerError> {
        // Restart the lease so the message doesn't become visible to other
        // consumers while the worker is on it.
        self.queue
            .extend_lease(
                &self.config.queue_url,
                &message.receipt_handle,
                self.config.visibility_timeout,
            )
            .await?;

        self.worker
            .work(message.body)
            .await
            .map_err(SqsListenerError::worker)?;

        // Done with the message, remove it for good.
        self.queue
            .delete(&self.config.queue_url, &message.receipt_handle)
            .await?;

        Ok(())
    }
}

/// Object-safe view of a listener, so listeners over different queue and
/// worker types can share one [`ListenerGroup`](super::ListenerGroup).
#[async_trait]
pub(crate) trait RunnableListener: Send {
    async fn run(self: Box<Self>) -> Result<(), SqsListenerError>;
}

#[async_trait]
impl<Q, W> RunnableListener for SqsListener<Q, W>
where
    Q: MessageQueue + 'static,
    W: Worker + 'static,
{
    async fn run(mut self: Box<Self>) -> Result<(), SqsListenerError> {
        self.listen().await
    }
}

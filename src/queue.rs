use std::time::Duration;

use async_trait::async_trait;
use tracing::warn;

use crate::errors::SqsListenerError;

/// One message pulled from the queue, held for a single processing attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMessage {
    /// The message payload, handed to the worker untouched.
    pub body: String,

    /// Opaque lease handle identifying this delivery of the message.
    ///
    /// Required for extending the lease and for deleting the message once
    /// the worker has finished with it.
    pub receipt_handle: String,
}

/// Capability to fetch, extend, and delete leased messages on a queue.
///
/// The listener consumes this interface rather than the SQS client
/// directly, so the polling logic can be exercised against an in-process
/// double and alternative transports can be plugged in. All three
/// operations are invoked as blocking point-to-point calls; failures are
/// reported as [`SqsListenerError::Transport`] and are never retried by
/// the listener.
#[async_trait]
pub trait MessageQueue: Send + Sync {
    /// Fetches up to `max_messages` messages, long-polling for at most
    /// `wait_time`. Every returned message carries a lease of
    /// `visibility_timeout`, granted at fetch time.
    async fn fetch(
        &self,
        queue_url: &str,
        max_messages: i32,
        visibility_timeout: Duration,
        wait_time: Duration,
    ) -> Result<Vec<QueueMessage>, SqsListenerError>;

    /// Restarts the lease on one message so it stays invisible to other
    /// consumers for another `visibility_timeout`.
    async fn extend_lease(
        &self,
        queue_url: &str,
        receipt_handle: &str,
        visibility_timeout: Duration,
    ) -> Result<(), SqsListenerError>;

    /// Permanently removes a processed message from the queue.
    async fn delete(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), SqsListenerError>;
}

/// [`MessageQueue`] backed by the AWS SQS SDK.
#[derive(Debug, Clone)]
pub struct SqsQueue {
    client: aws_sdk_sqs::Client,
}

impl SqsQueue {
    /// Wraps an already-configured SQS client.
    ///
    /// See [`crate::client`] for helpers that build one from the
    /// environment or from explicit credentials.
    pub fn new(client: aws_sdk_sqs::Client) -> Self {
        SqsQueue { client }
    }
}

#[async_trait]
impl MessageQueue for SqsQueue {
    async fn fetch(
        &self,
        queue_url: &str,
        max_messages: i32,
        visibility_timeout: Duration,
        wait_time: Duration,
    ) -> Result<Vec<QueueMessage>, SqsListenerError> {
        let response = self
            .client
            .receive_message()
            .queue_url(queue_url)
            .max_number_of_messages(max_messages)
            .visibility_timeout(visibility_timeout.as_secs() as i32)
            .wait_time_seconds(wait_time.as_secs() as i32)
            .send()
            .await
            .map_err(|err| SqsListenerError::transport(aws_sdk_sqs::Error::from(err)))?;

        let messages = response
            .messages
            .unwrap_or_default()
            .into_iter()
            .filter_map(|message| match message.receipt_handle {
                Some(receipt_handle) => Some(QueueMessage {
                    body: message.body.unwrap_or_default(),
                    receipt_handle,
                }),
                // Without a receipt handle the message can be neither
                // extended nor deleted, so it is unprocessable here. Leave
                // it to reappear when its lease runs out.
                None => {
                    warn!(message_id = ?message.message_id, "skipping message without receipt handle");
                    None
                }
            })
            .collect();

        Ok(messages)
    }

    async fn extend_lease(
        &self,
        queue_url: &str,
        receipt_handle: &str,
        visibility_timeout: Duration,
    ) -> Result<(), SqsListenerError> {
        self.client
            .change_message_visibility()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .visibility_timeout(visibility_timeout.as_secs() as i32)
            .send()
            .await
            .map_err(|err| SqsListenerError::transport(aws_sdk_sqs::Error::from(err)))?;

        Ok(())
    }

    async fn delete(
        &self,
        queue_url: &str,
        receipt_handle: &str,
    ) -> Result<(), SqsListenerError> {
        self.client
            .delete_message()
            .queue_url(queue_url)
            .receipt_handle(receipt_handle)
            .send()
            .await
            .map_err(|err| SqsListenerError::transport(aws_sdk_sqs::Error::from(err)))?;

        Ok(())
    }
}

use thiserror::Error;

/// Boxed error returned by a [`Worker`](crate::worker::Worker) when message
/// processing fails.
pub type BoxedWorkerError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error types for listener operations.
///
/// Each variant maps to one of the three failure classes a run can end
/// with. None of them are retried internally: a listener run terminates on
/// the first error it sees, and redelivery of any in-flight message is
/// handled by the queue's visibility mechanism once the lease expires.
#[derive(Debug, Error)]
pub enum SqsListenerError {
    /// The listener configuration is unusable.
    ///
    /// Raised when the listener is constructed, before any network call is
    /// made. Typical cause: a queue URL that is missing or does not use an
    /// encrypted transport scheme.
    #[error("invalid listener configuration: {message}")]
    Configuration { message: String },

    /// A queue operation (fetch, lease extension, delete) failed.
    #[error("queue transport operation failed: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync + 'static>),

    /// The worker returned an error while processing a message.
    ///
    /// The failed message was not deleted; it becomes visible again once
    /// its lease expires.
    #[error("worker failed while processing message: {0}")]
    Worker(BoxedWorkerError),
}

impl SqsListenerError {
    /// Creates a `Configuration` error with the provided message.
    pub fn configuration(message: impl Into<String>) -> Self {
        SqsListenerError::Configuration {
            message: message.into(),
        }
    }

    /// Wraps a transport-layer failure.
    ///
    /// Public so that alternative [`MessageQueue`](crate::queue::MessageQueue)
    /// implementations can surface their own transport errors.
    pub fn transport(
        source: impl Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    ) -> Self {
        SqsListenerError::Transport(source.into())
    }

    /// Wraps a worker processing failure.
    pub fn worker(source: BoxedWorkerError) -> Self {
        SqsListenerError::Worker(source)
    }
}

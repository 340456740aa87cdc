//! # SQS Lease Listener
//!
//! A lease-aware AWS SQS polling listener. It pulls batches of messages,
//! hands each one to a worker, and budgets the batch's visibility window
//! so that a message is only started when enough lease time remains to
//! finish it at the worst pace observed so far in the batch.
//!
//! ## Features
//!
//! - Sequential batch processing with per-message lease extension and
//!   delete-on-success
//! - Predictive time-budget gate that defers messages the lease can no
//!   longer cover, leaving them for a later fetch
//! - Crash-loud failure policy: configuration, transport, and worker
//!   errors all terminate the run, so a failed message's lease expires and
//!   the queue redelivers it (at-least-once)
//! - Graceful stop at batch boundaries via a cloneable shutdown handle
//! - Long polling with configurable batch size, visibility timeout, and
//!   wait time
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use sqs_lease_listener::client::sqs_client_from_env;
//! use sqs_lease_listener::listener::{ListenerConfig, SqsListener};
//! use sqs_lease_listener::queue::SqsQueue;
//! use sqs_lease_listener::worker::{BoxedWorkerError, FnWorker};
//!
//! async fn handle(body: String, _shared: ()) -> Result<(), BoxedWorkerError> {
//!     println!("processing: {body}");
//!     Ok(())
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = sqs_client_from_env().await;
//!     let config =
//!         ListenerConfig::new("https://sqs.us-east-1.amazonaws.com/123456789012/jobs");
//!
//!     let mut listener =
//!         SqsListener::new(SqsQueue::new(client), config, FnWorker::new(handle, ()))?;
//!     let shutdown = listener.shutdown_handle();
//!
//!     tokio::spawn(async move {
//!         tokio::signal::ctrl_c().await.ok();
//!         shutdown.shutdown();
//!     });
//!
//!     listener.listen().await?;
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod errors;
pub mod listener;
pub mod queue;
pub mod worker;

pub use errors::{BoxedWorkerError, SqsListenerError};
pub use listener::{ListenerConfig, ListenerGroup, ShutdownHandle, SqsListener};
pub use queue::{MessageQueue, QueueMessage, SqsQueue};
pub use worker::{FnWorker, Worker};

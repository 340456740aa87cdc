//! End-to-end test against a live SQS queue.
//!
//! Needs AWS credentials and `TEST_SQS_QUEUE_URL` in the environment (a
//! `.env` file works). Ignored by default; run with `cargo test -- --ignored`.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use sqs_lease_listener::client::sqs_client_from_env;
use sqs_lease_listener::listener::{ListenerConfig, SqsListener};
use sqs_lease_listener::queue::SqsQueue;
use sqs_lease_listener::worker::{BoxedWorkerError, FnWorker};
use tokio::sync::Mutex;
use tokio::time::timeout;

#[derive(Clone, Default)]
struct SharedInbox {
    bodies: Arc<Mutex<Vec<String>>>,
}

impl SharedInbox {
    async fn push(&self, body: String) {
        self.bodies.lock().await.push(body);
    }

    async fn len(&self) -> usize {
        self.bodies.lock().await.len()
    }
}

async fn record(body: String, inbox: SharedInbox) -> Result<(), BoxedWorkerError> {
    println!("received message: {body}");
    inbox.push(body).await;
    Ok(())
}

#[tokio::test]
#[ignore = "requires AWS credentials and TEST_SQS_QUEUE_URL"]
async fn consumes_and_deletes_a_live_message() {
    dotenvy::dotenv().ok();

    let queue_url = env::var("TEST_SQS_QUEUE_URL").expect("TEST_SQS_QUEUE_URL must be set");
    let sqs_client = sqs_client_from_env().await;

    sqs_client
        .send_message()
        .queue_url(&queue_url)
        .message_body("live listener test message")
        .send()
        .await
        .expect("failed to send test message");

    let inbox = SharedInbox::default();
    let worker = FnWorker::new(record, inbox.clone());

    let config = ListenerConfig::new(queue_url.as_str()).with_wait_time(Duration::from_secs(5));
    let mut listener = SqsListener::new(SqsQueue::new(sqs_client), config, worker)
        .expect("listener config should validate");
    let shutdown = listener.shutdown_handle();

    let listen_task = tokio::spawn(async move { listener.listen().await });

    timeout(Duration::from_secs(30), async {
        loop {
            if inbox.len().await >= 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(500)).await;
        }
    })
    .await
    .expect("timed out waiting for the message to be processed");

    shutdown.shutdown();

    let run_result = timeout(Duration::from_secs(30), listen_task)
        .await
        .expect("listener did not stop at the batch boundary")
        .expect("listener task panicked");
    run_result.expect("listener run failed");

    assert!(
        inbox.len().await >= 1,
        "should have processed the test message"
    );
}

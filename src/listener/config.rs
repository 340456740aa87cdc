use std::time::Duration;

use url::Url;

use crate::errors::SqsListenerError;

/// SQS serves at most 10 messages per receive call.
const MAX_BATCH_SIZE: i32 = 10;

/// SQS caps long-poll waits at 20 seconds.
const MAX_WAIT_TIME: Duration = Duration::from_secs(20);

/// Configuration for a single [`SqsListener`](super::SqsListener).
///
/// A plain value, owned by the listener it configures. Several listeners
/// with different configurations can coexist in one process. Validated
/// once, when the listener is constructed; an invalid configuration never
/// reaches the queue.
///
/// # Fields
/// - `queue_url`: the queue to consume; must be an `https` URL.
/// - `batch_size`: maximum messages requested per fetch (1 to 10).
/// - `visibility_timeout`: lease length granted at fetch time and
///   re-granted per message; also the time budget for working through one
///   batch.
/// - `wait_time`: long-poll wait for each fetch (at most 20 seconds).
#[derive(Debug, Clone)]
pub struct ListenerConfig {
    pub queue_url: String,
    pub batch_size: i32,
    pub visibility_timeout: Duration,
    pub wait_time: Duration,
}

impl ListenerConfig {
    /// Creates a configuration for `queue_url` with the default batch size
    /// (10), visibility timeout (10 s), and wait time (20 s).
    pub fn new(queue_url: impl Into<String>) -> Self {
        ListenerConfig {
            queue_url: queue_url.into(),
            batch_size: 10,
            visibility_timeout: Duration::from_secs(10),
            wait_time: Duration::from_secs(20),
        }
    }

    pub fn with_batch_size(mut self, batch_size: i32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_visibility_timeout(mut self, visibility_timeout: Duration) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }

    pub fn with_wait_time(mut self, wait_time: Duration) -> Self {
        self.wait_time = wait_time;
        self
    }

    /// Checks the whole configuration. Called once at listener
    /// construction, so every failure here surfaces before any network
    /// call is made.
    pub(crate) fn validate(&self) -> Result<(), SqsListenerError> {
        let url = Url::parse(&self.queue_url).map_err(|err| {
            SqsListenerError::configuration(format!(
                "queue_url {:?} is not a valid URL: {err}",
                self.queue_url
            ))
        })?;

        if url.scheme() != "https" {
            return Err(SqsListenerError::configuration(format!(
                "queue_url must use the https scheme, got {:?}",
                url.scheme()
            )));
        }

        if !(1..=MAX_BATCH_SIZE).contains(&self.batch_size) {
            return Err(SqsListenerError::configuration(format!(
                "batch_size must be between 1 and {MAX_BATCH_SIZE}, got {}",
                self.batch_size
            )));
        }

        if self.visibility_timeout.is_zero() {
            return Err(SqsListenerError::configuration(
                "visibility_timeout must be greater than zero",
            ));
        }

        if self.wait_time > MAX_WAIT_TIME {
            return Err(SqsListenerError::configuration(format!(
                "wait_time must be at most {}s, got {}s",
                MAX_WAIT_TIME.as_secs(),
                self.wait_time.as_secs()
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const QUEUE_URL: &str = "https://sqs.us-east-1.amazonaws.com/123456789012/jobs";

    #[test]
    fn default_values_match_the_documented_defaults() {
        let config = ListenerConfig::new(QUEUE_URL);

        assert_eq!(config.batch_size, 10);
        assert_eq!(config.visibility_timeout, Duration::from_secs(10));
        assert_eq!(config.wait_time, Duration::from_secs(20));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_non_https_queue_url() {
        let config = ListenerConfig::new("http://sqs.us-east-1.amazonaws.com/123/jobs");

        let err = config.validate().unwrap_err();
        assert!(matches!(err, SqsListenerError::Configuration { .. }));
        assert!(err.to_string().contains("https"));
    }

    #[test]
    fn rejects_empty_queue_url() {
        let config = ListenerConfig::new("");

        assert!(matches!(
            config.validate(),
            Err(SqsListenerError::Configuration { .. })
        ));
    }

    #[test]
    fn rejects_unparseable_queue_url() {
        let config = ListenerConfig::new("not a url at all");

        assert!(matches!(
            config.validate(),
            Err(SqsListenerError::Configuration { .. })
        ));
    }

    #[test]
    fn rejects_batch_size_outside_the_sqs_window() {
        for batch_size in [0, -1, 11] {
            let config = ListenerConfig::new(QUEUE_URL).with_batch_size(batch_size);
            assert!(
                matches!(
                    config.validate(),
                    Err(SqsListenerError::Configuration { .. })
                ),
                "batch_size {batch_size} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_zero_visibility_timeout() {
        let config = ListenerConfig::new(QUEUE_URL).with_visibility_timeout(Duration::ZERO);

        assert!(matches!(
            config.validate(),
            Err(SqsListenerError::Configuration { .. })
        ));
    }

    #[test]
    fn rejects_wait_time_beyond_the_long_poll_maximum() {
        let config = ListenerConfig::new(QUEUE_URL).with_wait_time(Duration::from_secs(21));

        assert!(matches!(
            config.validate(),
            Err(SqsListenerError::Configuration { .. })
        ));
    }
}

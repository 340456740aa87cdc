use aws_config::Region;
use aws_sdk_sqs::config::SharedCredentialsProvider;

/// Builds an SQS client from ambient AWS configuration.
///
/// Honors the standard environment and profile settings, such as:
/// - `AWS_ACCESS_KEY_ID`
/// - `AWS_SECRET_ACCESS_KEY`
/// - `AWS_REGION`
/// - `AWS_PROFILE`
///
/// # Example
///
/// ```rust,no_run
/// use sqs_lease_listener::client::sqs_client_from_env;
/// use sqs_lease_listener::queue::SqsQueue;
///
/// #[tokio::main]
/// async fn main() {
///     let queue = SqsQueue::new(sqs_client_from_env().await);
///     // Hand the queue to a listener...
/// }
/// ```
pub async fn sqs_client_from_env() -> aws_sdk_sqs::Client {
    let config = aws_config::load_from_env().await;
    aws_sdk_sqs::Client::new(&config)
}

/// Builds an SQS client with explicit credentials and region.
///
/// For applications that manage credentials themselves instead of relying
/// on the process environment, e.g. when talking to queues in several
/// accounts from one process.
///
/// # Arguments
///
/// * `access_key_id` - The AWS access key ID
/// * `secret_access_key` - The AWS secret access key
/// * `region` - The AWS region, e.g. `"us-east-1"`
pub fn sqs_client_with_credentials(
    access_key_id: &str,
    secret_access_key: &str,
    region: &str,
) -> aws_sdk_sqs::Client {
    let credentials =
        aws_sdk_sqs::config::Credentials::new(access_key_id, secret_access_key, None, None, "aws");

    let config = aws_sdk_sqs::config::Builder::new()
        .region(Region::new(region.to_string()))
        .credentials_provider(SharedCredentialsProvider::new(credentials))
        .build();

    aws_sdk_sqs::Client::from_conf(config)
}

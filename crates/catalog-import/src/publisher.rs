//! Record publishing to the work queue
//!
//! Each decoded row becomes one message on the catalog work queue. Publishes
//! return only once the backend has acknowledged receipt; the queue is
//! at-least-once and consumers may see messages out of order.

use crate::decoder::DecodedRow;
use async_trait::async_trait;
use catalog_common::{CatalogError, Result};
use tracing::{debug, instrument};

/// Sink for decoded rows.
#[async_trait]
pub trait RecordPublisher: Send + Sync {
    /// Submit one row for delivery; `Ok` means the backend acknowledged it.
    async fn publish(&self, row: &DecodedRow) -> Result<()>;
}

/// SQS-backed publisher, one `SendMessage` per row.
#[derive(Clone)]
pub struct SqsPublisher {
    client: aws_sdk_sqs::Client,
    queue_url: String,
}

impl SqsPublisher {
    pub async fn new(region: &str, queue_url: impl Into<String>) -> Self {
        let shared = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        Self {
            client: aws_sdk_sqs::Client::new(&shared),
            queue_url: queue_url.into(),
        }
    }

    pub fn from_client(client: aws_sdk_sqs::Client, queue_url: impl Into<String>) -> Self {
        Self {
            client,
            queue_url: queue_url.into(),
        }
    }
}

#[async_trait]
impl RecordPublisher for SqsPublisher {
    #[instrument(skip(self, row))]
    async fn publish(&self, row: &DecodedRow) -> Result<()> {
        let body = serde_json::to_string(row)?;

        debug!(queue_url = %self.queue_url, body = %body, "Sending record to queue");

        self.client
            .send_message()
            .queue_url(&self.queue_url)
            .message_body(body)
            .send()
            .await
            .map_err(|err| {
                CatalogError::Publish(format!(
                    "failed to send message to {}: {}",
                    self.queue_url,
                    err.into_service_error()
                ))
            })?;

        Ok(())
    }
}

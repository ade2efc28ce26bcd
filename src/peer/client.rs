use super::protocol::{announce_url, parse_redistribute_signal, parse_status, status_url};
use crate::membership::types::Node;

use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// Outbound requests to other nodes.
#[async_trait]
pub trait PeerClient: Send + Sync {
    /// Announces `message_id` held at `caller_address` to a coordinator and
    /// returns its redistribute signal.
    async fn announce(
        &self,
        coordinator: &Node,
        message_id: &str,
        caller_address: &str,
    ) -> Result<bool>;

    /// Asks a coordinator for the current status of a message. Negative
    /// values mean the status is unknown.
    async fn message_status(&self, coordinator: &Node, message_id: &str) -> Result<i64>;
}

/// `PeerClient` over plain HTTP.
///
/// Every request carries `request_timeout`; failed sends are retried up to
/// `attempts` times in total with jittered exponential backoff.
pub struct HttpPeerClient {
    http_client: reqwest::Client,
    request_timeout: Duration,
    attempts: usize,
}

impl HttpPeerClient {
    pub fn new(request_timeout: Duration, attempts: usize) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            request_timeout,
            attempts: attempts.max(1),
        }
    }

    async fn get_text(&self, url: String) -> Result<String> {
        let response = self.get_with_retry(url.clone()).await?;

        if !response.status().is_success() {
            return Err(anyhow::anyhow!(
                "Peer request to {} failed: {}",
                url,
                response.status()
            ));
        }

        Ok(response.text().await?)
    }

    async fn get_with_retry(&self, url: String) -> Result<reqwest::Response> {
        let mut delay_ms = 150u64;

        for attempt in 0..self.attempts {
            let response = self
                .http_client
                .get(url.clone())
                .timeout(self.request_timeout)
                .send()
                .await;

            match response {
                Ok(resp) => return Ok(resp),
                Err(e) => {
                    if attempt + 1 == self.attempts {
                        return Err(anyhow::anyhow!(e));
                    }
                    tracing::debug!(
                        "Peer request to {} failed (attempt {}): {}",
                        url,
                        attempt + 1,
                        e
                    );
                    let jitter = rand::random::<u64>() % 50;
                    tokio::time::sleep(Duration::from_millis(delay_ms + jitter)).await;
                    delay_ms = (delay_ms * 2).min(1200);
                }
            }
        }

        Err(anyhow::anyhow!("Retry attempts exhausted"))
    }
}

#[async_trait]
impl PeerClient for HttpPeerClient {
    async fn announce(
        &self,
        coordinator: &Node,
        message_id: &str,
        caller_address: &str,
    ) -> Result<bool> {
        let body = self
            .get_text(announce_url(&coordinator.address, message_id, caller_address))
            .await?;
        Ok(parse_redistribute_signal(&body))
    }

    async fn message_status(&self, coordinator: &Node, message_id: &str) -> Result<i64> {
        let body = self
            .get_text(status_url(&coordinator.address, message_id))
            .await?;
        Ok(parse_status(&body))
    }
}

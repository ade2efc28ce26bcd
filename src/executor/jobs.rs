//! Node Jobs
//!
//! The background work a storage node performs after answering a request:
//! announcing new messages to coordinators and refreshing message status.
//! Everything here is best-effort. Errors go back to the executor, which
//! logs them; they never reach the HTTP caller.

use super::executor::JobHandler;
use super::types::Job;
use crate::membership::directory::NodeDirectory;
use crate::peer::client::PeerClient;

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Coordinators sampled per replication announcement.
pub const ANNOUNCE_FANOUT: usize = 3;

pub struct NodeJobs {
    directory: Arc<dyn NodeDirectory>,
    peers: Arc<dyn PeerClient>,
    /// Address other nodes use to reach this node.
    advertised_address: String,
}

impl NodeJobs {
    pub fn new(
        directory: Arc<dyn NodeDirectory>,
        peers: Arc<dyn PeerClient>,
        advertised_address: impl Into<String>,
    ) -> Arc<Self> {
        Arc::new(Self {
            directory,
            peers,
            advertised_address: advertised_address.into(),
        })
    }

    /// Announces a stored message to a random coordinator sample.
    ///
    /// The redistribute decision follows the last coordinator that answered.
    /// Returns the decision; fails only if no coordinator could be reached.
    pub async fn announce_replication(&self, message_id: &str) -> Result<bool> {
        let coordinators = self
            .directory
            .random_coordinator_nodes(ANNOUNCE_FANOUT)
            .await?;

        if coordinators.is_empty() {
            tracing::warn!("No coordinators known, message {} not announced", message_id);
            return Ok(false);
        }

        let mut redistribute = false;
        let mut reached = 0usize;

        for coordinator in &coordinators {
            match self
                .peers
                .announce(coordinator, message_id, &self.advertised_address)
                .await
            {
                Ok(signal) => {
                    reached += 1;
                    redistribute = signal;
                    tracing::debug!(
                        "Announced message {} to {} (redistribute: {})",
                        message_id,
                        coordinator.address,
                        signal
                    );
                }
                Err(e) => {
                    tracing::warn!(
                        "Announcing message {} to {} failed: {}",
                        message_id,
                        coordinator.address,
                        e
                    );
                }
            }
        }

        if reached == 0 {
            return Err(anyhow::anyhow!(
                "Message {} could not be announced to any of {} coordinator(s)",
                message_id,
                coordinators.len()
            ));
        }

        if redistribute {
            self.redistribute(message_id);
        }

        Ok(redistribute)
    }

    // TODO: push the message to other storage nodes once the node-to-node
    // transfer endpoint is defined; until then the decision is only logged.
    fn redistribute(&self, message_id: &str) {
        tracing::info!(
            "Coordinator requested redistribution of message {}; push replication is not enabled",
            message_id
        );
    }

    /// Looks up a message's status at a coordinator and records it when valid.
    ///
    /// Returns the recorded status, or `None` when the coordinator reported
    /// none.
    pub async fn refresh_status(&self, message_id: &str) -> Result<Option<i64>> {
        let coordinator = self
            .directory
            .random_coordinator_nodes(1)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("No coordinator available for status lookup"))?;

        let status = self.peers.message_status(&coordinator, message_id).await?;

        if status < 0 {
            tracing::debug!("No valid status for message {} ({})", message_id, status);
            return Ok(None);
        }

        self.directory
            .update_message_status(message_id, status)
            .await?;
        tracing::debug!("Refreshed status of message {} to {}", message_id, status);

        Ok(Some(status))
    }
}

#[async_trait]
impl JobHandler for NodeJobs {
    async fn run(&self, job: &Job) -> Result<()> {
        match job {
            Job::AnnounceReplication { message_id } => {
                self.announce_replication(message_id).await?;
            }
            Job::RefreshStatus { message_id } => {
                self.refresh_status(message_id).await?;
            }
        }
        Ok(())
    }
}

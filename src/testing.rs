//! Recording test doubles for the node's collaborators.

use crate::executor::executor::JobHandler;
use crate::executor::types::Job;
use crate::membership::directory::NodeDirectory;
use crate::membership::types::Node;
use crate::peer::client::PeerClient;
use crate::storage::memory::MemoryStore;
use crate::storage::types::{Message, MessageStore, StoreError};

use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Memory store that records every `put` and can be told to fail.
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    pub puts: Mutex<Vec<Message>>,
    pub fail_put_with: Mutex<Option<StoreError>>,
}

impl RecordingStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub async fn put_count(&self) -> usize {
        self.puts.lock().await.len()
    }
}

#[async_trait]
impl MessageStore for RecordingStore {
    async fn get(&self, message_id: &str) -> Result<Message, StoreError> {
        self.inner.get(message_id).await
    }

    async fn put(&self, message: Message) -> Result<(), StoreError> {
        self.puts.lock().await.push(message.clone());
        if let Some(err) = self.fail_put_with.lock().await.take() {
            return Err(err);
        }
        self.inner.put(message).await
    }
}

/// Directory with fixed node lists that records status updates.
#[derive(Default)]
pub struct MockDirectory {
    pub coordinators: Vec<Node>,
    pub storage: Vec<Node>,
    pub sample_requests: Mutex<Vec<usize>>,
    pub status_updates: Mutex<Vec<(String, i64)>>,
}

impl MockDirectory {
    pub fn with_coordinators(addresses: &[&str]) -> Arc<Self> {
        Arc::new(Self {
            coordinators: addresses.iter().map(|a| Node::coordinator(*a)).collect(),
            ..Default::default()
        })
    }
}

#[async_trait]
impl NodeDirectory for MockDirectory {
    async fn random_coordinator_nodes(&self, count: usize) -> Result<Vec<Node>> {
        self.sample_requests.lock().await.push(count);
        Ok(self.coordinators.iter().take(count).cloned().collect())
    }

    async fn coordinator_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.coordinators.clone())
    }

    async fn storage_nodes(&self, limit: usize) -> Result<Vec<Node>> {
        Ok(self.storage.iter().take(limit).cloned().collect())
    }

    async fn update_message_status(&self, message_id: &str, status: i64) -> Result<()> {
        self.status_updates
            .lock()
            .await
            .push((message_id.to_string(), status));
        Ok(())
    }
}

/// Peer client answering from per-coordinator tables.
///
/// Coordinators without an entry in `signals` fail the announcement.
#[derive(Default)]
pub struct MockPeers {
    pub signals: HashMap<String, bool>,
    pub status: Option<i64>,
    pub delay: Option<Duration>,
    pub announcements: Mutex<Vec<(String, String, String)>>,
}

#[async_trait]
impl PeerClient for MockPeers {
    async fn announce(
        &self,
        coordinator: &Node,
        message_id: &str,
        caller_address: &str,
    ) -> Result<bool> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.announcements.lock().await.push((
            coordinator.address.clone(),
            message_id.to_string(),
            caller_address.to_string(),
        ));
        self.signals
            .get(&coordinator.address)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("coordinator {} unreachable", coordinator.address))
    }

    async fn message_status(&self, _coordinator: &Node, _message_id: &str) -> Result<i64> {
        self.status
            .ok_or_else(|| anyhow::anyhow!("status lookup failed"))
    }
}

/// Job handler that records jobs and fails, sleeps or panics on demand.
#[derive(Default)]
pub struct RecordingHandler {
    pub seen: Mutex<Vec<Job>>,
    pub fail: bool,
    pub panic: bool,
    pub delay: Option<Duration>,
}

#[async_trait]
impl JobHandler for RecordingHandler {
    async fn run(&self, job: &Job) -> Result<()> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.seen.lock().await.push(job.clone());
        if self.panic {
            panic!("job handler panic");
        }
        if self.fail {
            return Err(anyhow::anyhow!("intentional failure"));
        }
        Ok(())
    }
}

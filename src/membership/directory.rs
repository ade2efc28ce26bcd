//! Node Directory
//!
//! The storage node's view of the network: which coordinators and storage
//! nodes exist, plus a record store for the last known status of each
//! message. Handlers only read node listings; jobs sample coordinators and
//! write status records.

use super::types::{Node, NodeId, NodeRole};

use anyhow::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use rand::seq::SliceRandom;
use std::sync::Arc;

/// Read/write interface to the node directory.
#[async_trait]
pub trait NodeDirectory: Send + Sync {
    /// Returns up to `count` distinct coordinators chosen uniformly at random.
    async fn random_coordinator_nodes(&self, count: usize) -> Result<Vec<Node>>;

    /// Returns every known coordinator.
    async fn coordinator_nodes(&self) -> Result<Vec<Node>>;

    /// Returns at most `limit` known storage nodes.
    async fn storage_nodes(&self, limit: usize) -> Result<Vec<Node>>;

    /// Persists the latest delivery/replication status of a message.
    async fn update_message_status(&self, message_id: &str, status: i64) -> Result<()>;
}

/// In-process directory seeded from configuration.
pub struct StaticDirectory {
    members: Arc<DashMap<NodeId, Node>>,
    message_status: Arc<DashMap<String, i64>>,
}

impl StaticDirectory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Builds a directory from coordinator and storage node addresses.
    pub fn from_addresses(coordinators: &[String], storage_nodes: &[String]) -> Arc<Self> {
        let directory = Self::default();
        for address in coordinators {
            directory.register(Node::coordinator(address.as_str()));
        }
        for address in storage_nodes {
            directory.register(Node::storage(address.as_str()));
        }
        tracing::info!(
            "Node directory seeded with {} coordinator(s) and {} storage node(s)",
            coordinators.len(),
            storage_nodes.len()
        );
        Arc::new(directory)
    }

    pub fn register(&self, node: Node) {
        tracing::debug!("Registering {:?} node {}", node.role, node.address);
        self.members.insert(node.id.clone(), node);
    }

    pub fn message_status(&self, message_id: &str) -> Option<i64> {
        self.message_status.get(message_id).map(|entry| *entry.value())
    }

    fn members_with_role(&self, role: NodeRole) -> Vec<Node> {
        let mut nodes: Vec<Node> = self
            .members
            .iter()
            .filter(|entry| entry.value().role == role)
            .map(|entry| entry.value().clone())
            .collect();
        // DashMap iteration order is arbitrary; keep listings stable.
        nodes.sort_by(|a, b| a.address.cmp(&b.address));
        nodes
    }
}

impl Default for StaticDirectory {
    fn default() -> Self {
        Self {
            members: Arc::new(DashMap::new()),
            message_status: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl NodeDirectory for StaticDirectory {
    async fn random_coordinator_nodes(&self, count: usize) -> Result<Vec<Node>> {
        let coordinators = self.members_with_role(NodeRole::Coordinator);
        let sample = coordinators
            .choose_multiple(&mut rand::thread_rng(), count)
            .cloned()
            .collect();
        Ok(sample)
    }

    async fn coordinator_nodes(&self) -> Result<Vec<Node>> {
        Ok(self.members_with_role(NodeRole::Coordinator))
    }

    async fn storage_nodes(&self, limit: usize) -> Result<Vec<Node>> {
        let mut nodes = self.members_with_role(NodeRole::Storage);
        nodes.truncate(limit);
        Ok(nodes)
    }

    async fn update_message_status(&self, message_id: &str, status: i64) -> Result<()> {
        self.message_status.insert(message_id.to_string(), status);
        tracing::debug!("Recorded status {} for message {}", status, message_id);
        Ok(())
    }
}

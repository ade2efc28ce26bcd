use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// Role a peer plays in the message network.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NodeRole {
    /// Tracks announced messages and decides on redistribution.
    Coordinator,
    /// Durably holds message content.
    Storage,
}

/// A peer known to the node directory.
///
/// Peers are identified on the wire by `address` (`host:port`); the `id` only
/// keys the directory's own records.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Node {
    pub id: NodeId,
    pub address: String,
    pub role: NodeRole,
}

impl Node {
    pub fn coordinator(address: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            address: address.into(),
            role: NodeRole::Coordinator,
        }
    }

    pub fn storage(address: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            address: address.into(),
            role: NodeRole::Storage,
        }
    }
}

//! Storage API Protocol
//!
//! Route patterns, control sub-actions and the fixed response texts of the
//! storage API.

/// Route capturing every path below the storage prefix.
pub const ENDPOINT_STORAGE: &str = "/storage/*path";
/// Prefix every valid storage request path starts with.
pub const STORAGE_PREFIX: &str = "/storage/";

/// Control sub-action listing storage nodes.
pub const CONTROL_GET_STORAGE_NODES: &str = "get-storage-nodes";
/// Control sub-action listing coordinator nodes.
pub const CONTROL_GET_COORDINATOR_NODES: &str = "get-coordinator-nodes";
/// Most storage nodes returned by `get-storage-nodes`.
pub const CONTROL_STORAGE_NODE_LIMIT: usize = 10;

pub const MSG_INVALID_REQUEST: &str = "Invalid Action or MessageID";
pub const MSG_TOO_LARGE: &str = "Message too large to be accepted by this node";
pub const MSG_TRANSMISSION_FAILED: &str = "Transmission of Message Body failed. Please try again.";
pub const MSG_SERVE_FAILED: &str = "Error serving message from disk";
pub const MSG_EXPORT_STORAGE_NODES_FAILED: &str = "Failed to export StorageNodes.";
pub const MSG_EXPORT_COORDINATOR_NODES_FAILED: &str = "Failed to export CoordinatorNodes.";
pub const MSG_OK: &str = "OK";

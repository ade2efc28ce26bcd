//! Membership & Discovery Module
//!
//! The node directory: which coordinators and storage nodes this node knows
//! about, and where message status records are kept.
//!
//! ## Core Concepts
//! - **Roles**: Every peer is either a coordinator or a storage node.
//! - **Sampling**: Replication announcements go to a small random sample of coordinators.
//! - **Status Records**: The latest known status per message, refreshed asynchronously.

pub mod directory;
pub mod types;

#[cfg(test)]
mod tests;

//! Message Network Storage Node Library
//!
//! This library crate defines the modules that make up a storage node. It
//! serves as the foundation for the binary executable (`main.rs`).
//!
//! ## Architecture Modules
//! - **`api`**: The `/storage/<action>/<messageID>` HTTP surface. Parses and
//!   validates requests, then runs the get / put / update / control handlers.
//! - **`executor`**: The bounded job queue and worker pool that carry
//!   replication announcements and status refreshes off the response path.
//! - **`membership`**: The node directory: coordinator and storage node
//!   listings, random coordinator sampling, message status records.
//! - **`peer`**: Outbound HTTP requests to coordinator nodes.
//! - **`storage`**: The local, immutable message store (memory or disk).
//! - **`config`**: Command-line arguments and node configuration.

pub mod api;
pub mod config;
pub mod executor;
pub mod membership;
pub mod peer;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

//! Local Message Storage Module
//!
//! Holds the immutable messages this node is responsible for.
//!
//! ## Core Concepts
//! - **Immutability**: A message id, once stored, always refers to the same content.
//! - **Status Mapping**: Store failures carry the HTTP status the API reports verbatim.
//! - **Backends**: `MemoryStore` for tests and ephemeral nodes, `DiskStore` for durable nodes.

pub mod disk;
pub mod memory;
pub mod types;

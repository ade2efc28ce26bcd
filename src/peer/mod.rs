//! Peer Communication Module
//!
//! Outbound node-to-node requests made by background jobs. The HTTP serving
//! path never calls into this module directly.

pub mod client;
pub mod protocol;

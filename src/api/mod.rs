//! Storage HTTP API Module
//!
//! The storage node's public surface: `/storage/<action>/<messageID>`.
//!
//! ## Request Flow
//! 1. **Routing**: Every request under `/storage/` reaches a single entry point;
//!    anything else is rejected.
//! 2. **Validation**: `StorageRequest::parse` turns the raw path into a typed
//!    action and a sanitized message id. Invalid requests are answered with 400
//!    before any store access or job submission.
//! 3. **Handling**: `get`, `put`, `update` and `control` each have their own
//!    contract; `put` and `update` hand follow-up work to the job queue.

pub mod handlers;
pub mod protocol;
pub mod request;


use crate::executor::queue::JobQueue;
use crate::membership::directory::NodeDirectory;
use crate::storage::types::MessageStore;

use axum::routing::any;
use axum::{Extension, Router};
use std::sync::Arc;

/// Everything a storage request handler needs.
pub struct StorageContext {
    pub store: Arc<dyn MessageStore>,
    pub directory: Arc<dyn NodeDirectory>,
    pub jobs: Arc<JobQueue>,
    /// Put bodies above this many bytes are refused.
    pub max_message_size: usize,
}

/// Builds the storage API router.
pub fn router(context: Arc<StorageContext>) -> Router {
    Router::new()
        .route(protocol::ENDPOINT_STORAGE, any(handlers::handle_request))
        .fallback(handlers::handle_invalid)
        .layer(Extension(context))
}

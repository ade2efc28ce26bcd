//! Storage Data Types
//!
//! The message model and the contract between request handlers and the local
//! message store.

use async_trait::async_trait;
use axum::http::StatusCode;
use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// An immutable message held by this node.
///
/// Identity is the sanitized `id`. Content is kept byte-exact in the store;
/// in JSON it is rendered as text, with invalid UTF-8 replaced lossily.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    #[serde(serialize_with = "content_as_text", deserialize_with = "content_from_text")]
    pub content: Bytes,
}

impl Message {
    pub fn new(id: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
        }
    }
}

fn content_as_text<S: Serializer>(content: &Bytes, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&String::from_utf8_lossy(content))
}

fn content_from_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Bytes, D::Error> {
    let text = String::deserialize(deserializer)?;
    Ok(Bytes::from(text))
}

/// Failure reported by a message store.
///
/// Each variant maps onto the HTTP status the storage API passes through to
/// the caller.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("message {0} not found")]
    NotFound(String),

    #[error("message {0} already stored with different content")]
    Conflict(String),

    #[error("storage I/O failure: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    pub fn status(&self) -> StatusCode {
        match self {
            StoreError::NotFound(_) => StatusCode::NOT_FOUND,
            StoreError::Conflict(_) => StatusCode::CONFLICT,
            StoreError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Local message store used by the storage API.
#[async_trait]
pub trait MessageStore: Send + Sync {
    async fn get(&self, message_id: &str) -> Result<Message, StoreError>;

    /// Stores a message. Re-storing identical content succeeds; different
    /// content under an existing id is a conflict.
    async fn put(&self, message: Message) -> Result<(), StoreError>;
}

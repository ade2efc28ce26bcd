use super::types::{Message, MessageStore, StoreError};

use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;

/// Message store kept entirely in memory.
pub struct MemoryStore {
    local_data: Arc<DashMap<String, Bytes>>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn local_entry_count(&self) -> usize {
        self.local_data.len()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self {
            local_data: Arc::new(DashMap::new()),
        }
    }
}

#[async_trait]
impl MessageStore for MemoryStore {
    async fn get(&self, message_id: &str) -> Result<Message, StoreError> {
        self.local_data
            .get(message_id)
            .map(|entry| Message::new(message_id, entry.value().clone()))
            .ok_or_else(|| StoreError::NotFound(message_id.to_string()))
    }

    async fn put(&self, message: Message) -> Result<(), StoreError> {
        match self.local_data.entry(message.id.clone()) {
            Entry::Occupied(existing) => {
                if existing.get() == &message.content {
                    Ok(())
                } else {
                    Err(StoreError::Conflict(message.id))
                }
            }
            Entry::Vacant(slot) => {
                tracing::debug!(
                    "Stored message {} ({} bytes) in memory",
                    message.id,
                    message.content.len()
                );
                slot.insert(message.content);
                Ok(())
            }
        }
    }
}

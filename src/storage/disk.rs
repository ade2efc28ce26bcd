//! Disk-backed message store.
//!
//! One file per message under the data directory, named by the sanitized
//! message id. Writes go to a temporary file first and are published with a
//! hard link, so a message file is either absent or complete and is never
//! replaced once it exists.

use super::types::{Message, MessageStore, StoreError};

use async_trait::async_trait;
use bytes::Bytes;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct DiskStore {
    data_dir: PathBuf,
}

impl DiskStore {
    /// Opens (and creates if needed) a store rooted at `data_dir`.
    pub async fn open(data_dir: impl AsRef<Path>) -> anyhow::Result<Arc<Self>> {
        let data_dir = data_dir.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&data_dir).await?;
        tracing::info!("Disk store opened at {}", data_dir.display());
        Ok(Arc::new(Self { data_dir }))
    }

    fn message_path(&self, message_id: &str) -> PathBuf {
        self.data_dir.join(message_id)
    }

    async fn read_content(&self, message_id: &str) -> Result<Option<Bytes>, StoreError> {
        match tokio::fs::read(self.message_path(message_id)).await {
            Ok(content) => Ok(Some(Bytes::from(content))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

#[async_trait]
impl MessageStore for DiskStore {
    async fn get(&self, message_id: &str) -> Result<Message, StoreError> {
        match self.read_content(message_id).await? {
            Some(content) => Ok(Message::new(message_id, content)),
            None => Err(StoreError::NotFound(message_id.to_string())),
        }
    }

    async fn put(&self, message: Message) -> Result<(), StoreError> {
        if let Some(existing) = self.read_content(&message.id).await? {
            return if existing == message.content {
                Ok(())
            } else {
                Err(StoreError::Conflict(message.id))
            };
        }

        let tmp_path = self
            .data_dir
            .join(format!(".{}.{}.tmp", message.id, uuid::Uuid::new_v4()));
        tokio::fs::write(&tmp_path, &message.content).await?;

        let published = tokio::fs::hard_link(&tmp_path, self.message_path(&message.id)).await;
        if let Err(e) = tokio::fs::remove_file(&tmp_path).await {
            tracing::warn!("Failed to remove temp file {}: {}", tmp_path.display(), e);
        }

        match published {
            Ok(()) => {
                tracing::debug!(
                    "Stored message {} ({} bytes) on disk",
                    message.id,
                    message.content.len()
                );
                Ok(())
            }
            // Lost a race with a concurrent writer of the same id.
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                match self.read_content(&message.id).await? {
                    Some(existing) if existing == message.content => Ok(()),
                    _ => Err(StoreError::Conflict(message.id)),
                }
            }
            Err(e) => Err(StoreError::Io(e)),
        }
    }
}

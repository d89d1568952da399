use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::DomainResult;

/// Trait for photo byte storage (GridFS in production)
#[async_trait]
pub trait PhotoStorage: Send + Sync {
    /// Store the bytes and return the storage id
    async fn store(&self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> DomainResult<String>;

    async fn load(&self, storage_id: &str) -> DomainResult<Option<Vec<u8>>>;

    /// Deleting an unknown id is not an error
    async fn delete(&self, storage_id: &str) -> DomainResult<()>;
}

#[derive(Clone, Default)]
pub struct InMemoryPhotoStorage {
    blobs: Arc<RwLock<HashMap<String, Vec<u8>>>>,
}

impl InMemoryPhotoStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }
}

#[async_trait]
impl PhotoStorage for InMemoryPhotoStorage {
    async fn store(&self, _file_name: &str, _content_type: &str, bytes: Vec<u8>) -> DomainResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.blobs.write().await.insert(id.clone(), bytes);
        Ok(id)
    }

    async fn load(&self, storage_id: &str) -> DomainResult<Option<Vec<u8>>> {
        Ok(self.blobs.read().await.get(storage_id).cloned())
    }

    async fn delete(&self, storage_id: &str) -> DomainResult<()> {
        self.blobs.write().await.remove(storage_id);
        Ok(())
    }
}

//! GridFS implementation of the PhotoStorage trait.
//!
//! Each photo is one GridFS file; its ObjectId in hex is the storage id kept
//! in the `listing_photos` table.

use async_trait::async_trait;
use futures_util::io::{AsyncReadExt, AsyncWriteExt};
use mongodb::bson::{doc, oid::ObjectId, Bson};
use mongodb::error::{ErrorKind, GridFsErrorKind};
use mongodb::gridfs::GridFsBucket;
use mongodb::options::GridFsBucketOptions;
use mongodb::Client;

use eh_core::services::PhotoStorage;
use eh_core::{DomainError, DomainResult};
use eh_shared::PhotoStorageConfig;

use crate::InfrastructureError;

pub struct GridFsPhotoStorage {
    bucket: GridFsBucket,
}

impl GridFsPhotoStorage {
    /// Connect to MongoDB and open the configured bucket
    pub async fn connect(config: &PhotoStorageConfig) -> Result<Self, InfrastructureError> {
        tracing::info!(
            database = %config.database,
            bucket = %config.bucket,
            "Connecting to photo storage"
        );

        let client = Client::with_uri_str(&config.mongodb_uri).await?;
        let database = client.database(&config.database);
        database.run_command(doc! { "ping": 1 }).await?;

        let options = GridFsBucketOptions::builder()
            .bucket_name(config.bucket.clone())
            .build();

        Ok(Self {
            bucket: database.gridfs_bucket(options),
        })
    }

    fn object_id(storage_id: &str) -> Option<Bson> {
        ObjectId::parse_str(storage_id).ok().map(Bson::ObjectId)
    }

    fn is_file_not_found(err: &mongodb::error::Error) -> bool {
        matches!(
            *err.kind,
            ErrorKind::GridFs(GridFsErrorKind::FileNotFound { .. })
        )
    }

    fn storage_error(action: &str, err: mongodb::error::Error) -> DomainError {
        tracing::error!(error = %err, "Photo storage failed to {}", action);
        DomainError::ServiceUnavailable {
            service: "photo storage".to_string(),
        }
    }
}

#[async_trait]
impl PhotoStorage for GridFsPhotoStorage {
    async fn store(&self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> DomainResult<String> {
        let mut upload = self
            .bucket
            .open_upload_stream(file_name)
            .metadata(doc! { "contentType": content_type })
            .await
            .map_err(|e| Self::storage_error("open upload", e))?;

        upload
            .write_all(&bytes)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to write photo: {}", e)))?;
        upload
            .close()
            .await
            .map_err(|e| DomainError::internal(format!("Failed to finish photo upload: {}", e)))?;

        let id = match upload.id() {
            Bson::ObjectId(oid) => oid.to_hex(),
            other => other.to_string(),
        };
        tracing::debug!(storage_id = %id, size = bytes.len(), "Photo stored");
        Ok(id)
    }

    async fn load(&self, storage_id: &str) -> DomainResult<Option<Vec<u8>>> {
        let Some(id) = Self::object_id(storage_id) else {
            return Ok(None);
        };

        let mut download = match self.bucket.open_download_stream(id).await {
            Ok(stream) => stream,
            Err(e) if Self::is_file_not_found(&e) => return Ok(None),
            Err(e) => return Err(Self::storage_error("open download", e)),
        };

        let mut bytes = Vec::new();
        download
            .read_to_end(&mut bytes)
            .await
            .map_err(|e| DomainError::internal(format!("Failed to read photo: {}", e)))?;
        Ok(Some(bytes))
    }

    async fn delete(&self, storage_id: &str) -> DomainResult<()> {
        let Some(id) = Self::object_id(storage_id) else {
            return Ok(());
        };

        match self.bucket.delete(id).await {
            Ok(()) => Ok(()),
            Err(e) if Self::is_file_not_found(&e) => Ok(()),
            Err(e) => Err(Self::storage_error("delete", e)),
        }
    }
}

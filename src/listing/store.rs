//! Object store listing
//!
//! Implements [`BlobListing`] over one container of a storage account.

use super::types::{BlobListing, ChildEntry, FileListing, FileMeta};
use crate::error::{Error, Result};
use crate::storage::ContainerStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::ObjectMeta;
use tracing::debug;

/// Listing backed by an `object_store` container
#[derive(Debug, Clone)]
pub struct ObjectStoreListing {
    store: ContainerStore,
}

impl ObjectStoreListing {
    /// Create a listing over a container
    pub fn new(store: ContainerStore) -> Self {
        Self { store }
    }

    /// The container being listed
    pub fn container_store(&self) -> &ContainerStore {
        &self.store
    }
}

#[async_trait]
impl BlobListing for ObjectStoreListing {
    async fn list_children(&self, path: &str) -> Result<Vec<ChildEntry>> {
        let prefix = self.store.object_path(path)?;
        let result = match self.store.store().list_with_delimiter(Some(&prefix)).await {
            Ok(result) => result,
            Err(object_store::Error::NotFound { .. }) => return Err(Error::not_found(path)),
            Err(e) => return Err(e.into()),
        };

        let mut children: Vec<ChildEntry> = result
            .objects
            .iter()
            .map(|meta| ChildEntry::file(self.store.full_path(&meta.location)))
            .chain(
                result
                    .common_prefixes
                    .iter()
                    .map(|dir| ChildEntry::directory(self.store.full_path(dir))),
            )
            .collect();

        // Object stores have no empty directories
        if children.is_empty() {
            return Err(Error::not_found(path));
        }

        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }

    async fn list_all(&self, path: &str) -> Result<FileListing> {
        let prefix = self.store.object_path(path)?;
        let metas: Vec<ObjectMeta> = match self.store.store().list(Some(&prefix)).try_collect().await
        {
            Ok(metas) => metas,
            Err(object_store::Error::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };

        debug!("Listed {} files under {}", metas.len(), path);

        Ok(metas
            .into_iter()
            .map(|meta| {
                (
                    self.store.full_path(&meta.location),
                    FileMeta {
                        last_modified: meta.last_modified,
                        size: meta.size as u64,
                    },
                )
            })
            .collect())
    }
}

//! One container of a storage account

use crate::error::{Error, Result};
use crate::types::{DatalakePath, SEPARATOR};
use bytes::Bytes;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// An object store scoped to one container
#[derive(Debug, Clone)]
pub struct ContainerStore {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Container (bucket) name
    container: String,
    /// Whether the container is a top-level prefix inside the store
    nested: bool,
}

impl ContainerStore {
    /// Wrap a store for `container`
    ///
    /// With `nested`, object paths keep the container as their first segment
    /// (local directories, memory); otherwise the store is the container.
    pub fn new(store: Arc<dyn ObjectStore>, container: impl Into<String>, nested: bool) -> Self {
        Self {
            store,
            container: container.into(),
            nested,
        }
    }

    /// Container name
    pub fn container(&self) -> &str {
        &self.container
    }

    /// The underlying object store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Object path for a full `container/blob/path`
    ///
    /// Segments are kept verbatim, so this is the inverse of [`Self::full_path`]
    /// for listed locations (`ts=00%3A00` stays `ts=00%3A00`).
    pub fn object_path(&self, path: &str) -> Result<ObjectPath> {
        let parsed = DatalakePath::parse(path)?;
        if parsed.container() != self.container {
            return Err(Error::invalid_path(
                path,
                format!("path is outside container '{}'", self.container),
            ));
        }

        let blob = parsed.blob_path().trim_end_matches(SEPARATOR);
        let key = match (self.nested, blob.is_empty()) {
            (true, true) => self.container.clone(),
            (true, false) => format!("{}{SEPARATOR}{blob}", self.container),
            (false, _) => blob.to_string(),
        };
        ObjectPath::parse(&key).map_err(|e| Error::invalid_path(path, e.to_string()))
    }

    /// Full `container/blob/path` for an object location
    pub fn full_path(&self, location: &ObjectPath) -> String {
        if self.nested {
            location.to_string()
        } else {
            format!("{}{SEPARATOR}{location}", self.container)
        }
    }

    /// Read a whole object
    pub async fn get(&self, path: &str) -> Result<Bytes> {
        let location = self.object_path(path)?;
        match self.store.get(&location).await {
            Ok(result) => Ok(result.bytes().await?),
            Err(object_store::Error::NotFound { .. }) => Err(Error::FileNotFound {
                path: path.to_string(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a whole object
    pub async fn put(&self, path: &str, data: Bytes) -> Result<()> {
        let location = self.object_path(path)?;
        self.store.put(&location, data.into()).await?;
        Ok(())
    }
}

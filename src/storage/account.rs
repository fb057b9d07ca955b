//! Storage account parsing (Azure, S3, R2, GCS, local, memory)

use super::container::ContainerStore;
use crate::error::{Error, Result};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::ObjectStore;
use std::path::PathBuf;
use std::sync::Arc;
use url::Url;

/// A storage account holding containers
///
/// Credentials are read from the environment by the `object_store` builders
/// (`AZURE_STORAGE_ACCOUNT_KEY`, `AWS_ACCESS_KEY_ID`, ...).
#[derive(Debug, Clone)]
pub enum StorageAccount {
    /// Azure Blob Storage / ADLS Gen2; containers are blob containers
    Azure {
        /// Account name, or `None` to read it from the environment
        account: Option<String>,
    },
    /// S3 or an S3-compatible service; containers are buckets
    S3 {
        /// Custom endpoint (Cloudflare R2, MinIO)
        endpoint: Option<String>,
    },
    /// Google Cloud Storage; containers are buckets
    Gcs,
    /// Local directory; containers are its subdirectories
    Local {
        /// Directory holding the containers
        root: PathBuf,
    },
    /// Process memory; containers are top-level prefixes
    Memory(Arc<InMemory>),
}

impl StorageAccount {
    /// Parse a storage account URL
    ///
    /// Supported formats:
    /// - `az://account` - Azure Blob Storage
    /// - `s3://` - AWS S3
    /// - `r2://` - Cloudflare R2 (endpoint from `R2_ENDPOINT_URL`)
    /// - `gs://` - Google Cloud Storage
    /// - `file:///local/path` or `/local/path` - Local filesystem
    /// - `memory://` - In-process store
    pub fn parse(url: &str) -> Result<Self> {
        let parsed = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                return Ok(Self::Local {
                    root: PathBuf::from(url),
                });
            }
            Err(e) => return Err(Error::config(format!("Invalid storage URL '{url}': {e}"))),
        };

        match parsed.scheme() {
            "az" | "azure" | "abfs" | "abfss" => Ok(Self::Azure {
                account: parsed
                    .host_str()
                    .filter(|host| !host.is_empty())
                    .map(String::from),
            }),
            "s3" => Ok(Self::S3 { endpoint: None }),
            "r2" => Ok(Self::S3 {
                endpoint: std::env::var("R2_ENDPOINT_URL").ok(),
            }),
            "gs" => Ok(Self::Gcs),
            "file" => {
                let root = parsed
                    .to_file_path()
                    .map_err(|()| Error::config(format!("Invalid file URL: {url}")))?;
                Ok(Self::Local { root })
            }
            "memory" => Ok(Self::memory()),
            other => Err(Error::config(format!("Unsupported storage scheme: {other}"))),
        }
    }

    /// A fresh in-memory account
    pub fn memory() -> Self {
        Self::Memory(Arc::new(InMemory::new()))
    }

    /// A local directory account
    pub fn local(root: impl Into<PathBuf>) -> Self {
        Self::Local { root: root.into() }
    }

    /// Get the scheme (az, s3, gs, file, memory)
    pub fn scheme(&self) -> &str {
        match self {
            Self::Azure { .. } => "az",
            Self::S3 { .. } => "s3",
            Self::Gcs => "gs",
            Self::Local { .. } => "file",
            Self::Memory(_) => "memory",
        }
    }

    /// Check if this is a cloud account (not local or memory)
    pub fn is_cloud(&self) -> bool {
        matches!(self, Self::Azure { .. } | Self::S3 { .. } | Self::Gcs)
    }

    /// Open one container of the account
    pub fn container_store(&self, container: &str) -> Result<ContainerStore> {
        match self {
            Self::Azure { account } => {
                let mut builder = MicrosoftAzureBuilder::from_env().with_container_name(container);
                if let Some(account) = account {
                    builder = builder.with_account(account);
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;
                Ok(ContainerStore::new(Arc::new(store), container, false))
            }
            Self::S3 { endpoint } => {
                let mut builder = AmazonS3Builder::from_env().with_bucket_name(container);
                if let Some(endpoint) = endpoint {
                    builder = builder.with_endpoint(endpoint);
                }
                let store = builder
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create S3 client: {e}")))?;
                Ok(ContainerStore::new(Arc::new(store), container, false))
            }
            Self::Gcs => {
                let store = GoogleCloudStorageBuilder::from_env()
                    .with_bucket_name(container)
                    .build()
                    .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;
                Ok(ContainerStore::new(Arc::new(store), container, false))
            }
            Self::Local { root } => {
                let store = LocalFileSystem::new_with_prefix(root).map_err(|e| {
                    Error::config(format!(
                        "Failed to open local store at {}: {e}",
                        root.display()
                    ))
                })?;
                Ok(ContainerStore::new(Arc::new(store), container, true))
            }
            Self::Memory(store) => {
                let store: Arc<dyn ObjectStore> = store.clone();
                Ok(ContainerStore::new(store, container, true))
            }
        }
    }
}

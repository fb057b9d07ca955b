//! Listing types and traits
//!
//! Defines the directory-listing contract consumed by partition resolution.

use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// An immediate child of a listed directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChildEntry {
    /// Full path of the child (`container/...`), without a trailing separator
    pub name: String,
    /// Whether the child is a directory (common prefix)
    pub is_directory: bool,
}

impl ChildEntry {
    /// A file child
    pub fn file(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: false,
        }
    }

    /// A directory child
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_directory: true,
        }
    }
}

/// Metadata of a listed file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FileMeta {
    /// Last modification time
    pub last_modified: DateTime<Utc>,
    /// Size in bytes
    pub size: u64,
}

impl FileMeta {
    /// Create metadata with a zero size
    pub fn modified_at(last_modified: DateTime<Utc>) -> Self {
        Self {
            last_modified,
            size: 0,
        }
    }
}

/// Files below a path keyed by full path
pub type FileListing = BTreeMap<String, FileMeta>;

/// Directory-listing capability over a blob hierarchy
///
/// Paths are full `container/blob/path` strings. Directory paths end in `/`.
#[async_trait]
pub trait BlobListing: Send + Sync {
    /// List the immediate children of a directory
    ///
    /// Fails with [`Error::NotFound`](crate::Error::NotFound) when nothing
    /// exists under `path`.
    async fn list_children(&self, path: &str) -> Result<Vec<ChildEntry>>;

    /// List every file below `path`, recursively
    ///
    /// Returns an empty listing when nothing exists under `path`.
    async fn list_all(&self, path: &str) -> Result<FileListing>;
}

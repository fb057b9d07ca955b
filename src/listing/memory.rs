//! In-memory listing
//!
//! A [`BlobListing`] over a fixed set of file paths and timestamps. Useful to
//! resolve partitions against a known layout without touching storage.

use super::types::{BlobListing, ChildEntry, FileListing, FileMeta};
use crate::error::{Error, Result};
use crate::types::{with_trailing_separator, SEPARATOR};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::{BTreeMap, BTreeSet};

/// Listing over an in-memory file table
#[derive(Debug, Clone, Default)]
pub struct InMemoryListing {
    /// Files keyed by full path
    files: FileListing,
    /// Directory paths whose listing fails with a non-`NotFound` error
    failures: BTreeMap<String, String>,
}

impl InMemoryListing {
    /// Create an empty listing
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file with its modification time
    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        self.insert(path, FileMeta::modified_at(last_modified));
        self
    }

    /// Make every listing of `path` fail with `message`
    #[must_use]
    pub fn with_failure(mut self, path: &str, message: impl Into<String>) -> Self {
        self.failures
            .insert(with_trailing_separator(path), message.into());
        self
    }

    /// Add or replace a file
    pub fn insert(&mut self, path: impl Into<String>, meta: FileMeta) {
        self.files.insert(path.into(), meta);
    }

    /// Number of files
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether there are no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn check_failure(&self, prefix: &str) -> Result<()> {
        match self.failures.get(prefix) {
            Some(message) => Err(Error::listing(prefix, message.clone())),
            None => Ok(()),
        }
    }

    fn files_under<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = (&'a String, &'a FileMeta)> {
        self.files
            .range(prefix.to_string()..)
            .take_while(move |(path, _)| path.starts_with(prefix))
    }
}

#[async_trait]
impl BlobListing for InMemoryListing {
    async fn list_children(&self, path: &str) -> Result<Vec<ChildEntry>> {
        let prefix = with_trailing_separator(path);
        self.check_failure(&prefix)?;

        let mut children = Vec::new();
        let mut seen_dirs = BTreeSet::new();

        for (name, _) in self.files_under(&prefix) {
            let rest = &name[prefix.len()..];
            match rest.split_once(SEPARATOR) {
                Some((dir, _)) => {
                    if seen_dirs.insert(dir) {
                        children.push(ChildEntry::directory(format!("{prefix}{dir}")));
                    }
                }
                None => children.push(ChildEntry::file(name.clone())),
            }
        }

        if children.is_empty() {
            return Err(Error::not_found(path));
        }
        Ok(children)
    }

    async fn list_all(&self, path: &str) -> Result<FileListing> {
        let prefix = with_trailing_separator(path);
        self.check_failure(&prefix)?;

        Ok(self
            .files_under(&prefix)
            .map(|(name, meta)| (name.clone(), *meta))
            .collect())
    }
}

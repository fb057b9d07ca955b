//! Storage module
//!
//! Maps a storage account URL to `object_store` backends.
//!
//! # Overview
//!
//! A [`StorageAccount`] describes where containers live (Azure, S3, GCS, a
//! local directory or process memory). Each container is opened as a
//! [`ContainerStore`], which translates `container/blob/path` strings into
//! object paths for reads, writes and listings.

mod account;
mod container;

pub use account::StorageAccount;
pub use container::ContainerStore;

#[cfg(test)]
mod tests;

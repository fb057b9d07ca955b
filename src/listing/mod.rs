//! Listing module
//!
//! The directory-listing contract that partition resolution runs against.
//!
//! # Overview
//!
//! - [`BlobListing::list_children`] lists the immediate children of a
//!   directory and reports `NotFound` when the directory is absent.
//! - [`BlobListing::list_all`] lists every file below a path together with
//!   its last-modified timestamp.
//!
//! [`ObjectStoreListing`] serves the contract from a storage container and
//! [`InMemoryListing`] from a fixed file table.

mod memory;
mod store;
mod types;

pub use memory::InMemoryListing;
pub use store::ObjectStoreListing;
pub use types::{BlobListing, ChildEntry, FileListing, FileMeta};

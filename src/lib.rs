// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # datalake-utils
//!
//! Read and write tabular files in blob storage, with Hive-style partition
//! resolution.
//!
//! ## Features
//!
//! - **Partition resolution**: enumerate `key=value` directories explicitly
//!   or discover them from storage, with inclusion and exclusion filters
//! - **Storage backends**: Azure Blob, S3 / R2, GCS, local directories and
//!   process memory through `object_store`
//! - **Table I/O**: CSV, JSON, JSON Lines, Parquet and Excel workbooks into
//!   Arrow batches
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use datalake_utils::{Datalake, PartitionConfig, PartitionKeys, ReadOptions};
//!
//! #[tokio::main]
//! async fn main() -> datalake_utils::Result<()> {
//!     let datalake = Datalake::from_url("az://myaccount")?;
//!
//!     let config = PartitionConfig::explicit(
//!         PartitionKeys::new()
//!             .with_key("year", [2022, 2023])
//!             .with_key("month", [10]),
//!     );
//!     let table = datalake
//!         .read_csv_with_partition("container/sales/", &config, &ReadOptions::default())
//!         .await?;
//!
//!     println!("{} rows", table.num_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                          Datalake                               │
//! │  read_*(paths)   read_*_with_partition(root)   write_*(batch)   │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//! ┌──────────────┬───────────────┴───┬──────────────┬──────────────┐
//! │  Partition   │     Listing       │   Storage    │    Table     │
//! ├──────────────┼───────────────────┼──────────────┼──────────────┤
//! │ Explicit     │ list_children     │ Azure        │ CSV / JSON   │
//! │ Discovery    │ list_all          │ S3 / R2      │ Parquet      │
//! │ Filters      │ In-memory         │ GCS / Local  │ Concat       │
//! └──────────────┴───────────────────┴──────────────┴──────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Common types and type aliases
pub mod types;

/// Directory listing contract and implementations
pub mod listing;

/// Storage accounts and containers
pub mod storage;

/// Hive partition resolution
pub mod partition;

/// Record decoders (JSON, JSONL, workbooks)
pub mod decode;

/// Arrow tables: schema inference, reading, writing
pub mod table;

/// Read configuration files
pub mod config;

/// Datalake facade
pub mod datalake;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::*;

// Re-export commonly used types
pub use config::PartitionReadConfig;
pub use datalake::{Datalake, PathList};
pub use decode::ReadOptions;
pub use listing::{BlobListing, InMemoryListing, ObjectStoreListing};
pub use partition::{
    resolve, PartitionConfig, PartitionEntry, PartitionKeys, PartitionValues, ResolvedPartitions,
};
pub use storage::StorageAccount;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

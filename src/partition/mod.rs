//! Partition resolution module
//!
//! Supports: explicit partition keys, discovery from storage, recency
//! selection at the deepest level, inclusion/exclusion filters
//!
//! # Overview
//!
//! Hive-style layouts store column values in directory names:
//!
//! ```text
//! container/path/year=2022/month=10/file.csv
//! container/path/year=2022/month=11/file.csv
//! ```
//!
//! [`resolve`] turns such a tree into an ordered list of
//! `(file, key values)` entries. With explicit [`PartitionKeys`] only the
//! Cartesian product of the given values is looked up; without them the
//! whole tree below the root is listed once and `key=value` directories are
//! parsed.
//! With `last_modified_last_level`, only the newest file per partition is kept.

mod filter;
mod resolver;
mod types;

pub use resolver::{combinations, resolve};
pub use types::{
    parse_segment, PartitionConfig, PartitionEntry, PartitionFilter, PartitionKeys,
    PartitionValues, ResolvedPartitions,
};

//! CLI module
//!
//! Command-line interface for partition resolution and table reads.
//!
//! # Commands
//!
//! - `partitions` - Resolve and print the partition files below a root
//! - `read` - Read files or a partitioned directory as one table

mod commands;
mod runner;

pub use commands::{Cli, Commands, PartitionArgs};
pub use runner::Runner;

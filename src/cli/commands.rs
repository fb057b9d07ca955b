//! CLI commands and argument parsing

use crate::types::FileFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Datalake utilities CLI
#[derive(Parser, Debug)]
#[command(name = "datalake-utils")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Storage account URL (az://account, s3://, gs://, memory://, a local path)
    #[arg(short, long, global = true)]
    pub storage: Option<String>,

    /// Read configuration file (YAML or JSON)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// CLI subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve the partition files below a root directory
    Partitions {
        /// Root directory (`container/path/`)
        root: String,

        #[command(flatten)]
        partition: PartitionArgs,
    },

    /// Read files, or a partitioned directory, as one table
    Read {
        /// File path, or root directory with --partitioned
        path: String,

        /// File format (guessed from the path when omitted)
        #[arg(short, long)]
        format: Option<FileFormat>,

        /// Treat the path as a Hive-partitioned root directory
        #[arg(short, long)]
        partitioned: bool,

        /// CSV delimiter
        #[arg(short, long)]
        delimiter: Option<char>,

        /// CSV has no header row
        #[arg(long)]
        no_header: bool,

        /// Dot path to the records inside a JSON document
        #[arg(long)]
        record_path: Option<String>,

        /// Worksheet to read from a workbook
        #[arg(long)]
        sheet: Option<String>,

        /// Write the table to this `container/path` instead of stdout
        #[arg(short, long)]
        output: Option<String>,

        #[command(flatten)]
        partition: PartitionArgs,
    },
}

/// Partition layout overrides shared by the subcommands
#[derive(Args, Debug, Clone, Default)]
pub struct PartitionArgs {
    /// Declared partition key with candidate values (`year=2022,2023`), repeatable
    #[arg(short, long = "key", value_name = "KEY=VALUES")]
    pub keys: Vec<String>,

    /// Exclude partition values (`month=11`), repeatable
    #[arg(long = "exclude", value_name = "KEY=VALUES")]
    pub exclusions: Vec<String>,

    /// Keep only these partition values (`month=10,12`), repeatable
    #[arg(long = "include", value_name = "KEY=VALUES")]
    pub inclusions: Vec<String>,

    /// Take the latest file per partition across the last directory level
    #[arg(long)]
    pub last_modified_last_level: bool,
}

//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, PartitionArgs};
use crate::config::PartitionReadConfig;
use crate::datalake::Datalake;
use crate::error::{Error, Result};
use crate::partition::{PartitionConfig, PartitionKeys};
use crate::table::encode_json;
use crate::types::FileFormat;
use arrow::record_batch::RecordBatch;
use serde_json::json;
use std::io::Write;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = self.load_config()?;

        match &self.cli.command {
            Commands::Partitions { root, partition } => {
                self.partitions(&config, root, partition).await
            }
            Commands::Read {
                path,
                format,
                partitioned,
                delimiter,
                no_header,
                record_path,
                sheet,
                output,
                partition,
            } => {
                let mut options = config.read.clone();
                if let Some(delimiter) = delimiter {
                    options.delimiter = *delimiter;
                }
                if *no_header {
                    options.header = false;
                }
                if let Some(record_path) = record_path {
                    options.record_path = Some(record_path.clone());
                }
                if let Some(sheet) = sheet {
                    options.sheet = Some(sheet.clone());
                }

                let format = (*format)
                    .or(config.format)
                    .or_else(|| FileFormat::from_path(path))
                    .ok_or_else(|| {
                        Error::config(format!(
                            "Cannot guess the file format of '{path}', use --format"
                        ))
                    })?;

                let datalake = self.datalake(&config)?;
                let table = if *partitioned {
                    let partitions = merge_partition_args(&config.partitions, partition)?;
                    datalake
                        .read_with_partition(path, format, &partitions, &options)
                        .await?
                } else if format == FileFormat::Parquet {
                    datalake.read_parquet(path.as_str()).await?
                } else {
                    datalake
                        .read_files(path.as_str().into(), format, &options)
                        .await?
                };

                match output {
                    Some(output) => write_table(&datalake, &table, output, options.delimiter).await,
                    None => print_table(&table),
                }
            }
        }
    }

    /// Load the read configuration, or defaults when no file is given
    fn load_config(&self) -> Result<PartitionReadConfig> {
        match &self.cli.config {
            Some(path) => PartitionReadConfig::from_file(path),
            None => Ok(PartitionReadConfig::default()),
        }
    }

    /// Open the storage account from the flag or the config file
    fn datalake(&self, config: &PartitionReadConfig) -> Result<Datalake> {
        let url = self
            .cli
            .storage
            .as_deref()
            .or(config.storage.as_deref())
            .ok_or_else(|| Error::config("Storage account not specified (use -s flag)"))?;

        Ok(Datalake::from_url(url)?.with_parquet_config(config.parquet.clone()))
    }

    async fn partitions(
        &self,
        config: &PartitionReadConfig,
        root: &str,
        args: &PartitionArgs,
    ) -> Result<()> {
        let partitions = merge_partition_args(&config.partitions, args)?;
        let resolved = self
            .datalake(config)?
            .resolve_partitions(root, &partitions)
            .await?;

        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        for (path, entry) in resolved.iter() {
            let line = json!({
                "path": path,
                "file": entry.file,
                "partition": entry.values,
            });
            writeln!(out, "{line}")?;
        }

        info!("{} partition files", resolved.len());
        Ok(())
    }
}

/// Apply command-line overrides on top of the configured partition layout
fn merge_partition_args(base: &PartitionConfig, args: &PartitionArgs) -> Result<PartitionConfig> {
    let mut config = base.clone();

    if !args.keys.is_empty() {
        config.partition_keys = Some(parse_key_values(&args.keys)?);
    }
    if !args.exclusions.is_empty() {
        config.partition_exclusion = parse_key_values(&args.exclusions)?;
    }
    if !args.inclusions.is_empty() {
        config.partition_inclusion = parse_key_values(&args.inclusions)?;
    }
    if args.last_modified_last_level {
        config.last_modified_last_level = true;
    }

    config.validate()?;
    Ok(config)
}

/// Parse `key=v1,v2` arguments into ordered partition keys
fn parse_key_values(args: &[String]) -> Result<PartitionKeys> {
    let mut keys = PartitionKeys::new();
    for arg in args {
        let (key, values) = arg
            .split_once('=')
            .filter(|(key, _)| !key.is_empty())
            .ok_or_else(|| Error::config(format!("Expected KEY=VALUES, got '{arg}'")))?;
        keys.insert(key, values.split(',').map(String::from).collect());
    }
    Ok(keys)
}

/// Print a table as JSON Lines on stdout
fn print_table(table: &RecordBatch) -> Result<()> {
    let bytes = encode_json(table)?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    out.write_all(&bytes)?;
    out.flush()?;
    Ok(())
}

/// Write a table in the format of the output path's extension
async fn write_table(
    datalake: &Datalake,
    table: &RecordBatch,
    output: &str,
    delimiter: char,
) -> Result<()> {
    match FileFormat::from_path(output) {
        Some(FileFormat::Parquet) => datalake.write_parquet(table, output).await,
        Some(FileFormat::Csv) => datalake.write_csv(table, output, delimiter).await,
        Some(FileFormat::Json | FileFormat::Jsonl) => datalake.write_json(table, output).await,
        Some(FileFormat::Excel) | None => Err(Error::InvalidExtension {
            path: output.to_string(),
            expected: ".parquet, .csv, .json, .jsonl".to_string(),
        }),
    }
}

//! Read configuration files
//!
//! A YAML (or JSON) document describing one partitioned read: where the
//! storage lives, the file format, the partition layout and parse options.

use crate::decode::ReadOptions;
use crate::error::{Error, Result};
use crate::partition::PartitionConfig;
use crate::table::ParquetWriterConfig;
use crate::types::FileFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Configuration for a partitioned read loaded from YAML or JSON
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionReadConfig {
    /// Storage account URL (`az://account`, `s3://`, `memory://`, a local path)
    pub storage: Option<String>,

    /// File format of the partition files; guessed from paths when absent
    pub format: Option<FileFormat>,

    /// Partition layout and filters
    pub partitions: PartitionConfig,

    /// Text parsing options
    pub read: ReadOptions,

    /// Parquet output options
    pub parquet: ParquetWriterConfig,
}

impl PartitionReadConfig {
    /// Parse and validate a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| Error::config(format!("Failed to parse read config YAML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| Error::config(format!("Failed to parse read config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file; `.json` files are JSON, anything else is YAML
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "Failed to read config file '{}': {e}",
                path.display()
            ))
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Self::from_json_str(&content),
            _ => Self::from_yaml_str(&content),
        }
    }

    /// Check that partition keys and values can form path segments
    pub fn validate(&self) -> Result<()> {
        self.partitions.validate()
    }
}

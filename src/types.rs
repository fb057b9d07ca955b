//! Common types used throughout datalake-utils
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

/// JSON object type
pub type JsonObject = serde_json::Map<String, JsonValue>;

/// Path separator used by blob storage
pub const SEPARATOR: char = '/';

// ============================================================================
// File Format
// ============================================================================

/// Tabular file formats understood by the reader and writer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    /// Delimited text with an optional header row
    #[default]
    Csv,
    /// A JSON document holding an array of records
    Json,
    /// JSON Lines (one record per line)
    Jsonl,
    /// Apache Parquet
    Parquet,
    /// Excel or OpenDocument workbook
    Excel,
}

impl FileFormat {
    /// File extensions accepted for this format
    pub fn extensions(self) -> &'static [&'static str] {
        match self {
            FileFormat::Csv => &[".csv", ".tsv", ".txt"],
            FileFormat::Json => &[".json"],
            FileFormat::Jsonl => &[".jsonl", ".ndjson"],
            FileFormat::Parquet => &[".parquet", ".parq", ".pq"],
            FileFormat::Excel => &[".xlsx", ".xlsm", ".xlsb", ".xls", ".ods"],
        }
    }

    /// Guess the format from a file path
    pub fn from_path(path: &str) -> Option<Self> {
        let lower = path.to_lowercase();
        [
            FileFormat::Parquet,
            FileFormat::Excel,
            FileFormat::Csv,
            FileFormat::Jsonl,
            FileFormat::Json,
        ]
        .into_iter()
        .find(|format| format.extensions().iter().any(|ext| lower.ends_with(ext)))
    }

    /// Format name for logging
    pub fn as_str(self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Jsonl => "jsonl",
            FileFormat::Parquet => "parquet",
            FileFormat::Excel => "excel",
        }
    }
}

/// Check that `path` ends with one of `extensions`
pub fn verify_extension(path: &str, extensions: &[&str]) -> Result<()> {
    if extensions.iter().any(|ext| path.ends_with(ext)) {
        Ok(())
    } else {
        Err(Error::InvalidExtension {
            path: path.to_string(),
            expected: extensions.join(", "),
        })
    }
}

// ============================================================================
// Datalake Path
// ============================================================================

/// A `container/blob/path` reference inside a storage account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatalakePath {
    container: String,
    blob_path: String,
}

impl DatalakePath {
    /// Split a path into container (first segment) and blob path (remainder)
    pub fn parse(path: &str) -> Result<Self> {
        let trimmed = path.trim_start_matches(SEPARATOR);
        let (container, blob_path) = match trimmed.split_once(SEPARATOR) {
            Some((container, rest)) => (container, rest),
            None => (trimmed, ""),
        };

        if container.is_empty() {
            return Err(Error::invalid_path(path, "missing container name"));
        }

        Ok(Self {
            container: container.to_string(),
            blob_path: blob_path.to_string(),
        })
    }

    /// Parse a path that must reference a directory-like location
    pub fn parse_directory(path: &str) -> Result<Self> {
        if !path.ends_with(SEPARATOR) {
            return Err(Error::invalid_path(
                path,
                "a partitioned read needs a directory path ending in '/'",
            ));
        }
        Self::parse(path)
    }

    /// Container (or bucket) name
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Path inside the container
    pub fn blob_path(&self) -> &str {
        &self.blob_path
    }

    /// Whether the path ends in a separator
    pub fn is_directory(&self) -> bool {
        self.blob_path.is_empty() || self.blob_path.ends_with(SEPARATOR)
    }

    /// Last path segment, if this is a file path
    pub fn file_name(&self) -> Option<&str> {
        if self.is_directory() {
            None
        } else {
            self.blob_path.rsplit(SEPARATOR).next()
        }
    }
}

impl std::fmt::Display for DatalakePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.container, self.blob_path)
    }
}

/// Append a trailing separator when missing
pub fn with_trailing_separator(path: &str) -> String {
    if path.ends_with(SEPARATOR) {
        path.to_string()
    } else {
        format!("{path}{SEPARATOR}")
    }
}

/// Last segment of a path, ignoring a trailing separator
pub fn basename(path: &str) -> &str {
    path.trim_end_matches(SEPARATOR)
        .rsplit(SEPARATOR)
        .next()
        .unwrap_or_default()
}

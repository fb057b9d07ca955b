//! Error types for datalake-utils
//!
//! This module defines the error hierarchy for the entire crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for datalake-utils
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Partition key '{key}' does not exist in the resolved partitions")]
    UnknownPartitionKey { key: String },

    #[error("Ambiguous partition layout at '{path}': {message}")]
    AmbiguousLayout { path: String, message: String },

    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    #[error("{path} -> the path does not end with the expected extension ({expected})")]
    InvalidExtension { path: String, expected: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Storage Errors
    // ============================================================================
    #[error("Path not found: {path}")]
    NotFound { path: String },

    #[error("{path} -> the path was not found, verify that the file(s) exist")]
    FileNotFound { path: String },

    #[error("Listing failed for '{path}': {message}")]
    Listing { path: String, message: String },

    #[error("Object store error: {0}")]
    Storage(#[from] object_store::Error),

    // ============================================================================
    // Data Processing Errors
    // ============================================================================
    #[error("Failed to decode file: {message}")]
    Decode { message: String },

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Output error: {message}")]
    Output { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an unknown partition key error
    pub fn unknown_key(key: impl Into<String>) -> Self {
        Self::UnknownPartitionKey { key: key.into() }
    }

    /// Create an ambiguous layout error
    pub fn ambiguous_layout(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::AmbiguousLayout {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create an invalid path error
    pub fn invalid_path(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a listing not-found error
    pub fn not_found(path: impl Into<String>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a generic listing error
    pub fn listing(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Listing {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// Create an output error
    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    /// Whether this error means the listed path does not exist.
    ///
    /// This is the only condition under which partition resolution skips a
    /// candidate instead of failing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NotFound { .. }
                | Error::FileNotFound { .. }
                | Error::Storage(object_store::Error::NotFound { .. })
        )
    }

    /// Whether this error comes from invalid user configuration
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config { .. }
                | Error::UnknownPartitionKey { .. }
                | Error::AmbiguousLayout { .. }
                | Error::InvalidPath { .. }
                | Error::InvalidExtension { .. }
                | Error::YamlParse(_)
                | Error::JsonParse(_)
        )
    }
}

/// Result type alias for datalake-utils
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::unknown_key("month");
        assert_eq!(
            err.to_string(),
            "Partition key 'month' does not exist in the resolved partitions"
        );

        let err = Error::FileNotFound {
            path: "ruta".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "ruta -> the path was not found, verify that the file(s) exist"
        );
    }

    #[test]
    fn test_is_not_found() {
        assert!(Error::not_found("c/a/").is_not_found());
        assert!(Error::FileNotFound {
            path: "c/a.csv".to_string()
        }
        .is_not_found());
        assert!(Error::Storage(object_store::Error::NotFound {
            path: "a".to_string(),
            source: "missing".into(),
        })
        .is_not_found());

        assert!(!Error::listing("c/a/", "connection reset").is_not_found());
        assert!(!Error::config("test").is_not_found());
    }

    #[test]
    fn test_is_config() {
        assert!(Error::unknown_key("year").is_config());
        assert!(Error::ambiguous_layout("a/b/c", "too deep").is_config());
        assert!(!Error::not_found("a").is_config());
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}

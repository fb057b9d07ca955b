//! Decoder types and traits

use crate::error::{Error, Result};
use crate::types::FileFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::decoders::{JsonDecoder, JsonlDecoder};

/// Options controlling how text files are parsed into records
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// CSV field delimiter
    pub delimiter: char,
    /// Whether the first CSV row holds the column names
    pub header: bool,
    /// Dot path to the records array inside a JSON document
    pub record_path: Option<String>,
    /// Worksheet to read from a workbook; the first one when unset
    pub sheet: Option<String>,
    /// Infer CSV column types; when off every column is read as text
    pub infer_types: bool,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            delimiter: ',',
            header: true,
            record_path: None,
            sheet: None,
            infer_types: true,
        }
    }
}

impl ReadOptions {
    /// Default options: comma delimiter, header row, whole JSON document
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSV delimiter
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Set whether the CSV has a header row
    #[must_use]
    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    /// Set the JSON record path
    #[must_use]
    pub fn with_record_path(mut self, path: impl Into<String>) -> Self {
        self.record_path = Some(path.into());
        self
    }

    /// Set the workbook sheet to read
    #[must_use]
    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = Some(sheet.into());
        self
    }

    /// Set whether CSV column types are inferred
    #[must_use]
    pub fn with_infer_types(mut self, infer_types: bool) -> Self {
        self.infer_types = infer_types;
        self
    }
}

/// Trait for decoding a text body into JSON records
pub trait RecordDecoder: Send + Sync {
    /// Decode the body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;
}

/// Build the decoder for a JSON format
///
/// CSV and Parquet decode straight into Arrow batches, and workbooks go
/// through [`decode_workbook`](super::decode_workbook).
pub fn decoder_for(format: FileFormat, options: &ReadOptions) -> Result<Box<dyn RecordDecoder>> {
    match format {
        FileFormat::Json => Ok(Box::new(match &options.record_path {
            Some(path) => JsonDecoder::with_path(path.as_str()),
            None => JsonDecoder::new(),
        })),
        FileFormat::Jsonl => Ok(Box::new(JsonlDecoder::new())),
        FileFormat::Csv | FileFormat::Parquet | FileFormat::Excel => Err(Error::decode(format!(
            "{} files have no record decoder",
            format.as_str()
        ))),
    }
}

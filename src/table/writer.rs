//! Encode Arrow batches into file bytes

use crate::error::{Error, Result};
use arrow::csv::WriterBuilder;
use arrow::json::LineDelimitedWriter;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::basic::{Compression, GzipLevel, ZstdLevel};
use parquet::file::properties::{EnabledStatistics, WriterProperties};
use serde::{Deserialize, Serialize};

/// Parquet compression codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParquetCompression {
    /// No compression
    None,
    /// Snappy (default)
    #[default]
    Snappy,
    /// Gzip at the default level
    Gzip,
    /// Zstandard at the default level
    Zstd,
}

impl ParquetCompression {
    fn codec(self) -> Compression {
        match self {
            ParquetCompression::None => Compression::UNCOMPRESSED,
            ParquetCompression::Snappy => Compression::SNAPPY,
            ParquetCompression::Gzip => Compression::GZIP(GzipLevel::default()),
            ParquetCompression::Zstd => Compression::ZSTD(ZstdLevel::default()),
        }
    }
}

/// Configuration for the Parquet encoder
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParquetWriterConfig {
    /// Compression codec
    pub compression: ParquetCompression,
    /// Maximum rows per row group
    pub row_group_size: usize,
    /// Dictionary encoding
    pub dictionary_enabled: bool,
    /// Column statistics
    pub statistics_enabled: bool,
}

impl Default for ParquetWriterConfig {
    fn default() -> Self {
        Self {
            compression: ParquetCompression::Snappy,
            row_group_size: 1024 * 1024,
            dictionary_enabled: true,
            statistics_enabled: true,
        }
    }
}

impl ParquetWriterConfig {
    /// Create a new config with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression codec
    #[must_use]
    pub fn with_compression(mut self, compression: ParquetCompression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Enable or disable dictionary encoding
    #[must_use]
    pub fn with_dictionary(mut self, enabled: bool) -> Self {
        self.dictionary_enabled = enabled;
        self
    }

    /// Enable or disable statistics
    #[must_use]
    pub fn with_statistics(mut self, enabled: bool) -> Self {
        self.statistics_enabled = enabled;
        self
    }

    fn build_properties(&self) -> WriterProperties {
        let mut builder = WriterProperties::builder()
            .set_compression(self.compression.codec())
            .set_max_row_group_size(self.row_group_size.max(1));

        if !self.dictionary_enabled {
            builder = builder.set_dictionary_enabled(false);
        }

        if !self.statistics_enabled {
            builder = builder.set_statistics_enabled(EnabledStatistics::None);
        }

        builder.build()
    }
}

/// Encode a batch as a Parquet file
pub fn encode_parquet(batch: &RecordBatch, config: &ParquetWriterConfig) -> Result<Bytes> {
    let props = config.build_properties();
    let mut writer = ArrowWriter::try_new(Vec::new(), batch.schema(), Some(props))?;
    writer.write(batch)?;
    let buffer = writer.into_inner()?;
    Ok(Bytes::from(buffer))
}

/// Encode a batch as delimited text with a header row
pub fn encode_csv(batch: &RecordBatch, delimiter: char) -> Result<Bytes> {
    let delimiter = u8::try_from(delimiter)
        .map_err(|_| Error::output(format!("CSV delimiter '{delimiter}' is not a single byte")))?;

    let mut buffer = Vec::new();
    {
        let mut writer = WriterBuilder::new()
            .with_header(true)
            .with_delimiter(delimiter)
            .build(&mut buffer);
        writer.write(batch)?;
    }
    Ok(Bytes::from(buffer))
}

/// Encode a batch as JSON Lines
pub fn encode_json(batch: &RecordBatch) -> Result<Bytes> {
    let mut buffer = Vec::new();
    {
        let mut writer = LineDelimitedWriter::new(&mut buffer);
        writer.write(batch)?;
        writer.finish()?;
    }
    Ok(Bytes::from(buffer))
}

//! Table module
//!
//! Arrow record batches as the in-memory table representation.
//!
//! # Overview
//!
//! This module provides utilities for:
//! - Inferring Arrow schemas from decoded JSON records
//! - Decoding CSV, JSON, JSONL, Parquet and workbook bytes into batches
//! - Stamping partition values as columns and concatenating batches
//! - Encoding batches back to CSV, JSON Lines and Parquet

mod columns;
mod reader;
mod schema;
mod writer;

pub use columns::{concat_tables, sanitize_string_columns, with_partition_columns};
pub use reader::decode_table;
pub use schema::{infer_schema, json_to_arrow, merge_schemas};
pub use writer::{encode_csv, encode_json, encode_parquet, ParquetCompression, ParquetWriterConfig};

#[cfg(test)]
mod tests;

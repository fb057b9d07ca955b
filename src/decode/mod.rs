//! Record decoder module
//!
//! Supports: JSON, JSONL, Excel workbooks
//!
//! # Overview
//!
//! JSON documents and worksheets are parsed into JSON records before schema
//! inference turns them into Arrow batches. CSV and Parquet bypass this
//! module and decode straight into Arrow.

mod decoders;
mod excel;
mod types;

pub use decoders::{JsonDecoder, JsonlDecoder};
pub use excel::decode_workbook;
pub use types::{decoder_for, ReadOptions, RecordDecoder};

#[cfg(test)]
mod tests;

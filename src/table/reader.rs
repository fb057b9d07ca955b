//! Decode file contents into Arrow batches

use super::schema::json_to_arrow;
use crate::decode::{decode_workbook, decoder_for, ReadOptions};
use crate::error::{Error, Result};
use crate::types::FileFormat;
use arrow::compute::concat_batches;
use arrow::csv::reader::Format;
use arrow::csv::ReaderBuilder;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use std::io::Cursor;
use std::sync::Arc;

const UTF8_BOM: &[u8] = b"\xef\xbb\xbf";

/// Decode the raw bytes of one file into a single batch
pub fn decode_table(bytes: Bytes, format: FileFormat, options: &ReadOptions) -> Result<RecordBatch> {
    match format {
        FileFormat::Parquet => decode_parquet(bytes),
        FileFormat::Csv => decode_csv(bytes, options),
        FileFormat::Excel => {
            let records = decode_workbook(&bytes, options.sheet.as_deref(), options.header)?;
            json_to_arrow(&records, None)
        }
        FileFormat::Json | FileFormat::Jsonl => {
            let body = std::str::from_utf8(&bytes)
                .map_err(|e| Error::decode(format!("File is not valid UTF-8: {e}")))?;
            let records = decoder_for(format, options)?.decode(body)?;
            json_to_arrow(&records, None)
        }
    }
}

fn decode_csv(bytes: Bytes, options: &ReadOptions) -> Result<RecordBatch> {
    let delimiter = u8::try_from(options.delimiter)
        .ok()
        .filter(u8::is_ascii)
        .ok_or_else(|| {
            Error::decode(format!(
                "CSV delimiter '{}' is not a single ASCII character",
                options.delimiter
            ))
        })?;

    let bytes = if bytes.starts_with(UTF8_BOM) {
        bytes.slice(UTF8_BOM.len()..)
    } else {
        bytes
    };

    let format = Format::default()
        .with_delimiter(delimiter)
        .with_header(options.header)
        .with_truncated_rows(true);

    let (inferred, _) = format.infer_schema(Cursor::new(&bytes), None)?;
    let schema = if options.infer_types {
        Arc::new(inferred)
    } else {
        Arc::new(Schema::new(
            inferred
                .fields()
                .iter()
                .map(|f| Field::new(f.name(), DataType::Utf8, true))
                .collect::<Vec<_>>(),
        ))
    };

    let reader = ReaderBuilder::new(schema.clone())
        .with_format(format)
        .build(Cursor::new(bytes))?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

fn decode_parquet(bytes: Bytes) -> Result<RecordBatch> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(bytes)?;
    let schema = builder.schema().clone();
    let reader = builder.build()?;

    let batches = reader.collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(concat_batches(&schema, &batches)?)
}

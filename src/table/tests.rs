//! Tests for table module

use super::*;
use crate::decode::ReadOptions;
use crate::partition::PartitionValues;
use crate::types::FileFormat;
use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float64Type, Int64Type};
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use pretty_assertions::assert_eq;
use serde_json::json;

fn column_names(batch: &RecordBatch) -> Vec<String> {
    batch
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect()
}

fn csv_batch(body: &str) -> RecordBatch {
    decode_table(Bytes::from(body.to_string()), FileFormat::Csv, &ReadOptions::default()).unwrap()
}

// ============================================================================
// Schema Inference Tests
// ============================================================================

#[test]
fn test_infer_schema_empty() {
    assert!(infer_schema(&[]).fields().is_empty());
}

#[test]
fn test_infer_schema_first_seen_order() {
    let records = vec![
        json!({"name": "Alice", "age": 30}),
        json!({"email": null, "name": "Bob", "age": 25}),
    ];

    let schema = infer_schema(&records);
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["name", "age", "email"]);
    assert_eq!(schema.field(0).data_type(), &DataType::Utf8);
    assert_eq!(schema.field(1).data_type(), &DataType::Int64);
    assert_eq!(schema.field(2).data_type(), &DataType::Null);
}

#[test]
fn test_infer_schema_type_merging() {
    let records = vec![
        json!({"value": 42, "flag": true, "email": null}),
        json!({"value": 3.5, "flag": "yes", "email": "bob@example.com"}),
    ];

    let schema = infer_schema(&records);
    assert_eq!(schema.field_with_name("value").unwrap().data_type(), &DataType::Float64);
    assert_eq!(schema.field_with_name("flag").unwrap().data_type(), &DataType::Utf8);
    assert_eq!(schema.field_with_name("email").unwrap().data_type(), &DataType::Utf8);
}

#[test]
fn test_merge_schemas_keeps_order() {
    let a = infer_schema(&[json!({"x": 1, "y": "a"})]);
    let b = infer_schema(&[json!({"z": true, "x": 1.5})]);

    let merged = merge_schemas(&a, &b);
    let names: Vec<&str> = merged.fields().iter().map(|f| f.name().as_str()).collect();
    assert_eq!(names, vec!["x", "y", "z"]);
    assert_eq!(merged.field(0).data_type(), &DataType::Float64);
}

#[test]
fn test_json_to_arrow_nested() {
    let records = vec![
        json!({"id": 1, "tags": ["a", "b"], "meta": {"score": 1.5}}),
        json!({"id": 2, "tags": [], "meta": null}),
    ];

    let batch = json_to_arrow(&records, None).unwrap();
    assert_eq!(batch.num_rows(), 2);
    assert_eq!(batch.num_columns(), 3);
    assert!(matches!(batch.schema().field(1).data_type(), DataType::List(_)));
    assert!(matches!(batch.schema().field(2).data_type(), DataType::Struct(_)));
}

// ============================================================================
// Reader Tests
// ============================================================================

#[test]
fn test_decode_csv() {
    let batch = csv_batch("id,name\n1,Alice\n2,Bob\n");

    assert_eq!(column_names(&batch), vec!["id", "name"]);
    let ids = batch.column(0).as_primitive::<Int64Type>();
    assert_eq!(ids.value(1), 2);
    assert_eq!(batch.column(1).as_string::<i32>().value(0), "Alice");
}

#[test]
fn test_decode_csv_infers_types() {
    let batch = csv_batch("id,name,score,active\n1,Alice,9.5,true\n2,Bob,,false\n");

    assert_eq!(column_names(&batch), vec!["id", "name", "score", "active"]);
    let schema = batch.schema();
    assert_eq!(schema.field(0).data_type(), &DataType::Int64);
    assert_eq!(schema.field(2).data_type(), &DataType::Float64);
    assert_eq!(schema.field(3).data_type(), &DataType::Boolean);
    assert!(batch.column(2).is_null(1));
    assert!(!batch.column(3).as_boolean().value(1));
}

#[test]
fn test_decode_csv_quoted_fields() {
    let batch = csv_batch("id,text\n1,\"hello, world\"\n2,\"say \"\"hi\"\"\"\n3,\"multi\nline\"\n");

    let text = batch.column(1).as_string::<i32>();
    assert_eq!(text.value(0), "hello, world");
    assert_eq!(text.value(1), "say \"hi\"");
    assert_eq!(text.value(2), "multi\nline");
}

#[test]
fn test_decode_csv_crlf_and_bom() {
    let options = ReadOptions::new().with_delimiter(';');
    let body = Bytes::from("\u{feff}a;b\r\n1;x\r\n");

    let batch = decode_table(body, FileFormat::Csv, &options).unwrap();
    assert_eq!(column_names(&batch), vec!["a", "b"]);
    assert_eq!(batch.column(1).as_string::<i32>().value(0), "x");
}

#[test]
fn test_decode_csv_without_header() {
    let options = ReadOptions::new().with_header(false);
    let batch = decode_table(Bytes::from_static(b"1,a\n2,b\n"), FileFormat::Csv, &options).unwrap();

    assert_eq!(batch.num_rows(), 2);
    assert_eq!(column_names(&batch), vec!["column_1", "column_2"]);
}

#[test]
fn test_decode_csv_row_lengths() {
    let batch = csv_batch("a,b,c\n1\n");
    assert_eq!(batch.num_rows(), 1);
    assert!(batch.column(1).is_null(0));
    assert!(batch.column(2).is_null(0));

    let long = Bytes::from_static(b"a,b\n1,2,3\n");
    assert!(decode_table(long, FileFormat::Csv, &ReadOptions::default()).is_err());
}

#[test]
fn test_decode_csv_header_only() {
    let batch = csv_batch("a,b\n");
    assert_eq!(batch.num_rows(), 0);
    assert_eq!(column_names(&batch), vec!["a", "b"]);
}

#[test]
fn test_decode_csv_as_text_keeps_leading_zeros() {
    let options = ReadOptions::new().with_infer_types(false);
    let body = Bytes::from_static(b"code,qty\n00123,4\n");

    let batch = decode_table(body, FileFormat::Csv, &options).unwrap();
    assert_eq!(batch.column(0).as_string::<i32>().value(0), "00123");
    assert_eq!(batch.schema().field(1).data_type(), &DataType::Utf8);
}

#[test]
fn test_decode_csv_rejects_wide_delimiter() {
    let options = ReadOptions::new().with_delimiter('→');
    let body = Bytes::from_static(b"a\n1\n");
    assert!(decode_table(body, FileFormat::Csv, &options).is_err());
}

#[test]
fn test_decode_json_with_record_path() {
    let body = Bytes::from_static(br#"{"data": {"rows": [{"a": 1}, {"a": 2}]}}"#);
    let options = ReadOptions::new().with_record_path("data.rows");

    let batch = decode_table(body, FileFormat::Json, &options).unwrap();
    assert_eq!(batch.num_rows(), 2);
}

#[test]
fn test_decode_rejects_invalid_utf8() {
    let body = Bytes::from_static(&[0xff, 0xfe, 0x00]);
    assert!(decode_table(body, FileFormat::Jsonl, &ReadOptions::default()).is_err());
}

#[test]
fn test_parquet_encode_decode() {
    let batch = csv_batch("id,score,name\n1,0.5,a\n2,1.5,\n");

    let bytes = encode_parquet(&batch, &ParquetWriterConfig::default()).unwrap();
    let decoded = decode_table(bytes, FileFormat::Parquet, &ReadOptions::default()).unwrap();

    assert_eq!(decoded.num_rows(), 2);
    assert_eq!(column_names(&decoded), vec!["id", "score", "name"]);
    assert_eq!(decoded.column(1).as_primitive::<Float64Type>().value(1), 1.5);
    assert!(decoded.column(2).is_null(1));
}

#[test]
fn test_parquet_config_from_yaml() {
    let config: ParquetWriterConfig =
        serde_yaml::from_str("compression: zstd\nrow_group_size: 10").unwrap();
    assert_eq!(config.compression, ParquetCompression::Zstd);
    assert_eq!(config.row_group_size, 10);
    assert!(config.dictionary_enabled);
}

// ============================================================================
// Column Tests
// ============================================================================

#[test]
fn test_with_partition_columns_appends_and_overwrites() {
    let batch = csv_batch("year,value\n1999,1\n1999,2\n");
    let values: PartitionValues = [("year", "2022"), ("month", "10")].into_iter().collect();

    let stamped = with_partition_columns(&batch, &values).unwrap();

    assert_eq!(column_names(&stamped), vec!["year", "value", "month"]);
    let years = stamped.column(0).as_string::<i32>();
    assert_eq!(years.value(0), "2022");
    assert_eq!(years.value(1), "2022");
    assert_eq!(stamped.column(2).as_string::<i32>().value(1), "10");
}

#[test]
fn test_with_partition_columns_on_empty_batch() {
    let batch = RecordBatch::new_empty(std::sync::Arc::new(arrow::datatypes::Schema::empty()));
    let values: PartitionValues = [("year", "2022")].into_iter().collect();

    let stamped = with_partition_columns(&batch, &values).unwrap();
    assert_eq!(stamped.num_rows(), 0);
    assert_eq!(column_names(&stamped), vec!["year"]);
}

#[test]
fn test_concat_tables_union_schema() {
    let a = csv_batch("id,name\n1,a\n");
    let b = csv_batch("id,extra\nx,true\n");

    let combined = concat_tables(&[a, b]).unwrap();

    assert_eq!(combined.num_rows(), 2);
    assert_eq!(column_names(&combined), vec!["id", "name", "extra"]);
    assert_eq!(combined.schema().field(0).data_type(), &DataType::Utf8);
    let ids = combined.column(0).as_string::<i32>();
    assert_eq!(ids.value(0), "1");
    assert_eq!(ids.value(1), "x");
    assert!(combined.column(1).is_null(1));
    assert!(combined.column(2).is_null(0));
}

#[test]
fn test_concat_tables_edge_cases() {
    let empty = concat_tables(&[]).unwrap();
    assert_eq!(empty.num_rows(), 0);
    assert_eq!(empty.num_columns(), 0);

    let single = csv_batch("a\n1\n");
    assert_eq!(concat_tables(std::slice::from_ref(&single)).unwrap(), single);
}

#[test]
fn test_sanitize_string_columns() {
    let batch = json_to_arrow(&[json!({"text": "a;b\nc\r", "n": 1})], None).unwrap();

    let clean = sanitize_string_columns(&batch, ';').unwrap();
    assert_eq!(clean.column(0).as_string::<i32>().value(0), "a b c ");
    assert_eq!(clean.column(1).as_primitive::<Int64Type>().value(0), 1);
}

// ============================================================================
// Writer Tests
// ============================================================================

#[test]
fn test_encode_csv() {
    let batch = csv_batch("id,name\n1,Alice\n");
    let bytes = encode_csv(&batch, ';').unwrap();
    assert_eq!(std::str::from_utf8(&bytes).unwrap(), "id;name\n1;Alice\n");
}

#[test]
fn test_encode_csv_rejects_wide_delimiter() {
    let batch = csv_batch("id\n1\n");
    assert!(encode_csv(&batch, 'é').is_err());
}

#[test]
fn test_encode_json_lines() {
    let batch = csv_batch("id,name\n1,Alice\n2,Bob\n");
    let bytes = encode_json(&batch).unwrap();
    let text = std::str::from_utf8(&bytes).unwrap();

    let lines: Vec<serde_json::Value> = text
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(
        lines,
        vec![json!({"id": 1, "name": "Alice"}), json!({"id": 2, "name": "Bob"})]
    );
}

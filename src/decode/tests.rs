//! Tests for decoder module

use super::*;
use crate::types::FileFormat;
use serde_json::json;
use test_case::test_case;

// ============================================================================
// ReadOptions Tests
// ============================================================================

#[test]
fn test_read_options_default() {
    let options = ReadOptions::default();
    assert_eq!(options.delimiter, ',');
    assert!(options.header);
    assert!(options.record_path.is_none());
}

#[test]
fn test_read_options_from_yaml() {
    let options: ReadOptions = serde_yaml::from_str("delimiter: ';'\nheader: false").unwrap();
    assert_eq!(options, ReadOptions::new().with_delimiter(';').with_header(false));
}

#[test_case(FileFormat::Csv)]
#[test_case(FileFormat::Parquet)]
#[test_case(FileFormat::Excel)]
fn test_decoder_for_rejects_arrow_formats(format: FileFormat) {
    assert!(decoder_for(format, &ReadOptions::default()).is_err());
}

#[test]
fn test_decoder_for_uses_options() {
    let options = ReadOptions::new().with_record_path("data");
    let decoder = decoder_for(FileFormat::Json, &options).unwrap();
    let records = decoder.decode(r#"{"data": [{"a": 1}]}"#).unwrap();
    assert_eq!(records, vec![json!({"a": 1})]);
}

// ============================================================================
// JSON Decoder Tests
// ============================================================================

#[test]
fn test_json_decoder_array() {
    let decoder = JsonDecoder::new();
    let body = r#"[{"id": 1}, {"id": 2}, {"id": 3}]"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[0]["id"], 1);
    assert_eq!(records[2]["id"], 3);
}

#[test]
fn test_json_decoder_object() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode(r#"{"id": 1, "name": "test"}"#).unwrap();
    assert_eq!(records, vec![json!({"id": 1, "name": "test"})]);
}

#[test]
fn test_json_decoder_nested_path() {
    let decoder = JsonDecoder::with_path("response.items");
    let body = r#"{"response": {"items": [{"id": 1}], "total": 1}}"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], 1);
}

#[test_case("data[-1]", 3 ; "negative index")]
#[test_case("$.data[0]", 1 ; "dollar prefix")]
fn test_json_decoder_array_index(path: &str, expected: i64) {
    let decoder = JsonDecoder::with_path(path);
    let body = r#"{"data": [{"id": 1}, {"id": 2}, {"id": 3}]}"#;

    let records = decoder.decode(body).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["id"], expected);
}

#[test]
fn test_json_decoder_missing_path_is_empty() {
    let decoder = JsonDecoder::with_path("nothing.here");
    assert!(decoder.decode(r#"{"data": []}"#).unwrap().is_empty());
}

#[test]
fn test_json_decoder_falls_back_to_lines() {
    let decoder = JsonDecoder::new();
    let records = decoder.decode("{\"id\": 1}\n{\"id\": 2}\n").unwrap();
    assert_eq!(records.len(), 2);
}

#[test]
fn test_json_decoder_invalid() {
    assert!(JsonDecoder::new().decode("not valid json").is_err());
}

// ============================================================================
// JSONL Decoder Tests
// ============================================================================

#[test]
fn test_jsonl_decoder_skips_blank_lines() {
    let body = "{\"id\": 1}\n\n  \n{\"id\": 2}\n";
    let records = JsonlDecoder::new().decode(body).unwrap();
    assert_eq!(records, vec![json!({"id": 1}), json!({"id": 2})]);
}

#[test]
fn test_jsonl_decoder_reports_line() {
    let err = JsonlDecoder::new()
        .decode("{\"id\": 1}\n{broken\n")
        .unwrap_err();
    assert!(err.to_string().contains("line 2"));
}

// ============================================================================
// Workbook Tests
// ============================================================================

fn workbook() -> Vec<u8> {
    let mut workbook = rust_xlsxwriter::Workbook::new();

    let summary = workbook.add_worksheet();
    summary.set_name("Summary").unwrap();
    summary.write_string(0, 0, "total").unwrap();
    summary.write_number(1, 0, 3.0).unwrap();

    let sales = workbook.add_worksheet();
    sales.set_name("Sales").unwrap();
    sales.write_string(0, 0, "id").unwrap();
    sales.write_string(0, 1, "name").unwrap();
    sales.write_string(0, 2, "price").unwrap();
    sales.write_number(1, 0, 1.0).unwrap();
    sales.write_string(1, 1, "foo").unwrap();
    sales.write_number(1, 2, 9.5).unwrap();
    sales.write_number(2, 0, 2.0).unwrap();
    sales.write_string(2, 1, "bar").unwrap();

    workbook.save_to_buffer().unwrap()
}

#[test]
fn test_workbook_reads_first_sheet_by_default() {
    let records = decode_workbook(&workbook(), None, true).unwrap();
    assert_eq!(records, vec![json!({"total": 3})]);
}

#[test]
fn test_workbook_named_sheet() {
    let records = decode_workbook(&workbook(), Some("Sales"), true).unwrap();
    assert_eq!(
        records,
        vec![
            json!({"id": 1, "name": "foo", "price": 9.5}),
            json!({"id": 2, "name": "bar", "price": null}),
        ]
    );
}

#[test]
fn test_workbook_without_header() {
    let records = decode_workbook(&workbook(), Some("Summary"), false).unwrap();
    assert_eq!(
        records,
        vec![json!({"column_1": "total"}), json!({"column_1": 3})]
    );
}

#[test]
fn test_workbook_errors() {
    assert!(decode_workbook(&workbook(), Some("Missing"), true).is_err());
    assert!(decode_workbook(b"not a workbook", None, true).is_err());
}

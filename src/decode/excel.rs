//! Workbook decoding (xlsx, xlsm, xlsb, xls, ods)

use crate::error::{Error, Result};
use calamine::{open_workbook_auto_from_rs, Data, DataType, Reader};
use serde_json::{Map, Value};
use std::io::Cursor;

/// Decode one worksheet into records
///
/// Reads `sheet` when given, otherwise the first worksheet. With `header`
/// the first row names the columns; otherwise they are `column_1`,
/// `column_2`, and so on.
pub fn decode_workbook(bytes: &[u8], sheet: Option<&str>, header: bool) -> Result<Vec<Value>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
        .map_err(|e| Error::decode(format!("Failed to open workbook: {e}")))?;

    let name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| Error::decode("Workbook has no worksheets"))?,
    };

    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| Error::decode(format!("Failed to read worksheet '{name}': {e}")))?;

    let mut rows = range.rows();
    let headers: Vec<String> = if header {
        match rows.next() {
            Some(row) => row
                .iter()
                .enumerate()
                .map(|(i, cell)| match cell {
                    Data::Empty => format!("column_{}", i + 1),
                    cell => cell.to_string(),
                })
                .collect(),
            None => return Ok(Vec::new()),
        }
    } else {
        (1..=range.width()).map(|i| format!("column_{i}")).collect()
    };

    Ok(rows
        .map(|row| {
            let record: Map<String, Value> = headers
                .iter()
                .zip(row)
                .map(|(name, cell)| (name.clone(), cell_value(cell)))
                .collect();
            Value::Object(record)
        })
        .collect())
}

/// Whole-number floats become integers, matching how spreadsheets store them
#[allow(clippy::float_cmp)]
fn cell_value(cell: &Data) -> Value {
    match cell {
        Data::Int(n) => Value::from(*n),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 9.0e15 => Value::from(*f as i64),
        Data::Float(f) => serde_json::Number::from_f64(*f).map_or(Value::Null, Value::Number),
        Data::Bool(b) => Value::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => Value::String(s.clone()),
        Data::DateTime(_) => cell
            .as_datetime()
            .map_or(Value::Null, |dt| Value::String(dt.to_string())),
        _ => Value::Null,
    }
}

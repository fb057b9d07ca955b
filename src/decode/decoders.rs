//! Decoder implementations
//!
//! Each decoder handles a specific text format.

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
///
/// A document that is not a single JSON value is retried as JSON Lines.
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// Dot path to the records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    fn extract_records(&self, value: Value) -> Vec<Value> {
        let value = match &self.record_path {
            Some(path) => match extract_simple_path(&value, path) {
                Some(v) => v,
                None => return Vec::new(),
            },
            None => value,
        };

        match value {
            Value::Array(arr) => arr,
            Value::Null => Vec::new(),
            v => vec![v],
        }
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        match serde_json::from_str::<Value>(body) {
            Ok(value) => Ok(self.extract_records(value)),
            Err(e) => {
                if body.trim().lines().nth(1).is_some() {
                    if let Ok(records) = JsonlDecoder.decode(body) {
                        return Ok(records);
                    }
                }
                Err(Error::decode(format!("Failed to parse JSON: {e}")))
            }
        }
    }
}

// ============================================================================
// JSONL Decoder
// ============================================================================

/// JSON Lines decoder (one JSON object per line)
#[derive(Debug, Clone, Default)]
pub struct JsonlDecoder;

impl JsonlDecoder {
    /// Create a new JSONL decoder
    pub fn new() -> Self {
        Self
    }
}

impl RecordDecoder for JsonlDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let mut records = Vec::new();

        for (line_num, line) in body.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let value: Value = serde_json::from_str(line).map_err(|e| {
                Error::decode(format!(
                    "Failed to parse JSONL at line {}: {e}",
                    line_num + 1
                ))
            })?;

            records.push(value);
        }

        Ok(records)
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Extract a value using a simple dot-notation path
///
/// Supports `a.b.c`, a leading `$.`, and array indexing such as `items[0]`
/// or `items[-1]`.
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix("$.").unwrap_or(path);
    if path.is_empty() || path == "$" {
        return Some(value.clone());
    }

    let mut current = value;
    for part in path.split('.') {
        let Some(bracket_pos) = part.find('[') else {
            current = current.get(part)?;
            continue;
        };

        let name = &part[..bracket_pos];
        let index_str = part[bracket_pos + 1..].strip_suffix(']')?;

        if !name.is_empty() {
            current = current.get(name)?;
        }

        if index_str == "*" {
            return Some(current.clone());
        }

        let index = index_str.parse::<i64>().ok()?;
        let Value::Array(arr) = current else {
            return None;
        };
        let idx = if index < 0 {
            arr.len().checked_sub(index.unsigned_abs() as usize)?
        } else {
            index as usize
        };
        current = arr.get(idx)?;
    }

    Some(current.clone())
}

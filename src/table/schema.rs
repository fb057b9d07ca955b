//! Arrow schema inference and JSON to Arrow conversion
//!
//! Columns keep the order in which their names are first seen.

use crate::error::{Error, Result};
use arrow::array::{
    ArrayRef, BooleanArray, Float64Array, Int64Array, ListArray, NullArray, StringArray,
    StructArray,
};
use arrow::buffer::OffsetBuffer;
use arrow::datatypes::{DataType, Field, Fields, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Infer an Arrow schema from a set of JSON records
///
/// Every field is nullable. A column seen with incompatible types becomes
/// Utf8; integers mixed with floats become Float64.
pub fn infer_schema(records: &[Value]) -> Schema {
    let mut fields: Vec<(String, DataType)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for record in records {
        let Value::Object(obj) = record else {
            continue;
        };
        for (key, value) in obj {
            let inferred = infer_type(value);
            match index.get(key) {
                Some(&i) => fields[i].1 = merge_types(&fields[i].1, &inferred),
                None => {
                    index.insert(key.clone(), fields.len());
                    fields.push((key.clone(), inferred));
                }
            }
        }
    }

    Schema::new(
        fields
            .into_iter()
            .map(|(name, dtype)| Field::new(name, dtype, true))
            .collect::<Vec<_>>(),
    )
}

/// Merge two schemas, keeping the column order of `schema1` then `schema2`
pub fn merge_schemas(schema1: &Schema, schema2: &Schema) -> Schema {
    let mut fields: Vec<Field> = schema1
        .fields()
        .iter()
        .map(|f| f.as_ref().clone())
        .collect();

    for field in schema2.fields() {
        match fields.iter_mut().find(|f| f.name() == field.name()) {
            Some(existing) => {
                let merged_type = merge_types(existing.data_type(), field.data_type());
                *existing = Field::new(
                    existing.name(),
                    merged_type,
                    existing.is_nullable() || field.is_nullable(),
                );
            }
            None => fields.push(field.as_ref().clone()),
        }
    }

    Schema::new(fields)
}

/// Convert JSON records to an Arrow RecordBatch
///
/// Uses the provided schema or infers one from the data.
pub fn json_to_arrow(records: &[Value], schema: Option<&Schema>) -> Result<RecordBatch> {
    let schema = match schema {
        Some(schema) => schema.clone(),
        None => infer_schema(records),
    };
    let schema = Arc::new(schema);

    if records.is_empty() {
        return Ok(RecordBatch::new_empty(schema));
    }

    let mut columns: Vec<ArrayRef> = Vec::with_capacity(schema.fields().len());
    for field in schema.fields() {
        let values: Vec<Option<&Value>> = records
            .iter()
            .map(|record| match record {
                Value::Object(obj) => obj.get(field.name()),
                _ => None,
            })
            .collect();

        columns.push(build_array(&values, field.data_type())?);
    }

    let options = RecordBatchOptions::new().with_row_count(Some(records.len()));
    RecordBatch::try_new_with_options(schema, columns, &options)
        .map_err(|e| Error::output(format!("Failed to create RecordBatch: {e}")))
}

/// Infer Arrow DataType from a JSON value
fn infer_type(value: &Value) -> DataType {
    match value {
        Value::Null => DataType::Null,
        Value::Bool(_) => DataType::Boolean,
        Value::Number(n) => {
            if n.is_i64() {
                DataType::Int64
            } else {
                DataType::Float64
            }
        }
        Value::String(_) => DataType::Utf8,
        Value::Array(arr) => {
            let element_type = arr
                .iter()
                .filter(|v| !v.is_null())
                .map(infer_type)
                .reduce(|a, b| merge_types(&a, &b))
                .unwrap_or(DataType::Null);
            DataType::List(Arc::new(Field::new("item", element_type, true)))
        }
        Value::Object(obj) if obj.is_empty() => DataType::Null,
        Value::Object(obj) => {
            let fields: Vec<Field> = obj
                .iter()
                .map(|(k, v)| Field::new(k, infer_type(v), true))
                .collect();
            DataType::Struct(Fields::from(fields))
        }
    }
}

/// Merge two data types into a compatible type
pub(crate) fn merge_types(type1: &DataType, type2: &DataType) -> DataType {
    match (type1, type2) {
        (a, b) if a == b => a.clone(),

        (DataType::Null, other) | (other, DataType::Null) => other.clone(),

        (DataType::Int64, DataType::Float64) | (DataType::Float64, DataType::Int64) => {
            DataType::Float64
        }

        (DataType::List(a), DataType::List(b)) => DataType::List(Arc::new(Field::new(
            "item",
            merge_types(a.data_type(), b.data_type()),
            true,
        ))),

        _ => DataType::Utf8,
    }
}

/// Build an Arrow array from JSON values
fn build_array(values: &[Option<&Value>], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Null => Ok(Arc::new(NullArray::new(values.len()))),

        DataType::Boolean => {
            let arr: BooleanArray = values.iter().map(|v| v.and_then(Value::as_bool)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Int64 => {
            let arr: Int64Array = values.iter().map(|v| v.and_then(Value::as_i64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            let arr: Float64Array = values.iter().map(|v| v.and_then(Value::as_f64)).collect();
            Ok(Arc::new(arr))
        }

        DataType::List(field) => build_list_array(values, field),

        DataType::Struct(fields) => build_struct_array(values, fields),

        _ => {
            let arr: StringArray = values
                .iter()
                .map(|v| match v {
                    None | Some(Value::Null) => None,
                    Some(Value::String(s)) => Some(s.clone()),
                    Some(other) => Some(other.to_string()),
                })
                .collect();
            Ok(Arc::new(arr))
        }
    }
}

/// Build a list array from JSON arrays
fn build_list_array(values: &[Option<&Value>], field: &Arc<Field>) -> Result<ArrayRef> {
    let mut all_items: Vec<Option<&Value>> = Vec::new();
    let mut offsets: Vec<i32> = vec![0];

    for value in values {
        if let Some(Value::Array(arr)) = value {
            all_items.extend(arr.iter().map(Some));
        }
        let offset = i32::try_from(all_items.len())
            .map_err(|_| Error::output("Array too large for i32 offset"))?;
        offsets.push(offset);
    }

    let items_array = build_array(&all_items, field.data_type())?;
    let offset_buffer = OffsetBuffer::new(offsets.into());

    let list_array = ListArray::try_new(Arc::clone(field), offset_buffer, items_array, None)?;
    Ok(Arc::new(list_array))
}

/// Build a struct array from JSON objects
fn build_struct_array(values: &[Option<&Value>], fields: &Fields) -> Result<ArrayRef> {
    let mut child_arrays: Vec<ArrayRef> = Vec::with_capacity(fields.len());

    for field in fields {
        let child_values: Vec<Option<&Value>> = values
            .iter()
            .map(|v| match v {
                Some(Value::Object(obj)) => obj.get(field.name()),
                _ => None,
            })
            .collect();

        child_arrays.push(build_array(&child_values, field.data_type())?);
    }

    let struct_array = StructArray::try_new(fields.clone(), child_arrays, None)?;
    Ok(Arc::new(struct_array))
}

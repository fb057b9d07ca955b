//! Column-level transformations on record batches

use super::schema::merge_types;
use crate::error::Result;
use crate::partition::PartitionValues;
use arrow::array::{new_null_array, Array, ArrayRef, AsArray, StringArray};
use arrow::compute::{cast, concat_batches};
use arrow::datatypes::{DataType, Field, FieldRef, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

/// Stamp partition values as constant Utf8 columns
///
/// An existing column with the same name is overwritten in place; new
/// columns are appended in key order.
pub fn with_partition_columns(batch: &RecordBatch, values: &PartitionValues) -> Result<RecordBatch> {
    if values.is_empty() {
        return Ok(batch.clone());
    }

    let rows = batch.num_rows();
    let mut fields: Vec<FieldRef> = batch.schema().fields().iter().cloned().collect();
    let mut columns: Vec<ArrayRef> = batch.columns().to_vec();

    for (key, value) in values.iter() {
        let field = Arc::new(Field::new(key, DataType::Utf8, false));
        let column: ArrayRef = Arc::new(StringArray::from(vec![value; rows]));

        match fields.iter().position(|f| f.name() == key) {
            Some(i) => {
                fields[i] = field;
                columns[i] = column;
            }
            None => {
                fields.push(field);
                columns.push(column);
            }
        }
    }

    let options = RecordBatchOptions::new().with_row_count(Some(rows));
    Ok(RecordBatch::try_new_with_options(
        Arc::new(Schema::new(fields)),
        columns,
        &options,
    )?)
}

/// Concatenate batches with possibly different schemas
///
/// The result schema is the union of all columns in first-seen order.
/// Missing columns are filled with nulls and columns whose types disagree are
/// widened. No batches yields an empty batch with no columns.
pub fn concat_tables(batches: &[RecordBatch]) -> Result<RecordBatch> {
    let Some(first) = batches.first() else {
        return Ok(RecordBatch::new_empty(Arc::new(Schema::empty())));
    };
    if batches.len() == 1 {
        return Ok(first.clone());
    }

    let mut union: Vec<(String, DataType)> = Vec::new();
    for batch in batches {
        for field in batch.schema().fields() {
            match union.iter_mut().find(|(name, _)| name == field.name()) {
                Some((_, dtype)) => *dtype = merge_types(dtype, field.data_type()),
                None => union.push((field.name().clone(), field.data_type().clone())),
            }
        }
    }

    let schema = Arc::new(Schema::new(
        union
            .iter()
            .map(|(name, dtype)| Field::new(name, dtype.clone(), true))
            .collect::<Vec<_>>(),
    ));

    let mut aligned = Vec::with_capacity(batches.len());
    for batch in batches {
        let rows = batch.num_rows();
        let mut columns: Vec<ArrayRef> = Vec::with_capacity(union.len());

        for (name, dtype) in &union {
            let column = match batch.column_by_name(name) {
                Some(col) if col.data_type() == dtype => Arc::clone(col),
                Some(col) => cast(col, dtype)?,
                None => new_null_array(dtype, rows),
            };
            columns.push(column);
        }

        let options = RecordBatchOptions::new().with_row_count(Some(rows));
        aligned.push(RecordBatch::try_new_with_options(
            Arc::clone(&schema),
            columns,
            &options,
        )?);
    }

    Ok(concat_batches(&schema, &aligned)?)
}

/// Replace line breaks and the delimiter inside Utf8 columns with a space
pub fn sanitize_string_columns(batch: &RecordBatch, delimiter: char) -> Result<RecordBatch> {
    let columns: Vec<ArrayRef> = batch
        .columns()
        .iter()
        .map(|col| match col.data_type() {
            DataType::Utf8 => {
                let sanitized: StringArray = col
                    .as_string::<i32>()
                    .iter()
                    .map(|v| v.map(|s| s.replace(['\n', '\r', delimiter], " ")))
                    .collect();
                Arc::new(sanitized) as ArrayRef
            }
            _ => Arc::clone(col),
        })
        .collect();

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    Ok(RecordBatch::try_new_with_options(
        batch.schema(),
        columns,
        &options,
    )?)
}

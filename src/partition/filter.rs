//! Inclusion and exclusion filters over partition values

use super::types::{PartitionEntry, PartitionFilter, PartitionKeys};
use crate::error::{Error, Result};
use std::collections::HashSet;

/// Apply exclusions, then inclusions, to resolved entries
///
/// Every filter key is validated before any entry is dropped. A key is known
/// when it was declared in `declared` or appears in at least one entry. When
/// nothing was declared and nothing was found there is nothing to filter.
pub(crate) fn apply_filters(
    mut entries: Vec<PartitionEntry>,
    declared: Option<&PartitionKeys>,
    exclusion: &PartitionFilter,
    inclusion: &PartitionFilter,
) -> Result<Vec<PartitionEntry>> {
    if exclusion.is_empty() && inclusion.is_empty() {
        return Ok(entries);
    }
    if declared.is_none() && entries.is_empty() {
        return Ok(entries);
    }

    let mut known: HashSet<&str> = declared
        .map(|keys| keys.key_names().collect())
        .unwrap_or_default();
    known.extend(entries.iter().flat_map(|entry| entry.values.keys()));

    if let Some(key) = exclusion
        .key_names()
        .chain(inclusion.key_names())
        .find(|key| !known.contains(key))
    {
        return Err(Error::unknown_key(key));
    }

    for (key, excluded) in exclusion.iter() {
        entries.retain(|entry| match entry.values.get(key) {
            Some(value) => !excluded.iter().any(|v| v == value),
            None => true,
        });
    }

    for (key, included) in inclusion.iter() {
        entries.retain(|entry| match entry.values.get(key) {
            Some(value) => included.iter().any(|v| v == value),
            None => false,
        });
    }

    Ok(entries)
}

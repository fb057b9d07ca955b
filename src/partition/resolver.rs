//! Partition resolution
//!
//! Builds the list of partition entries under a root path, either from an
//! explicit enumeration of partition keys or by discovering `key=value`
//! directories in storage.

use super::filter::apply_filters;
use super::types::{
    parse_segment, PartitionConfig, PartitionEntry, PartitionKeys, PartitionValues,
    ResolvedPartitions,
};
use crate::error::{Error, Result};
use crate::listing::{BlobListing, FileListing, FileMeta};
use crate::types::{basename, with_trailing_separator, SEPARATOR};
use std::collections::HashMap;
use tracing::{debug, info};

/// Resolve the partitions below `root`
///
/// Listing calls are awaited one after another: one per candidate
/// combination in explicit mode, a single recursive listing in discovery mode.
pub async fn resolve(
    root: &str,
    config: &PartitionConfig,
    listing: &dyn BlobListing,
) -> Result<ResolvedPartitions> {
    let root = with_trailing_separator(root);

    let entries = match &config.partition_keys {
        Some(keys) => {
            from_partition_keys(&root, keys, config.last_modified_last_level, listing).await?
        }
        None => discover(&root, config.last_modified_last_level, listing).await?,
    };

    let entries = apply_filters(
        entries,
        config.partition_keys.as_ref(),
        &config.partition_exclusion,
        &config.partition_inclusion,
    )?;

    info!("Resolved {} partitions under {}", entries.len(), root);
    Ok(ResolvedPartitions::new(root, entries))
}

// ============================================================================
// Explicit Mode
// ============================================================================

/// Cartesian product of the candidate values; the last key varies fastest
pub fn combinations(keys: &PartitionKeys) -> Vec<PartitionValues> {
    let mut combos = vec![PartitionValues::new()];

    for (key, values) in keys.iter() {
        let mut next = Vec::with_capacity(combos.len() * values.len());
        for combo in &combos {
            for value in values {
                next.push(combo.clone().with_value(key, value.as_str()));
            }
        }
        combos = next;
    }

    combos
}

async fn from_partition_keys(
    root: &str,
    keys: &PartitionKeys,
    last_modified_last_level: bool,
    listing: &dyn BlobListing,
) -> Result<Vec<PartitionEntry>> {
    let mut entries = Vec::new();

    for values in combinations(keys) {
        let dir = if values.is_empty() {
            root.to_string()
        } else {
            format!("{root}{}{SEPARATOR}", values.to_path())
        };

        let file = if last_modified_last_level {
            first_child(&dir, listing).await?
        } else {
            newest_below(&dir, listing).await?
        };

        match file {
            Some(file) => entries.push(PartitionEntry::new(file, values)),
            None => debug!("Partition {} has no files", dir),
        }
    }

    Ok(entries)
}

/// Basename of the first child of `dir`, `None` when absent or empty
async fn first_child(dir: &str, listing: &dyn BlobListing) -> Result<Option<String>> {
    match listing.list_children(dir).await {
        Ok(children) => Ok(children
            .first()
            .map(|child| basename(&child.name).to_string())),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

/// Most recent file below `dir`, allowing one undeclared directory level
async fn newest_below(dir: &str, listing: &dyn BlobListing) -> Result<Option<String>> {
    let files = match listing.list_all(dir).await {
        Ok(files) => files,
        Err(e) if e.is_not_found() => return Ok(None),
        Err(e) => return Err(e),
    };

    for path in files.keys() {
        if relative_to(dir, path)?.matches(SEPARATOR).count() > 1 {
            return Err(Error::ambiguous_layout(
                path.as_str(),
                "more than one directory level below the declared partition keys",
            ));
        }
    }

    let Some((path, _)) = newest_file(&files) else {
        return Ok(None);
    };

    Ok(Some(relative_to(dir, path)?.to_string()))
}

/// The file with the latest timestamp; ties keep the first in path order
fn newest_file(files: &FileListing) -> Option<(&String, &FileMeta)> {
    files.iter().fold(None, |newest, (path, meta)| match newest {
        Some((_, best)) if meta.last_modified <= best.last_modified => newest,
        _ => Some((path, meta)),
    })
}

// ============================================================================
// Discovery Mode
// ============================================================================

/// A listed file split into partition directories, leaf directory and name
struct DiscoveredFile<'a> {
    values: PartitionValues,
    leaf: Option<&'a str>,
    name: &'a str,
}

impl DiscoveredFile<'_> {
    /// File part of the entry: `leaf/name` or `name`
    fn suffix(&self) -> String {
        match self.leaf {
            Some(leaf) => format!("{leaf}{SEPARATOR}{}", self.name),
            None => self.name.to_string(),
        }
    }
}

async fn discover(
    root: &str,
    last_modified_last_level: bool,
    listing: &dyn BlobListing,
) -> Result<Vec<PartitionEntry>> {
    let files = match listing.list_all(root).await {
        Ok(files) => files,
        Err(e) if e.is_not_found() => FileListing::new(),
        Err(e) => return Err(e),
    };

    // Stable sort: equal timestamps keep listing order
    let mut files: Vec<(String, FileMeta)> = files.into_iter().collect();
    files.sort_by(|a, b| b.1.last_modified.cmp(&a.1.last_modified));

    debug!("Discovered {} files under {}", files.len(), root);

    if last_modified_last_level {
        discover_latest_per_leaf(root, &files)
    } else {
        files
            .iter()
            .map(|(path, _)| {
                let file = split_partition_path(root, path, false)?;
                Ok(PartitionEntry::new(file.suffix(), file.values))
            })
            .collect()
    }
}

/// Keep the most recent file per partition, ignoring the last directory level
fn discover_latest_per_leaf(
    root: &str,
    files: &[(String, FileMeta)],
) -> Result<Vec<PartitionEntry>> {
    let mut entries: Vec<(PartitionEntry, FileMeta)> = Vec::new();
    let mut groups: HashMap<PartitionValues, usize> = HashMap::new();

    for (path, meta) in files {
        let file = split_partition_path(root, path, true)?;

        match groups.get(&file.values) {
            Some(&idx) => {
                if meta.last_modified > entries[idx].1.last_modified {
                    entries[idx] = (PartitionEntry::new(file.suffix(), file.values), *meta);
                }
            }
            None => {
                groups.insert(file.values.clone(), entries.len());
                entries.push((PartitionEntry::new(file.suffix(), file.values), *meta));
            }
        }
    }

    Ok(entries.into_iter().map(|(entry, _)| entry).collect())
}

/// Split a listed path into partition values, an optional leaf and the name
///
/// With `leaf_is_undeclared`, the last directory is always the leaf and every
/// directory above it must be a `key=value` segment. Otherwise every
/// `key=value` directory is a partition and a single trailing directory
/// without `=` is tolerated as the leaf.
fn split_partition_path<'a>(
    root: &str,
    path: &'a str,
    leaf_is_undeclared: bool,
) -> Result<DiscoveredFile<'a>> {
    let relative = relative_to(root, path)?;
    let mut segments: Vec<&str> = relative.split(SEPARATOR).collect();
    let name = segments.pop().unwrap_or_default();

    let leaf = if leaf_is_undeclared {
        segments.pop()
    } else {
        match segments.last() {
            Some(last) if parse_segment(last).is_none() => segments.pop(),
            _ => None,
        }
    };

    let mut values = PartitionValues::new();
    for segment in segments {
        let (key, value) = parse_segment(segment).ok_or_else(|| {
            Error::ambiguous_layout(
                path,
                format!("directory '{segment}' is not a key=value partition"),
            )
        })?;
        values.insert(key, value);
    }

    Ok(DiscoveredFile { values, leaf, name })
}

fn relative_to<'a>(dir: &str, path: &'a str) -> Result<&'a str> {
    path.strip_prefix(dir)
        .ok_or_else(|| Error::invalid_path(path, format!("listed path is not below '{dir}'")))
}

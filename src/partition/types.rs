//! Partition types
//!
//! Ordered key/value abstractions for Hive-style partitions and the
//! immutable result of partition resolution.

use crate::error::{self, Error};
use crate::types::SEPARATOR;
use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// ============================================================================
// Partition Keys
// ============================================================================

/// Ordered mapping from partition key to a list of values
///
/// Used both for the candidate values of explicit partition keys and for
/// inclusion/exclusion filters. Key order is the directory nesting order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartitionKeys {
    keys: Vec<(String, Vec<String>)>,
}

/// Inclusion/exclusion filters share the key → values shape
pub type PartitionFilter = PartitionKeys;

impl PartitionKeys {
    /// Create an empty key set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key with its values
    #[must_use]
    pub fn with_key<I, V>(mut self, key: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        self.insert(key, values.into_iter().map(|v| v.to_string()).collect());
        self
    }

    /// Insert a key, replacing the values of an existing key in place
    pub fn insert(&mut self, key: impl Into<String>, values: Vec<String>) {
        let key = key.into();
        match self.keys.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = values,
            None => self.keys.push((key, values)),
        }
    }

    /// Values for a key
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.keys
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    /// Whether the key is declared
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys.iter().any(|(k, _)| k == key)
    }

    /// Key names in declaration order
    pub fn key_names(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(|(k, _)| k.as_str())
    }

    /// Iterate over `(key, values)` in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.keys.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no keys are declared
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Number of candidate combinations (product of value list lengths)
    pub fn combination_count(&self) -> usize {
        self.keys.iter().map(|(_, v)| v.len()).product()
    }
}

impl<K: Into<String>> FromIterator<(K, Vec<String>)> for PartitionKeys {
    fn from_iter<T: IntoIterator<Item = (K, Vec<String>)>>(iter: T) -> Self {
        let mut keys = Self::new();
        for (key, values) in iter {
            keys.insert(key, values);
        }
        keys
    }
}

impl Serialize for PartitionKeys {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.keys.len()))?;
        for (key, values) in &self.keys {
            map.serialize_entry(key, values)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PartitionKeys {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeysVisitor;

        impl<'de> Visitor<'de> for KeysVisitor {
            type Value = PartitionKeys;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map from partition key to a list of values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut keys = PartitionKeys::new();
                while let Some((key, values)) = access.next_entry::<String, ScalarList>()? {
                    keys.insert(key, values.0);
                }
                Ok(keys)
            }
        }

        deserializer.deserialize_map(KeysVisitor)
    }
}

/// A scalar rendered as a string; YAML `year: [2022, 2023]` yields `"2022"`
struct Scalar(String);

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ScalarVisitor;

        impl Visitor<'_> for ScalarVisitor {
            type Value = Scalar;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a string, number or boolean")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Scalar, E> {
                Ok(Scalar(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<Scalar, E> {
                Ok(Scalar(v.to_string()))
            }
        }

        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// One scalar or a sequence of scalars
struct ScalarList(Vec<String>);

impl<'de> Deserialize<'de> for ScalarList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct ListVisitor;

        impl<'de> Visitor<'de> for ListVisitor {
            type Value = ScalarList;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a value or a list of values")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<ScalarList, A::Error> {
                let mut values = Vec::new();
                while let Some(Scalar(value)) = seq.next_element()? {
                    values.push(value);
                }
                Ok(ScalarList(values))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ScalarList, E> {
                Ok(ScalarList(vec![v.to_string()]))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ScalarList, E> {
                Ok(ScalarList(vec![v.to_string()]))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ScalarList, E> {
                Ok(ScalarList(vec![v.to_string()]))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<ScalarList, E> {
                Ok(ScalarList(vec![v.to_string()]))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<ScalarList, E> {
                Ok(ScalarList(vec![v.to_string()]))
            }
        }

        deserializer.deserialize_any(ListVisitor)
    }
}

// ============================================================================
// Partition Values
// ============================================================================

/// Ordered `key → value` assignment of one partition
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct PartitionValues {
    pairs: Vec<(String, String)>,
}

impl PartitionValues {
    /// Create an empty assignment
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a value
    #[must_use]
    pub fn with_value(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Set a value, keeping the original position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.pairs.push((key, value)),
        }
    }

    /// Get a value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    /// Iterate over `(key, value)` in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Key names in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.pairs.iter().map(|(k, _)| k.as_str())
    }

    /// Number of keys
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Whether there are no keys
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// `k1=v1/k2=v2` directory path for these values
    pub fn to_path(&self) -> String {
        self.pairs
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(&SEPARATOR.to_string())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PartitionValues {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut values = Self::new();
        for (key, value) in iter {
            values.insert(key, value);
        }
        values
    }
}

impl Serialize for PartitionValues {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.pairs.len()))?;
        for (key, value) in &self.pairs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

/// Parse a `key=value` directory segment
///
/// Splits at the first `=`; segments without `=` or with an empty key are not
/// partition segments.
pub fn parse_segment(segment: &str) -> Option<(&str, &str)> {
    match segment.split_once('=') {
        Some((key, value)) if !key.is_empty() => Some((key, value)),
        _ => None,
    }
}

// ============================================================================
// Partition Entries
// ============================================================================

/// One resolved partition: the file to load and its key values
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartitionEntry {
    /// File name, or the relative suffix below the last partition directory
    pub file: String,
    /// Key values of the partition directories holding the file
    pub values: PartitionValues,
}

impl PartitionEntry {
    /// Create a new entry
    pub fn new(file: impl Into<String>, values: PartitionValues) -> Self {
        Self {
            file: file.into(),
            values,
        }
    }

    /// Path of the file relative to the partition root
    pub fn relative_path(&self) -> String {
        if self.values.is_empty() {
            self.file.clone()
        } else {
            format!("{}{SEPARATOR}{}", self.values.to_path(), self.file)
        }
    }
}

/// The immutable result of partition resolution
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPartitions {
    root: String,
    entries: Vec<PartitionEntry>,
}

impl ResolvedPartitions {
    pub(crate) fn new(root: String, entries: Vec<PartitionEntry>) -> Self {
        Self { root, entries }
    }

    /// Root path the partitions were resolved under
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Resolved entries in resolution order
    pub fn partition_files(&self) -> &[PartitionEntry] {
        &self.entries
    }

    /// Absolute file paths: `root + k1=v1/.../ + file`, in entry order
    pub fn partition_list(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|entry| format!("{}{}", self.root, entry.relative_path()))
            .collect()
    }

    /// Iterate over `(absolute_path, entry)`
    pub fn iter(&self) -> impl Iterator<Item = (String, &PartitionEntry)> {
        self.entries
            .iter()
            .map(|entry| (format!("{}{}", self.root, entry.relative_path()), entry))
    }

    /// Number of resolved entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume into the entry list
    pub fn into_entries(self) -> Vec<PartitionEntry> {
        self.entries
    }
}

// ============================================================================
// Partition Config
// ============================================================================

/// Configuration for partition resolution
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartitionConfig {
    /// Explicit key → candidate values; `None` discovers partitions from storage
    pub partition_keys: Option<PartitionKeys>,
    /// Values to drop, per key
    pub partition_exclusion: PartitionFilter,
    /// Values to keep, per key
    pub partition_inclusion: PartitionFilter,
    /// Pick the most recently modified file below the last partition level
    pub last_modified_last_level: bool,
}

impl PartitionConfig {
    /// Auto-discovery with no filters
    pub fn discover() -> Self {
        Self::default()
    }

    /// Explicit partition keys with no filters
    pub fn explicit(keys: PartitionKeys) -> Self {
        Self {
            partition_keys: Some(keys),
            ..Self::default()
        }
    }

    /// Set the exclusion filter
    #[must_use]
    pub fn with_exclusion(mut self, exclusion: PartitionFilter) -> Self {
        self.partition_exclusion = exclusion;
        self
    }

    /// Set the inclusion filter
    #[must_use]
    pub fn with_inclusion(mut self, inclusion: PartitionFilter) -> Self {
        self.partition_inclusion = inclusion;
        self
    }

    /// Set the recency mode
    #[must_use]
    pub fn with_last_modified_last_level(mut self, enabled: bool) -> Self {
        self.last_modified_last_level = enabled;
        self
    }

    /// Whether partitions are discovered from storage
    pub fn is_discovery(&self) -> bool {
        self.partition_keys.is_none()
    }

    /// Check that every key and value can form a single path segment
    pub fn validate(&self) -> error::Result<()> {
        if let Some(keys) = &self.partition_keys {
            validate_keys("partition_keys", keys)?;
        }
        validate_keys("partition_exclusion", &self.partition_exclusion)?;
        validate_keys("partition_inclusion", &self.partition_inclusion)
    }
}

fn validate_keys(section: &str, keys: &PartitionKeys) -> error::Result<()> {
    for (key, values) in keys.iter() {
        if key.is_empty() || key.contains(['=', SEPARATOR]) {
            return Err(Error::config(format!(
                "{section}: invalid partition key '{key}'"
            )));
        }
        if let Some(value) = values.iter().find(|v| v.contains(SEPARATOR)) {
            return Err(Error::config(format!(
                "{section}: value '{value}' of key '{key}' contains '{SEPARATOR}'"
            )));
        }
    }
    Ok(())
}

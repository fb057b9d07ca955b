//! Datalake facade
//!
//! Reads and writes tables by `container/blob/path` against one storage
//! account, with Hive-partitioned reads on top of [`resolve`].

use crate::decode::ReadOptions;
use crate::error::{Error, Result, ResultExt};
use crate::listing::{BlobListing, ObjectStoreListing};
use crate::partition::{resolve, PartitionConfig, ResolvedPartitions};
use crate::storage::{ContainerStore, StorageAccount};
use crate::table::{
    concat_tables, decode_table, encode_csv, encode_json, encode_parquet, sanitize_string_columns,
    with_partition_columns, ParquetWriterConfig,
};
use crate::types::{verify_extension, DatalakePath, FileFormat};
use arrow::record_batch::RecordBatch;
use tracing::{debug, info};

// ============================================================================
// Path Lists
// ============================================================================

/// One or more file paths to read as a single table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathList(Vec<String>);

impl PathList {
    /// The paths in read order
    pub fn paths(&self) -> &[String] {
        &self.0
    }
}

impl From<&str> for PathList {
    fn from(path: &str) -> Self {
        Self(vec![path.to_string()])
    }
}

impl From<String> for PathList {
    fn from(path: String) -> Self {
        Self(vec![path])
    }
}

impl From<Vec<String>> for PathList {
    fn from(paths: Vec<String>) -> Self {
        Self(paths)
    }
}

impl From<Vec<&str>> for PathList {
    fn from(paths: Vec<&str>) -> Self {
        Self(paths.into_iter().map(String::from).collect())
    }
}

impl From<&[&str]> for PathList {
    fn from(paths: &[&str]) -> Self {
        Self(paths.iter().map(|p| (*p).to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for PathList {
    fn from(paths: [&str; N]) -> Self {
        Self(paths.iter().map(|p| (*p).to_string()).collect())
    }
}

// ============================================================================
// Datalake
// ============================================================================

/// Table reads and writes against one storage account
#[derive(Debug, Clone)]
pub struct Datalake {
    account: StorageAccount,
    parquet: ParquetWriterConfig,
}

impl Datalake {
    /// Create a datalake over a storage account
    pub fn new(account: StorageAccount) -> Self {
        Self {
            account,
            parquet: ParquetWriterConfig::default(),
        }
    }

    /// Create a datalake from a storage account URL
    pub fn from_url(url: &str) -> Result<Self> {
        Ok(Self::new(StorageAccount::parse(url)?))
    }

    /// Use a custom Parquet writer configuration
    #[must_use]
    pub fn with_parquet_config(mut self, config: ParquetWriterConfig) -> Self {
        self.parquet = config;
        self
    }

    /// The storage account
    pub fn account(&self) -> &StorageAccount {
        &self.account
    }

    fn container_for(&self, path: &str) -> Result<ContainerStore> {
        let parsed = DatalakePath::parse(path)?;
        self.account.container_store(parsed.container())
    }

    // ------------------------------------------------------------------------
    // Plain reads
    // ------------------------------------------------------------------------

    /// Read one or more CSV files
    pub async fn read_csv(
        &self,
        paths: impl Into<PathList>,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        self.read_files(paths.into(), FileFormat::Csv, options).await
    }

    /// Read one or more JSON documents
    pub async fn read_json(
        &self,
        paths: impl Into<PathList>,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        self.read_files(paths.into(), FileFormat::Json, options).await
    }

    /// Read one or more JSON Lines files
    pub async fn read_jsonl(
        &self,
        paths: impl Into<PathList>,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        self.read_files(paths.into(), FileFormat::Jsonl, options).await
    }

    /// Read one or more workbooks
    ///
    /// Each file contributes the sheet named by `options.sheet`, or its first
    /// sheet.
    pub async fn read_excel(
        &self,
        paths: impl Into<PathList>,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        self.read_files(paths.into(), FileFormat::Excel, options).await
    }

    /// Read Parquet files
    ///
    /// A path ending in `/` reads every Parquet file below it, in path order.
    pub async fn read_parquet(&self, paths: impl Into<PathList>) -> Result<RecordBatch> {
        let mut files = Vec::new();
        for path in paths.into().0 {
            if DatalakePath::parse(&path)?.is_directory() {
                files.extend(self.parquet_files_below(&path).await?);
            } else {
                files.push(path);
            }
        }
        self.read_files(PathList(files), FileFormat::Parquet, &ReadOptions::default())
            .await
    }

    /// Read files of one format and concatenate them
    ///
    /// Every path must carry one of the format's extensions.
    pub async fn read_files(
        &self,
        paths: PathList,
        format: FileFormat,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        for path in paths.paths() {
            verify_extension(path, format.extensions())?;
        }

        let mut batches = Vec::with_capacity(paths.0.len());
        for path in paths.paths() {
            batches.push(self.read_one(path, format, options).await?);
        }

        concat_tables(&batches)
    }

    async fn read_one(
        &self,
        path: &str,
        format: FileFormat,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        let bytes = self.container_for(path)?.get(path).await?;
        debug!("Read {} bytes from {}", bytes.len(), path);
        decode_table(bytes, format, options).with_context(|| format!("Failed to read {path}"))
    }

    async fn parquet_files_below(&self, dir: &str) -> Result<Vec<String>> {
        let listing = ObjectStoreListing::new(self.container_for(dir)?);
        let files: Vec<String> = listing
            .list_all(dir)
            .await?
            .into_keys()
            .filter(|path| FileFormat::from_path(path) == Some(FileFormat::Parquet))
            .collect();

        if files.is_empty() {
            return Err(Error::FileNotFound {
                path: dir.to_string(),
            });
        }
        Ok(files)
    }

    // ------------------------------------------------------------------------
    // Partitioned reads
    // ------------------------------------------------------------------------

    /// Resolve the partitions below `root`
    pub async fn resolve_partitions(
        &self,
        root: &str,
        config: &PartitionConfig,
    ) -> Result<ResolvedPartitions> {
        let listing = ObjectStoreListing::new(self.container_for(root)?);
        resolve(root, config, &listing).await
    }

    /// Read every resolved partition file and stamp its key values as columns
    ///
    /// `root` must be a directory path ending in `/`.
    pub async fn read_with_partition(
        &self,
        root: &str,
        format: FileFormat,
        config: &PartitionConfig,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        let parsed = DatalakePath::parse_directory(root)?;
        let store = self.account.container_store(parsed.container())?;
        let listing = ObjectStoreListing::new(store.clone());

        let resolved = resolve(root, config, &listing).await?;

        let mut batches = Vec::with_capacity(resolved.len());
        for (path, entry) in resolved.iter() {
            let bytes = store.get(&path).await?;
            debug!("Read {} bytes from {}", bytes.len(), path);
            let batch = decode_table(bytes, format, options)
                .with_context(|| format!("Failed to read {path}"))?;
            batches.push(with_partition_columns(&batch, &entry.values)?);
        }

        let table = concat_tables(&batches)?;
        info!(
            "Read {} rows from {} {} partition files under {}",
            table.num_rows(),
            batches.len(),
            format.as_str(),
            root
        );
        Ok(table)
    }

    /// Partitioned CSV read
    pub async fn read_csv_with_partition(
        &self,
        root: &str,
        config: &PartitionConfig,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        self.read_with_partition(root, FileFormat::Csv, config, options)
            .await
    }

    /// Partitioned JSON read
    pub async fn read_json_with_partition(
        &self,
        root: &str,
        config: &PartitionConfig,
        options: &ReadOptions,
    ) -> Result<RecordBatch> {
        self.read_with_partition(root, FileFormat::Json, config, options)
            .await
    }

    /// Partitioned Parquet read
    pub async fn read_parquet_with_partition(
        &self,
        root: &str,
        config: &PartitionConfig,
    ) -> Result<RecordBatch> {
        self.read_with_partition(root, FileFormat::Parquet, config, &ReadOptions::default())
            .await
    }

    // ------------------------------------------------------------------------
    // Writes
    // ------------------------------------------------------------------------

    /// Write a batch as CSV with a header row
    ///
    /// Line breaks and the delimiter inside string values become spaces.
    pub async fn write_csv(&self, batch: &RecordBatch, path: &str, delimiter: char) -> Result<()> {
        let clean = sanitize_string_columns(batch, delimiter)?;
        let bytes = encode_csv(&clean, delimiter)?;
        self.write_bytes(path, bytes).await
    }

    /// Write a batch as JSON Lines
    pub async fn write_json(&self, batch: &RecordBatch, path: &str) -> Result<()> {
        let bytes = encode_json(batch)?;
        self.write_bytes(path, bytes).await
    }

    /// Write a batch as Parquet
    pub async fn write_parquet(&self, batch: &RecordBatch, path: &str) -> Result<()> {
        let bytes = encode_parquet(batch, &self.parquet)?;
        self.write_bytes(path, bytes).await
    }

    async fn write_bytes(&self, path: &str, bytes: bytes::Bytes) -> Result<()> {
        let size = bytes.len();
        self.container_for(path)?.put(path, bytes).await?;
        info!("Wrote {} bytes to {}", size, path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{Array, AsArray};
    use arrow::datatypes::Int64Type;
    use bytes::Bytes;
    use pretty_assertions::assert_eq;

    async fn seeded(files: &[(&str, &str)]) -> Datalake {
        let datalake = Datalake::new(StorageAccount::memory());
        for (path, body) in files {
            datalake
                .container_for(path)
                .unwrap()
                .put(path, Bytes::from(body.to_string()))
                .await
                .unwrap();
        }
        datalake
    }

    fn strings(batch: &RecordBatch, column: &str) -> Vec<String> {
        batch
            .column_by_name(column)
            .unwrap()
            .as_string::<i32>()
            .iter()
            .map(|v| v.unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_path_list_conversions() {
        assert_eq!(PathList::from("c/a.csv").paths(), ["c/a.csv"]);
        assert_eq!(PathList::from(["c/a.csv", "c/b.csv"]).paths().len(), 2);
        assert_eq!(
            PathList::from(vec!["c/a.csv".to_string()]),
            PathList::from("c/a.csv")
        );
    }

    #[tokio::test]
    async fn test_read_csv_rejects_wrong_extension() {
        let datalake = seeded(&[]).await;
        let err = datalake
            .read_csv("contenedor/foo/bar.text", &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidExtension { .. }));
    }

    #[tokio::test]
    async fn test_read_csv_missing_file() {
        let datalake = seeded(&[]).await;
        let err = datalake
            .read_csv("contenedor/foo/bar.csv", &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_read_csv_list_concatenates() {
        let datalake = seeded(&[
            ("c/a.csv", "foo_id\n1\n2\n3\n"),
            ("c/b.csv", "foo_id\n4\n5\n6\n"),
        ])
        .await;

        let table = datalake
            .read_csv(["c/a.csv", "c/b.csv"], &ReadOptions::default())
            .await
            .unwrap();

        assert_eq!(table.num_rows(), 6);
        let ids = table.column(0).as_primitive::<Int64Type>();
        assert_eq!(ids.value(3), 4);
    }

    #[tokio::test]
    async fn test_read_csv_with_partition_stamps_columns() {
        let body = "foo_id\n1\n2\n3\n";
        let datalake = seeded(&[
            ("contenedor/file/path/part=1/file.csv", body),
            ("contenedor/file/path/part=2/file.csv", body),
        ])
        .await;

        let config = PartitionConfig::explicit(
            crate::partition::PartitionKeys::new().with_key("part", [1, 2]),
        );
        let table = datalake
            .read_csv_with_partition("contenedor/file/path/", &config, &ReadOptions::default())
            .await
            .unwrap();

        assert_eq!(strings(&table, "part"), vec!["1", "1", "1", "2", "2", "2"]);
    }

    #[tokio::test]
    async fn test_read_with_partition_requires_directory() {
        let datalake = seeded(&[]).await;
        let err = datalake
            .read_csv_with_partition(
                "contenedor/file/path",
                &PartitionConfig::discover(),
                &ReadOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPath { .. }));
    }

    #[tokio::test]
    async fn test_write_csv_sanitizes_strings() {
        let datalake = seeded(&[]).await;
        let records = vec![
            serde_json::json!({"foo_str": "bar\n", "bar_str": "bar", "foo": 1}),
            serde_json::json!({"foo_str": "foo,", "bar_str": "foo|", "foo": 2}),
            serde_json::json!({"foo_str": "bar|", "bar_str": "bar\r", "foo": 3}),
        ];
        let batch = crate::table::json_to_arrow(&records, None).unwrap();

        datalake.write_csv(&batch, "c/out.csv", ',').await.unwrap();
        let table = datalake
            .read_csv("c/out.csv", &ReadOptions::default())
            .await
            .unwrap();

        assert_eq!(strings(&table, "foo_str"), vec!["bar ", "foo ", "bar|"]);
        assert_eq!(strings(&table, "bar_str"), vec!["bar", "foo|", "bar "]);
        assert!(!table.column(2).is_null(0));
    }

    #[tokio::test]
    async fn test_read_excel() {
        let mut workbook = rust_xlsxwriter::Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "foo_id").unwrap();
        sheet.write_number(1, 0, 1.0).unwrap();
        sheet.write_number(2, 0, 2.0).unwrap();

        let datalake = seeded(&[]).await;
        datalake
            .write_bytes("c/path/to/file.xlsx", Bytes::from(workbook.save_to_buffer().unwrap()))
            .await
            .unwrap();

        let table = datalake
            .read_excel("c/path/to/file.xlsx", &ReadOptions::default())
            .await
            .unwrap();
        let ids = table.column(0).as_primitive::<Int64Type>();
        assert_eq!(ids.values().to_vec(), vec![1, 2]);

        let err = datalake
            .read_excel("c/path/to/file.csv", &ReadOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::InvalidExtension { .. }));
    }

    #[tokio::test]
    async fn test_read_parquet_directory() {
        let datalake = seeded(&[("c/data/_SUCCESS", "")]).await;
        let batch = crate::table::json_to_arrow(&[serde_json::json!({"a": 1})], None).unwrap();
        datalake
            .write_parquet(&batch, "c/data/part-0.parquet")
            .await
            .unwrap();
        datalake
            .write_parquet(&batch, "c/data/part-1.parquet")
            .await
            .unwrap();

        let table = datalake.read_parquet("c/data/").await.unwrap();
        assert_eq!(table.num_rows(), 2);

        let err = datalake.read_parquet("c/empty/").await.unwrap_err();
        assert!(err.is_not_found());
    }
}

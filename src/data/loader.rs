//! CSV Data Loader Module
//! Handles CSV file loading using Polars, keeping the raw bytes for export.

use polars::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read CSV {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: PolarsError,
    },
    #[error("Failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// A loaded CSV file.
pub struct Table {
    name: String,
    df: DataFrame,
    raw: Vec<u8>,
}

impl Table {
    /// Load a CSV file with a header row, inferring column types.
    pub fn load(path: &Path) -> Result<Self, LoaderError> {
        let raw = fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let malformed = |source| LoaderError::Malformed {
            path: path.to_path_buf(),
            source,
        };
        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(None)
            .with_ignore_errors(false)
            .finish()
            .and_then(|lazy| lazy.collect())
            .map_err(malformed)?;

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.to_string_lossy().to_string());

        info!(
            "Loaded {}: {} rows, {} columns",
            name,
            df.height(),
            df.width()
        );
        debug!("Schema of {}: {:?}", name, df.schema());

        Ok(Self {
            name,
            df,
            raw,
        })
    }

    /// Base name of the source file.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// File contents exactly as read from disk.
    pub fn raw_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Get list of column names.
    pub fn columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn row_count(&self) -> usize {
        self.df.height()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_load_infers_columns_and_types() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "prices-2024-01-01.csv",
            "ticker,current_price,1M\nAAA,10.5,12.345\nBBB,20,\n",
        );

        let table = Table::load(&path).unwrap();
        assert_eq!(table.name(), "prices-2024-01-01.csv");
        assert_eq!(table.columns(), vec!["ticker", "current_price", "1M"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(
            table.dataframe().column("current_price").unwrap().dtype(),
            &DataType::Float64
        );
        assert_eq!(
            table.dataframe().column("ticker").unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn test_load_keeps_raw_bytes() {
        let dir = TempDir::new().unwrap();
        let content = "ticker,1M\r\n\"AAA\",  1.50\r\nBBB,2\r\n";
        let path = write(&dir, "raw-2024-01-01.csv", content);

        let table = Table::load(&path).unwrap();
        assert_eq!(table.raw_bytes(), content.as_bytes());
    }

    #[test]
    fn test_load_infers_types_from_whole_file() {
        let dir = TempDir::new().unwrap();
        let mut content = String::from("ticker,1M\n");
        for i in 0..10_050 {
            content.push_str(&format!("T{i},{i}\n"));
        }
        content.push_str("LATE,n/a\n");
        let path = write(&dir, "long-2024-01-01.csv", &content);

        let table = Table::load(&path).unwrap();
        assert_eq!(table.row_count(), 10_051);
        assert_eq!(
            table.dataframe().column("1M").unwrap().dtype(),
            &DataType::String
        );
    }

    #[test]
    fn test_load_ragged_rows_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "bad-2024-01-01.csv", "a,b\n1,2\n3,4,5\n");

        let err = Table::load(&path).err().unwrap();
        assert!(matches!(err, LoaderError::Malformed { .. }));
        assert!(err.to_string().contains("bad-2024-01-01.csv"));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let dir = TempDir::new().unwrap();
        let err = Table::load(&dir.path().join("gone-2024-01-01.csv"))
            .err()
            .unwrap();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}

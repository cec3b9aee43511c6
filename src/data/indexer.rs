//! File Indexer Module
//! Scans the output folder for CSV files ending in a `YYYY-MM-DD` date suffix.

use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::{debug, info, trace};

/// Trailing `<date>.csv`, extension matched case-insensitively.
static DATE_SUFFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d{4}-\d{2}-\d{2})\.csv$").unwrap());

#[derive(Error, Debug)]
pub enum IndexError {
    #[error("Folder not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("No files found that end with YYYY-MM-DD.csv in {}", .0.display())]
    EmptyIndex(PathBuf),
    #[error("Failed to list {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// One discovered CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    /// `YYYY-MM-DD` taken from the filename, not checked against a calendar.
    pub date: String,
}

/// Extract the date suffix from a file name, if it has one.
pub fn date_suffix(name: &str) -> Option<&str> {
    DATE_SUFFIX_RE
        .captures(name)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Discovered files grouped by date.
///
/// Groups are never empty and are sorted by lowercased file name.
#[derive(Debug, Clone, Default)]
pub struct FileIndex {
    by_date: BTreeMap<String, Vec<FileEntry>>,
}

impl FileIndex {
    /// Scan `dir` (non-recursive) and build a fresh index.
    pub fn scan(dir: &Path) -> Result<Self, IndexError> {
        if !dir.is_dir() {
            return Err(IndexError::DirectoryNotFound(dir.to_path_buf()));
        }

        let io_err = |source| IndexError::Io {
            path: dir.to_path_buf(),
            source,
        };

        let mut by_date: BTreeMap<String, Vec<FileEntry>> = BTreeMap::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let entry = entry.map_err(io_err)?;
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().to_string();
            let Some(date) = date_suffix(&name) else {
                trace!("Skipping {}", name);
                continue;
            };

            by_date.entry(date.to_string()).or_default().push(FileEntry {
                date: date.to_string(),
                path,
                name,
            });
        }

        if by_date.is_empty() {
            return Err(IndexError::EmptyIndex(dir.to_path_buf()));
        }

        for files in by_date.values_mut() {
            files.sort_by_key(|f| (f.name.to_lowercase(), f.name.clone()));
        }

        let index = Self { by_date };
        info!(
            "Indexed {} files across {} dates in {}",
            index.len(),
            index.by_date.len(),
            dir.display()
        );
        Ok(index)
    }

    /// Available dates, most recent first.
    pub fn dates(&self) -> Vec<String> {
        self.by_date.keys().rev().cloned().collect()
    }

    /// Files for a date, sorted by name.
    pub fn files_for(&self, date: &str) -> Option<&[FileEntry]> {
        self.by_date.get(date).map(Vec::as_slice)
    }

    /// First file of the most recent date.
    pub fn latest(&self) -> Option<&FileEntry> {
        self.by_date
            .values()
            .next_back()
            .and_then(|files| files.first())
    }

    /// Look up an entry by path, e.g. to keep a selection across rescans.
    pub fn find(&self, path: &Path) -> Option<&FileEntry> {
        let date = date_suffix(path.file_name()?.to_str()?)?;
        let found = self
            .by_date
            .get(date)?
            .iter()
            .find(|f| f.path == path);
        debug!("Lookup {} -> {}", path.display(), found.is_some());
        found
    }

    pub fn len(&self) -> usize {
        self.by_date.values().map(Vec::len).sum()
    }
}

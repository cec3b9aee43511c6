//! Viewer Module
//! Single request/response entry point: selection + options in, everything the UI shows out.

use crate::data::{
    DisplayOptions, ExportPayload, FileIndex, IndexError, LoaderError, PresentError,
    PresentationSpec, Table, TablePresenter, ViewMode,
};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ViewerError {
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Present(#[from] PresentError),
}

/// How a failure should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Nothing else can be shown for this folder.
    Blocking,
    /// Nothing to show, but nothing went wrong.
    Notice,
    /// Only the current selection failed.
    Inline,
}

impl ViewerError {
    pub fn severity(&self) -> Severity {
        match self {
            ViewerError::Index(IndexError::EmptyIndex(_)) => Severity::Notice,
            ViewerError::Index(_) => Severity::Blocking,
            ViewerError::Loader(_) | ViewerError::Present(_) => Severity::Inline,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ViewRequest {
    pub path: PathBuf,
    pub options: DisplayOptions,
}

/// Everything needed to render one selection.
#[derive(Debug, Clone)]
pub struct ViewResult {
    pub source: PathBuf,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
    pub missing_columns: Vec<String>,
    pub export: ExportPayload,
}

/// Scans a folder and presents selected files.
#[derive(Debug, Clone)]
pub struct Viewer {
    root: PathBuf,
    spec: PresentationSpec,
    mode: ViewMode,
}

impl Viewer {
    pub fn new(root: PathBuf, spec: PresentationSpec, mode: ViewMode) -> Self {
        Self { root, spec, mode }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn set_root(&mut self, root: PathBuf) {
        self.root = root;
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn scan(&self) -> Result<FileIndex, ViewerError> {
        FileIndex::scan(&self.root).map_err(|e| {
            warn!("{}", e);
            e.into()
        })
    }

    /// Load, present and export one file.
    pub fn view(&self, request: &ViewRequest) -> Result<ViewResult, ViewerError> {
        let table = Table::load(&request.path).inspect_err(|e| warn!("{}", e))?;
        let display = TablePresenter::present(&table, &self.spec, self.mode, request.options)?;
        let export = TablePresenter::export(&table, &display, self.mode)?;

        let shown_rows = display.total_rows().min(request.options.max_rows);
        info!(
            "Viewing {} ({:?}, {} of {} rows)",
            table.name(),
            self.mode,
            shown_rows,
            table.row_count()
        );

        Ok(ViewResult {
            source: request.path.clone(),
            headers: display.headers(),
            rows: display.preview_rows(),
            total_rows: display.total_rows(),
            missing_columns: display.missing_columns().to_vec(),
            export,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn viewer(dir: &TempDir, mode: ViewMode) -> Viewer {
        Viewer::new(dir.path().to_path_buf(), PresentationSpec::default(), mode)
    }

    #[test]
    fn test_view_filtered_selection() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("perf-2024-05-01.csv");
        fs::write(&path, "ticker,current_price,1M\nAAA,1,12.345\nBBB,2,oops\n").unwrap();

        let viewer = viewer(&dir, ViewMode::Filtered);
        let index = viewer.scan().unwrap();
        let entry = index.latest().unwrap();

        let result = viewer
            .view(&ViewRequest {
                path: entry.path.clone(),
                options: DisplayOptions::for_mode(viewer.mode()),
            })
            .unwrap();

        assert_eq!(result.headers, vec!["ticker", "current_price", "1M Performance"]);
        assert_eq!(result.rows[0][2], "12.35%");
        assert_eq!(result.rows[1][2], "");
        assert_eq!(result.total_rows, 2);
        assert!(result.missing_columns.contains(&"3M".to_string()));
        assert_eq!(result.export.file_name, "perf-2024-05-01.csv");
        assert_eq!(result.export.mime, "text/csv");
    }

    #[test]
    fn test_view_pass_through_round_trips_bytes() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("raw-2024-05-01.csv");
        let content = "ticker;x\nAAA;1\n";
        fs::write(&path, content).unwrap();

        let viewer = viewer(&dir, ViewMode::PassThrough);
        let result = viewer
            .view(&ViewRequest {
                path: path.clone(),
                options: DisplayOptions::for_mode(ViewMode::PassThrough),
            })
            .unwrap();

        assert_eq!(result.export.bytes, content.as_bytes());
        assert!(result.missing_columns.is_empty());
    }

    #[test]
    fn test_malformed_file_is_inline_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad-2024-05-01.csv");
        fs::write(&path, "a,b\n1,2\n3,4,5\n").unwrap();

        let err = viewer(&dir, ViewMode::Filtered)
            .view(&ViewRequest {
                path,
                options: DisplayOptions::for_mode(ViewMode::Filtered),
            })
            .unwrap_err();
        assert_eq!(err.severity(), Severity::Inline);
    }

    #[test]
    fn test_scan_error_severity() {
        let dir = TempDir::new().unwrap();
        let empty = viewer(&dir, ViewMode::Filtered).scan().unwrap_err();
        assert_eq!(empty.severity(), Severity::Notice);

        let mut missing = viewer(&dir, ViewMode::Filtered);
        missing.set_root(dir.path().join("nope"));
        assert_eq!(missing.scan().unwrap_err().severity(), Severity::Blocking);
    }
}

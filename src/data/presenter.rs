//! Table Presenter Module
//! Column selection, renaming and percentage formatting for display and export.

use crate::data::Table;
use polars::prelude::*;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

/// Row cap bounds for the preview.
pub const MIN_ROWS: usize = 10;
pub const MAX_ROWS: usize = 500;
pub const DEFAULT_ROWS: usize = 100;

pub const CSV_MIME: &str = "text/csv";

#[derive(Error, Debug)]
pub enum PresentError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// How the selected file is presented and exported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// Preferred columns only (unless "show all" is ticked); export the transformed table.
    #[default]
    Filtered,
    /// Always the full table; export the source file byte for byte.
    PassThrough,
}

impl ViewMode {
    /// Initial state of the "show all columns" toggle.
    pub fn default_show_all(self) -> bool {
        match self {
            ViewMode::Filtered => false,
            ViewMode::PassThrough => true,
        }
    }
}

/// Preferred column order and display labels for percentage columns.
#[derive(Debug, Clone, PartialEq)]
pub struct PresentationSpec {
    pub preferred_columns: Vec<String>,
    /// `(source column, display label)` pairs.
    pub performance_labels: Vec<(String, String)>,
}

impl Default for PresentationSpec {
    fn default() -> Self {
        let preferred_columns = [
            "ticker",
            "current_up_trend",
            "current_trend_length",
            "current_price",
            "1M",
            "3M",
            "6M",
            "1Y",
        ];
        Self {
            preferred_columns: preferred_columns.iter().map(|c| c.to_string()).collect(),
            performance_labels: ["1M", "3M", "6M", "1Y"]
                .iter()
                .map(|c| (c.to_string(), format!("{c} Performance")))
                .collect(),
        }
    }
}

impl PresentationSpec {
    /// Display label for a performance column.
    pub fn label_for(&self, column: &str) -> Option<&str> {
        self.performance_labels
            .iter()
            .find(|(raw, _)| raw == column)
            .map(|(_, label)| label.as_str())
    }
}

/// User-facing display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayOptions {
    pub max_rows: usize,
    pub show_all_columns: bool,
}

impl DisplayOptions {
    pub fn new(max_rows: usize, show_all_columns: bool) -> Self {
        Self {
            max_rows: max_rows.clamp(MIN_ROWS, MAX_ROWS),
            show_all_columns,
        }
    }

    pub fn for_mode(mode: ViewMode) -> Self {
        Self::new(DEFAULT_ROWS, mode.default_show_all())
    }
}

/// Transformed view of a loaded table.
#[derive(Debug, Clone)]
pub struct DisplayTable {
    df: DataFrame,
    missing_columns: Vec<String>,
    max_rows: usize,
}

impl DisplayTable {
    /// Full transformed frame, without the row cap.
    pub fn dataframe(&self) -> &DataFrame {
        &self.df
    }

    /// Preferred columns the file did not have.
    pub fn missing_columns(&self) -> &[String] {
        &self.missing_columns
    }

    pub fn headers(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn total_rows(&self) -> usize {
        self.df.height()
    }

    /// First `max_rows` rows.
    pub fn preview(&self) -> DataFrame {
        self.df.head(Some(self.max_rows))
    }

    /// Preview cells rendered as text, row by row.
    pub fn preview_rows(&self) -> Vec<Vec<String>> {
        let preview = self.preview();
        let columns = preview.get_columns();
        (0..preview.height())
            .map(|i| {
                columns
                    .iter()
                    .map(|col| col.get(i).map(cell_text).unwrap_or_default())
                    .collect()
            })
            .collect()
    }
}

/// Render a cell; nulls become empty strings.
fn cell_text(value: AnyValue) -> String {
    if value.is_null() {
        return String::new();
    }
    match value.get_str() {
        Some(s) => s.to_string(),
        None => value.to_string(),
    }
}

/// Payload offered for download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPayload {
    pub file_name: String,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
}

/// Format a percentage cell: two decimals and a `%`, empty when missing.
pub fn format_percent(value: Option<f64>) -> String {
    match value {
        Some(v) if !v.is_nan() => format!("{v:.2}%"),
        _ => String::new(),
    }
}

/// Handles column selection and formatting.
pub struct TablePresenter;

impl TablePresenter {
    /// Build the display view of `table`.
    pub fn present(
        table: &Table,
        spec: &PresentationSpec,
        mode: ViewMode,
        options: DisplayOptions,
    ) -> Result<DisplayTable, PresentError> {
        let source = table.dataframe();
        let max_rows = options.max_rows.clamp(MIN_ROWS, MAX_ROWS);

        if mode == ViewMode::PassThrough || options.show_all_columns {
            debug!("Showing all columns of {}: {:?}", table.name(), table.columns());
            return Ok(DisplayTable {
                df: source.clone(),
                missing_columns: Vec::new(),
                max_rows,
            });
        }

        let (available, missing): (Vec<&String>, Vec<&String>) = spec
            .preferred_columns
            .iter()
            .partition(|c| source.column(c.as_str()).is_ok());
        if !missing.is_empty() {
            info!("{} is missing columns: {:?}", table.name(), missing);
        }

        let mut df = source.select(available.iter().map(|c| c.as_str()))?;
        let renames: Vec<(String, String)> = df
            .get_column_names_str()
            .into_iter()
            .filter_map(|c| spec.label_for(c).map(|l| (c.to_string(), l.to_string())))
            .collect();
        for (raw, label) in &renames {
            let formatted = Self::format_performance(df.column(raw)?, label)?;
            df.replace(raw, formatted)?;
            df.rename(raw, label.as_str().into())?;
        }

        Ok(DisplayTable {
            df,
            missing_columns: missing.into_iter().cloned().collect(),
            max_rows,
        })
    }

    /// Coerce a column to numbers and render each as a percentage string.
    ///
    /// Missing cells stay null so they show and export as empty fields.
    fn format_performance(column: &Column, label: &str) -> Result<Series, PresentError> {
        let numeric = column.cast(&DataType::Float64)?;
        let values: Vec<Option<String>> = numeric
            .f64()?
            .into_iter()
            .map(|v| Some(format_percent(v)).filter(|s| !s.is_empty()))
            .collect();
        Ok(Series::new(label.into(), values))
    }

    /// Bytes offered for download, named after the source file.
    pub fn export(
        table: &Table,
        display: &DisplayTable,
        mode: ViewMode,
    ) -> Result<ExportPayload, PresentError> {
        let bytes = match mode {
            ViewMode::PassThrough => table.raw_bytes().to_vec(),
            ViewMode::Filtered => {
                let mut df = display.dataframe().clone();
                let mut buf = Vec::new();
                CsvWriter::new(&mut buf)
                    .include_header(true)
                    .finish(&mut df)?;
                buf
            }
        };
        debug!("Export of {} is {} bytes", table.name(), bytes.len());

        Ok(ExportPayload {
            file_name: table.name().to_string(),
            mime: CSV_MIME,
            bytes,
        })
    }
}

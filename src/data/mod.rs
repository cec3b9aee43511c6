//! Data module - file discovery, CSV loading and presentation

mod indexer;
mod loader;
mod presenter;
mod viewer;

pub use indexer::{FileEntry, FileIndex, IndexError};
pub use loader::{LoaderError, Table};
pub use presenter::{
    DisplayOptions, ExportPayload, PresentError, PresentationSpec, TablePresenter, ViewMode,
    DEFAULT_ROWS, MAX_ROWS, MIN_ROWS,
};
pub use viewer::{Severity, ViewRequest, ViewResult, Viewer, ViewerError};

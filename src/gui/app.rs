//! CSV Viewer Main Application
//! Main window with control panel and table viewer.

use crate::config::AppConfig;
use crate::data::{DisplayOptions, FileIndex, ViewRequest, Viewer};
use crate::gui::{ControlPanel, ControlPanelAction, TableViewer, ViewState};
use egui::SidePanel;
use std::fs;
use tracing::{debug, error, info};

/// Main application window.
pub struct ViewerApp {
    viewer: Viewer,
    index: Option<FileIndex>,
    control_panel: ControlPanel,
    table_viewer: TableViewer,
}

impl ViewerApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, config: AppConfig) -> Self {
        let viewer = Viewer::new(config.output_dir.clone(), config.presentation, config.mode);
        let options = DisplayOptions::new(config.max_rows, viewer.mode().default_show_all());

        let mut app = Self {
            control_panel: ControlPanel::new(config.output_dir, options),
            viewer,
            index: None,
            table_viewer: TableViewer::new(),
        };
        app.rescan();
        app
    }

    /// Rebuild the index from disk and re-render the current selection.
    fn rescan(&mut self) {
        match self.viewer.scan() {
            Ok(index) => {
                self.control_panel.update_index(&index);
                self.control_panel
                    .set_status(&format!("Found {} files", index.len()));
                self.index = Some(index);
                self.refresh_view();
            }
            Err(e) => {
                self.index = None;
                self.control_panel.clear_selection();
                self.control_panel.set_status("No files");
                self.table_viewer.set_state(e.into());
            }
        }
    }

    /// Issue one view request for the current selection and options.
    fn refresh_view(&mut self) {
        let Some(path) = self.control_panel.selected_file() else {
            self.table_viewer.set_state(ViewState::Empty);
            self.control_panel.download_enabled = false;
            return;
        };

        let request = ViewRequest {
            path: path.to_path_buf(),
            options: self.control_panel.settings.options(),
        };
        debug!("View request: {:?}", request);

        let state = match self.viewer.view(&request) {
            Ok(result) => ViewState::Ready(result),
            Err(e) => e.into(),
        };
        self.control_panel.download_enabled = matches!(state, ViewState::Ready(_));
        self.table_viewer.set_state(state);
    }

    fn handle_browse_folder(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .set_directory(self.viewer.root())
            .pick_folder()
        {
            info!("Switching folder to {}", path.display());
            self.viewer.set_root(path.clone());
            self.control_panel.root = path;
            self.control_panel.settings.file = None;
            self.rescan();
        }
    }

    fn handle_date_changed(&mut self, date: &str) {
        if let Some(index) = &self.index {
            self.control_panel.select_date(index, date);
        }
        self.refresh_view();
    }

    /// Save the export payload where the user chooses.
    fn handle_download(&mut self) {
        let Some(result) = self.table_viewer.result() else {
            self.control_panel.set_status("Nothing to download");
            return;
        };
        let export = &result.export;

        let output_path = match rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(&export.file_name)
            .save_file()
        {
            Some(path) => path,
            None => return, // User cancelled
        };

        match fs::write(&output_path, &export.bytes) {
            Ok(()) => {
                info!(
                    "Saved {} ({} bytes, {})",
                    output_path.display(),
                    export.bytes.len(),
                    export.mime
                );
                self.control_panel
                    .set_status(&format!("Saved {}", output_path.display()));
                self.control_panel.last_download = Some(output_path);
            }
            Err(e) => {
                error!("Failed to save {}: {}", output_path.display(), e);
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    fn handle_open_download(&mut self) {
        let Some(path) = self.control_panel.last_download.clone() else {
            return;
        };
        if let Err(e) = open::that(&path) {
            error!("Failed to open {}: {}", path.display(), e);
            self.control_panel.set_status(&format!("Error: {}", e));
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(300.0)
            .max_width(350.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let action = self.control_panel.show(ui);
                    if action != ControlPanelAction::None {
                        debug!("Action: {:?}", action);
                    }

                    match action {
                        ControlPanelAction::BrowseFolder => self.handle_browse_folder(),
                        ControlPanelAction::Rescan => self.rescan(),
                        ControlPanelAction::DateChanged(date) => self.handle_date_changed(&date),
                        ControlPanelAction::SelectionChanged => self.refresh_view(),
                        ControlPanelAction::Download => self.handle_download(),
                        ControlPanelAction::OpenDownload => self.handle_open_download(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Table Viewer
        egui::CentralPanel::default().show(ctx, |ui| {
            self.table_viewer.show(ui);
        });
    }
}

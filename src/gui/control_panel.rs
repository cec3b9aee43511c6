//! Control Panel Widget
//! Left side panel with folder, date/file selection, display options and download.

use crate::data::{DisplayOptions, FileEntry, FileIndex, MAX_ROWS, MIN_ROWS};
use egui::{Color32, ComboBox, RichText};
use std::path::{Path, PathBuf};

/// Current selection and display settings.
#[derive(Default, Clone)]
pub struct UserSettings {
    pub date: Option<String>,
    pub file: Option<PathBuf>,
    pub max_rows: usize,
    pub show_all_columns: bool,
}

impl UserSettings {
    pub fn options(&self) -> DisplayOptions {
        DisplayOptions::new(self.max_rows, self.show_all_columns)
    }
}

/// Left side control panel.
pub struct ControlPanel {
    pub settings: UserSettings,
    pub root: PathBuf,
    pub dates: Vec<String>,
    pub files: Vec<FileEntry>,
    pub download_enabled: bool,
    pub last_download: Option<PathBuf>,
    pub status: String,
}

impl ControlPanel {
    pub fn new(root: PathBuf, options: DisplayOptions) -> Self {
        Self {
            settings: UserSettings {
                date: None,
                file: None,
                max_rows: options.max_rows,
                show_all_columns: options.show_all_columns,
            },
            root,
            dates: Vec::new(),
            files: Vec::new(),
            download_enabled: false,
            last_download: None,
            status: "Ready".to_string(),
        }
    }

    /// Refill the dropdowns from a fresh scan, keeping the selection if it still exists.
    pub fn update_index(&mut self, index: &FileIndex) {
        self.dates = index.dates();

        let kept = self
            .settings
            .file
            .as_deref()
            .and_then(|path| index.find(path))
            .or_else(|| index.latest());

        match kept {
            Some(entry) => {
                let date = entry.date.clone();
                let path = entry.path.clone();
                self.select_date(index, &date);
                self.settings.file = Some(path);
            }
            None => self.clear_selection(),
        }
    }

    /// Switch date and reset the file to the first one of that date.
    pub fn select_date(&mut self, index: &FileIndex, date: &str) {
        self.files = index.files_for(date).map(<[_]>::to_vec).unwrap_or_default();
        self.settings.date = Some(date.to_string());
        self.settings.file = self.files.first().map(|f| f.path.clone());
    }

    pub fn clear_selection(&mut self) {
        self.dates.clear();
        self.files.clear();
        self.settings.date = None;
        self.settings.file = None;
        self.download_enabled = false;
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.settings.file.as_deref()
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("📄 Output CSV Viewer")
                    .size(20.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Folder Section =====
        ui.label(RichText::new("📁 Data Folder").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.label(RichText::new(self.root.display().to_string()).size(12.0));
                ui.horizontal(|ui| {
                    if ui.button("📂 Browse").clicked() {
                        action = ControlPanelAction::BrowseFolder;
                    }
                    if ui.button("🔄 Rescan").clicked() {
                        action = ControlPanelAction::Rescan;
                    }
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Selection Section =====
        ui.label(RichText::new("🗂 Selection").size(14.0).strong());
        ui.add_space(8.0);

        let label_width = 50.0;
        let combo_width = 230.0;

        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("Date:"));
            ComboBox::from_id_salt("date")
                .width(combo_width)
                .selected_text(self.settings.date.clone().unwrap_or_default())
                .show_ui(ui, |ui| {
                    for date in &self.dates {
                        let selected = self.settings.date.as_ref() == Some(date);
                        if ui.selectable_label(selected, date).clicked() && !selected {
                            action = ControlPanelAction::DateChanged(date.clone());
                        }
                    }
                });
        });

        ui.add_space(5.0);

        let file_text = self
            .files
            .iter()
            .find(|f| Some(&f.path) == self.settings.file.as_ref())
            .map(|f| f.name.clone())
            .unwrap_or_default();
        ui.horizontal(|ui| {
            ui.add_sized([label_width, 20.0], egui::Label::new("File:"));
            ComboBox::from_id_salt("file")
                .width(combo_width)
                .selected_text(file_text)
                .show_ui(ui, |ui| {
                    for file in &self.files {
                        let selected = self.settings.file.as_ref() == Some(&file.path);
                        if ui.selectable_label(selected, &file.name).clicked() && !selected {
                            self.settings.file = Some(file.path.clone());
                            action = ControlPanelAction::SelectionChanged;
                        }
                    }
                });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Display Options =====
        egui::CollapsingHeader::new(RichText::new("⚙️ Display options").size(14.0).strong())
            .default_open(false)
            .show(ui, |ui| {
                let rows = ui.add(
                    egui::Slider::new(&mut self.settings.max_rows, MIN_ROWS..=MAX_ROWS)
                        .text("Max rows to show"),
                );
                let all = ui.checkbox(&mut self.settings.show_all_columns, "Show all columns");
                if rows.changed() || all.changed() {
                    action = ControlPanelAction::SelectionChanged;
                }
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Action Buttons =====
        ui.vertical_centered(|ui| {
            ui.add_enabled_ui(self.download_enabled, |ui| {
                let button =
                    egui::Button::new(RichText::new("⬇ Download selected CSV").size(15.0))
                        .min_size(egui::vec2(200.0, 32.0));
                if ui.add(button).clicked() {
                    action = ControlPanelAction::Download;
                }
            });

            ui.add_space(8.0);

            ui.add_enabled_ui(self.last_download.is_some(), |ui| {
                let open_button = egui::Button::new(RichText::new("📄 Open last download").size(13.0))
                    .min_size(egui::vec2(150.0, 28.0));
                if ui.add(open_button).clicked() {
                    action = ControlPanelAction::OpenDownload;
                }
            });
        });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(5.0);

        let status_color = if self.status.starts_with("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.starts_with("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    BrowseFolder,
    Rescan,
    DateChanged(String),
    SelectionChanged,
    Download,
    OpenDownload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn index(names: &[&str]) -> (TempDir, FileIndex) {
        let dir = TempDir::new().unwrap();
        for name in names {
            fs::write(dir.path().join(name), "ticker\nAAA\n").unwrap();
        }
        let index = FileIndex::scan(dir.path()).unwrap();
        (dir, index)
    }

    #[test]
    fn test_update_index_selects_latest() {
        let (dir, index) = index(&["b-2024-01-01.csv", "a-2024-01-01.csv", "c-2023-12-31.csv"]);
        let mut panel = ControlPanel::new(dir.path().to_path_buf(), DisplayOptions::new(100, false));

        panel.update_index(&index);
        assert_eq!(panel.dates, vec!["2024-01-01", "2023-12-31"]);
        assert_eq!(panel.settings.date.as_deref(), Some("2024-01-01"));
        assert_eq!(panel.selected_file(), Some(dir.path().join("a-2024-01-01.csv").as_path()));
    }

    #[test]
    fn test_date_change_resets_file_and_rescan_keeps_it() {
        let (dir, index) = index(&["b-2024-01-01.csv", "c-2023-12-31.csv", "d-2023-12-31.csv"]);
        let mut panel = ControlPanel::new(dir.path().to_path_buf(), DisplayOptions::new(100, false));
        panel.update_index(&index);

        panel.select_date(&index, "2023-12-31");
        assert_eq!(panel.files.len(), 2);
        let c = dir.path().join("c-2023-12-31.csv");
        assert_eq!(panel.selected_file(), Some(c.as_path()));

        panel.settings.file = Some(dir.path().join("d-2023-12-31.csv"));
        let rescanned = FileIndex::scan(dir.path()).unwrap();
        panel.update_index(&rescanned);
        assert_eq!(panel.settings.date.as_deref(), Some("2023-12-31"));
        assert_eq!(
            panel.selected_file(),
            Some(dir.path().join("d-2023-12-31.csv").as_path())
        );
    }
}

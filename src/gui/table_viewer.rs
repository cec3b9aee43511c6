//! Table Viewer Widget
//! Central panel showing the selected file's preview, or why there is none.

use crate::data::{Severity, ViewResult, ViewerError};
use egui::{Color32, RichText, ScrollArea};

const MIN_COLUMN_WIDTH: f32 = 80.0;

/// What the central panel currently shows.
#[derive(Default)]
pub enum ViewState {
    #[default]
    Empty,
    Message(Severity, String),
    Ready(ViewResult),
}

impl From<ViewerError> for ViewState {
    fn from(err: ViewerError) -> Self {
        ViewState::Message(err.severity(), err.to_string())
    }
}

/// Scrollable table display.
#[derive(Default)]
pub struct TableViewer {
    pub state: ViewState,
}

impl TableViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_state(&mut self, state: ViewState) {
        self.state = state;
    }

    /// The result currently on screen, if any.
    pub fn result(&self) -> Option<&ViewResult> {
        match &self.state {
            ViewState::Ready(result) => Some(result),
            _ => None,
        }
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        match &self.state {
            ViewState::Empty => {
                ui.centered_and_justified(|ui| {
                    ui.label(RichText::new("No Data").size(20.0));
                });
            }
            ViewState::Message(severity, message) => Self::draw_message(ui, *severity, message),
            ViewState::Ready(result) => Self::draw_result(ui, result),
        }
    }

    fn draw_message(ui: &mut egui::Ui, severity: Severity, message: &str) {
        let (icon, color) = match severity {
            Severity::Blocking => ("⛔", Color32::from_rgb(220, 53, 69)),
            Severity::Inline => ("⚠", Color32::from_rgb(220, 53, 69)),
            Severity::Notice => ("ℹ", Color32::from_rgb(230, 170, 40)),
        };

        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(2.0, color))
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.label(
                    RichText::new(format!("{icon} {message}"))
                        .size(15.0)
                        .color(color),
                );
            });
    }

    fn draw_result(ui: &mut egui::Ui, result: &ViewResult) {
        ui.label(
            RichText::new(format!("Showing: {}", result.source.display()))
                .size(12.0)
                .color(Color32::GRAY),
        );

        if !result.missing_columns.is_empty() {
            ui.add_space(4.0);
            Self::draw_message(
                ui,
                Severity::Notice,
                &format!("Missing columns in file: {}", result.missing_columns.join(", ")),
            );
        }

        ui.add_space(6.0);
        ui.label(
            RichText::new(format!(
                "{} of {} rows",
                result.rows.len(),
                result.total_rows
            ))
            .size(11.0),
        );
        ui.separator();

        ScrollArea::both()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                egui::Grid::new("preview_table")
                    .striped(true)
                    .min_col_width(MIN_COLUMN_WIDTH)
                    .show(ui, |ui| {
                        for header in &result.headers {
                            ui.label(RichText::new(header).strong());
                        }
                        ui.end_row();

                        for row in &result.rows {
                            for cell in row {
                                ui.label(cell);
                            }
                            ui.end_row();
                        }
                    });
            });
    }
}

//! Control Panel Widget
//! Left side panel with the dataset picker and the dashboard filters.

use crate::pipeline::FilterBounds;
use crate::stats::FilterCriteria;
use egui::{Color32, RichText, ScrollArea};
use std::path::PathBuf;

/// Left side control panel with dataset selection and filter controls.
pub struct ControlPanel {
    pub dataset_path: Option<PathBuf>,
    pub bounds: FilterBounds,
    pub filters: FilterCriteria,
    pub status: String,
}

impl Default for ControlPanel {
    fn default() -> Self {
        let bounds = FilterBounds::observe(&[]);
        Self {
            dataset_path: None,
            filters: bounds.default_criteria(),
            bounds,
            status: "Ready".to_string(),
        }
    }
}

impl ControlPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset the controls to the ranges of a newly loaded dataset.
    pub fn update_bounds(&mut self, path: PathBuf, bounds: FilterBounds) {
        self.filters = bounds.default_criteria();
        self.bounds = bounds;
        self.dataset_path = Some(path);
    }

    /// Draw the control panel
    pub fn show(&mut self, ui: &mut egui::Ui) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🩺 Screening")
                    .size(22.0)
                    .color(Color32::from_rgb(100, 149, 237)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📁 Dataset").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.horizontal(|ui| {
                    let path_text = self
                        .dataset_path
                        .as_ref()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "No file loaded".to_string());

                    ui.label(RichText::new(&path_text).size(12.0).color(
                        if self.dataset_path.is_some() {
                            Color32::WHITE
                        } else {
                            Color32::GRAY
                        },
                    ));

                    ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                        if ui.button("📂 Open").clicked() {
                            action = ControlPanelAction::OpenDataset;
                        }
                    });
                });
            });

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Filters Section =====
        ui.label(RichText::new("⚙️ Filters").size(14.0).strong());
        ui.add_space(8.0);

        ui.label("Select Facility");
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(5.0)
            .show(ui, |ui| {
                ScrollArea::vertical().max_height(200.0).show(ui, |ui| {
                    for facility in &self.bounds.facilities {
                        let mut selected = self.filters.facilities.contains(facility);
                        if ui.checkbox(&mut selected, facility).changed() {
                            if selected {
                                self.filters.facilities.insert(facility.clone());
                            } else {
                                self.filters.facilities.remove(facility);
                            }
                            action = ControlPanelAction::FiltersChanged;
                        }
                    }
                });
            });

        ui.add_space(5.0);
        ui.horizontal(|ui| {
            if ui.small_button("Select All").clicked() {
                self.filters.facilities = self.bounds.facilities.iter().cloned().collect();
                action = ControlPanelAction::FiltersChanged;
            }
            if ui.small_button("Clear All").clicked() {
                self.filters.facilities.clear();
                action = ControlPanelAction::FiltersChanged;
            }
        });

        ui.add_space(10.0);

        let (risk_min, risk_max) = self.bounds.risk;
        ui.label("Risk Score above");
        if ui
            .add(egui::Slider::new(&mut self.filters.min_risk, risk_min..=risk_max).integer())
            .changed()
        {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(5.0);

        let (age_min, age_max) = self.bounds.age;
        ui.label("Age above");
        if ui
            .add(egui::Slider::new(&mut self.filters.min_age, age_min..=age_max).integer())
            .changed()
        {
            action = ControlPanelAction::FiltersChanged;
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        let status_color = if self.status.contains("Error") {
            Color32::from_rgb(220, 53, 69)
        } else if self.status.contains("Saved") {
            Color32::from_rgb(40, 167, 69)
        } else {
            Color32::GRAY
        };
        ui.label(RichText::new(&self.status).size(11.0).color(status_color));

        action
    }

    /// Set status line
    pub fn set_status(&mut self, status: &str) {
        self.status = status.to_string();
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    OpenDataset,
    FiltersChanged,
}

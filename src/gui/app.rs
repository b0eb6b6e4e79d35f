//! Screening Dashboard Application
//! Main window with control panel and chart viewer. Every filter change
//! re-runs the pipeline synchronously on the loaded dataset.

use crate::config::DEFAULT_CSV_FILE_NAME;
use crate::data::DataLoader;
use crate::export;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::pipeline::{self, Dataset};
use egui::SidePanel;
use std::path::Path;
use tracing::{error, info};

/// Main application window.
pub struct ScreeningApp {
    loader: DataLoader,
    dataset: Option<Dataset>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl ScreeningApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, loader: DataLoader, dataset: Dataset) -> Self {
        let mut app = Self {
            loader,
            dataset: None,
            control_panel: ControlPanel::new(),
            chart_viewer: ChartViewer::new(),
        };
        app.set_dataset(dataset);
        app
    }

    fn set_dataset(&mut self, dataset: Dataset) {
        self.control_panel
            .update_bounds(dataset.path.clone(), dataset.bounds.clone());
        self.control_panel.set_status(&format!(
            "Loaded {} rows, {} facilities",
            dataset.records.len(),
            dataset.bounds.facilities.len()
        ));
        self.dataset = Some(dataset);
        self.recompute();
    }

    /// Re-run filter and aggregation for the current controls.
    fn recompute(&mut self) {
        match &self.dataset {
            Some(dataset) => {
                let view = pipeline::compute(&dataset.records, &self.control_panel.filters);
                self.chart_viewer.set_view(view);
            }
            None => self.chart_viewer.clear(),
        }
    }

    /// Handle dataset selection
    fn handle_open_dataset(&mut self) {
        if let Some(path) = rfd::FileDialog::new()
            .add_filter("Spreadsheets", &["xlsx", "xlsm", "xls", "ods", "csv"])
            .pick_file()
        {
            self.open_dataset(&path);
        }
    }

    fn open_dataset(&mut self, path: &Path) {
        match Dataset::load(&mut self.loader, path) {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                error!(path = %path.display(), error = %e, "failed to open dataset");
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }

    /// Handle CSV download - serialize the current summary and save it where the user chooses
    fn handle_download_csv(&mut self) {
        let Some(view) = &self.chart_viewer.view else {
            return;
        };

        let csv = match export::summary_csv(&view.summary) {
            Ok(csv) => csv,
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
                return;
            }
        };

        let Some(path) = rfd::FileDialog::new()
            .add_filter("CSV Files", &["csv"])
            .set_file_name(DEFAULT_CSV_FILE_NAME)
            .save_file()
        else {
            return; // User cancelled
        };

        match std::fs::write(&path, csv) {
            Ok(()) => {
                info!(path = %path.display(), "summary CSV saved");
                self.control_panel
                    .set_status(&format!("Saved {}", path.display()));
            }
            Err(e) => {
                self.control_panel.set_status(&format!("Error: {}", e));
            }
        }
    }
}

impl eframe::App for ScreeningApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(280.0)
            .max_width(340.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    match self.control_panel.show(ui) {
                        ControlPanelAction::OpenDataset => self.handle_open_dataset(),
                        ControlPanelAction::FiltersChanged => self.recompute(),
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Dashboard
        let mut download = false;
        egui::CentralPanel::default().show(ctx, |ui| {
            download = self.chart_viewer.show(ui);
        });

        if download {
            self.handle_download_csv();
        }
    }
}

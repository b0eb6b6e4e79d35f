//! Chart Viewer Widget
//! Central scrollable area with the metric cards, summary table and charts.

use crate::charts::ChartPlotter;
use crate::config::{DASHBOARD_SUBTITLE, DASHBOARD_TITLE};
use crate::pipeline::DashboardView;
use crate::stats::SummaryMetrics;
use egui::{Color32, RichText, ScrollArea};

const SECTION_SPACING: f32 = 15.0;
const METRIC_CARD_WIDTH: f32 = 220.0;

/// Dashboard output for the current filters.
#[derive(Default)]
pub struct ChartViewer {
    pub view: Option<DashboardView>,
}

impl ChartViewer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_view(&mut self, view: DashboardView) {
        self.view = Some(view);
    }

    pub fn clear(&mut self) {
        self.view = None;
    }

    /// Draw the dashboard. Returns `true` when the CSV download was requested.
    pub fn show(&mut self, ui: &mut egui::Ui) -> bool {
        let mut download = false;

        ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.label(RichText::new(DASHBOARD_TITLE).size(26.0).strong());
                ui.label(RichText::new(DASHBOARD_SUBTITLE).size(13.0).color(Color32::GRAY));
                ui.add_space(SECTION_SPACING);

                let Some(view) = &self.view else {
                    ui.centered_and_justified(|ui| {
                        ui.label(RichText::new("No dataset loaded").size(20.0));
                    });
                    return;
                };

                Self::draw_metrics(ui, &view.metrics);
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("Summary Table").size(18.0).strong());
                ui.add_space(5.0);
                if view.summary.is_empty() {
                    ui.label(RichText::new("No facilities match the current filters").color(Color32::GRAY));
                } else {
                    ChartPlotter::draw_summary_table(ui, &view.summary);
                }
                ui.add_space(SECTION_SPACING);

                ui.label(RichText::new("Visualizations").size(18.0).strong());
                ui.add_space(5.0);

                if view.charts.is_empty() {
                    ui.label(RichText::new("No data to chart").color(Color32::GRAY));
                } else {
                    ui.columns(2, |columns| {
                        columns[0].label(RichText::new("Participants by Facility").size(14.0).strong());
                        ChartPlotter::draw_bar_chart(&mut columns[0], &view.charts);

                        columns[1].label(RichText::new("Participant Distribution").size(14.0).strong());
                        ChartPlotter::draw_pie_chart(&mut columns[1], &view.charts);
                    });

                    ui.add_space(SECTION_SPACING);
                    ui.label(RichText::new("Risk Score vs Age").size(14.0).strong());
                    ChartPlotter::draw_age_risk_chart(ui, &view.charts);
                }

                ui.add_space(SECTION_SPACING);
                let button = egui::Button::new(RichText::new("⬇ Download Summary CSV").size(14.0))
                    .min_size(egui::vec2(200.0, 30.0));
                if ui.add(button).clicked() {
                    download = true;
                }
            });

        download
    }

    fn draw_metrics(ui: &mut egui::Ui, metrics: &SummaryMetrics) {
        ui.horizontal(|ui| {
            Self::metric_card(ui, "Total Participants", metrics.total_participants.to_string());
            Self::metric_card(ui, "Average Age", Self::format_metric(metrics.mean_age));
            Self::metric_card(ui, "Average Risk Score", Self::format_metric(metrics.mean_risk));
        });
    }

    fn metric_card(ui: &mut egui::Ui, title: &str, value: String) {
        egui::Frame::none()
            .rounding(8.0)
            .stroke(egui::Stroke::new(1.0, Color32::from_rgb(100, 149, 237)))
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .inner_margin(12.0)
            .show(ui, |ui| {
                ui.set_width(METRIC_CARD_WIDTH);
                ui.vertical(|ui| {
                    ui.label(RichText::new(title).size(13.0).color(Color32::GRAY));
                    ui.label(RichText::new(value).size(24.0).strong());
                });
            });
    }

    /// Rounded mean, or an explicit no-data marker.
    pub fn format_metric(value: Option<f64>) -> String {
        value
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| "No data".to_string())
    }
}

//! Chart Plotter Module
//! Facility charts for the dashboard: participants bar chart, participant
//! share pie chart and risk score vs age series, drawn with egui_plot and the
//! egui painter.

use crate::data::ScreeningRecord;
use crate::stats::FacilitySummary;
use egui::{Color32, RichText};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};
use std::collections::BTreeMap;
use std::f64::consts::{FRAC_PI_2, TAU};

/// Color palette for facilities
pub const PALETTE: [Color32; 10] = [
    Color32::from_rgb(52, 152, 219), // Blue
    Color32::from_rgb(231, 76, 60),  // Red
    Color32::from_rgb(46, 204, 113), // Green
    Color32::from_rgb(155, 89, 182), // Purple
    Color32::from_rgb(243, 156, 18), // Orange
    Color32::from_rgb(26, 188, 156), // Teal
    Color32::from_rgb(233, 30, 99),  // Pink
    Color32::from_rgb(0, 188, 212),  // Cyan
    Color32::from_rgb(121, 85, 72),  // Brown
    Color32::from_rgb(96, 125, 139), // Blue Grey
];

/// Bar color scale endpoints, lowest to highest count.
const SCALE_LOW: Color32 = Color32::from_rgb(13, 8, 135);
const SCALE_HIGH: Color32 = Color32::from_rgb(240, 249, 33);

const CHART_HEIGHT: f32 = 300.0;

/// Chart data derived from one dashboard run.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChartData {
    /// Participants per facility, in summary order.
    pub participants: Vec<(String, usize)>,
    /// (age, risk score) points per facility, sorted by age.
    pub age_risk: BTreeMap<String, Vec<[f64; 2]>>,
}

impl ChartData {
    pub fn build(summary: &[FacilitySummary], records: &[&ScreeningRecord]) -> Self {
        let participants = summary
            .iter()
            .map(|s| (s.facility_name.clone(), s.total_participants))
            .collect();

        let mut age_risk: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
        for record in records {
            if let (Some(name), Some(age), Some(risk)) =
                (record.facility_name.as_ref(), record.age, record.risk_score)
            {
                age_risk.entry(name.clone()).or_default().push([age, risk]);
            }
        }
        for points in age_risk.values_mut() {
            points.sort_by(|a, b| a[0].partial_cmp(&b[0]).unwrap_or(std::cmp::Ordering::Equal));
        }

        Self {
            participants,
            age_risk,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Palette index of a facility, stable across all three charts.
    pub fn facility_index(&self, facility: &str) -> usize {
        self.participants
            .iter()
            .position(|(name, _)| name == facility)
            .unwrap_or(0)
    }
}

/// One pie slice; angles in radians, clockwise from 12 o'clock.
#[derive(Clone, Debug, PartialEq)]
pub struct PieSlice {
    pub label: String,
    pub value: usize,
    pub fraction: f64,
    pub start: f64,
    pub sweep: f64,
}

/// Creates the dashboard charts.
pub struct ChartPlotter;

impl ChartPlotter {
    pub fn facility_color(index: usize) -> Color32 {
        PALETTE[index % PALETTE.len()]
    }

    /// Interpolate the bar color scale for `count` out of `max`.
    pub fn count_color(count: usize, max: usize) -> Color32 {
        let t = if max == 0 {
            0.0
        } else {
            (count as f32 / max as f32).clamp(0.0, 1.0)
        };
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color32::from_rgb(
            lerp(SCALE_LOW.r(), SCALE_HIGH.r()),
            lerp(SCALE_LOW.g(), SCALE_HIGH.g()),
            lerp(SCALE_LOW.b(), SCALE_HIGH.b()),
        )
    }

    /// Split the participant counts into pie slices. Zero totals give no slices.
    pub fn pie_slices(participants: &[(String, usize)]) -> Vec<PieSlice> {
        let total: usize = participants.iter().map(|(_, n)| n).sum();
        if total == 0 {
            return Vec::new();
        }

        let mut start = -FRAC_PI_2;
        participants
            .iter()
            .map(|(label, value)| {
                let fraction = *value as f64 / total as f64;
                let slice = PieSlice {
                    label: label.clone(),
                    value: *value,
                    fraction,
                    start,
                    sweep: fraction * TAU,
                };
                start += slice.sweep;
                slice
            })
            .collect()
    }

    /// Participants by facility, bars colored by count.
    pub fn draw_bar_chart(ui: &mut egui::Ui, chart_data: &ChartData) {
        let labels: Vec<String> = chart_data
            .participants
            .iter()
            .map(|(name, _)| name.clone())
            .collect();
        let max = chart_data
            .participants
            .iter()
            .map(|(_, n)| *n)
            .max()
            .unwrap_or(0);

        let bars: Vec<Bar> = chart_data
            .participants
            .iter()
            .enumerate()
            .map(|(i, (name, count))| {
                Bar::new(i as f64, *count as f64)
                    .name(name)
                    .width(0.6)
                    .fill(Self::count_color(*count, max))
            })
            .collect();

        Plot::new("participants_bar")
            .height(CHART_HEIGHT)
            .allow_zoom(false)
            .allow_drag(false)
            .allow_scroll(false)
            .include_y(0.0)
            .x_axis_label("facility_name")
            .y_axis_label("Participants")
            .x_axis_formatter(move |mark, _range| {
                let idx = mark.value.round();
                if (mark.value - idx).abs() > 1e-6 || idx < 0.0 {
                    return String::new();
                }
                labels.get(idx as usize).cloned().unwrap_or_default()
            })
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).name("Participants"));
            });
    }

    /// Participant distribution pie chart with a percentage legend.
    pub fn draw_pie_chart(ui: &mut egui::Ui, chart_data: &ChartData) {
        let slices = Self::pie_slices(&chart_data.participants);

        ui.horizontal(|ui| {
            let size = CHART_HEIGHT.min(ui.available_width() * 0.6);
            let (response, painter) =
                ui.allocate_painter(egui::vec2(size, size), egui::Sense::hover());
            let center = response.rect.center();
            let radius = size * 0.45;

            for (i, slice) in slices.iter().enumerate() {
                let color = Self::facility_color(i);
                // Fan of narrow triangles keeps every shape convex.
                let steps = ((slice.sweep / 0.05).ceil() as usize).max(1);
                for step in 0..steps {
                    let a0 = slice.start + slice.sweep * step as f64 / steps as f64;
                    let a1 = slice.start + slice.sweep * (step + 1) as f64 / steps as f64;
                    let p0 = center + egui::vec2(a0.cos() as f32, a0.sin() as f32) * radius;
                    let p1 = center + egui::vec2(a1.cos() as f32, a1.sin() as f32) * radius;
                    painter.add(egui::Shape::convex_polygon(
                        vec![center, p0, p1],
                        color,
                        egui::Stroke::NONE,
                    ));
                }

                if slice.fraction >= 0.05 {
                    let mid = slice.start + slice.sweep / 2.0;
                    let pos = center
                        + egui::vec2(mid.cos() as f32, mid.sin() as f32) * (radius * 0.65);
                    painter.text(
                        pos,
                        egui::Align2::CENTER_CENTER,
                        format!("{:.1}%", slice.fraction * 100.0),
                        egui::FontId::proportional(12.0),
                        Color32::WHITE,
                    );
                }
            }

            ui.vertical(|ui| {
                for (i, slice) in slices.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(14.0, 14.0), egui::Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, Self::facility_color(i));
                        ui.label(
                            RichText::new(format!(
                                "{} ({}, {:.1}%)",
                                slice.label,
                                slice.value,
                                slice.fraction * 100.0
                            ))
                            .size(12.0),
                        );
                    });
                }
            });
        });
    }

    /// Risk score against age, one line per facility.
    pub fn draw_age_risk_chart(ui: &mut egui::Ui, chart_data: &ChartData) {
        Plot::new("risk_vs_age")
            .height(CHART_HEIGHT)
            .legend(Legend::default())
            .allow_scroll(false)
            .x_axis_label("Age")
            .y_axis_label("Risk Score")
            .show(ui, |plot_ui| {
                for (facility, points) in &chart_data.age_risk {
                    let color = Self::facility_color(chart_data.facility_index(facility));

                    plot_ui.line(
                        Line::new(PlotPoints::from_iter(points.iter().copied()))
                            .color(color)
                            .width(1.5)
                            .name(facility),
                    );
                    plot_ui.points(
                        Points::new(PlotPoints::from_iter(points.iter().copied()))
                            .radius(3.0)
                            .color(color)
                            .name(facility),
                    );
                }
            });
    }

    /// Draw the summary table
    pub fn draw_summary_table(ui: &mut egui::Ui, summary: &[FacilitySummary]) {
        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| {
                egui::Grid::new("summary_table")
                    .striped(true)
                    .min_col_width(90.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for header in crate::export::DASHBOARD_COLUMNS {
                            ui.label(RichText::new(header).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in summary {
                            ui.label(RichText::new(&row.facility_name).size(12.0));
                            ui.label(RichText::new(row.total_participants.to_string()).size(12.0));
                            ui.label(RichText::new(Self::format_value(row.avg_age)).size(12.0));
                            ui.label(
                                RichText::new(Self::format_value(row.avg_risk_score)).size(12.0),
                            );
                            ui.end_row();
                        }
                    });
            });
    }

    pub fn format_value(value: Option<f64>) -> String {
        value.map(|v| format!("{:.2}", v)).unwrap_or_else(|| "-".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(name: &str, age: f64, risk: f64) -> ScreeningRecord {
        ScreeningRecord {
            row: 0,
            facility_code: None,
            facility_name: Some(name.to_string()),
            consent: "YES".to_string(),
            age: Some(age),
            risk_score: Some(risk),
        }
    }

    #[test]
    fn series_are_sorted_by_age() {
        let records = vec![
            record("CHC Pinan", 50.0, 6.0),
            record("CHC Pinan", 35.0, 4.0),
            record("CHC Tahla", 40.0, 5.0),
        ];
        let refs: Vec<&ScreeningRecord> = records.iter().collect();
        let summary = crate::stats::StatsCalculator::summarize(&refs);
        let data = ChartData::build(&summary, &refs);

        assert_eq!(
            data.participants,
            vec![("CHC Pinan".to_string(), 2), ("CHC Tahla".to_string(), 1)]
        );
        assert_eq!(data.age_risk["CHC Pinan"], vec![[35.0, 4.0], [50.0, 6.0]]);
        assert_eq!(data.facility_index("CHC Tahla"), 1);
    }

    #[test]
    fn pie_slices_cover_full_circle() {
        let slices = ChartPlotter::pie_slices(&[
            ("A".to_string(), 1),
            ("B".to_string(), 3),
        ]);
        assert_eq!(slices.len(), 2);
        assert!((slices[0].fraction - 0.25).abs() < 1e-12);
        assert!((slices[1].start - (slices[0].start + slices[0].sweep)).abs() < 1e-12);
        let total: f64 = slices.iter().map(|s| s.sweep).sum();
        assert!((total - TAU).abs() < 1e-9);
    }

    #[test]
    fn no_participants_no_slices() {
        assert!(ChartPlotter::pie_slices(&[]).is_empty());
        assert!(ChartPlotter::pie_slices(&[("A".to_string(), 0)]).is_empty());
    }

    #[test]
    fn count_color_spans_scale() {
        assert_eq!(ChartPlotter::count_color(0, 10), SCALE_LOW);
        assert_eq!(ChartPlotter::count_color(10, 10), SCALE_HIGH);
        assert_eq!(ChartPlotter::count_color(3, 0), SCALE_LOW);
    }

    #[test]
    fn missing_values_render_as_dash() {
        assert_eq!(ChartPlotter::format_value(None), "-");
        assert_eq!(ChartPlotter::format_value(Some(4.333)), "4.33");
    }
}

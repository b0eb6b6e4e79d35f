//! Summary rows as Polars DataFrames.

use super::{DASHBOARD_COLUMNS, SUMMARY_COLUMNS};
use crate::stats::FacilitySummary;
use polars::prelude::*;

/// Full batch summary with all six columns.
pub fn summary_frame(summary: &[FacilitySummary]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            SUMMARY_COLUMNS[0].into(),
            summary.iter().map(|s| s.facility_name.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            SUMMARY_COLUMNS[1].into(),
            summary
                .iter()
                .map(|s| s.total_participants as u64)
                .collect::<Vec<_>>(),
        ),
        Column::new(
            SUMMARY_COLUMNS[2].into(),
            summary.iter().map(|s| s.avg_age).collect::<Vec<_>>(),
        ),
        Column::new(
            SUMMARY_COLUMNS[3].into(),
            summary.iter().map(|s| s.avg_risk_score).collect::<Vec<_>>(),
        ),
        Column::new(
            SUMMARY_COLUMNS[4].into(),
            summary.iter().map(|s| s.max_risk_score).collect::<Vec<_>>(),
        ),
        Column::new(
            SUMMARY_COLUMNS[5].into(),
            summary.iter().map(|s| s.min_risk_score).collect::<Vec<_>>(),
        ),
    ])
}

/// Dashboard projection: participants, average age and average risk.
pub fn dashboard_frame(summary: &[FacilitySummary]) -> PolarsResult<DataFrame> {
    DataFrame::new(vec![
        Column::new(
            DASHBOARD_COLUMNS[0].into(),
            summary.iter().map(|s| s.facility_name.clone()).collect::<Vec<_>>(),
        ),
        Column::new(
            DASHBOARD_COLUMNS[1].into(),
            summary
                .iter()
                .map(|s| s.total_participants as u64)
                .collect::<Vec<_>>(),
        ),
        Column::new(
            DASHBOARD_COLUMNS[2].into(),
            summary.iter().map(|s| s.avg_age).collect::<Vec<_>>(),
        ),
        Column::new(
            DASHBOARD_COLUMNS[3].into(),
            summary.iter().map(|s| s.avg_risk_score).collect::<Vec<_>>(),
        ),
    ])
}

/// Human readable table for the console.
pub fn render_table(summary: &[FacilitySummary]) -> PolarsResult<String> {
    Ok(format!("{}", summary_frame(summary)?))
}

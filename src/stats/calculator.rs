//! Statistics Calculator Module
//! Per-facility aggregation and the headline dashboard metrics.

use crate::data::ScreeningRecord;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use tracing::debug;

/// Aggregated figures for one facility.
#[derive(Debug, Clone, PartialEq)]
pub struct FacilitySummary {
    pub facility_name: String,
    pub total_participants: usize,
    pub avg_age: Option<f64>,
    pub avg_risk_score: Option<f64>,
    pub max_risk_score: Option<f64>,
    pub min_risk_score: Option<f64>,
}

/// Headline numbers over all filtered records.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryMetrics {
    pub total_participants: usize,
    /// Mean age rounded to one decimal, `None` without data.
    pub mean_age: Option<f64>,
    /// Mean risk score rounded to one decimal, `None` without data.
    pub mean_risk: Option<f64>,
}

impl SummaryMetrics {
    pub fn has_data(&self) -> bool {
        self.total_participants > 0
    }
}

/// Handles the group-by and descriptive statistics.
pub struct StatsCalculator;

impl StatsCalculator {
    /// Group records by facility name, sorted by name.
    ///
    /// Records without a facility name are not part of any group.
    pub fn summarize(records: &[&ScreeningRecord]) -> Vec<FacilitySummary> {
        let mut groups: BTreeMap<&str, Vec<&ScreeningRecord>> = BTreeMap::new();
        for record in records {
            if let Some(name) = record.facility_name.as_deref() {
                groups.entry(name).or_default().push(record);
            }
        }

        let summary: Vec<FacilitySummary> = groups
            .into_iter()
            .map(|(name, rows)| {
                let ages: Vec<f64> = rows.iter().filter_map(|r| r.age).collect();
                let risks: Vec<f64> = rows.iter().filter_map(|r| r.risk_score).collect();

                FacilitySummary {
                    facility_name: name.to_string(),
                    total_participants: rows.len(),
                    avg_age: Self::mean(&ages),
                    avg_risk_score: Self::mean(&risks),
                    max_risk_score: Self::max(&risks),
                    min_risk_score: Self::min(&risks),
                }
            })
            .collect();

        debug!(groups = summary.len(), "facility summary computed");
        summary
    }

    /// Totals and rounded means for the metric cards.
    pub fn metrics(records: &[&ScreeningRecord]) -> SummaryMetrics {
        let ages: Vec<f64> = records.iter().filter_map(|r| r.age).collect();
        let risks: Vec<f64> = records.iter().filter_map(|r| r.risk_score).collect();

        SummaryMetrics {
            total_participants: records.len(),
            mean_age: Self::mean(&ages).map(Self::round1),
            mean_risk: Self::mean(&risks).map(Self::round1),
        }
    }

    pub fn mean(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(Statistics::mean(values.iter()))
        }
    }

    pub fn max(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(Statistics::max(values.iter()))
        }
    }

    pub fn min(values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            None
        } else {
            Some(Statistics::min(values.iter()))
        }
    }

    pub fn round1(value: f64) -> f64 {
        (value * 10.0).round() / 10.0
    }
}

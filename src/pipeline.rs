//! Screening Pipeline
//! load -> normalize -> filter -> aggregate, for both the batch report and the
//! dashboard. Everything after loading is a pure function of its inputs.

use crate::charts::ChartData;
use crate::config::{BATCH_MIN_AGE, BATCH_MIN_RISK};
use crate::data::{DataLoader, DataProcessor, LoaderError, ProcessorError, ScreeningRecord};
use crate::export::{self, ExportError};
use crate::stats::{FacilitySummary, FilterCriteria, StatsCalculator, SummaryMetrics};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Observed value ranges used to initialise the dashboard controls.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterBounds {
    pub facilities: Vec<String>,
    pub age: (f64, f64),
    pub risk: (f64, f64),
}

impl FilterBounds {
    /// Distinct facility names and integer slider ranges for age and risk.
    ///
    /// Thresholds are strict, so each range starts at the largest integer
    /// below the observed minimum; at that floor every value passes.
    pub fn observe(records: &[ScreeningRecord]) -> Self {
        let facilities: BTreeSet<&str> = records
            .iter()
            .filter_map(|r| r.facility_name.as_deref())
            .collect();

        Self {
            facilities: facilities.into_iter().map(str::to_string).collect(),
            age: Self::range(records.iter().filter_map(|r| r.age)),
            risk: Self::range(records.iter().filter_map(|r| r.risk_score)),
        }
    }

    fn range(values: impl Iterator<Item = f64>) -> (f64, f64) {
        let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
        if min > max {
            (0.0, 0.0)
        } else {
            (min.ceil() - 1.0, max.trunc())
        }
    }

    /// Every facility selected, thresholds at the batch defaults kept inside the range.
    pub fn default_criteria(&self) -> FilterCriteria {
        FilterCriteria::new(
            BATCH_MIN_AGE.clamp(self.age.0, self.age.1),
            BATCH_MIN_RISK.clamp(self.risk.0, self.risk.1),
            self.facilities.iter().cloned(),
        )
    }
}

/// A normalized dataset ready for repeated dashboard runs.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub path: PathBuf,
    pub records: Vec<ScreeningRecord>,
    pub bounds: FilterBounds,
}

impl Dataset {
    pub fn load(loader: &mut DataLoader, path: &Path) -> Result<Self, PipelineError> {
        let df = loader.load(path)?;
        let records = DataProcessor::normalize(df)?;
        let bounds = FilterBounds::observe(&records);

        Ok(Self {
            path: path.to_path_buf(),
            records,
            bounds,
        })
    }
}

/// Everything the dashboard shows for one set of filters.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub summary: Vec<FacilitySummary>,
    pub metrics: SummaryMetrics,
    pub charts: ChartData,
}

/// Batch summary under the fixed screening criteria.
pub fn run_report(records: &[ScreeningRecord]) -> Vec<FacilitySummary> {
    let filtered = FilterCriteria::batch().apply(records);
    let summary = StatsCalculator::summarize(&filtered);
    info!(
        records = records.len(),
        kept = filtered.len(),
        facilities = summary.len(),
        "batch criteria applied"
    );
    summary
}

/// Recompute the dashboard for the current filter values.
pub fn compute(records: &[ScreeningRecord], filters: &FilterCriteria) -> DashboardView {
    let filtered = filters.apply(records);
    let summary = StatsCalculator::summarize(&filtered);
    let metrics = StatsCalculator::metrics(&filtered);
    let charts = ChartData::build(&summary, &filtered);

    DashboardView {
        summary,
        metrics,
        charts,
    }
}

/// Load `input`, write the batch summary workbook to `output` and return it.
pub fn generate_report(input: &Path, output: &Path) -> Result<Vec<FacilitySummary>, PipelineError> {
    let mut loader = DataLoader::new();
    let df = loader.load(input)?;
    let records = DataProcessor::normalize(df)?;
    let summary = run_report(&records);
    export::write_summary_xlsx(&summary, output)?;
    Ok(summary)
}

//! Stats module - filtering and aggregation

mod calculator;
mod filter;

pub use calculator::{FacilitySummary, StatsCalculator, SummaryMetrics};
pub use filter::FilterCriteria;

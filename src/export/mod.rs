//! Export module - summary workbook, console table and CSV download

mod csv;
mod frame;
mod xlsx;

use crate::data::LoaderError;
use polars::prelude::PolarsError;
use rust_xlsxwriter::XlsxError;
use thiserror::Error;

pub use self::csv::summary_csv;
pub use frame::{dashboard_frame, render_table, summary_frame};
pub use xlsx::{read_summary_xlsx, write_summary_xlsx};

/// Column headers of the batch summary workbook, in order.
pub const SUMMARY_COLUMNS: [&str; 6] = [
    "facility_name",
    "total_participants",
    "avg_age",
    "avg_risk_score",
    "max_risk_score",
    "min_risk_score",
];

/// Column headers of the dashboard summary table and CSV download.
pub const DASHBOARD_COLUMNS: [&str; 4] =
    ["facility_name", "Participants", "Average_Age", "Average_Risk"];

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to write workbook: {0}")]
    Xlsx(#[from] XlsxError),
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
    #[error("Failed to read summary: {0}")]
    Loader(#[from] LoaderError),
    #[error("Summary column '{0}' not found")]
    MissingColumn(String),
    #[error("Invalid value in column '{column}' at row {row}")]
    InvalidValue { column: String, row: usize },
    #[error("CSV output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

//! Dashboard summary as CSV text.

use super::{dashboard_frame, ExportError};
use crate::stats::FacilitySummary;
use polars::prelude::*;

/// Serialize the dashboard summary table, header included.
pub fn summary_csv(summary: &[FacilitySummary]) -> Result<String, ExportError> {
    let mut df = dashboard_frame(summary)?;
    let mut buffer: Vec<u8> = Vec::new();

    CsvWriter::new(&mut buffer)
        .include_header(true)
        .finish(&mut df)?;

    Ok(String::from_utf8(buffer)?)
}

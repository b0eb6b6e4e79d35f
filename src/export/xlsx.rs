//! Summary workbook writer and reader.

use super::{ExportError, SUMMARY_COLUMNS};
use crate::data::{load_table, DataProcessor};
use crate::stats::FacilitySummary;
use polars::prelude::*;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::info;

const SHEET_NAME: &str = "Summary";

/// Write the summary to a new workbook. Missing values are left blank.
pub fn write_summary_xlsx(summary: &[FacilitySummary], path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let header_fmt = Format::new().set_bold();

    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME)?;

    for (col, name) in SUMMARY_COLUMNS.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, *name, &header_fmt)?;
    }

    for (idx, row) in summary.iter().enumerate() {
        let r = idx as u32 + 1;
        sheet.write_string(r, 0, row.facility_name.as_str())?;
        sheet.write_number(r, 1, row.total_participants as f64)?;

        let numbers = [
            row.avg_age,
            row.avg_risk_score,
            row.max_risk_score,
            row.min_risk_score,
        ];
        for (offset, value) in numbers.iter().enumerate() {
            if let Some(v) = value {
                sheet.write_number(r, 2 + offset as u16, *v)?;
            }
        }
    }

    sheet.autofit();
    workbook.save(path)?;

    info!(path = %path.display(), rows = summary.len(), "summary workbook written");
    Ok(())
}

/// Read a summary workbook written by [`write_summary_xlsx`].
pub fn read_summary_xlsx(path: &Path) -> Result<Vec<FacilitySummary>, ExportError> {
    let df = load_table(path)?;

    let names = summary_column(&df, SUMMARY_COLUMNS[0])?;
    let counts = summary_column(&df, SUMMARY_COLUMNS[1])?;
    let avg_age = summary_column(&df, SUMMARY_COLUMNS[2])?;
    let avg_risk = summary_column(&df, SUMMARY_COLUMNS[3])?;
    let max_risk = summary_column(&df, SUMMARY_COLUMNS[4])?;
    let min_risk = summary_column(&df, SUMMARY_COLUMNS[5])?;

    let mut summary = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let facility_name = DataProcessor::to_text(&names.get(row)?).ok_or_else(|| {
            ExportError::InvalidValue {
                column: SUMMARY_COLUMNS[0].to_string(),
                row,
            }
        })?;
        let total = DataProcessor::to_numeric(&counts.get(row)?)
            .filter(|v| *v >= 0.0 && v.fract() == 0.0)
            .ok_or_else(|| ExportError::InvalidValue {
                column: SUMMARY_COLUMNS[1].to_string(),
                row,
            })?;

        summary.push(FacilitySummary {
            facility_name,
            total_participants: total as usize,
            avg_age: DataProcessor::to_numeric(&avg_age.get(row)?),
            avg_risk_score: DataProcessor::to_numeric(&avg_risk.get(row)?),
            max_risk_score: DataProcessor::to_numeric(&max_risk.get(row)?),
            min_risk_score: DataProcessor::to_numeric(&min_risk.get(row)?),
        });
    }

    Ok(summary)
}

fn summary_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ExportError> {
    df.column(name)
        .map_err(|_| ExportError::MissingColumn(name.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn blank_cells_read_back_as_missing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("summary.xlsx");
        let summary = vec![FacilitySummary {
            facility_name: "CHC Rajgarh".to_string(),
            total_participants: 4,
            avg_age: None,
            avg_risk_score: Some(4.25),
            max_risk_score: Some(6.0),
            min_risk_score: Some(3.5),
        }];

        write_summary_xlsx(&summary, &path).unwrap();
        let back = read_summary_xlsx(&path).unwrap();

        assert_eq!(back.len(), 1);
        assert_eq!(back[0].facility_name, "CHC Rajgarh");
        assert_eq!(back[0].total_participants, 4);
        assert_eq!(back[0].avg_age, None);
        assert_eq!(back[0].avg_risk_score, Some(4.25));
    }

    #[test]
    fn empty_summary_keeps_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.xlsx");
        write_summary_xlsx(&[], &path).unwrap();
        assert!(read_summary_xlsx(&path).unwrap().is_empty());
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing_dir").join("summary.xlsx");
        assert!(write_summary_xlsx(&[], &path).is_err());
    }
}

//! Data Processor Module
//! Cleans the raw table: trims headers, coerces numeric answers, normalizes
//! consent and resolves facility codes to display names.

use crate::config::{self, AGE_COLUMN, CONSENT_COLUMN, FACILITY_COLUMN, RISK_COLUMN};
use crate::data::{unique_column_names, ScreeningRecord};
use polars::prelude::*;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Required column '{0}' not found")]
    MissingColumn(String),
}

/// Handles data cleaning and conversion into typed records.
pub struct DataProcessor;

impl DataProcessor {
    /// Strip leading/trailing whitespace from every column name. Names that
    /// collide after trimming get a `.N` suffix.
    pub fn trim_column_names(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let names = unique_column_names(
            df.get_column_names()
                .iter()
                .map(|name| name.trim().to_string()),
        );

        let columns: Vec<Column> = df
            .get_columns()
            .iter()
            .zip(names)
            .map(|(col, name)| {
                let mut col = col.clone();
                col.rename(name.into());
                col
            })
            .collect();

        Ok(DataFrame::new(columns)?)
    }

    /// Normalize the raw table into screening records.
    pub fn normalize(df: &DataFrame) -> Result<Vec<ScreeningRecord>, ProcessorError> {
        let df = Self::trim_column_names(df)?;

        let facility = Self::required_column(&df, FACILITY_COLUMN)?;
        let consent = Self::required_column(&df, CONSENT_COLUMN)?;
        let age = Self::required_column(&df, AGE_COLUMN)?;
        let risk = Self::required_column(&df, RISK_COLUMN)?;

        let mut records = Vec::with_capacity(df.height());
        let mut unmapped = 0usize;

        for i in 0..df.height() {
            let facility_code = Self::to_text(&facility.get(i)?);
            let facility_name = facility_code
                .as_deref()
                .and_then(config::facility_name)
                .map(str::to_string);

            if facility_name.is_none() {
                unmapped += 1;
            }

            records.push(ScreeningRecord {
                row: i,
                facility_code,
                facility_name,
                consent: Self::normalize_consent(&consent.get(i)?),
                age: Self::to_numeric(&age.get(i)?),
                risk_score: Self::to_numeric(&risk.get(i)?),
            });
        }

        if unmapped > 0 {
            warn!(unmapped, "rows with unmapped facility codes");
        }
        info!(records = records.len(), "records normalized");

        Ok(records)
    }

    fn required_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column, ProcessorError> {
        df.column(name)
            .map_err(|_| ProcessorError::MissingColumn(name.to_string()))
    }

    /// Coerce a cell to a number; anything unparsable is missing.
    pub fn to_numeric(value: &AnyValue) -> Option<f64> {
        match value {
            AnyValue::Null => None,
            AnyValue::String(s) => Self::parse_numeric(s),
            AnyValue::StringOwned(s) => Self::parse_numeric(s.as_str()),
            AnyValue::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            other => other.extract::<f64>().filter(|v| !v.is_nan()),
        }
    }

    pub fn parse_numeric(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
    }

    /// Consent is compared as trimmed, uppercase text. Missing becomes empty.
    pub fn normalize_consent(value: &AnyValue) -> String {
        Self::to_text(value)
            .map(|s| s.trim().to_uppercase())
            .unwrap_or_default()
    }

    /// Text form of a cell; strings are taken verbatim.
    pub fn to_text(value: &AnyValue) -> Option<String> {
        match value {
            AnyValue::Null => None,
            AnyValue::String(s) => Some(s.to_string()),
            AnyValue::StringOwned(s) => Some(s.to_string()),
            other => Some(other.to_string()),
        }
    }
}

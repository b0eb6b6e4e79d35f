//! Typed screening record produced by normalization.

/// One normalized row of the screening dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ScreeningRecord {
    /// Zero-based position of the row in the source table.
    pub row: usize,
    /// Raw facility code as recorded, if present.
    pub facility_code: Option<String>,
    /// Display name resolved from the facility mapping.
    pub facility_name: Option<String>,
    /// Consent answer, trimmed and uppercased.
    pub consent: String,
    pub age: Option<f64>,
    pub risk_score: Option<f64>,
}

impl ScreeningRecord {
    pub fn has_consent(&self) -> bool {
        self.consent == crate::config::CONSENT_ACCEPTED
    }
}

//! Screening Filter Module
//! Selects records that gave consent, exceed the age and risk thresholds and
//! belong to one of the selected facilities.

use crate::config::{BATCH_MIN_AGE, BATCH_MIN_RISK, REQUIRED_FACILITIES};
use crate::data::ScreeningRecord;
use std::collections::BTreeSet;
use tracing::debug;

/// Criteria a record must satisfy to be kept.
///
/// Age and risk comparisons are strict: a value equal to the threshold is
/// rejected, and a missing value never passes.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterCriteria {
    pub min_age: f64,
    pub min_risk: f64,
    pub facilities: BTreeSet<String>,
}

impl FilterCriteria {
    pub fn new<I, S>(min_age: f64, min_risk: f64, facilities: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            min_age,
            min_risk,
            facilities: facilities.into_iter().map(Into::into).collect(),
        }
    }

    /// Fixed criteria of the batch report.
    pub fn batch() -> Self {
        Self::new(BATCH_MIN_AGE, BATCH_MIN_RISK, REQUIRED_FACILITIES)
    }

    pub fn matches(&self, record: &ScreeningRecord) -> bool {
        record.has_consent()
            && exceeds(record.age, self.min_age)
            && exceeds(record.risk_score, self.min_risk)
            && record
                .facility_name
                .as_ref()
                .is_some_and(|name| self.facilities.contains(name))
    }

    /// Keep the records matching every criterion, in input order.
    pub fn apply<'a>(&self, records: &'a [ScreeningRecord]) -> Vec<&'a ScreeningRecord> {
        let kept: Vec<&ScreeningRecord> = records.iter().filter(|r| self.matches(r)).collect();
        debug!(
            kept = kept.len(),
            dropped = records.len() - kept.len(),
            min_age = self.min_age,
            min_risk = self.min_risk,
            "filter applied"
        );
        kept
    }
}

fn exceeds(value: Option<f64>, threshold: f64) -> bool {
    value.is_some_and(|v| v > threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(consent: &str, age: Option<f64>, risk: Option<f64>, name: Option<&str>) -> ScreeningRecord {
        ScreeningRecord {
            row: 0,
            facility_code: None,
            facility_name: name.map(str::to_string),
            consent: consent.to_string(),
            age,
            risk_score: risk,
        }
    }

    #[test]
    fn batch_keeps_matching_record() {
        let r = record("YES", Some(31.0), Some(4.0), Some("CHC Pinan"));
        assert!(FilterCriteria::batch().matches(&r));
    }

    #[test]
    fn thresholds_are_strict() {
        let criteria = FilterCriteria::batch();
        assert!(!criteria.matches(&record("YES", Some(30.0), Some(4.0), Some("CHC Pinan"))));
        assert!(!criteria.matches(&record("YES", Some(31.0), Some(3.0), Some("CHC Pinan"))));
        assert!(criteria.matches(&record("YES", Some(30.5), Some(3.1), Some("CHC Pinan"))));
    }

    #[test]
    fn dashboard_thresholds_are_strict_too() {
        let criteria = FilterCriteria::new(40.0, 5.0, ["PHC Dhamred"]);
        assert!(!criteria.matches(&record("YES", Some(40.0), Some(6.0), Some("PHC Dhamred"))));
        assert!(!criteria.matches(&record("YES", Some(41.0), Some(5.0), Some("PHC Dhamred"))));
        assert!(criteria.matches(&record("YES", Some(41.0), Some(6.0), Some("PHC Dhamred"))));
    }

    #[test]
    fn consent_must_be_yes() {
        let criteria = FilterCriteria::batch();
        for consent in ["NO", "Y", "", "YES PLEASE", "yes"] {
            let r = record(consent, Some(50.0), Some(9.0), Some("CHC Pinan"));
            assert!(!criteria.matches(&r), "consent {consent:?} accepted");
        }
    }

    #[test]
    fn missing_numbers_never_pass() {
        let criteria = FilterCriteria::batch();
        assert!(!criteria.matches(&record("YES", None, Some(9.0), Some("CHC Pinan"))));
        assert!(!criteria.matches(&record("YES", Some(50.0), None, Some("CHC Pinan"))));
    }

    #[test]
    fn facility_must_be_selected() {
        let criteria = FilterCriteria::new(0.0, 0.0, ["CHC Pinan"]);
        assert!(!criteria.matches(&record("YES", Some(50.0), Some(9.0), Some("CHC Tahla"))));
        assert!(!criteria.matches(&record("YES", Some(50.0), Some(9.0), None)));

        let nothing = FilterCriteria::new(0.0, 0.0, Vec::<String>::new());
        assert!(!nothing.matches(&record("YES", Some(50.0), Some(9.0), Some("CHC Pinan"))));
    }

    #[test]
    fn apply_preserves_order() {
        let records = vec![
            record("YES", Some(50.0), Some(9.0), Some("PHC Dhamred")),
            record("NO", Some(50.0), Some(9.0), Some("PHC Dhamred")),
            record("YES", Some(45.0), Some(7.0), Some("CHC Pinan")),
        ];
        let kept = FilterCriteria::batch().apply(&records);
        assert_eq!(kept.len(), 2);
        assert_eq!(kept[0].facility_name.as_deref(), Some("PHC Dhamred"));
        assert_eq!(kept[1].facility_name.as_deref(), Some("CHC Pinan"));
    }
}

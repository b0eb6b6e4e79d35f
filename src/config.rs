//! Screening Configuration
//! Fixed column names, facility lookup table, and screening criteria.

/// Column holding the raw facility code.
pub const FACILITY_COLUMN: &str = "health_facility";
/// Column holding the consent answer.
pub const CONSENT_COLUMN: &str = "q2";
/// Column holding the participant age.
pub const AGE_COLUMN: &str = "q7";
/// Column holding the screening risk score.
pub const RISK_COLUMN: &str = "q46";

/// The only consent value accepted after normalization.
pub const CONSENT_ACCEPTED: &str = "YES";

/// Batch criteria: age must be above this value.
pub const BATCH_MIN_AGE: f64 = 30.0;
/// Batch criteria: risk score must be above this value.
pub const BATCH_MIN_RISK: f64 = 3.0;

pub const DEFAULT_INPUT_PATH: &str = "Assignment_dataset.xlsx";
pub const DEFAULT_REPORT_PATH: &str = "facility_summary.xlsx";
pub const DEFAULT_CSV_FILE_NAME: &str = "facility_summary.csv";

pub const DASHBOARD_TITLE: &str = "Health Risk Screening Dashboard";
pub const DASHBOARD_SUBTITLE: &str = "Interactive dashboard for screening data analysis";

/// Facility code to display name.
pub static FACILITY_MAPPING: [(&str, &str); 9] = [
    ("health_facility9", "CHC Harsana"),
    ("health_facility8", "CHC Rajgarh"),
    ("health_facility7", "PHC Dhamred"),
    ("health_facility6", "PHC Bahatukala"),
    ("health_facility5", "CHC Laxmangarh"),
    ("health_facility4", "CHC Pinan"),
    ("health_facility3", "CHC Tahla"),
    ("health_facility2", "PHC Bhanokhar"),
    ("health_facility1", "PHC Ramanagar"),
];

/// Facilities a batch record must belong to.
pub static REQUIRED_FACILITIES: [&str; 9] = [
    "CHC Harsana",
    "CHC Laxmangarh",
    "CHC Pinan",
    "CHC Rajgarh",
    "CHC Tahla",
    "PHC Bahatukala",
    "PHC Bhanokhar",
    "PHC Dhamred",
    "PHC Ramanagar",
];

/// Look up the display name for a raw facility code.
pub fn facility_name(code: &str) -> Option<&'static str> {
    FACILITY_MAPPING
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_map_to_names() {
        assert_eq!(facility_name("health_facility1"), Some("PHC Ramanagar"));
        assert_eq!(facility_name("health_facility9"), Some("CHC Harsana"));
    }

    #[test]
    fn unknown_codes_have_no_name() {
        assert_eq!(facility_name("health_facility10"), None);
        assert_eq!(facility_name(" health_facility1"), None);
        assert_eq!(facility_name(""), None);
    }

    #[test]
    fn allow_list_covers_every_mapped_name() {
        for (_, name) in FACILITY_MAPPING.iter() {
            assert!(REQUIRED_FACILITIES.contains(name), "{name} missing");
        }
    }
}

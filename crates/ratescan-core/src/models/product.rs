//! Catalog record model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The resolved rate/term record for one loan product.
///
/// Created fresh each run and written into the catalog keyed by product id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Lowest advertised interest rate, percent per annum. `None` when no
    /// rate signal was found; serialized as `null` so consumers can tell
    /// "unknown" from a real figure.
    pub rate: Option<f64>,

    /// Longest advertised term in months; 0 when no term was found.
    pub term_months: u32,

    /// When this record was produced (UTC).
    pub updated_at: DateTime<Utc>,

    /// Human-readable product name.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub description: Option<String>,
}

impl ProductRecord {
    /// Check the record against its documented invariants.
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(rate) = self.rate {
            if rate <= 0.0 {
                issues.push(format!("rate must be positive, got {rate}"));
            }
        }

        if self.rate.is_none() && self.term_months == 0 {
            issues.push("record carries neither a rate nor a term".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(rate: Option<f64>, term_months: u32) -> ProductRecord {
        ProductRecord {
            rate,
            term_months,
            updated_at: Utc.with_ymd_and_hms(2024, 1, 15, 12, 0, 0).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_validate_accepts_full_record() {
        assert!(record(Some(9.9), 60).validate().is_empty());
    }

    #[test]
    fn test_validate_accepts_partial_record() {
        assert!(record(Some(9.9), 0).validate().is_empty());
        assert!(record(None, 36).validate().is_empty());
    }

    #[test]
    fn test_validate_flags_empty_record() {
        assert!(!record(None, 0).validate().is_empty());
    }

    #[test]
    fn test_validate_flags_nonpositive_rate() {
        assert!(!record(Some(0.0), 12).validate().is_empty());
    }

    #[test]
    fn test_description_omitted_when_absent() {
        let json = serde_json::to_string(&record(Some(9.9), 60)).unwrap();
        assert!(!json.contains("description"));
        assert!(json.contains("\"rate\":9.9"));
    }

    #[test]
    fn test_missing_rate_serializes_as_null() {
        let json = serde_json::to_string(&record(None, 12)).unwrap();
        assert!(json.contains("\"rate\":null"));
    }
}

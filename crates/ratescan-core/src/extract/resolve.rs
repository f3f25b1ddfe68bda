//! Candidate resolution: one canonical value per field.

use std::cmp::Ordering;

use super::CandidateSet;

/// The resolved values for one product, before stamping into a record.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FieldResult {
    /// Canonical rate, or `None` when no rate candidate survived.
    pub rate: Option<f64>,

    /// Canonical term in months; 0 when no term candidate survived.
    pub term_months: u32,
}

impl FieldResult {
    /// True when neither field resolved.
    pub fn is_unresolved(&self) -> bool {
        self.rate.is_none() && self.term_months == 0
    }
}

/// Reduce candidate sets to canonical field values.
///
/// Pages phrase ranges as «от X%» / «до N месяцев», so the lowest rate and
/// the longest term are the advertised boundary values. This is a product
/// convention, fixed across all strategies and sources.
pub fn resolve(set: &CandidateSet) -> FieldResult {
    let rate = set
        .rates
        .iter()
        .map(|c| c.value)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let term_months = set.terms.iter().map(|c| c.value).max().unwrap_or(0);

    FieldResult { rate, term_months }
}

//! Candidate collection: scan text spans or tariff objects for rate and
//! term signals.
//!
//! Collection is a pure function of its input. Normalization errors on
//! individual tokens are skipped, never propagated: one corrupt number must
//! not blank out an otherwise valid result set.

use serde_json::Value;
use tracing::debug;

use super::patterns::{DURATION_PATTERN, NUMERIC_TOKEN, RATE_PATTERN};
use super::units::{normalize_duration, normalize_rate};
use super::{Candidate, CandidateSet};

/// Rate fields read from a structured tariff object. Values may arrive
/// stringified ("от 9,9%"), so each is scanned for numeric tokens.
const TARIFF_RATE_FIELDS: [&str; 3] = ["minRate", "maxRate", "rate"];

/// Term fields read from a structured tariff object; integer months only.
const TARIFF_TERM_FIELDS: [&str; 2] = ["minTermMonths", "maxTermMonths"];

/// Collect every percentage figure in a text span.
pub fn collect_rates(text: &str) -> Vec<Candidate<f64>> {
    let mut rates = Vec::new();

    for caps in RATE_PATTERN.captures_iter(text) {
        let token = &caps[1];
        match normalize_rate(token) {
            Ok(value) if value > 0.0 => {
                rates.push(Candidate::new(value, caps.get(0).unwrap().as_str()));
            }
            Ok(value) => debug!(token, value, "discarding non-positive rate"),
            Err(err) => debug!(token, %err, "skipping malformed rate token"),
        }
    }

    rates
}

/// Collect every duration phrase in a text span, converted to months.
pub fn collect_terms(text: &str) -> Vec<Candidate<u32>> {
    let mut terms = Vec::new();

    for caps in DURATION_PATTERN.captures_iter(text) {
        let Ok(value) = caps[1].parse::<u32>() else {
            continue;
        };
        match normalize_duration(value, &caps[2]) {
            Ok(months) => terms.push(Candidate::new(months, caps.get(0).unwrap().as_str())),
            Err(err) => debug!(unit = &caps[2], %err, "skipping unknown duration unit"),
        }
    }

    terms
}

/// Collect both fields from one text span.
pub fn collect_text(text: &str) -> CandidateSet {
    CandidateSet {
        rates: collect_rates(text),
        terms: collect_terms(text),
    }
}

/// Collect from one structured tariff object by named field rather than by
/// scanning free text. Numeric fields still pass through the normalizers so
/// format surprises degrade to skipped tokens instead of aborts.
pub fn collect_tariff(tariff: &Value) -> CandidateSet {
    let mut set = CandidateSet::default();

    for field in TARIFF_RATE_FIELDS {
        let Some(value) = tariff.get(field) else {
            continue;
        };
        let text = match value {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            _ => continue,
        };
        for token in NUMERIC_TOKEN.find_iter(&text) {
            if let Ok(rate) = normalize_rate(token.as_str()) {
                if rate > 0.0 {
                    set.rates.push(Candidate::new(rate, format!("{field}: {text}")));
                }
            }
        }
    }

    for field in TARIFF_TERM_FIELDS {
        let Some(months) = tariff.get(field).and_then(Value::as_u64) else {
            continue;
        };
        // Already on the month scale; the normalizer is only a format check.
        if let Ok(months) = normalize_duration(months as u32, "мес") {
            set.terms
                .push(Candidate::new(months, format!("{field}: {months}")));
        }
    }

    set
}

/// Collect from an array of tariff objects.
pub fn collect_tariffs(tariffs: &[Value]) -> CandidateSet {
    let mut set = CandidateSet::default();
    for tariff in tariffs {
        set.extend(collect_tariff(tariff));
    }
    set
}

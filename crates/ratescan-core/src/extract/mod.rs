//! The extraction cascade: locators, candidate collectors, unit
//! normalization and the strategy chain that ties them together.

pub mod chain;
pub mod collect;
pub mod locate;
pub mod patterns;
pub mod resolve;
pub mod units;

pub use chain::{Strategy, StrategyChain, Sufficiency};
pub use collect::{collect_rates, collect_tariffs, collect_terms, collect_text};
pub use locate::{Located, Locator};
pub use resolve::{resolve, FieldResult};
pub use units::{normalize_duration, normalize_rate};

/// A normalized numeric value extracted from content, not yet resolved to a
/// canonical field value.
///
/// Rate candidates are percent figures (`Candidate<f64>`), term candidates
/// are already on the month scale (`Candidate<u32>`).
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate<T> {
    /// Normalized value.
    pub value: T,

    /// Source text the value was parsed from, kept for debug logging.
    pub source: String,
}

impl<T> Candidate<T> {
    pub fn new(value: T, source: impl Into<String>) -> Self {
        Self {
            value,
            source: source.into(),
        }
    }
}

/// Candidates gathered by one strategy, split per target field.
#[derive(Debug, Clone, Default)]
pub struct CandidateSet {
    pub rates: Vec<Candidate<f64>>,
    pub terms: Vec<Candidate<u32>>,
}

impl CandidateSet {
    /// True when neither field produced anything.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty() && self.terms.is_empty()
    }

    /// Merge another set into this one.
    pub fn extend(&mut self, other: CandidateSet) {
        self.rates.extend(other.rates);
        self.terms.extend(other.terms);
    }
}

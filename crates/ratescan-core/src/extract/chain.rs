//! The strategy chain: prioritized locator/collector pairs with explicit
//! fallthrough.
//!
//! Strategies run in descending structural specificity: embedded payloads
//! first, then scoped markup, with the unscoped full-text scan last. An
//! unscoped scan can pick up stray numbers (phone numbers, unrelated
//! percentages), so it only runs once the precise anchors are gone.

use tracing::{debug, trace};

use super::collect::{collect_tariffs, collect_text};
use super::locate::{Located, Locator, DEFAULT_CELL_SELECTOR};
use super::CandidateSet;
use crate::error::ExtractError;
use crate::models::config::ProductConfig;
use crate::models::content::{RawContent, SourceKind};

/// Decides whether a strategy's output is good enough to stop the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Sufficiency {
    /// At least one rate and one term candidate.
    #[default]
    RateAndTerm,

    /// Any candidate for either field.
    AnyField,
}

impl Sufficiency {
    pub fn satisfied_by(self, set: &CandidateSet) -> bool {
        match self {
            Self::RateAndTerm => !set.rates.is_empty() && !set.terms.is_empty(),
            Self::AnyField => !set.is_empty(),
        }
    }
}

/// One extraction strategy: a named locator evaluated against the page.
///
/// The collector is implied by what the locator yields: structured items go
/// through the named-field collector, text spans through the regex
/// collectors.
#[derive(Debug, Clone)]
pub struct Strategy {
    pub name: &'static str,
    pub locator: Locator,
}

impl Strategy {
    pub fn new(name: &'static str, locator: Locator) -> Self {
        Self { name, locator }
    }

    fn collect(&self, raw: &RawContent) -> Result<CandidateSet, ExtractError> {
        match self.locator.locate(raw)? {
            Located::Json(items) => Ok(collect_tariffs(&items)),
            Located::Text(spans) => {
                let mut set = CandidateSet::default();
                for span in &spans {
                    set.extend(collect_text(span));
                }
                Ok(set)
            }
            Located::Nothing => Ok(CandidateSet::default()),
        }
    }
}

/// An ordered list of strategies, most structurally precise first.
#[derive(Debug, Clone)]
pub struct StrategyChain {
    strategies: Vec<Strategy>,
    sufficiency: Sufficiency,
}

impl StrategyChain {
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self {
            strategies,
            sufficiency: Sufficiency::default(),
        }
    }

    pub fn with_sufficiency(mut self, sufficiency: Sufficiency) -> Self {
        self.sufficiency = sufficiency;
        self
    }

    /// The default chain for a source kind, without per-product overrides.
    pub fn for_source(kind: SourceKind) -> Self {
        Self::new(default_strategies(kind, None, None, None))
    }

    /// The default chain for a product, with its configured overrides.
    pub fn for_product(product: &ProductConfig) -> Self {
        let heading = product
            .section_hint
            .clone()
            .or_else(|| product.description.clone());
        Self::new(default_strategies(
            product.kind,
            product.json_path.clone(),
            product.css_selector.clone(),
            heading,
        ))
    }

    /// Evaluate strategies in order, stopping at the first whose output
    /// satisfies the sufficiency predicate.
    ///
    /// An absent anchor is a fallthrough, not an error. When no strategy is
    /// sufficient, the first partial result (in priority order) wins; only a
    /// cascade that found nothing at all is a `NoMatch`.
    pub fn run(&self, raw: &RawContent) -> Result<CandidateSet, ExtractError> {
        let mut partial: Option<(&'static str, CandidateSet)> = None;

        for strategy in &self.strategies {
            let set = strategy.collect(raw)?;

            if self.sufficiency.satisfied_by(&set) {
                debug!(
                    strategy = strategy.name,
                    rates = set.rates.len(),
                    terms = set.terms.len(),
                    "strategy sufficient"
                );
                return Ok(set);
            }

            if !set.is_empty() && partial.is_none() {
                partial = Some((strategy.name, set));
                continue;
            }

            trace!(strategy = strategy.name, "strategy empty, falling through");
        }

        match partial {
            Some((name, set)) => {
                debug!(strategy = name, "no sufficient strategy, keeping partial result");
                Ok(set)
            }
            None => Err(ExtractError::NoMatch),
        }
    }
}

fn default_strategies(
    kind: SourceKind,
    json_path: Option<Vec<String>>,
    css_selector: Option<String>,
    heading: Option<String>,
) -> Vec<Strategy> {
    let json_locator = match json_path {
        Some(path) => Locator::JsonPath { path },
        None => Locator::tariff_path(),
    };
    let css_locator = Locator::Css {
        selector: css_selector.unwrap_or_else(|| DEFAULT_CELL_SELECTOR.to_string()),
    };

    match kind {
        SourceKind::StructuredJson => vec![
            Strategy::new("tariff-json", json_locator),
            Strategy::new("full-text", Locator::FullText),
        ],
        SourceKind::TableHtml => vec![
            Strategy::new("embedded-json", json_locator),
            Strategy::new("table-cells", css_locator),
            Strategy::new("full-text", Locator::FullText),
        ],
        SourceKind::FreeText => vec![Strategy::new("full-text", Locator::FullText)],
        SourceKind::PdfText => {
            let mut strategies = Vec::new();
            if let Some(heading) = heading {
                strategies.push(Strategy::new("product-section", Locator::Section { heading }));
            }
            strategies.push(Strategy::new("full-text", Locator::FullText));
            strategies
        }
    }
}

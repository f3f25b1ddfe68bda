//! Per-run orchestration: fetch, extract, and collect per-product outcomes.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{ExtractError, FetchError};
use crate::extract::chain::StrategyChain;
use crate::extract::resolve::resolve;
use crate::fetch::ContentFetcher;
use crate::models::config::ProductConfig;
use crate::models::content::RawContent;
use crate::models::product::ProductRecord;

/// Why a single product produced no record this run.
#[derive(Error, Debug)]
pub enum ProductFailure {
    /// The fetch collaborator failed; passed through unchanged.
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    /// The strategy chain was exhausted without sufficient candidates.
    #[error("extraction failed: {0}")]
    Extract(#[from] ExtractError),
}

/// Outcome of one pipeline run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Freshly extracted records, keyed by product id, ready for the
    /// catalog merge.
    pub updated: BTreeMap<String, ProductRecord>,

    /// Products that produced no record, with the reason. Failures are
    /// reported, never raised; failed ids are excluded from the merge so
    /// their previous catalog entries survive.
    pub failures: Vec<(String, ProductFailure)>,
}

impl RunReport {
    pub fn succeeded(&self) -> usize {
        self.updated.len()
    }

    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Fold one product's outcome into the report.
    pub fn record(&mut self, id: &str, outcome: Result<ProductRecord, ProductFailure>) {
        match outcome {
            Ok(record) => {
                self.updated.insert(id.to_string(), record);
            }
            Err(failure) => self.failures.push((id.to_string(), failure)),
        }
    }
}

/// Extract one product from already-fetched content.
///
/// Pure and synchronous: no shared state, safe to run for many products
/// independently. The timestamp is passed in by the caller so one run
/// stamps every record identically.
pub fn extract_product(
    product: &ProductConfig,
    raw: &RawContent,
    now: DateTime<Utc>,
) -> Result<ProductRecord, ExtractError> {
    let chain = StrategyChain::for_product(product);
    let fields = resolve(&chain.run(raw)?);

    Ok(ProductRecord {
        rate: fields.rate,
        term_months: fields.term_months,
        updated_at: now,
        description: product.description.clone(),
    })
}

/// Fetch and extract a single product.
pub async fn run_product<F: ContentFetcher>(
    fetcher: &F,
    product: &ProductConfig,
    now: DateTime<Utc>,
) -> Result<ProductRecord, ProductFailure> {
    let raw = fetcher.fetch(product).await?;
    let record = extract_product(product, &raw, now)?;
    info!(
        product = %product.id,
        rate = ?record.rate,
        term_months = record.term_months,
        "extracted"
    );
    Ok(record)
}

/// Fetch and extract every product, collecting per-product outcomes.
///
/// Individual failures are recorded, never raised. The caller owns the
/// single catalog merge-and-write that follows, which keeps writes
/// serialized even if callers parallelize extraction.
pub async fn run_products<F: ContentFetcher>(
    fetcher: &F,
    products: &[ProductConfig],
    now: DateTime<Utc>,
) -> RunReport {
    let mut report = RunReport::default();

    for product in products {
        let outcome = run_product(fetcher, product, now).await;
        if let Err(failure) = &outcome {
            warn!(product = %product.id, %failure, "product skipped");
        }
        report.record(&product.id, outcome);
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    use crate::models::content::SourceKind;

    /// Serves canned content, standing in for the network layer.
    struct FixtureFetcher {
        pages: HashMap<String, RawContent>,
    }

    impl FixtureFetcher {
        fn new(pages: impl IntoIterator<Item = (&'static str, RawContent)>) -> Self {
            Self {
                pages: pages
                    .into_iter()
                    .map(|(id, raw)| (id.to_string(), raw))
                    .collect(),
            }
        }
    }

    impl ContentFetcher for FixtureFetcher {
        async fn fetch(&self, product: &ProductConfig) -> Result<RawContent, FetchError> {
            self.pages
                .get(&product.id)
                .cloned()
                .ok_or_else(|| FetchError::Missing(product.id.clone()))
        }
    }

    fn table_product(id: &str) -> ProductConfig {
        ProductConfig::new(id, format!("https://bank.example/{id}"), SourceKind::TableHtml)
    }

    const TABLE_PAGE: &str = "<table><tr><td>от 9.9%</td><td>до 5 лет</td></tr></table>";

    #[test]
    fn test_table_html_end_to_end() {
        let product = table_product("prime_plus");
        let raw = RawContent::new(SourceKind::TableHtml, TABLE_PAGE);
        let record = extract_product(&product, &raw, Utc::now()).unwrap();

        assert_eq!(record.rate, Some(9.9));
        assert_eq!(record.term_months, 60);
    }

    #[test]
    fn test_extraction_is_idempotent() {
        let product = table_product("prime_plus");
        let raw = RawContent::new(SourceKind::TableHtml, TABLE_PAGE);
        let now = Utc::now();

        let first = extract_product(&product, &raw, now).unwrap();
        let second = extract_product(&product, &raw, now).unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_run_collects_successes_and_failures() {
        let fetcher = FixtureFetcher::new([
            ("prime_plus", RawContent::new(SourceKind::TableHtml, TABLE_PAGE)),
            (
                "car_pledge",
                RawContent::new(SourceKind::FreeText, "страница без цифр"),
            ),
        ]);
        let products = vec![
            table_product("prime_plus"),
            ProductConfig::new("car_pledge", "https://bank.example/car", SourceKind::FreeText),
            table_product("unfetchable"),
        ];

        let report = run_products(&fetcher, &products, Utc::now()).await;

        assert_eq!(report.succeeded(), 1);
        assert_eq!(report.failed(), 2);
        assert!(report.updated.contains_key("prime_plus"));
        assert!(matches!(
            report.failures[0].1,
            ProductFailure::Extract(ExtractError::NoMatch)
        ));
        assert!(matches!(
            report.failures[1].1,
            ProductFailure::Fetch(FetchError::Missing(_))
        ));
    }

    #[tokio::test]
    async fn test_structured_json_product() {
        let payload = r#"{"props":{"pageProps":{"tariffs":[
            {"minRate":"11,9","maxRate":"29,9","minTermMonths":3,"maxTermMonths":84},
            {"minRate":"9,9","maxTermMonths":60}
        ]}}}"#;
        let fetcher = FixtureFetcher::new([(
            "alternativa",
            RawContent::new(SourceKind::StructuredJson, payload),
        )]);
        let product = ProductConfig::new(
            "alternativa",
            "https://bank.example/alternativa",
            SourceKind::StructuredJson,
        );

        let record = run_product(&fetcher, &product, Utc::now()).await.unwrap();
        assert_eq!(record.rate, Some(9.9));
        assert_eq!(record.term_months, 84);
    }

    #[test]
    fn test_record_carries_description() {
        let product = table_product("prime_plus").with_description("Кредит Прайм Плюс");
        let raw = RawContent::new(SourceKind::TableHtml, TABLE_PAGE);
        let record = extract_product(&product, &raw, Utc::now()).unwrap();
        assert_eq!(record.description.as_deref(), Some("Кредит Прайм Плюс"));
    }
}

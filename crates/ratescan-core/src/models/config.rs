//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::content::SourceKind;

/// Main configuration for the ratescan pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Where the merged catalog is persisted.
    pub catalog_path: PathBuf,

    /// Fetch layer configuration.
    pub fetch: FetchConfig,

    /// Products to monitor.
    pub products: Vec<ProductConfig>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/products.json"),
            fetch: FetchConfig::default(),
            products: Vec::new(),
        }
    }
}

/// Fetch layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// User-Agent header sent with every request.
    pub user_agent: String,

    /// Origin root fetched once before the first product request, so the
    /// session carries the origin's cookies/tokens.
    pub bootstrap_url: Option<String>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64) ",
                "AppleWebKit/537.36 (KHTML, like Gecko) ",
                "Chrome/114.0.0.0 Safari/537.36"
            )
            .to_string(),
            bootstrap_url: None,
        }
    }
}

/// One monitored product and its per-product cascade overrides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductConfig {
    /// Catalog key.
    pub id: String,

    /// Page URL handed to the fetch collaborator.
    pub url: String,

    /// How the fetched content should be interpreted.
    pub kind: SourceKind,

    /// Human-readable product name, carried onto the record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Override for the table-cell selector.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub css_selector: Option<String>,

    /// Override for the embedded-payload path to the tariff array.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<Vec<String>>,

    /// Heading the PDF section locator anchors on. Falls back to
    /// `description` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub section_hint: Option<String>,
}

impl ProductConfig {
    /// Minimal config for a product with no overrides.
    pub fn new(id: impl Into<String>, url: impl Into<String>, kind: SourceKind) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            kind,
            description: None,
            css_selector: None,
            json_path: None,
            section_hint: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl ScanConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }

    /// A starter configuration with one example product, for `config init`.
    pub fn sample() -> Self {
        Self {
            products: vec![
                ProductConfig::new(
                    "cash_loan",
                    "https://bank.example/credits/cash",
                    SourceKind::TableHtml,
                )
                .with_description("Cash loan"),
            ],
            ..Self::default()
        }
    }
}

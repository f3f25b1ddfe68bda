//! Core library for loan product rate/term monitoring.
//!
//! This crate provides:
//! - The extraction cascade: prioritized locator strategies, candidate
//!   collection and unit normalization over raw page content
//! - Candidate resolution to one canonical rate/term per product
//! - Catalog merge semantics with atomic persistence
//! - The fetch-collaborator interface and per-run orchestration

pub mod catalog;
pub mod error;
pub mod extract;
pub mod fetch;
pub mod models;
pub mod pipeline;

pub use catalog::Catalog;
pub use error::{CatalogError, ExtractError, FetchError, RatescanError, Result};
pub use extract::{
    Candidate, CandidateSet, FieldResult, Located, Locator, Strategy, StrategyChain, Sufficiency,
};
pub use fetch::ContentFetcher;
pub use models::config::{FetchConfig, ProductConfig, ScanConfig};
pub use models::content::{RawContent, SourceKind};
pub use models::product::ProductRecord;
pub use pipeline::{extract_product, run_product, run_products, ProductFailure, RunReport};

//! Data models: raw content, product records, configuration.

pub mod config;
pub mod content;
pub mod product;

pub use config::{FetchConfig, ProductConfig, ScanConfig};
pub use content::{RawContent, SourceKind};
pub use product::ProductRecord;

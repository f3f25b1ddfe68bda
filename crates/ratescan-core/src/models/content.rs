//! Raw page content handed over by the fetch layer.

use serde::{Deserialize, Serialize};

/// How a product page's content was obtained.
///
/// The kind decides which default strategy chain the cascade evaluates; it
/// never changes after the fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A raw JSON payload (API response or pre-extracted page state).
    StructuredJson,
    /// Static or rendered HTML with tabular product data.
    TableHtml,
    /// Unstructured text (stripped HTML, plain-text snapshots).
    FreeText,
    /// Text extracted from a PDF document.
    PdfText,
}

impl SourceKind {
    /// Infer the kind from a saved page's file extension.
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::StructuredJson),
            "html" | "htm" => Some(Self::TableHtml),
            "txt" => Some(Self::FreeText),
            "pdf" => Some(Self::PdfText),
            _ => None,
        }
    }
}

/// An immutable blob of page content plus its source kind.
///
/// Produced by the external fetch collaborator; the cascade only consumes it.
#[derive(Debug, Clone)]
pub struct RawContent {
    /// Source kind tag.
    pub kind: SourceKind,

    /// The text/markup/JSON blob.
    pub content: String,
}

impl RawContent {
    pub fn new(kind: SourceKind, content: impl Into<String>) -> Self {
        Self {
            kind,
            content: content.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(SourceKind::from_extension("json"), Some(SourceKind::StructuredJson));
        assert_eq!(SourceKind::from_extension("HTML"), Some(SourceKind::TableHtml));
        assert_eq!(SourceKind::from_extension("txt"), Some(SourceKind::FreeText));
        assert_eq!(SourceKind::from_extension("pdf"), Some(SourceKind::PdfText));
        assert_eq!(SourceKind::from_extension("csv"), None);
    }
}

//! Locators: strategy-specific rules for finding the content span to scan.
//!
//! A locator that finds nothing yields [`Located::Nothing`], a fallthrough
//! signal for the chain rather than an error. Only a broken configuration
//! (an unparsable selector) is reported as an error.

use scraper::{Html, Selector};
use serde_json::Value;

use super::patterns::{HTML_TAG, NEXT_DATA_SCRIPT};
use crate::error::ExtractError;
use crate::models::content::RawContent;

/// Default path to the tariff array inside an embedded state payload.
pub const DEFAULT_TARIFF_PATH: [&str; 3] = ["props", "pageProps", "tariffs"];

/// Default cell selector for tabular product pages.
pub const DEFAULT_CELL_SELECTOR: &str = "table td, table th";

/// How many lines after a product heading the section locator keeps.
/// Product sheets keep the figures right next to the name.
const SECTION_WINDOW: usize = 8;

/// What a locator found.
#[derive(Debug, Clone)]
pub enum Located {
    /// Tariff objects for the structured collector.
    Json(Vec<Value>),
    /// Text spans for the free-text collectors.
    Text(Vec<String>),
    /// The structural anchor is absent from this content.
    Nothing,
}

/// A strategy-specific rule for finding the span to scan.
#[derive(Debug, Clone)]
pub enum Locator {
    /// Walk a path to an array of tariff objects, either in a raw JSON body
    /// or in an embedded `__NEXT_DATA__` script.
    JsonPath { path: Vec<String> },

    /// CSS selector over an HTML document; yields each matched element's
    /// collapsed text.
    Css { selector: String },

    /// Free-text window following a named product heading.
    Section { heading: String },

    /// The whole document, markup stripped.
    FullText,
}

impl Locator {
    /// The default embedded-payload locator.
    pub fn tariff_path() -> Self {
        Self::JsonPath {
            path: DEFAULT_TARIFF_PATH.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Apply the locator to raw content.
    pub fn locate(&self, raw: &RawContent) -> Result<Located, ExtractError> {
        match self {
            Self::JsonPath { path } => Ok(locate_json(&raw.content, path)),
            Self::Css { selector } => locate_css(&raw.content, selector),
            Self::Section { heading } => Ok(locate_section(&raw.content, heading)),
            Self::FullText => Ok(Located::Text(vec![strip_tags(&raw.content)])),
        }
    }
}

/// Parse the content as a JSON document: either the body itself, or the
/// payload of an embedded `__NEXT_DATA__` script.
fn payload_json(content: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str(content.trim()) {
        return Some(value);
    }
    NEXT_DATA_SCRIPT
        .captures(content)
        .and_then(|caps| serde_json::from_str(caps[1].trim()).ok())
}

fn locate_json(content: &str, path: &[String]) -> Located {
    let Some(payload) = payload_json(content) else {
        return Located::Nothing;
    };

    let mut node = &payload;
    for key in path {
        match node.get(key) {
            Some(next) => node = next,
            None => return Located::Nothing,
        }
    }

    match node {
        Value::Array(items) if !items.is_empty() => Located::Json(items.clone()),
        Value::Object(_) => Located::Json(vec![node.clone()]),
        _ => Located::Nothing,
    }
}

fn locate_css(content: &str, selector: &str) -> Result<Located, ExtractError> {
    let parsed = Selector::parse(selector)
        .map_err(|e| ExtractError::Selector(format!("{selector}: {e}")))?;

    let document = Html::parse_document(content);
    let spans: Vec<String> = document
        .select(&parsed)
        .map(|element| {
            element
                .text()
                .collect::<String>()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty())
        .collect();

    if spans.is_empty() {
        Ok(Located::Nothing)
    } else {
        Ok(Located::Text(spans))
    }
}

fn locate_section(content: &str, heading: &str) -> Located {
    let plain = strip_tags(content);
    let needle = heading.to_lowercase();
    let lines: Vec<&str> = plain.lines().collect();

    let Some(start) = lines
        .iter()
        .position(|line| line.to_lowercase().contains(&needle))
    else {
        return Located::Nothing;
    };

    // Keep the heading and the lines below it, stopping at the blank line
    // that separates it from the next product section.
    let mut taken = Vec::new();
    for line in &lines[start..] {
        if taken.len() >= SECTION_WINDOW {
            break;
        }
        if !taken.is_empty() && line.trim().is_empty() {
            break;
        }
        taken.push(*line);
    }
    Located::Text(vec![taken.join("\n")])
}

fn strip_tags(content: &str) -> String {
    HTML_TAG.replace_all(content, " ").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::content::SourceKind;

    fn html(content: &str) -> RawContent {
        RawContent::new(SourceKind::TableHtml, content)
    }

    #[test]
    fn test_json_path_on_raw_body() {
        let raw = RawContent::new(
            SourceKind::StructuredJson,
            r#"{"props":{"pageProps":{"tariffs":[{"minRate":9.9}]}}}"#,
        );
        match Locator::tariff_path().locate(&raw).unwrap() {
            Located::Json(items) => assert_eq!(items.len(), 1),
            other => panic!("expected Json, got {other:?}"),
        }
    }

    #[test]
    fn test_json_path_on_embedded_script() {
        let raw = html(concat!(
            r#"<html><body><script id="__NEXT_DATA__" type="application/json">"#,
            r#"{"props":{"pageProps":{"tariffs":[{"minRate":"от 9,9%"},{"maxTermMonths":60}]}}}"#,
            r#"</script></body></html>"#,
        ));
        match Locator::tariff_path().locate(&raw).unwrap() {
            Located::Json(items) => assert_eq!(items.len(), 2),
            other => panic!("expected Json, got {other:?}"),
        }
    }

    #[test]
    fn test_json_path_missing_anchor_falls_through() {
        let raw = html("<html><body>no payload here</body></html>");
        assert!(matches!(
            Locator::tariff_path().locate(&raw).unwrap(),
            Located::Nothing
        ));
    }

    #[test]
    fn test_json_path_empty_array_falls_through() {
        let raw = RawContent::new(
            SourceKind::StructuredJson,
            r#"{"props":{"pageProps":{"tariffs":[]}}}"#,
        );
        assert!(matches!(
            Locator::tariff_path().locate(&raw).unwrap(),
            Located::Nothing
        ));
    }

    #[test]
    fn test_css_collects_cell_text() {
        let raw = html("<table><tr><td>от 9.9%</td><td>до 5 лет</td></tr></table>");
        let locator = Locator::Css {
            selector: DEFAULT_CELL_SELECTOR.to_string(),
        };
        match locator.locate(&raw).unwrap() {
            Located::Text(spans) => assert_eq!(spans, vec!["от 9.9%", "до 5 лет"]),
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_css_no_match_falls_through() {
        let raw = html("<div>plain page</div>");
        let locator = Locator::Css {
            selector: DEFAULT_CELL_SELECTOR.to_string(),
        };
        assert!(matches!(locator.locate(&raw).unwrap(), Located::Nothing));
    }

    #[test]
    fn test_css_invalid_selector_is_an_error() {
        let raw = html("<div></div>");
        let locator = Locator::Css {
            selector: "td[".to_string(),
        };
        assert!(matches!(
            locator.locate(&raw),
            Err(ExtractError::Selector(_))
        ));
    }

    #[test]
    fn test_section_window_after_heading() {
        let text = "Потребительский кредит\nставка от 14,5%\nсрок до 60 мес\n";
        let raw = RawContent::new(SourceKind::PdfText, text);
        let locator = Locator::Section {
            heading: "потребительский".to_string(),
        };
        match locator.locate(&raw).unwrap() {
            Located::Text(spans) => {
                assert!(spans[0].contains("14,5%"));
                assert!(spans[0].contains("60 мес"));
            }
            other => panic!("expected Text, got {other:?}"),
        }
    }

    #[test]
    fn test_section_missing_heading_falls_through() {
        let raw = RawContent::new(SourceKind::PdfText, "ипотека: ставка 18%");
        let locator = Locator::Section {
            heading: "автокредит".to_string(),
        };
        assert!(matches!(locator.locate(&raw).unwrap(), Located::Nothing));
    }

    #[test]
    fn test_full_text_strips_markup() {
        let raw = html("<p>от <b>9.9</b>%</p>");
        match Locator::FullText.locate(&raw).unwrap() {
            Located::Text(spans) => assert!(!spans[0].contains('<')),
            other => panic!("expected Text, got {other:?}"),
        }
    }
}

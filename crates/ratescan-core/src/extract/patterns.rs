//! Shared regex inventory for the extraction cascade.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Percentage figure, optionally prefixed with «от»: "от 9,9%", "14.5 %".
    pub static ref RATE_PATTERN: Regex = Regex::new(
        r"(?i)(?:от\s*)?(\d+(?:[.,]\d+)?)\s*%"
    ).unwrap();

    /// Duration phrase, optionally prefixed with «до»: "до 5 лет",
    /// "60 мес.", "90 дней".
    pub static ref DURATION_PATTERN: Regex = Regex::new(
        r"(?i)(?:до\s+)?(\d+)\s*(дн\w*|мес\w*|лет\b|год\w*)"
    ).unwrap();

    /// Embedded Next.js state payload carrying the tariff objects.
    pub static ref NEXT_DATA_SCRIPT: Regex = Regex::new(
        r#"(?s)<script[^>]*id="__NEXT_DATA__"[^>]*>(.*?)</script>"#
    ).unwrap();

    /// Markup tags, stripped before full-text scanning.
    pub static ref HTML_TAG: Regex = Regex::new(r"<[^>]+>").unwrap();

    /// Numeric token inside a stringified tariff field.
    pub static ref NUMERIC_TOKEN: Regex = Regex::new(r"\d+(?:[.,]\d+)?").unwrap();
}

//! Unit normalization: raw numeric tokens and duration units onto canonical
//! scales.
//!
//! Duration candidates arrive in days, months or years depending on how the
//! page phrases the term; everything is put on a common month scale here so
//! the resolver can compare candidates from different unit families.

use crate::error::ExtractError;

/// Parse a raw rate token, accepting either `.` or `,` as the decimal
/// separator (e.g. "9,9" or "14.5").
pub fn normalize_rate(token: &str) -> Result<f64, ExtractError> {
    // Drop spaces and non-breaking spaces before looking at the digits.
    let cleaned: String = token
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == ',' || *c == '.')
        .collect();

    if !cleaned.chars().any(|c| c.is_ascii_digit()) {
        return Err(ExtractError::MalformedNumber(token.to_string()));
    }

    cleaned
        .replace(',', ".")
        .parse::<f64>()
        .map_err(|_| ExtractError::MalformedNumber(token.to_string()))
}

/// Convert a duration to months.
///
/// Unit synonyms are matched case-insensitively by family: days («дн*»)
/// floor-divide by 30 with a minimum of one month, months («мес*») pass
/// through, years («лет», «год*») multiply by 12.
pub fn normalize_duration(value: u32, unit: &str) -> Result<u32, ExtractError> {
    let unit_lower = unit.trim().to_lowercase();

    if unit_lower.starts_with("дн") {
        Ok((value / 30).max(1))
    } else if unit_lower.starts_with("мес") {
        Ok(value)
    } else if unit_lower == "лет" || unit_lower.starts_with("год") {
        Ok(value * 12)
    } else {
        Err(ExtractError::UnknownUnit(unit.to_string()))
    }
}

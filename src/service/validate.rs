use chrono::NaiveDate;
use regex::Regex;
use rust_decimal::Decimal;
use std::ops::RangeInclusive;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::error::{Error, Result};

pub(crate) const MAX_DESCRIPTION_LEN: usize = 255;
pub(crate) const MAX_NAME_LEN: usize = 50;

fn max_amount() -> Decimal {
    Decimal::new(99_999_999_99, 2)
}

/// Patterns are literals; a compile failure simply rejects every input.
fn color_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").ok()).as_ref()
}

fn email_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").ok())
        .as_ref()
}

/// Positive, at most two decimal places.
pub(crate) fn amount(value: Decimal) -> Result<Decimal> {
    if value <= Decimal::ZERO {
        return Err(Error::validation("amount", "must be greater than 0"));
    }
    if value > max_amount() {
        return Err(Error::validation("amount", format!("must not exceed {}", max_amount())));
    }
    let normalized = value.normalize();
    if normalized.scale() > 2 {
        return Err(Error::validation("amount", "at most two decimal places"));
    }
    Ok(normalized)
}

/// Parse user input such as `"$1,234.50"` into a valid amount.
pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    let cleaned: String = s
        .trim()
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | ' '))
        .collect();
    let value = Decimal::from_str(&cleaned)
        .map_err(|_| Error::validation("amount", format!("'{s}' is not a number")))?;
    amount(value)
}

fn bounded_text(field: &'static str, s: &str, max: usize) -> Result<String> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    if trimmed.chars().count() > max {
        return Err(Error::validation(field, format!("must be at most {max} characters")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn description(s: &str) -> Result<String> {
    bounded_text("description", s, MAX_DESCRIPTION_LEN)
}

pub(crate) fn category_name(s: &str) -> Result<String> {
    bounded_text("name", s, MAX_NAME_LEN)
}

pub(crate) fn display_name(s: &str) -> Result<String> {
    bounded_text("name", s, MAX_NAME_LEN)
}

/// `#RRGGBB`, normalised to upper case.
pub(crate) fn color(s: &str) -> Result<String> {
    let trimmed = s.trim();
    if !color_re().is_some_and(|re| re.is_match(trimmed)) {
        return Err(Error::validation("color", format!("'{s}' is not a #RRGGBB color")));
    }
    Ok(trimmed.to_uppercase())
}

pub(crate) fn email(s: &str) -> Result<String> {
    let trimmed = s.trim();
    if !email_re().is_some_and(|re| re.is_match(trimmed)) {
        return Err(Error::validation("email", format!("'{s}' is not an email address")));
    }
    Ok(trimmed.to_string())
}

pub(crate) fn in_range(field: &'static str, value: u32, range: RangeInclusive<u32>) -> Result<u32> {
    if !range.contains(&value) {
        return Err(Error::validation(
            field,
            format!("must be between {} and {}", range.start(), range.end()),
        ));
    }
    Ok(value)
}

pub(crate) fn date_range(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<()> {
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(Error::validation("date range", format!("{s} is after {e}")));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::calendar;
use crate::models::{EntryKind, Frequency};

/// Flags that never take a value.
const SWITCHES: &[&str] = &["--dry-run", "--active", "--paused"];

/// Command line split into positional words and `--flag value` pairs.
/// The first positional word is the command.
#[derive(Debug, Default)]
pub(crate) struct Args<'a> {
    positional: Vec<&'a str>,
    flags: Vec<(&'a str, Option<&'a str>)>,
}

impl<'a> Args<'a> {
    pub(crate) fn parse(raw: &'a [String]) -> Self {
        let mut args = Self::default();
        let mut iter = raw.iter().map(String::as_str).peekable();
        while let Some(word) = iter.next() {
            if word.starts_with("--") && word.len() > 2 {
                let value = if SWITCHES.contains(&word) {
                    None
                } else {
                    iter.next_if(|next| !next.starts_with("--"))
                };
                args.flags.push((word, value));
            } else {
                args.positional.push(word);
            }
        }
        args
    }

    pub(crate) fn command(&self) -> Option<&'a str> {
        self.positional.first().copied()
    }

    /// Positional argument `index`, counted after the command.
    pub(crate) fn pos(&self, index: usize) -> Option<&'a str> {
        self.positional.get(index + 1).copied()
    }

    pub(crate) fn required(&self, index: usize, usage: &str) -> Result<&'a str> {
        self.pos(index)
            .ok_or_else(|| anyhow::anyhow!("Usage: spendlog {usage}"))
    }

    /// Positional arguments from `index` on, joined by spaces.
    pub(crate) fn rest(&self, index: usize) -> Option<String> {
        let words = self.positional.get(index + 1..)?;
        if words.is_empty() {
            return None;
        }
        Some(words.join(" "))
    }

    /// Value of the last occurrence of `name`.
    pub(crate) fn flag(&self, name: &str) -> Option<&'a str> {
        self.flags
            .iter()
            .rev()
            .find(|(flag, _)| *flag == name)
            .and_then(|(_, value)| *value)
    }

    pub(crate) fn has(&self, name: &str) -> bool {
        self.flags.iter().any(|(flag, _)| *flag == name)
    }
}

pub(crate) fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{s}', expected YYYY-MM-DD"))
}

pub(crate) fn parse_month(s: &str) -> Result<(i32, u32)> {
    calendar::parse_month(s).ok_or_else(|| anyhow::anyhow!("Invalid month '{s}', expected YYYY-MM"))
}

pub(crate) fn parse_kind(s: &str) -> Result<EntryKind> {
    EntryKind::parse(s).ok_or_else(|| {
        let names: Vec<&str> = EntryKind::all().iter().map(|k| k.as_str()).collect();
        anyhow::anyhow!("Unknown type '{s}', expected one of: {}", names.join(", "))
    })
}

pub(crate) fn parse_frequency(s: &str) -> Result<Frequency> {
    Frequency::parse(s).ok_or_else(|| {
        let names: Vec<&str> = Frequency::all().iter().map(|f| f.as_str()).collect();
        anyhow::anyhow!("Unknown frequency '{s}', expected one of: {}", names.join(", "))
    })
}

pub(crate) fn parse_id(s: &str) -> Result<i64> {
    s.trim()
        .parse()
        .with_context(|| format!("Invalid id '{s}'"))
}

pub(crate) fn parse_count(s: &str) -> Result<u32> {
    s.trim()
        .parse()
        .with_context(|| format!("Invalid number '{s}'"))
}

pub(crate) fn parse_amount(s: &str) -> Result<Decimal> {
    Ok(crate::service::parse_amount(s)?)
}

pub(crate) fn optional<T>(value: Option<&str>, parse: impl Fn(&str) -> Result<T>) -> Result<Option<T>> {
    value.map(parse).transpose()
}

pub(crate) fn shellexpand(path: &str) -> String {
    if let Some(rest) = path.strip_prefix("~/") {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        format!("{home}/{rest}")
    } else {
        path.to_string()
    }
}

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;

//! Forgiving field deserializers.
//!
//! Rule documents and transcripts are often authored by hand or produced by
//! browser scripts. A `null`, a value of the wrong type or a numeric string
//! in a numeric field resolves to that field's default (or to the parsed
//! number) instead of rejecting the whole document.

use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;

use crate::rule::{DEFAULT_OTHER_PRIORITY_CAP, DEFAULT_OVERFLOW_WEIGHT, DEFAULT_PRIORITY_WEIGHT};

/// Any JSON value, sorted into the shapes a numeric or text field cares
/// about.
#[derive(Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
    Other(#[allow(dead_code)] IgnoredAny),
}

impl Loose {
    fn number_or(self, default: f64) -> f64 {
        match self {
            Loose::Number(n) if n.is_finite() => n,
            Loose::Text(s) => s
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite())
                .unwrap_or(default),
            _ => default,
        }
    }
}

fn number_or<'de, D>(deserializer: D, default: f64) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Loose::deserialize(deserializer)?.number_or(default))
}

pub(crate) fn zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    number_or(deserializer, 0.0)
}

pub(crate) fn one<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    number_or(deserializer, 1.0)
}

pub(crate) fn priority_weight<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<f64, D::Error> {
    number_or(deserializer, DEFAULT_PRIORITY_WEIGHT)
}

pub(crate) fn overflow_weight<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<f64, D::Error> {
    number_or(deserializer, DEFAULT_OVERFLOW_WEIGHT)
}

pub(crate) fn other_priority_cap<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<f64, D::Error> {
    number_or(deserializer, DEFAULT_OTHER_PRIORITY_CAP)
}

/// Strings pass through; anything else becomes `""`.
pub(crate) fn string_or_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Loose::deserialize(deserializer)? {
        Loose::Text(s) => s,
        _ => String::new(),
    })
}

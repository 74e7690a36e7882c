//! Per-ring value expansion.
//!
//! A ring parameter is either one value for every ring, an explicit list, or
//! a list of range rules `(first, last, value)` over 1-based ring numbers.

use serde::Deserialize;

use crate::error::ConfigError;

/// A value that may differ per ring.
#[derive(Debug, Clone, PartialEq)]
pub enum PerRing<T> {
    Uniform(T),
    PerRing(Vec<T>),
}

impl<T> PerRing<T> {
    /// Whether this value covers exactly `count` rings.
    #[must_use]
    pub fn matches(&self, count: usize) -> bool {
        match self {
            Self::Uniform(_) => true,
            Self::PerRing(list) => list.len() == count,
        }
    }

    /// Value for ring `index` (0-based).
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            Self::Uniform(v) => Some(v),
            Self::PerRing(list) => list.get(index),
        }
    }

    /// Every distinct stored value; a uniform value is yielded once.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        match self {
            Self::Uniform(v) => std::slice::from_ref(v).iter(),
            Self::PerRing(list) => list.iter(),
        }
    }
}

impl<T> From<T> for PerRing<T> {
    fn from(value: T) -> Self {
        Self::Uniform(value)
    }
}

/// `value` applies to rings `first..=last` (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RingRange {
    pub first: usize,
    pub last: usize,
    pub value: f64,
}

/// Expands range rules into one value per ring.
///
/// Rules must start at ring 1, be contiguous and non-overlapping, have
/// `first <= last`, and end exactly at `count`.
///
/// # Errors
///
/// Returns [`ConfigError::RingRule`] naming `field` on any violation.
pub fn expand_ranges(field: &'static str, rules: &[RingRange], count: usize) -> Result<Vec<f64>, ConfigError> {
    let fail = |reason: String| Err(ConfigError::RingRule { field, reason });

    if rules.is_empty() {
        return fail("no rules given".to_string());
    }
    let mut values = Vec::new();
    let mut expected: usize = 1;
    for rule in rules {
        if rule.first != expected {
            return fail(format!(
                "rule for rings {}-{} must start at ring {expected}",
                rule.first, rule.last
            ));
        }
        if rule.last < rule.first {
            return fail(format!("rule for rings {}-{} is reversed", rule.first, rule.last));
        }
        if !rule.value.is_finite() {
            return fail(format!("rule for rings {}-{} has a non-finite value", rule.first, rule.last));
        }
        if rule.last > count {
            return fail(format!(
                "rule for rings {}-{} exceeds ring count {count}",
                rule.first, rule.last
            ));
        }
        values.extend(std::iter::repeat(rule.value).take(rule.last - rule.first + 1));
        expected = rule.last.saturating_add(1);
    }
    if values.len() != count {
        return fail(format!("rules cover {} rings, expected {count}", values.len()));
    }
    Ok(values)
}

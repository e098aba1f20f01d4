//! Consensus over attributes that should be single-valued per customer.
//!
//! Customer-level columns (age group, gender, state, segment code) are repeated
//! on every transaction row and usually agree. When they do not, we still pick
//! one value, but deterministically: the lexicographically smallest real value.
//! The sentinel (e.g. `UNK`) only counts as a conflicting observation, it never
//! becomes the representative.

use std::collections::BTreeSet;

/// Outcome of resolving one attribute for one customer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Consensus {
    pub accepted: bool,
    /// Representative value; `None` only when nothing usable was observed.
    pub value: Option<String>,
    /// Distinct non-missing values seen, sentinel included.
    pub distinct: usize,
}

impl Consensus {
    /// More than one distinct value was observed.
    pub fn is_conflicting(&self) -> bool {
        self.distinct > 1
    }

    /// `attribute=value` indicator name, if accepted.
    pub fn feature(&self, attribute: &str) -> Option<String> {
        match (&self.value, self.accepted) {
            (Some(v), true) => Some(format!("{attribute}={v}")),
            _ => None,
        }
    }
}

/// Resolve the observed values of one attribute.
///
/// `sentinel` marks a placeholder meaning "unknown"; pass `None` for attributes
/// that have no such placeholder.
pub fn resolve<'a, I>(values: I, sentinel: Option<&str>) -> Consensus
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let distinct: BTreeSet<&str> = values.into_iter().flatten().collect();

    let value = distinct
        .iter()
        .find(|v| Some(**v) != sentinel)
        .map(|v| v.to_string());

    Consensus {
        accepted: value.is_some(),
        value,
        distinct: distinct.len(),
    }
}

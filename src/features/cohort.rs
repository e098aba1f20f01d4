//! Ordinal encoding of cohort (population) tags.
//!
//! Ordinals are 1-based and follow first-seen order over the table, visiting
//! the customer-side tag before the sale-side tag of each row. The inverse map
//! lets the training side relabel predictions with the original tag names.

use crate::ingest::types::Transaction;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CohortEncoding {
    /// Tags in ordinal order; ordinal = index + 1.
    tags: Vec<String>,
    index: HashMap<String, u32>,
}

impl From<Vec<String>> for CohortEncoding {
    fn from(tags: Vec<String>) -> Self {
        Self::from_tags(tags.iter().map(String::as_str))
    }
}

impl From<CohortEncoding> for Vec<String> {
    fn from(enc: CohortEncoding) -> Self {
        enc.tags
    }
}

impl CohortEncoding {
    pub fn from_transactions(rows: &[Transaction]) -> Self {
        Self::from_tags(
            rows.iter()
                .flat_map(|r| [r.cust_pop.as_deref(), r.sale_pop.as_deref()])
                .flatten(),
        )
    }

    pub fn from_tags<'a, I>(tags: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut enc = Self::default();
        for tag in tags {
            if !enc.index.contains_key(tag) {
                enc.tags.push(tag.to_string());
                enc.index.insert(tag.to_string(), enc.tags.len() as u32);
            }
        }
        enc
    }

    pub fn encode(&self, tag: &str) -> Option<u32> {
        self.index.get(tag).copied()
    }

    pub fn decode(&self, ordinal: u32) -> Option<&str> {
        let i = (ordinal as usize).checked_sub(1)?;
        self.tags.get(i).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// `(ordinal, tag)` pairs in ordinal order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        self.tags
            .iter()
            .enumerate()
            .map(|(i, t)| (i as u32 + 1, t.as_str()))
    }

    /// ordinal → tag, for relabelling predictions.
    pub fn inverse(&self) -> BTreeMap<u32, String> {
        self.iter().map(|(o, t)| (o, t.to_string())).collect()
    }
}

// src/quality.rs
//! Explicit accumulator for non-fatal data-quality findings. Each stage
//! returns its own report; the pipeline merges them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityReport {
    /// Rows dropped up front for lacking a segment code.
    pub rows_without_segment: usize,
    /// Rows removed because their (customer, transaction) pair repeated.
    pub duplicate_rows_removed: usize,
    /// attribute → number of customers showing more than one distinct value.
    pub conflicting_attributes: BTreeMap<String, usize>,
    /// Customers aggregated without any segment code.
    pub customers_without_segment: usize,
    /// Customers whose cohort tags span more than one population.
    pub multi_cohort_customers: usize,
    /// Customers with no cohort tag at all.
    pub customers_without_cohort: usize,
    /// Genre codes dropped because they are spelled like a derived feature.
    #[serde(default)]
    pub reserved_codes_skipped: usize,
}

impl QualityReport {
    pub fn record_conflict(&mut self, attribute: &str) {
        *self
            .conflicting_attributes
            .entry(attribute.to_string())
            .or_default() += 1;
    }

    pub fn conflicts_for(&self, attribute: &str) -> usize {
        self.conflicting_attributes
            .get(attribute)
            .copied()
            .unwrap_or(0)
    }

    pub fn merge(&mut self, other: &QualityReport) {
        self.rows_without_segment += other.rows_without_segment;
        self.duplicate_rows_removed += other.duplicate_rows_removed;
        for (attr, n) in &other.conflicting_attributes {
            *self.conflicting_attributes.entry(attr.clone()).or_default() += n;
        }
        self.customers_without_segment += other.customers_without_segment;
        self.multi_cohort_customers += other.multi_cohort_customers;
        self.customers_without_cohort += other.customers_without_cohort;
        self.reserved_codes_skipped += other.reserved_codes_skipped;
    }

    /// Warnings raised during aggregation; the up-front row removals are not
    /// warnings.
    pub fn warnings(&self) -> usize {
        self.conflicting_attributes.values().sum::<usize>()
            + self.multi_cohort_customers
            + self.reserved_codes_skipped
    }
}

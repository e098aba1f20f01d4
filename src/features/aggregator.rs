//! # Per-Customer Feature Aggregator
//! Collapses each customer's transaction rows into one sparse feature record.
//!
//! Every customer is computed from its own partition plus read-only shared
//! inputs (top-K secondary codes, junk list, cohort encoding, flags), so the
//! customers are aggregated on the rayon pool. Results come back in
//! first-seen customer order.

use crate::error::FormatError;
use crate::features::cohort::CohortEncoding;
use crate::features::consensus::{resolve, Consensus};
use crate::features::mosaic::SegmentCode;
use crate::features::{is_reserved_name, CustomerFeatures, FeatureGroup, POPULATION};
use crate::ingest::types::Transaction;
use crate::quality::QualityReport;
use rayon::prelude::*;
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::warn;

/// Default resolver sentinel for "unknown".
pub const DEFAULT_UNKNOWN_TOKEN: &str = "UNK";

/// Output of aggregating a whole table.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub customers: Vec<CustomerFeatures>,
    pub report: QualityReport,
}

#[derive(Debug, Clone)]
pub struct FeatureAggregator {
    top_secondary: HashSet<String>,
    primary_junk: HashSet<String>,
    gender_enabled: bool,
    unknown_token: String,
    cohorts: CohortEncoding,
}

impl FeatureAggregator {
    /// `top_secondary` is the top-K selector's output over the whole table.
    pub fn new(top_secondary: Vec<String>, cohorts: CohortEncoding) -> Self {
        Self {
            top_secondary: top_secondary.into_iter().collect(),
            primary_junk: HashSet::new(),
            gender_enabled: true,
            unknown_token: DEFAULT_UNKNOWN_TOKEN.to_string(),
            cohorts,
        }
    }

    pub fn with_primary_junk(mut self, junk: Vec<String>) -> Self {
        self.primary_junk = junk.into_iter().collect();
        self
    }

    pub fn with_gender(mut self, enabled: bool) -> Self {
        self.gender_enabled = enabled;
        self
    }

    pub fn with_unknown_token(mut self, token: impl Into<String>) -> Self {
        self.unknown_token = token.into();
        self
    }

    pub fn cohorts(&self) -> &CohortEncoding {
        &self.cohorts
    }

    /// Aggregate every customer in `rows`. Rows are expected to be
    /// duplicate-free already. A malformed segment code aborts the run.
    pub fn aggregate_all(&self, rows: &[Transaction]) -> Result<Aggregation, FormatError> {
        let partitions = partition_by_customer(rows);

        let per_customer = partitions
            .par_iter()
            .map(|(id, own)| self.aggregate_customer(id, own))
            .collect::<Result<Vec<_>, FormatError>>()?;

        let mut out = Aggregation {
            customers: Vec::with_capacity(per_customer.len()),
            report: QualityReport::default(),
        };
        for (features, report) in per_customer {
            out.report.merge(&report);
            out.customers.push(features);
        }
        Ok(out)
    }

    /// Derive one customer's features from that customer's rows only.
    pub fn aggregate_customer(
        &self,
        customer_id: &str,
        rows: &[&Transaction],
    ) -> Result<(CustomerFeatures, QualityReport), FormatError> {
        let mut feats = CustomerFeatures::new(customer_id);
        let mut report = QualityReport::default();

        // every distinct code must decode, not just the representative
        let codes: BTreeSet<&str> = rows.iter().filter_map(|r| r.mosaic_type.as_deref()).collect();
        for raw in &codes {
            SegmentCode::parse(raw)?;
        }

        // segment letter + income + education
        let segment = resolve(codes.iter().copied().map(Some), None);
        note_conflict(customer_id, "MosaicType", &segment, &mut report);
        match segment.value.as_deref() {
            Some(raw) => {
                let code = SegmentCode::parse(raw)?;
                feats.flag(FeatureGroup::SegmentLetter, code.letter_feature());
                feats.flag(FeatureGroup::IncomeTier, code.income().feature_name());
                feats.flag(FeatureGroup::EducationTier, code.education().feature_name());
            }
            None => report.customers_without_segment += 1,
        }

        // primary codes, minus junk
        let primary: BTreeSet<&str> = rows
            .iter()
            .filter_map(|r| r.mtype_primary.as_deref())
            .filter(|c| !self.primary_junk.contains(*c))
            .collect();
        for code in primary {
            flag_code(customer_id, FeatureGroup::PrimaryCode, code, &mut feats, &mut report);
        }

        // secondary codes, only the globally popular ones
        let secondary: BTreeSet<&str> = rows
            .iter()
            .filter_map(|r| r.mtype_secondary.as_deref())
            .filter(|c| self.top_secondary.contains(*c))
            .collect();
        for code in secondary {
            flag_code(customer_id, FeatureGroup::SecondaryCode, code, &mut feats, &mut report);
        }

        let unknown = Some(self.unknown_token.as_str());

        let age = resolve(rows.iter().map(|r| r.age_group.as_deref()), unknown);
        note_conflict(customer_id, "ageGroup", &age, &mut report);
        if let Some(name) = age.feature("age_group") {
            feats.flag(FeatureGroup::AgeGroup, name);
        }

        if self.gender_enabled {
            let gender = resolve(rows.iter().map(|r| r.gender.as_deref()), unknown);
            note_conflict(customer_id, "Gender", &gender, &mut report);
            if let Some(name) = gender.feature("gender") {
                feats.flag(FeatureGroup::Gender, name);
            }
        }

        let state = resolve(rows.iter().map(|r| r.customer_state.as_deref()), unknown);
        note_conflict(customer_id, "CustomerState", &state, &mut report);
        if let Some(name) = state.feature("cust_state") {
            feats.flag(FeatureGroup::CustomerState, name);
        }

        // population label: customer-side and sale-side tags together
        let tags: BTreeSet<&str> = rows
            .iter()
            .flat_map(|r| [r.cust_pop.as_deref(), r.sale_pop.as_deref()])
            .flatten()
            .collect();
        match tags.len() {
            0 => report.customers_without_cohort += 1,
            1 => {
                if let Some(ordinal) = tags.iter().next().and_then(|t| self.cohorts.encode(t)) {
                    feats.set(FeatureGroup::Population, POPULATION, ordinal);
                }
            }
            n => {
                warn!(
                    target: "features",
                    customer = customer_id,
                    cohorts = n,
                    "customer spans several populations; no label"
                );
                report.multi_cohort_customers += 1;
            }
        }

        Ok((feats, report))
    }
}

fn flag_code(
    customer: &str,
    group: FeatureGroup,
    code: &str,
    feats: &mut CustomerFeatures,
    report: &mut QualityReport,
) {
    if is_reserved_name(code) {
        warn!(
            target: "features",
            customer,
            code,
            ?group,
            "raw code collides with a derived feature name; skipped"
        );
        report.reserved_codes_skipped += 1;
        return;
    }
    feats.flag(group, code);
}

fn note_conflict(customer: &str, attribute: &str, c: &Consensus, report: &mut QualityReport) {
    if c.is_conflicting() {
        warn!(
            target: "features",
            customer,
            attribute,
            distinct = c.distinct,
            chosen = c.value.as_deref().unwrap_or("-"),
            "conflicting values for a single-valued attribute"
        );
        report.record_conflict(attribute);
    }
}

/// Group rows by customer, customers in first-seen order, rows in table order.
pub fn partition_by_customer(rows: &[Transaction]) -> Vec<(&str, Vec<&Transaction>)> {
    let mut slot: HashMap<&str, usize> = HashMap::new();
    let mut parts: Vec<(&str, Vec<&Transaction>)> = Vec::new();
    for r in rows {
        let id = r.customer_id.as_str();
        match slot.get(id) {
            Some(&i) => parts[i].1.push(r),
            None => {
                slot.insert(id, parts.len());
                parts.push((id, vec![r]));
            }
        }
    }
    parts
}

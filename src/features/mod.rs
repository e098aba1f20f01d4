// src/features/mod.rs
//! Feature derivation: segment decoding, consensus, top-K selection, cohort
//! encoding and the per-customer aggregator that ties them together.

pub mod aggregator;
pub mod cohort;
pub mod consensus;
pub mod mosaic;
pub mod top_k;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub use crate::features::aggregator::{partition_by_customer, Aggregation, FeatureAggregator};
pub use crate::features::cohort::CohortEncoding;
pub use crate::features::consensus::{resolve, Consensus};
pub use crate::features::mosaic::{EducationTier, IncomeTier, SegmentCode};
pub use crate::features::top_k::select_top_k;

/// Name of the label feature.
pub const POPULATION: &str = "Population";

/// Names the aggregator derives itself. A raw genre code spelled like one of
/// these would overwrite it, so such codes are not turned into features.
pub fn is_reserved_name(name: &str) -> bool {
    name == POPULATION
        || name.starts_with("mos_letter_")
        || name.contains('=')
        || [IncomeTier::High, IncomeTier::Average, IncomeTier::Low]
            .iter()
            .any(|t| t.feature_name() == name)
        || [EducationTier::Good, EducationTier::Average, EducationTier::Poor]
            .iter()
            .any(|t| t.feature_name() == name)
}

/// Which family a feature belongs to. Drives the profile's fill policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureGroup {
    SegmentLetter,
    IncomeTier,
    EducationTier,
    PrimaryCode,
    SecondaryCode,
    AgeGroup,
    Gender,
    CustomerState,
    Population,
}

impl FeatureGroup {
    /// Absence means "zero / not applicable", never "unknown".
    pub fn is_zero_fillable(&self) -> bool {
        !matches!(self, FeatureGroup::Gender | FeatureGroup::Population)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureValue {
    pub group: FeatureGroup,
    pub value: u32,
}

/// Sparse feature record for one customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    pub customer_id: String,
    features: BTreeMap<String, FeatureValue>,
}

impl CustomerFeatures {
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            features: BTreeMap::new(),
        }
    }

    pub(crate) fn set(&mut self, group: FeatureGroup, name: impl Into<String>, value: u32) {
        self.features
            .insert(name.into(), FeatureValue { group, value });
    }

    pub(crate) fn flag(&mut self, group: FeatureGroup, name: impl Into<String>) {
        self.set(group, name, 1);
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.features.get(name).map(|f| f.value)
    }

    pub fn group_of(&self, name: &str) -> Option<FeatureGroup> {
        self.features.get(name).map(|f| f.group)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.features.contains_key(name)
    }

    /// Ordinal population label, when the customer has exactly one cohort.
    pub fn population(&self) -> Option<u32> {
        self.get(POPULATION)
    }

    /// Features of one group, by name.
    pub fn names_in(&self, group: FeatureGroup) -> impl Iterator<Item = &str> + '_ {
        self.features
            .iter()
            .filter(move |(_, f)| f.group == group)
            .map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FeatureValue)> + '_ {
        self.features.iter().map(|(n, f)| (n.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

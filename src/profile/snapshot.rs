// src/profile/snapshot.rs
//! On-disk form of a profiling run. JSON; only this pipeline reads it back.

use crate::features::CohortEncoding;
use crate::profile::ProfileTable;
use crate::quality::QualityReport;
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSnapshot {
    pub created_at: DateTime<Utc>,
    pub profile: ProfileTable,
    /// Tags in ordinal order (ordinal = position + 1).
    pub cohorts: CohortEncoding,
    /// ordinal → tag, for relabelling predictions.
    pub cohort_labels: BTreeMap<u32, String>,
    pub quality: QualityReport,
}

impl ProfileSnapshot {
    pub fn new(profile: ProfileTable, cohorts: CohortEncoding, quality: QualityReport) -> Self {
        let cohort_labels = cohorts.inverse();
        Self {
            created_at: Utc::now(),
            profile,
            cohorts,
            cohort_labels,
            quality,
        }
    }

    pub fn write_to(&self, path: &Path) -> Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)
                .with_context(|| format!("creating snapshot directory {}", dir.display()))?;
        }
        let json = serde_json::to_vec_pretty(self).context("serializing profile snapshot")?;
        fs::write(path, json)
            .with_context(|| format!("writing profile snapshot to {}", path.display()))?;
        Ok(())
    }

    pub fn read_from(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)
            .with_context(|| format!("reading profile snapshot from {}", path.display()))?;
        let snap: Self = serde_json::from_slice(&bytes)
            .with_context(|| format!("parsing profile snapshot {}", path.display()))?;
        Ok(snap)
    }
}

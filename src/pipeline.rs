//! # Profiling Pipeline
//! raw rows → segment filter → duplicate-key removal → global passes (top-K
//! secondary codes, cohort encoding) → per-customer aggregation → profile.
//!
//! The global passes finish before any customer is aggregated. The first
//! malformed segment code aborts the run.

use crate::config::Settings;
use crate::error::Result;
use crate::features::{select_top_k, CohortEncoding, FeatureAggregator};
use crate::ingest::{self, types::TransactionSource, types::Transaction};
use crate::profile::snapshot::ProfileSnapshot;
use crate::profile::ProfileTable;
use crate::quality::QualityReport;
use crate::telemetry;
use metrics::counter;
use tracing::info;

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct ProfileRun {
    pub profile: ProfileTable,
    pub cohorts: CohortEncoding,
    /// Secondary codes promoted to features, most frequent first.
    pub top_secondary: Vec<String>,
    pub report: QualityReport,
}

impl ProfileRun {
    pub fn into_snapshot(self) -> ProfileSnapshot {
        ProfileSnapshot::new(self.profile, self.cohorts, self.report)
    }
}

/// Load from `source`, then [`build_profile`].
pub fn run(source: &dyn TransactionSource, settings: &Settings) -> Result<ProfileRun> {
    let raw = source.load()?;
    info!(source = source.name(), rows = raw.len(), "transactions loaded");
    build_profile(raw, settings)
}

pub fn build_profile(raw: Vec<Transaction>, settings: &Settings) -> Result<ProfileRun> {
    let (rows, without_segment, duplicates) =
        ingest::prepare_rows(raw, settings.keep_customers_without_segment);
    debug_assert!(ingest::keys_are_unique(&rows));

    let top_secondary = select_top_k(
        rows.iter().map(|r| r.mtype_secondary.as_deref()),
        &settings.secondary_junk,
        settings.top_secondary,
    );
    let cohorts = CohortEncoding::from_transactions(&rows);
    info!(
        top_secondary = ?top_secondary,
        cohorts = cohorts.len(),
        "global passes done"
    );

    let aggregator = FeatureAggregator::new(top_secondary.clone(), cohorts.clone())
        .with_primary_junk(settings.primary_junk.clone())
        .with_gender(settings.gender_features)
        .with_unknown_token(settings.unknown_token.clone());
    let aggregation = aggregator.aggregate_all(&rows)?;

    let profile = ProfileTable::assemble(&aggregation.customers);

    let mut report = aggregation.report;
    report.rows_without_segment = without_segment;
    report.duplicate_rows_removed = duplicates;

    let labelled = profile.labelled_rows().count();
    counter!(telemetry::CUSTOMERS).increment(profile.n_rows() as u64);
    counter!(telemetry::LABELLED_CUSTOMERS).increment(labelled as u64);
    counter!(telemetry::QUALITY_WARNINGS).increment(report.warnings() as u64);

    info!(
        customers = profile.n_rows(),
        features = profile.n_columns(),
        labelled,
        warnings = report.warnings(),
        "created customer profile"
    );

    Ok(ProfileRun {
        profile,
        cohorts,
        top_secondary,
        report,
    })
}

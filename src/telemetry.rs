// src/telemetry.rs
//! Counter names and their one-time descriptions. Recording goes through the
//! `metrics` facade; with no recorder installed the calls are no-ops.

use metrics::describe_counter;
use once_cell::sync::OnceCell;

pub const ROWS_LOADED: &str = "profiler_rows_loaded_total";
pub const ROWS_WITHOUT_SEGMENT: &str = "profiler_rows_without_segment_total";
pub const DUPLICATE_ROWS_REMOVED: &str = "profiler_duplicate_rows_removed_total";
pub const CUSTOMERS: &str = "profiler_customers_total";
pub const QUALITY_WARNINGS: &str = "profiler_quality_warnings_total";
pub const LABELLED_CUSTOMERS: &str = "profiler_labelled_customers_total";

/// One-time metrics registration.
pub fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!(ROWS_LOADED, "Transaction rows handed to the profiler.");
        describe_counter!(
            ROWS_WITHOUT_SEGMENT,
            "Rows dropped because they carry no segment code."
        );
        describe_counter!(
            DUPLICATE_ROWS_REMOVED,
            "Rows removed because their (customer, transaction) pair repeats."
        );
        describe_counter!(CUSTOMERS, "Customers aggregated into the profile.");
        describe_counter!(
            QUALITY_WARNINGS,
            "Non-fatal data-quality warnings raised during aggregation."
        );
        describe_counter!(
            LABELLED_CUSTOMERS,
            "Customers whose cohort tags resolve to a single population."
        );
    });
}

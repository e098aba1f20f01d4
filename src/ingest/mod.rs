// src/ingest/mod.rs
pub mod csv_source;
pub mod types;

use crate::ingest::types::Transaction;
use crate::telemetry;
use metrics::counter;
use std::collections::HashMap;

/// Drop rows without a segment code. Mirrors restricting the extract to
/// customers with a known segment; used when
/// `HANDLE_CUSTOMERS_WITH_NO_MOSAIC_GROUP = 0`.
pub fn drop_rows_without_segment(rows: Vec<Transaction>) -> (Vec<Transaction>, usize) {
    let before = rows.len();
    let kept: Vec<Transaction> = rows
        .into_iter()
        .filter(|r| r.mosaic_type.is_some())
        .collect();
    let dropped = before - kept.len();
    (kept, dropped)
}

/// Remove every row whose (customer, transaction) pair occurs more than once.
///
/// A repeated pair means the sale was attributed to several overlapping
/// cohorts; keeping any copy would bias that customer's features, so all
/// copies go. Returns the surviving rows (original order) and how many rows
/// were removed.
pub fn remove_duplicate_keys(rows: Vec<Transaction>) -> (Vec<Transaction>, usize) {
    let mut counts: HashMap<(&str, &str), usize> = HashMap::with_capacity(rows.len());
    for r in &rows {
        *counts.entry(r.key()).or_default() += 1;
    }
    let unique: Vec<bool> = rows.iter().map(|r| counts[&r.key()] == 1).collect();
    drop(counts);

    let before = rows.len();
    let kept: Vec<Transaction> = rows
        .into_iter()
        .zip(unique)
        .filter_map(|(r, keep)| keep.then_some(r))
        .collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// True when no (customer, transaction) pair repeats.
pub fn keys_are_unique(rows: &[Transaction]) -> bool {
    let mut seen = std::collections::HashSet::with_capacity(rows.len());
    rows.iter().all(|r| seen.insert(r.key()))
}

/// Global pre-aggregation pass: optional segment filter, then duplicate-key
/// removal. Returns (kept, dropped_without_segment, removed_duplicates).
pub fn prepare_rows(
    raw: Vec<Transaction>,
    keep_missing_segment: bool,
) -> (Vec<Transaction>, usize, usize) {
    telemetry::ensure_metrics_described();
    counter!(telemetry::ROWS_LOADED).increment(raw.len() as u64);

    let (rows, no_segment) = if keep_missing_segment {
        (raw, 0)
    } else {
        drop_rows_without_segment(raw)
    };
    let (kept, dup) = remove_duplicate_keys(rows);

    counter!(telemetry::ROWS_WITHOUT_SEGMENT).increment(no_segment as u64);
    counter!(telemetry::DUPLICATE_ROWS_REMOVED).increment(dup as u64);

    tracing::info!(
        target: "ingest",
        kept = kept.len(),
        without_segment = no_segment,
        duplicates_removed = dup,
        "prepared transaction rows"
    );

    (kept, no_segment, dup)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(c: &str, t: &str) -> Transaction {
        Transaction {
            customer_id: c.into(),
            trans_id: t.into(),
            ..Default::default()
        }
    }

    #[test]
    fn duplicated_pairs_are_removed_entirely() {
        let rows = vec![tx("C1", "T1"), tx("C1", "T1"), tx("C1", "T2")];
        let (kept, removed) = remove_duplicate_keys(rows);
        assert_eq!(removed, 2);
        assert_eq!(kept, vec![tx("C1", "T2")]);
        assert!(keys_are_unique(&kept));
    }

    #[test]
    fn same_transaction_for_other_customer_is_not_a_duplicate() {
        let rows = vec![tx("C1", "T1"), tx("C2", "T1")];
        let (kept, removed) = remove_duplicate_keys(rows);
        assert_eq!(removed, 0);
        assert_eq!(kept.len(), 2);
    }

    #[test]
    fn segment_filter_only_when_requested() {
        let mut with = tx("C1", "T1");
        with.mosaic_type = Some("A01".into());
        let rows = vec![with.clone(), tx("C2", "T2")];

        let (kept, no_seg, _) = prepare_rows(rows.clone(), true);
        assert_eq!((kept.len(), no_seg), (2, 0));

        let (kept, no_seg, _) = prepare_rows(rows, false);
        assert_eq!(kept, vec![with]);
        assert_eq!(no_seg, 1);
    }
}

// tests/metrics_pipeline.rs
use customer_profiler::ingest::csv_source::read_transactions;
use customer_profiler::{build_profile, telemetry, Settings};
use metrics_util::debugging::{DebugValue, DebuggingRecorder};
use std::collections::HashMap;

#[test]
fn counters_recorded_for_a_run() {
    let table = "\
CustomerID,transID,MosaicType,ageGroup,CustPop,SalePop
C1,T1,A01,18-24,PopA,PopA
C1,T1,A01,18-24,PopA,PopB
C2,T2,B07,25-34,PopA,PopB
C3,T3,C11,35-44,PopB,PopB
C3,T4,C11,45-54,PopB,PopB
";
    let raw = read_transactions(table.as_bytes(), None).unwrap();

    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    metrics::with_local_recorder(&recorder, || {
        build_profile(raw, &Settings::default()).unwrap();
    });

    let counters: HashMap<String, u64> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .filter_map(|(key, _, _, value)| match value {
            DebugValue::Counter(n) => Some((key.key().name().to_string(), n)),
            _ => None,
        })
        .collect();

    assert_eq!(counters.get(telemetry::ROWS_LOADED), Some(&5));
    assert_eq!(counters.get(telemetry::DUPLICATE_ROWS_REMOVED), Some(&2));
    assert_eq!(counters.get(telemetry::CUSTOMERS), Some(&2));
    assert_eq!(counters.get(telemetry::LABELLED_CUSTOMERS), Some(&1));
    // C2 spans two populations, C3 has two age groups
    assert_eq!(counters.get(telemetry::QUALITY_WARNINGS), Some(&2));
}

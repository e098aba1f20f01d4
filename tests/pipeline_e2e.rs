// tests/pipeline_e2e.rs
use customer_profiler::features::POPULATION;
use customer_profiler::ingest::csv_source::read_transactions;
use customer_profiler::{build_profile, FeatureGroup, Settings};

// C1: clean, one population. C2: duplicated T3 (both copies go), mixed age
// values, two populations. C3: no segment code, unknown age. C4: every row
// shares a duplicated key, so the customer disappears.
const TABLE: &str = "\
CustomerID,Gender,ageGroup,MosaicType,CustomerState,CustPop,SalePop,transID,VenueState,MTypePrimary,MTypeSecondary
C1,F,25-34,B07,NSW,PopA,PopA,T1,NSW,MUSIC,ROCK
C1,F,25-34,B07,NSW,PopA,PopA,T2,VIC,MUSIC,POP
C2,M,18-24,H30,VIC,PopA,PopB,T3,VIC,SPORT,CRICKET
C2,M,18-24,H30,VIC,PopB,PopB,T3,VIC,SPORT,CRICKET
C2,M,UNK,H30,VIC,PopB,PopB,T4,VIC,ARTS,ROCK
C2,M,18-24,H30,VIC,PopB,PopB,T5,VIC,MISC,---
C3,,UNK,,QLD,PopA,PopA,T6,QLD,MUSIC,ROCK
C4,F,65+,A01,SA,PopC,PopC,T7,SA,MUSIC,ROCK
C4,F,65+,A01,SA,PopC,PopC,T7,SA,MUSIC,ROCK
";

fn settings() -> Settings {
    Settings {
        primary_junk: vec!["MISC".into()],
        secondary_junk: vec!["POP".into()],
        top_secondary: 1,
        ..Settings::default()
    }
}

#[test]
fn end_to_end_profile() {
    let raw = read_transactions(TABLE.as_bytes(), None).unwrap();
    let run = build_profile(raw, &settings()).unwrap();
    let p = &run.profile;

    // C4 vanished with its duplicated rows
    let ids: Vec<&str> = p.rows().iter().map(|r| r.customer_id.as_str()).collect();
    assert_eq!(ids, ["C1", "C2", "C3"]);
    assert_eq!(run.report.duplicate_rows_removed, 4);

    // only the single most frequent non-junk secondary code is a feature
    assert_eq!(run.top_secondary, ["ROCK"]);
    assert!(p.column_index("CRICKET").is_none());
    assert!(p.column_index("POP").is_none());
    assert_eq!(p.value("C2", "ROCK"), Some(1));

    // segment features
    assert_eq!(p.value("C1", "mos_letter_B"), Some(1));
    assert_eq!(p.value("C1", "high_income"), Some(1));
    assert_eq!(p.value("C2", "average_income"), Some(1));
    assert_eq!(p.value("C2", "good_education"), Some(1));
    assert_eq!(p.value("C2", "mos_letter_B"), Some(0));
    // C3 had no segment code: zero-filled, never absent
    assert_eq!(p.value("C3", "mos_letter_B"), Some(0));
    assert_eq!(p.value("C3", "high_income"), Some(0));

    // primary junk dropped
    assert!(p.column_index("MISC").is_none());
    assert_eq!(p.value("C2", "ARTS"), Some(1));
    assert_eq!(p.value("C1", "ARTS"), Some(0));

    // age: real value beats UNK; UNK alone gives nothing
    assert_eq!(p.value("C2", "age_group=18-24"), Some(1));
    assert_eq!(p.value("C3", "age_group=18-24"), Some(0));
    assert_eq!(run.report.conflicts_for("ageGroup"), 1);

    // gender is not zero-filled
    assert_eq!(p.value("C1", "gender=F"), Some(1));
    assert_eq!(p.value("C2", "gender=F"), None);

    // population labels: C2 is PopB only after T3 removal
    let a = run.cohorts.encode("PopA").unwrap();
    let b = run.cohorts.encode("PopB").unwrap();
    assert_eq!(p.value("C1", POPULATION), Some(a));
    assert_eq!(p.value("C2", POPULATION), Some(b));
    assert_eq!(p.value("C3", POPULATION), Some(a));
    assert_eq!(run.cohorts.decode(b), Some("PopB"));
    assert!(run.cohorts.encode("PopC").is_none());
}

#[test]
fn multi_population_customer_has_no_label_cell() {
    let table = "\
CustomerID,transID,MosaicType,CustPop,SalePop,MTypePrimary
C1,T1,A01,PopA,PopB,MUSIC
C2,T2,A01,PopA,PopA,MUSIC
";
    let raw = read_transactions(table.as_bytes(), None).unwrap();
    let run = build_profile(raw, &Settings::default()).unwrap();

    assert_eq!(run.profile.value("C1", POPULATION), None);
    assert_eq!(run.profile.value("C2", POPULATION), Some(1));
    assert_eq!(run.report.multi_cohort_customers, 1);
    assert_eq!(run.profile.labelled_rows().count(), 1);
    let col = run.profile.column_index(POPULATION).unwrap();
    assert_eq!(run.profile.columns()[col].group, FeatureGroup::Population);
}

#[test]
fn malformed_segment_aborts_the_run() {
    let table = "\
CustomerID,transID,MosaicType
C1,T1,A01
C2,T2,A55
";
    let raw = read_transactions(table.as_bytes(), None).unwrap();
    let err = build_profile(raw, &Settings::default()).unwrap_err();
    assert!(err.to_string().contains("A55"));
}

#[test]
fn malformed_segment_on_a_secondary_row_aborts_too() {
    let table = "\
CustomerID,transID,MosaicType
C1,T1,B07
C1,T2,Z99
";
    let raw = read_transactions(table.as_bytes(), None).unwrap();
    let err = build_profile(raw, &Settings::default()).unwrap_err();
    assert!(err.to_string().contains("Z99"));
}

#[test]
fn segmentless_rows_can_be_dropped_up_front() {
    let settings = Settings {
        keep_customers_without_segment: false,
        ..Settings::default()
    };
    let raw = read_transactions(TABLE.as_bytes(), None).unwrap();
    let run = build_profile(raw, &settings).unwrap();
    assert!(run.profile.row("C3").is_none());
    assert_eq!(run.report.rows_without_segment, 1);
}

#[test]
fn ordinals_are_stable_within_a_run_and_across_identical_runs() {
    let first = build_profile(read_transactions(TABLE.as_bytes(), None).unwrap(), &settings()).unwrap();
    let second = build_profile(read_transactions(TABLE.as_bytes(), None).unwrap(), &settings()).unwrap();
    assert_eq!(first.cohorts, second.cohorts);
    assert_eq!(first.profile, second.profile);
}

//! Tests for the per-resource summary index

mod common;

use proptest::prelude::*;

use common::{foreign_report, kubewarden_report, namespace_scope, pod_scope};
use policy_reports_core::application::SummaryIndexBuilder;
use policy_reports_core::domain::reports::{
    ReportBody, ReportRecord, ReportScope, ReportType, ResultCounts,
};

#[test]
fn test_counts_combine_resource_and_cluster_reports() {
    let resource = vec![
        kubewarden_report(ReportType::Report, "r1", pod_scope("ns1", "p"), &["pass", "fail"]),
        kubewarden_report(ReportType::PolicyReport, "r2", pod_scope("ns1", "p"), &["pass"]),
    ];
    let cluster = vec![kubewarden_report(
        ReportType::ClusterReport,
        "c1",
        namespace_scope("ns1"),
        &["warn", "skip", "error"],
    )];

    let index = SummaryIndexBuilder::build(&resource, &cluster);

    assert_eq!(
        index.get("ns1/p").copied(),
        Some(ResultCounts {
            pass: 2,
            fail: 1,
            ..ResultCounts::default()
        })
    );
    assert_eq!(
        index.get("ns1").copied(),
        Some(ResultCounts {
            warn: 1,
            error: 1,
            skip: 1,
            ..ResultCounts::default()
        })
    );
    assert_eq!(index.totals().total(), 6);
}

#[test]
fn test_foreign_reports_are_ignored() {
    let resource = vec![
        foreign_report(ReportType::Report, "k1", pod_scope("ns1", "p"), &["fail"]),
        kubewarden_report(ReportType::Report, "r1", pod_scope("ns1", "q"), &["pass"]),
    ];

    let index = SummaryIndexBuilder::build(&resource, &Vec::<ReportRecord>::new());

    assert!(index.get("ns1/p").is_none());
    assert_eq!(index.get("ns1/q").map(|counts| counts.pass), Some(1));
}

#[test]
fn test_unrecognized_outcome_and_missing_scope_are_skipped() {
    let mut unscoped = ReportBody::new(ReportType::Report, "unscoped");
    unscoped.managed_by = Some("kubewarden".to_string());
    let resource = vec![
        kubewarden_report(ReportType::Report, "r1", pod_scope("ns1", "p"), &["pass", "unknown"]),
        ReportRecord::from_body(unscoped),
        kubewarden_report(ReportType::Report, "r3", ReportScope::default(), &["fail"]),
    ];

    let index = SummaryIndexBuilder::build(&resource, &Vec::<ReportRecord>::new());

    assert_eq!(index.len(), 1);
    assert_eq!(index.get("ns1/p").map(ResultCounts::total), Some(1));
}

fn arb_record() -> impl Strategy<Value = ReportRecord> {
    let outcomes = prop::collection::vec(
        prop::sample::select(vec!["pass", "fail", "warn", "error", "skip", "bogus"]),
        0..6,
    );
    (0usize..4, 0usize..4, any::<bool>(), outcomes).prop_map(|(ns, name, owned, outcomes)| {
        let scope = pod_scope(&format!("ns{}", ns), &format!("pod{}", name));
        let identity = format!("{}-{}-{}", ns, name, owned);
        if owned {
            kubewarden_report(ReportType::Report, &identity, scope, &outcomes)
        } else {
            foreign_report(ReportType::Report, &identity, scope, &outcomes)
        }
    })
}

proptest! {
    #[test]
    fn test_rebuild_is_idempotent(records in prop::collection::vec(arb_record(), 0..40)) {
        let first = SummaryIndexBuilder::build(&records, &Vec::<ReportRecord>::new());
        let second = SummaryIndexBuilder::build(&records, &Vec::<ReportRecord>::new());
        prop_assert_eq!(first, second);
    }

    #[test]
    fn test_only_kubewarden_results_are_counted(
        records in prop::collection::vec(arb_record(), 0..40)
    ) {
        let owned: Vec<ReportRecord> = records
            .iter()
            .filter(|record| record.is_managed_by_kubewarden())
            .cloned()
            .collect();

        let from_all = SummaryIndexBuilder::build(&records, &Vec::<ReportRecord>::new());
        let from_owned = SummaryIndexBuilder::build(&owned, &Vec::<ReportRecord>::new());
        prop_assert_eq!(&from_all, &from_owned);

        let recognized: u64 = owned
            .iter()
            .flat_map(|record| record.results())
            .filter(|result| result.kind().is_some())
            .count() as u64;
        prop_assert_eq!(from_all.totals().total(), recognized);
    }
}

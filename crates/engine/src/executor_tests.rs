use super::*;
use crate::{
    Field, MemoryPartition, PartitionLayout, Predicate, Snapshot,
    fixtures::{FailingPartition, dated_documents, scenario_documents},
};

const OPTIONS: ExecOptions = ExecOptions {
    fetch_cap: 1000,
    workers: 4,
};

fn memory(name: &str, docs: Vec<Document>) -> Arc<dyn Partition> {
    Arc::new(MemoryPartition::new(name, docs))
}

fn ids(docs: &[Document]) -> Vec<&str> {
    docs.iter().map(|d| d.document_id.as_str()).collect()
}

#[test]
fn match_all_returns_everything_newest_first() {
    let snap = Snapshot::from_documents(scenario_documents(), PartitionLayout::ByYear);
    let exec = execute(snap.partitions(), &FilterNode::match_all(), OPTIONS, &CancelToken::new())
        .expect("execute");

    assert_eq!(exec.total_count, 3);
    assert_eq!(ids(&exec.documents), vec!["2056-34", "1947-44", "1895-18"]);
    assert_eq!(
        exec.partitions_scanned,
        vec!["gazettes_2015", "gazettes_2016", "gazettes_2018"]
    );
    assert!(exec.failed_partitions.is_empty());
}

#[test]
fn filter_applies_in_every_partition() {
    let snap = Snapshot::from_documents(scenario_documents(), PartitionLayout::ByYear);
    let filter = Predicate::eq(Field::Availability, "Available").into();
    let exec = execute(snap.partitions(), &filter, OPTIONS, &CancelToken::new()).expect("execute");

    assert_eq!(exec.total_count, 2);
    assert!(exec.documents.iter().all(Document::is_available));
}

#[test]
fn fetch_cap_truncates_but_count_is_exact() {
    let parts = vec![
        memory("gazettes_2020", dated_documents("a", 2020, 30)),
        memory("gazettes_2021", dated_documents("b", 2021, 5)),
    ];
    let options = ExecOptions {
        fetch_cap: 10,
        workers: 2,
    };
    let exec = execute(&parts, &FilterNode::match_all(), options, &CancelToken::new()).expect("execute");

    assert_eq!(exec.total_count, 35);
    assert_eq!(exec.documents.len(), 15);
    assert!(exec.documents[..5].iter().all(|d| d.document_id.starts_with("b-")));
}

#[test]
fn failing_partition_contributes_nothing() {
    let failing = FailingPartition::new("gazettes_broken");
    let parts = vec![
        memory("gazettes_all", scenario_documents()),
        Arc::clone(&failing) as Arc<dyn Partition>,
    ];
    let exec = execute(&parts, &FilterNode::match_all(), OPTIONS, &CancelToken::new()).expect("execute");

    assert_eq!(exec.total_count, 3);
    assert_eq!(exec.documents.len(), 3);
    assert_eq!(exec.failed_partitions, vec!["gazettes_broken"]);
    // once for counting, once for fetching
    assert_eq!(failing.calls.load(std::sync::atomic::Ordering::SeqCst), 2);
}

#[test]
fn no_partitions_is_empty() {
    let exec = execute(&[], &FilterNode::match_all(), OPTIONS, &CancelToken::new()).expect("execute");
    assert_eq!(exec.total_count, 0);
    assert!(exec.documents.is_empty());
    assert!(exec.partitions_scanned.is_empty());
}

#[test]
fn cancelled_token_discards_results() {
    let snap = Snapshot::from_documents(scenario_documents(), PartitionLayout::ByYear);
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = execute(snap.partitions(), &FilterNode::match_all(), OPTIONS, &cancel)
        .expect_err("cancelled");
    assert!(err.is_cancelled());
}

#[test]
fn long_scan_observes_cancellation() {
    let part = MemoryPartition::new("big", dated_documents("x", 2019, 3000));
    let cancel = CancelToken::new();
    cancel.cancel();

    let err = count_matches(&part, &FilterNode::match_all(), &cancel).expect_err("cancelled");
    assert!(err.is_cancelled());
    let err = fetch_matches(&part, &FilterNode::match_all(), 5000, &cancel).expect_err("cancelled");
    assert!(err.is_cancelled());
}

#[test]
fn fetch_respects_cap_and_order() {
    let part = MemoryPartition::new("p", dated_documents("x", 2019, 20));
    let docs = fetch_matches(&part, &FilterNode::match_all(), 3, &CancelToken::new()).expect("fetch");
    assert_eq!(ids(&docs), vec!["x-0000", "x-0001", "x-0002"]);

    let none = fetch_matches(&part, &FilterNode::match_all(), 0, &CancelToken::new()).expect("fetch");
    assert!(none.is_empty());
}

#[test]
fn sort_ties_break_on_id_then_undated_last() {
    let mut docs = vec![
        Document::new("c"),
        Document::new("b").with_date("2020-01-01"),
        Document::new("a").with_date("2020-01-01"),
        Document::new("d").with_date("2021-06-30"),
    ];
    sort_documents(&mut docs);
    assert_eq!(ids(&docs), vec!["d", "a", "b", "c"]);
}

#[test]
fn gather_keeps_partition_order() {
    let parts: Vec<Arc<dyn Partition>> = (0..12)
        .map(|i| memory(&format!("p{i:02}"), dated_documents("x", 2000 + i, i as usize)))
        .collect();

    for workers in [1, 3, 16] {
        let gathered = gather(&parts, workers, &CancelToken::new(), |p| {
            count_matches(p, &FilterNode::match_all(), &CancelToken::new())
        })
        .expect("gather");

        let counts: Vec<usize> = gathered.values.iter().map(|(_, n)| *n).collect();
        assert_eq!(counts, (0..12).collect::<Vec<_>>(), "workers {workers}");
        assert_eq!(gathered.values[5].0, "p05");
    }
}

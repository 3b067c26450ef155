use super::*;
use crate::fixtures::{FailingPartition, scenario_documents};

fn names(parts: &[Arc<dyn Partition>]) -> Vec<String> {
    parts.iter().map(|p| p.name().to_owned()).collect()
}

#[test]
fn by_year_layout_buckets_by_date_prefix() {
    let mut docs = scenario_documents();
    docs.push(Document::new("undated"));
    docs.push(Document::new("odd").with_date("circa 1900"));

    let parts = partition_documents(docs, PartitionLayout::ByYear);
    let summary: Vec<(&str, usize)> = parts.iter().map(|p| (p.name(), p.len())).collect();
    assert_eq!(
        summary,
        vec![
            ("gazettes_2015", 1),
            ("gazettes_2016", 1),
            ("gazettes_2018", 1),
            ("gazettes_unknown", 2),
        ]
    );
}

#[test]
fn single_layout_always_has_one_partition() {
    let parts = partition_documents(scenario_documents(), PartitionLayout::Single);
    assert_eq!(parts.len(), 1);
    assert_eq!(parts[0].name(), "global_metadata");
    assert_eq!(parts[0].len(), 3);

    let empty = partition_documents(Vec::new(), PartitionLayout::Single);
    assert_eq!(empty.len(), 1);
    assert!(empty[0].is_empty());

    assert!(partition_documents(Vec::new(), PartitionLayout::ByYear).is_empty());
}

#[test]
fn memory_partition_scan_stops_when_visitor_declines() {
    let part = MemoryPartition::new("p", scenario_documents());
    let mut seen = Vec::new();
    part.scan(&mut |doc| {
        seen.push(doc.document_id.clone());
        seen.len() < 2
    })
    .expect("memory scan never fails");
    assert_eq!(seen, vec!["1895-18", "1947-44"]);
}

#[test]
fn resolve_without_hints_returns_everything() {
    let snap = Snapshot::from_documents(scenario_documents(), PartitionLayout::ByYear);
    assert_eq!(
        names(&snap.resolve(&[])),
        vec!["gazettes_2015", "gazettes_2016", "gazettes_2018"]
    );
}

#[test]
fn resolve_keeps_existing_hints_in_order() {
    let snap = Snapshot::from_documents(scenario_documents(), PartitionLayout::ByYear);
    let hints = vec![
        "gazettes_2018".to_owned(),
        "gazettes_1999".to_owned(),
        "gazettes_2015".to_owned(),
        "gazettes_2018".to_owned(),
    ];
    assert_eq!(names(&snap.resolve(&hints)), vec!["gazettes_2018", "gazettes_2015"]);

    assert!(snap.resolve(&["gazettes_1999".to_owned()]).is_empty());
}

#[test]
fn single_layout_ignores_hints() {
    let snap = Snapshot::from_documents(scenario_documents(), PartitionLayout::Single);
    let resolved = snap.resolve(&["gazettes_1999".to_owned()]);
    assert_eq!(names(&resolved), vec!["global_metadata"]);
}

#[test]
fn snapshot_lookup_by_name() {
    let failing: Arc<dyn Partition> = FailingPartition::new("gazettes_2020");
    let memory: Arc<dyn Partition> = Arc::new(MemoryPartition::new("gazettes_2021", Vec::new()));
    let snap = Snapshot::new(PartitionLayout::ByYear, vec![failing, memory]);

    assert_eq!(snap.len(), 2);
    assert!(snap.get("gazettes_2021").is_some());
    assert!(snap.get("gazettes_2022").is_none());
    assert!(snap.loaded_at().is_some());
    assert!(Snapshot::empty(PartitionLayout::ByYear).loaded_at().is_none());
}

#[test]
fn layout_from_flag() {
    assert_eq!(PartitionLayout::from_flag(true), PartitionLayout::ByYear);
    assert_eq!(PartitionLayout::from_flag(false), PartitionLayout::Single);
}

//! Shared test data.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use crate::{Document, EngineError, Partition, Result};

/// Three gazettes across 2015, 2016 and 2018; the 2018 one is unavailable.
pub(crate) fn scenario_documents() -> Vec<Document> {
    vec![
        Document::new("1895-18")
            .with_description("Test Doc 1")
            .with_date("2015-01-01")
            .with_type("ORGANISATIONAL")
            .with_availability("Available"),
        Document::new("1947-44")
            .with_description("Test Doc 2")
            .with_date("2016-01-01")
            .with_type("LEGAL_REGULATORY")
            .with_availability("Available"),
        Document::new("2056-34")
            .with_description("Test Doc 3")
            .with_date("2018-02-01")
            .with_type("UNAVAILABLE")
            .with_availability("Unavailable"),
    ]
}

/// `count` documents dated one day apart in `year`, ids `<prefix>-<n>`.
pub(crate) fn dated_documents(prefix: &str, year: i32, count: usize) -> Vec<Document> {
    (0..count)
        .map(|i| {
            let month = i / 28 % 12 + 1;
            let day = i % 28 + 1;
            Document::new(format!("{prefix}-{i:04}"))
                .with_description(format!("Generated notice {i}"))
                .with_date(format!("{year}-{month:02}-{day:02}"))
                .with_type("NOTICE")
                .with_availability("Available")
        })
        .collect()
}

/// Partition whose scans always fail.
pub(crate) struct FailingPartition {
    name: String,
    pub(crate) calls: AtomicUsize,
}

impl FailingPartition {
    pub(crate) fn new(name: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            calls: AtomicUsize::new(0),
        })
    }
}

impl Partition for FailingPartition {
    fn name(&self) -> &str {
        &self.name
    }

    fn scan(&self, _visit: &mut dyn FnMut(&Document) -> bool) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(EngineError::partition(&self.name, "backing store unavailable"))
    }
}

use std::{
    collections::{BTreeMap, HashMap},
    sync::Arc,
};

use chrono::{DateTime, Utc};
use gazette_runtime::{PARTITION_PREFIX, SINGLE_PARTITION_NAME};

use crate::{Document, Result, dsl::year_partition};

/// Suffix for documents whose date carries no usable year.
const UNKNOWN_YEAR: &str = "unknown";

/// A named, read-only subset of the corpus.
///
/// `scan` visits documents in storage order until `visit` returns `false`.
/// Implementations may fail (I/O, decoding); callers treat a failure as
/// affecting this partition only.
pub trait Partition: Send + Sync {
    fn name(&self) -> &str;

    fn scan(&self, visit: &mut dyn FnMut(&Document) -> bool) -> Result<()>;
}

/// Partition held fully in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPartition {
    name: String,
    documents: Vec<Document>,
}

impl MemoryPartition {
    pub fn new(name: impl Into<String>, documents: Vec<Document>) -> Self {
        Self {
            name: name.into(),
            documents,
        }
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl Partition for MemoryPartition {
    fn name(&self) -> &str {
        &self.name
    }

    fn scan(&self, visit: &mut dyn FnMut(&Document) -> bool) -> Result<()> {
        for doc in &self.documents {
            if !visit(doc) {
                break;
            }
        }
        Ok(())
    }
}

/// How documents are grouped into partitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PartitionLayout {
    /// One partition holding everything; date hints are ignored.
    Single,
    /// `gazettes_<YYYY>` per document year.
    #[default]
    ByYear,
}

impl PartitionLayout {
    pub fn from_flag(partition_by_year: bool) -> Self {
        if partition_by_year {
            PartitionLayout::ByYear
        } else {
            PartitionLayout::Single
        }
    }

    pub fn partition_for(self, doc: &Document) -> String {
        match self {
            PartitionLayout::Single => SINGLE_PARTITION_NAME.to_owned(),
            PartitionLayout::ByYear => match doc.year() {
                Some(year) => year_partition(year),
                None => format!("{PARTITION_PREFIX}{UNKNOWN_YEAR}"),
            },
        }
    }
}

/// Group documents into partitions ordered by name.
///
/// `Single` always yields exactly one partition, even when empty.
pub fn partition_documents(documents: Vec<Document>, layout: PartitionLayout) -> Vec<MemoryPartition> {
    if layout == PartitionLayout::Single {
        return vec![MemoryPartition::new(SINGLE_PARTITION_NAME, documents)];
    }

    let mut buckets: BTreeMap<String, Vec<Document>> = BTreeMap::new();
    for doc in documents {
        buckets.entry(layout.partition_for(&doc)).or_default().push(doc);
    }

    buckets
        .into_iter()
        .map(|(name, docs)| MemoryPartition::new(name, docs))
        .collect()
}

/// Immutable registry of partitions, resolved once per request.
pub struct Snapshot {
    layout: PartitionLayout,
    partitions: Vec<Arc<dyn Partition>>,
    by_name: HashMap<String, usize>,
    loaded_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    /// Snapshot that has never been loaded from a source.
    pub fn empty(layout: PartitionLayout) -> Self {
        Self {
            layout,
            partitions: Vec::new(),
            by_name: HashMap::new(),
            loaded_at: None,
        }
    }

    pub fn new(layout: PartitionLayout, partitions: Vec<Arc<dyn Partition>>) -> Self {
        let by_name = partitions
            .iter()
            .enumerate()
            .map(|(i, p)| (p.name().to_owned(), i))
            .collect();

        Self {
            layout,
            partitions,
            by_name,
            loaded_at: Some(Utc::now()),
        }
    }

    pub fn from_documents(documents: Vec<Document>, layout: PartitionLayout) -> Self {
        let partitions = partition_documents(documents, layout)
            .into_iter()
            .map(|p| Arc::new(p) as Arc<dyn Partition>)
            .collect();
        Self::new(layout, partitions)
    }

    pub fn layout(&self) -> PartitionLayout {
        self.layout
    }

    pub fn partitions(&self) -> &[Arc<dyn Partition>] {
        &self.partitions
    }

    pub fn partition_names(&self) -> Vec<String> {
        self.partitions.iter().map(|p| p.name().to_owned()).collect()
    }

    pub fn get(&self, name: &str) -> Option<&Arc<dyn Partition>> {
        self.by_name.get(name).map(|&i| &self.partitions[i])
    }

    pub fn len(&self) -> usize {
        self.partitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partitions.is_empty()
    }

    /// `None` until the snapshot has been built from source data.
    pub fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Partitions a request should scan.
    ///
    /// Without hints, or with a single-partition layout, that is every
    /// partition. Otherwise it is the hinted partitions that exist, in hint
    /// order; names that do not exist are dropped.
    pub fn resolve(&self, hints: &[String]) -> Vec<Arc<dyn Partition>> {
        if hints.is_empty() || self.layout == PartitionLayout::Single {
            return self.partitions.clone();
        }

        let mut seen = Vec::with_capacity(hints.len());
        let mut out = Vec::with_capacity(hints.len());
        for hint in hints {
            let Some(&i) = self.by_name.get(hint) else {
                log::debug!("hinted partition {hint} does not exist");
                continue;
            };
            if !seen.contains(&i) {
                seen.push(i);
                out.push(Arc::clone(&self.partitions[i]));
            }
        }
        out
    }
}

impl std::fmt::Debug for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Snapshot")
            .field("layout", &self.layout)
            .field("partitions", &self.partition_names())
            .field("loaded_at", &self.loaded_at)
            .finish()
    }
}

#[cfg(test)]
#[path = "partition_tests.rs"]
mod tests;

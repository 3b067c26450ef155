use std::sync::{Arc, PoisonError, RwLock};

use log::{error, info, warn};

use crate::{Document, EngineError, PartitionLayout, Result, Snapshot};

/// Bulk provider of the full document set.
pub trait DocumentSource: Send + Sync {
    /// Short human description for logs, e.g. a path.
    fn describe(&self) -> String;

    fn fetch(&self) -> Result<Vec<Document>>;
}

impl<S: DocumentSource + ?Sized> DocumentSource for Box<S> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch(&self) -> Result<Vec<Document>> {
        (**self).fetch()
    }
}

/// What a refresh did to the served snapshot.
#[derive(Debug)]
pub enum RefreshOutcome {
    Replaced { documents: usize, partitions: usize },
    /// The source failed; the previous snapshot is still served.
    KeptPrevious { error: EngineError },
    /// The source failed and there was never a snapshot; serving empty.
    NoSnapshot { error: EngineError },
}

impl RefreshOutcome {
    pub fn is_replaced(&self) -> bool {
        matches!(self, RefreshOutcome::Replaced { .. })
    }
}

/// Holder of the snapshot currently being served.
///
/// Readers take an `Arc` to the current snapshot and keep it for the whole
/// request; a refresh swaps in a new one without touching the old.
pub struct SnapshotStore {
    layout: PartitionLayout,
    current: RwLock<Arc<Snapshot>>,
}

impl SnapshotStore {
    pub fn new(layout: PartitionLayout) -> Self {
        Self {
            layout,
            current: RwLock::new(Arc::new(Snapshot::empty(layout))),
        }
    }

    pub fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn replace(&self, snapshot: Snapshot) {
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(snapshot);
    }

    /// Rebuild from `source`. On failure the served snapshot is left as is.
    pub fn refresh(&self, source: &dyn DocumentSource) -> RefreshOutcome {
        match source.fetch() {
            Ok(documents) => {
                let count = documents.len();
                let snapshot = Snapshot::from_documents(documents, self.layout);
                let partitions = snapshot.len();
                self.replace(snapshot);
                info!(
                    "loaded {count} documents into {partitions} partitions from {}",
                    source.describe()
                );
                RefreshOutcome::Replaced {
                    documents: count,
                    partitions,
                }
            }
            Err(err) if self.current().loaded_at().is_some() => {
                warn!(
                    "refresh from {} failed, keeping previous snapshot: {err}",
                    source.describe()
                );
                RefreshOutcome::KeptPrevious { error: err }
            }
            Err(err) => {
                error!("refresh from {} failed with no snapshot loaded: {err}", source.describe());
                RefreshOutcome::NoSnapshot { error: err }
            }
        }
    }
}

#[cfg(test)]
#[path = "store_tests.rs"]
mod tests;

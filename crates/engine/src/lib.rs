mod cache;
mod cancel;
mod document;
mod dsl;
mod engine;
mod error;
mod eval;
mod executor;
mod pagination;
mod partition;
mod pipeline;
mod query_runner;
mod stats;
mod store;

#[cfg(test)]
mod fixtures;

pub use cache::TtlCache;
pub use cancel::{CANCEL_CHECK_INTERVAL, CancelToken};
pub use document::{AVAILABLE, Document, Field};
pub use dsl::*;
pub use engine::{Engine, EngineConfig};
pub use error::{EngineError, Result};
pub use eval::*;
pub use executor::{ExecOptions, Execution, count_matches, execute, fetch_matches, sort_documents};
pub use pagination::{PageError, Pagination, page_range};
pub use partition::{MemoryPartition, Partition, PartitionLayout, Snapshot, partition_documents};
pub use pipeline::*;
pub use query_runner::{QueryInfo, SearchResult};
pub use stats::{
    DashboardStats, FilterOptions, YearRange, collect_dashboard, collect_filter_options, format_document_type,
};
pub use store::{DocumentSource, RefreshOutcome, SnapshotStore};

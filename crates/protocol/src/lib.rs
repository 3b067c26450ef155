pub mod codec;

use gazette_engine::{
    DashboardStats, FilterOptions, PageError, Pagination, PipelineMetrics, RefreshOutcome, SearchResult,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    pub page: usize,
    pub limit: usize,
    /// Ask for per-stage timings in the response.
    pub timed: bool,
}

impl SearchRequest {
    pub fn new(query: impl Into<String>, page: usize, limit: usize) -> Self {
        Self {
            query: query.into(),
            page,
            limit,
            timed: false,
        }
    }

    pub fn validate(&self) -> Result<(), PageError> {
        Pagination::validate(self.page, self.limit)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QueryMetrics {
    /// Total end-to-end time in milliseconds
    pub total_ms: f64,
    pub parse_ms: f64,
    /// Time spent counting and fetching across partitions.
    pub exec_ms: f64,
    pub paginate_ms: f64,
}

impl From<&PipelineMetrics> for QueryMetrics {
    fn from(m: &PipelineMetrics) -> Self {
        let ms = |d: Option<std::time::Duration>| d.unwrap_or_default().as_secs_f64() * 1000.0;
        Self {
            total_ms: m.total().as_secs_f64() * 1000.0,
            parse_ms: ms(m.parse_time),
            exec_ms: ms(m.exec_time),
            paginate_ms: ms(m.paginate_time),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub result: SearchResult,
    pub metrics: Option<QueryMetrics>,
}

/// Outcome of a refresh, as reported to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RefreshReport {
    Replaced { documents: usize, partitions: usize },
    KeptPrevious(String),
    NoSnapshot(String),
}

impl From<&RefreshOutcome> for RefreshReport {
    fn from(outcome: &RefreshOutcome) -> Self {
        match outcome {
            RefreshOutcome::Replaced { documents, partitions } => RefreshReport::Replaced {
                documents: *documents,
                partitions: *partitions,
            },
            RefreshOutcome::KeptPrevious { error } => RefreshReport::KeptPrevious(error.to_string()),
            RefreshOutcome::NoSnapshot { error } => RefreshReport::NoSnapshot(error.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReport {
    pub metadata_path: Option<String>,
    pub metadata_url: Option<String>,
    pub socket_path: String,
    pub partitions: Vec<String>,
    /// RFC 3339 time of the last successful load.
    pub loaded_at: Option<String>,
    pub cache_ttl_secs: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum DaemonRequest {
    Search(SearchRequest),
    Dashboard,
    FilterOptions(String),
    Refresh,
    Ping,
    Status,
}

#[derive(Debug, Serialize, Deserialize)]
pub enum DaemonResponse {
    SearchResult(Box<SearchResponse>),
    Dashboard(DashboardStats),
    FilterOptions(FilterOptions),
    Refreshed(RefreshReport),
    Pong,
    Status(StatusReport),
    Error(String),
}

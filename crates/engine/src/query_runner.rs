use serde::{Deserialize, Serialize};

use crate::{
    CancelToken, Document, Engine, PagedState, Pagination, PipelineMetrics, QueryPipeline, Result, Timer,
};

/// What the engine made of a query.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct QueryInfo {
    pub raw_query: String,
    pub partitions_scanned: Vec<String>,
    /// Number of structured `key:value` filters recognised.
    pub filters_applied: usize,
    pub has_free_text: bool,
    /// Partitions excluded after a scan failure.
    pub failed_partitions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SearchResult {
    /// The requested page, newest first.
    pub documents: Vec<Document>,
    pub pagination: Pagination,
    pub query_info: QueryInfo,
}

impl SearchResult {
    pub fn empty(raw_query: &str, page: usize, limit: usize) -> Self {
        Self {
            documents: Vec::new(),
            pagination: Pagination::empty(page, limit),
            query_info: QueryInfo {
                raw_query: raw_query.to_owned(),
                ..QueryInfo::default()
            },
        }
    }
}

impl Engine {
    /// Search the current snapshot. `page` and `limit` must be at least 1.
    pub fn search(&self, query: &str, page: usize, limit: usize) -> SearchResult {
        match self.run(query, page, limit, &CancelToken::new(), false) {
            Ok((result, _)) => result,
            // a private token is never cancelled
            Err(_) => SearchResult::empty(query, page, limit),
        }
    }

    /// Like [`Engine::search`], abandoning the fan-out once `cancel` fires.
    /// Cancellation is the only error.
    pub fn search_with_cancel(
        &self,
        query: &str,
        page: usize,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<SearchResult> {
        self.run(query, page, limit, cancel, false).map(|(result, _)| result)
    }

    /// Search and report per-stage timings.
    pub fn search_timed(
        &self,
        query: &str,
        page: usize,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<(SearchResult, Option<PipelineMetrics>)> {
        self.run(query, page, limit, cancel, true)
    }

    fn run(
        &self,
        query: &str,
        page: usize,
        limit: usize,
        cancel: &CancelToken,
        timed: bool,
    ) -> Result<(SearchResult, Option<PipelineMetrics>)> {
        if query.is_empty() {
            return Ok((SearchResult::empty(query, page, limit), None));
        }

        let snapshot = self.snapshot();
        let options = self.config().exec_options();

        if timed {
            let pipeline = QueryPipeline::new_timed(&snapshot, options)
                .with_cancel(cancel)
                .parse(query)
                .execute()?
                .paginate(page, limit);
            let metrics = pipeline.metrics().copied();
            Ok((into_result(query, pipeline), metrics))
        } else {
            let pipeline = QueryPipeline::new(&snapshot, options)
                .with_cancel(cancel)
                .parse(query)
                .execute()?
                .paginate(page, limit);
            Ok((into_result(query, pipeline), None))
        }
    }
}

fn into_result<T: Timer>(raw_query: &str, pipeline: QueryPipeline<'_, PagedState, T>) -> SearchResult {
    let parsed = pipeline.query();
    let execution = pipeline.execution();
    let query_info = QueryInfo {
        raw_query: raw_query.to_owned(),
        partitions_scanned: execution.partitions_scanned.clone(),
        filters_applied: parsed.filters.len(),
        has_free_text: parsed.has_free_text(),
        failed_partitions: execution.failed_partitions.clone(),
    };

    let (documents, pagination) = pipeline.into_page();
    SearchResult {
        documents,
        pagination,
        query_info,
    }
}

#[cfg(test)]
#[path = "query_runner_tests.rs"]
mod tests;

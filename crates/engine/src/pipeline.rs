use std::time::{Duration, Instant};

use crate::{
    CancelToken, Document, ExecOptions, Execution, FilterNode, Pagination, ParsedQuery, Result, Snapshot,
    build_query_filter, execute, page_range, parse_query,
};

/// Shared, state-independent pipeline context.
struct PipelineCtx<'a> {
    /// Snapshot the whole request runs against.
    snapshot: &'a Snapshot,
    options: ExecOptions,
    cancel: CancelToken,
    /// Original query string, if we parsed from text.
    query_str: Option<String>,
}

/// Initial state - pipeline created but no query parsed yet.
pub struct InitialState;

/// Query has been parsed and its filter built, ready for execution.
pub struct ParsedState {
    query: ParsedQuery,
    filter: FilterNode,
}

/// Query executed across partitions, ready for pagination.
pub struct ExecutedState {
    query: ParsedQuery,
    execution: Execution,
}

/// One page cut out of the sorted matches.
pub struct PagedState {
    query: ParsedQuery,
    execution: Execution,
    documents: Vec<Document>,
    pagination: Pagination,
}

/// Stages for which we record timings.
#[derive(Copy, Clone, Debug)]
pub enum Stage {
    Parse,
    Exec,
    Paginate,
}

/// Timing metrics collected during pipeline execution.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PipelineMetrics {
    /// Time spent parsing the query and building its filter.
    pub parse_time: Option<Duration>,
    /// Time spent counting, fetching and sorting across partitions.
    pub exec_time: Option<Duration>,
    /// Time spent slicing out the requested page.
    pub paginate_time: Option<Duration>,
}

impl PipelineMetrics {
    /// Total time across all measured stages.
    pub fn total(&self) -> Duration {
        self.parse_time.unwrap_or_default()
            + self.exec_time.unwrap_or_default()
            + self.paginate_time.unwrap_or_default()
    }
}

/// Strategy trait for timing behavior.
///
/// Implementations decide whether to measure stages and how to store metrics.
pub trait Timer {
    /// Run `f`, optionally measuring and recording the duration for `stage`.
    fn measure<F, R>(&mut self, stage: Stage, f: F) -> R
    where
        F: FnOnce() -> R;

    /// Return metrics if timing is enabled.
    fn metrics(&self) -> Option<&PipelineMetrics> {
        None
    }
}

/// Timer implementation that does nothing
#[derive(Debug, Default)]
pub struct NoopTimer;

impl Timer for NoopTimer {
    #[inline]
    fn measure<F, R>(&mut self, _stage: Stage, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        f()
    }
}

/// Timer implementation that collects `PipelineMetrics`.
#[derive(Debug, Default)]
pub struct MetricsTimer {
    metrics: PipelineMetrics,
}

impl Timer for MetricsTimer {
    fn measure<F, R>(&mut self, stage: Stage, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        match stage {
            Stage::Parse => self.metrics.parse_time = Some(elapsed),
            Stage::Exec => self.metrics.exec_time = Some(elapsed),
            Stage::Paginate => self.metrics.paginate_time = Some(elapsed),
        }

        result
    }

    fn metrics(&self) -> Option<&PipelineMetrics> {
        Some(&self.metrics)
    }
}

/// A type-safe search pipeline: parse, execute, paginate.
///
/// The typestate `S` enforces the order of operations at compile time.
/// Timing behavior is controlled by the `Timer` strategy `T`:
///
/// - `T = NoopTimer`    => untimed pipeline
/// - `T = MetricsTimer` => timed pipeline
pub struct QueryPipeline<'a, S, T: Timer = NoopTimer> {
    ctx: PipelineCtx<'a>,
    state: S,
    timer: T,
}

impl<'a> QueryPipeline<'a, InitialState, NoopTimer> {
    /// Create a new pipeline bound to a snapshot (untimed).
    pub fn new(snapshot: &'a Snapshot, options: ExecOptions) -> Self {
        Self::with_timer(snapshot, options, NoopTimer)
    }
}

impl<'a> QueryPipeline<'a, InitialState, MetricsTimer> {
    /// Create a new timed pipeline bound to a snapshot.
    pub fn new_timed(snapshot: &'a Snapshot, options: ExecOptions) -> Self {
        Self::with_timer(snapshot, options, MetricsTimer::default())
    }
}

impl<'a, T: Timer> QueryPipeline<'a, InitialState, T> {
    fn with_timer(snapshot: &'a Snapshot, options: ExecOptions, timer: T) -> Self {
        Self {
            ctx: PipelineCtx {
                snapshot,
                options,
                cancel: CancelToken::new(),
                query_str: None,
            },
            state: InitialState,
            timer,
        }
    }

    /// Parse a query string and build its filter tree.
    pub fn parse(self, query_str: &str) -> QueryPipeline<'a, ParsedState, T> {
        let QueryPipeline {
            mut ctx,
            state: InitialState,
            mut timer,
        } = self;

        let state = timer.measure(Stage::Parse, || {
            let query = parse_query(query_str);
            let filter = build_query_filter(&query);
            ParsedState { query, filter }
        });
        ctx.query_str = Some(query_str.to_owned());

        QueryPipeline { ctx, state, timer }
    }

    /// Use a pre-parsed query.
    pub fn with_query(self, query: ParsedQuery) -> QueryPipeline<'a, ParsedState, T> {
        let QueryPipeline {
            ctx,
            state: InitialState,
            timer,
        } = self;

        let filter = build_query_filter(&query);
        QueryPipeline {
            ctx,
            state: ParsedState { query, filter },
            timer,
        }
    }
}

impl<'a, S, T: Timer> QueryPipeline<'a, S, T> {
    /// Observe `cancel` during execution instead of a private token.
    pub fn with_cancel(mut self, cancel: &CancelToken) -> Self {
        self.ctx.cancel = cancel.clone();
        self
    }

    /// Access timing metrics, if enabled.
    pub fn metrics(&self) -> Option<&PipelineMetrics> {
        self.timer.metrics()
    }

    /// Get the original query string if this pipeline was created via `parse`.
    pub fn query_str(&self) -> Option<&str> {
        self.ctx.query_str.as_deref()
    }
}

impl<'a, T: Timer> QueryPipeline<'a, ParsedState, T> {
    /// Count and fetch across the partitions the query resolves to.
    ///
    /// Fails only when cancelled; partition failures are recorded in the
    /// execution instead.
    pub fn execute(self) -> Result<QueryPipeline<'a, ExecutedState, T>> {
        let QueryPipeline {
            ctx,
            state: ParsedState { query, filter },
            mut timer,
        } = self;

        let partitions = ctx.snapshot.resolve(&query.date_hints);
        let execution = timer.measure(Stage::Exec, || {
            execute(&partitions, &filter, ctx.options, &ctx.cancel)
        })?;

        Ok(QueryPipeline {
            ctx,
            state: ExecutedState { query, execution },
            timer,
        })
    }

    pub fn query(&self) -> &ParsedQuery {
        &self.state.query
    }

    pub fn filter(&self) -> &FilterNode {
        &self.state.filter
    }
}

impl<'a, T: Timer> QueryPipeline<'a, ExecutedState, T> {
    /// Cut page `page` of `limit` documents out of the sorted matches.
    pub fn paginate(self, page: usize, limit: usize) -> QueryPipeline<'a, PagedState, T> {
        let QueryPipeline {
            ctx,
            state: ExecutedState { query, mut execution },
            mut timer,
        } = self;

        let (documents, pagination) = timer.measure(Stage::Paginate, || {
            let range = page_range(execution.documents.len(), page, limit);
            let documents: Vec<Document> = execution.documents.drain(range).collect();
            let pagination = Pagination::compute(execution.total_count, page, limit, documents.len());
            (documents, pagination)
        });

        QueryPipeline {
            ctx,
            state: PagedState {
                query,
                execution,
                documents,
                pagination,
            },
            timer,
        }
    }

    /// Total matches from the count phase.
    pub fn count(&self) -> usize {
        self.state.execution.total_count
    }

    pub fn execution(&self) -> &Execution {
        &self.state.execution
    }
}

impl<'a, T: Timer> QueryPipeline<'a, PagedState, T> {
    pub fn documents(&self) -> &[Document] {
        &self.state.documents
    }

    pub fn pagination(&self) -> &Pagination {
        &self.state.pagination
    }

    pub fn query(&self) -> &ParsedQuery {
        &self.state.query
    }

    /// Execution details. Its `documents` no longer hold the returned page.
    pub fn execution(&self) -> &Execution {
        &self.state.execution
    }

    /// Consume the pipeline, returning the page and its metadata.
    pub fn into_page(self) -> (Vec<Document>, Pagination) {
        (self.state.documents, self.state.pagination)
    }
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;

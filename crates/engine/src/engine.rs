use std::{sync::Arc, time::Duration};

use gazette_runtime::{DEFAULT_CACHE_TTL, DEFAULT_FETCH_CAP, Settings};
use log::{debug, warn};

use crate::{
    CancelToken, DashboardStats, DocumentSource, EngineError, ExecOptions, FilterOptions, PartitionLayout, RefreshOutcome,
    Result, Snapshot, SnapshotStore, TtlCache, collect_dashboard, collect_filter_options,
};

const DASHBOARD_KEY: &str = "dashboard_data";
const FILTER_OPTIONS_PREFIX: &str = "filter_options:";

/// Tunables for one engine instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub cache_ttl: Duration,
    pub fetch_cap: usize,
    pub workers: usize,
    pub layout: PartitionLayout,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_ttl: DEFAULT_CACHE_TTL,
            fetch_cap: DEFAULT_FETCH_CAP,
            workers: 4,
            layout: PartitionLayout::ByYear,
        }
    }
}

impl From<&Settings> for EngineConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            cache_ttl: settings.cache_ttl,
            fetch_cap: settings.fetch_cap,
            workers: settings.workers,
            layout: PartitionLayout::from_flag(settings.partition_by_year),
        }
    }
}

impl EngineConfig {
    pub fn exec_options(&self) -> ExecOptions {
        ExecOptions {
            fetch_cap: self.fetch_cap,
            workers: self.workers,
        }
    }
}

/// Cached aggregate values.
#[derive(Debug, Clone)]
pub(crate) enum Aggregate {
    Dashboard(DashboardStats),
    FilterOptions(FilterOptions),
}

/// Query engine over a replaceable document snapshot.
///
/// Owns the snapshot store and the aggregate cache; share it behind an
/// `Arc` between request handlers.
pub struct Engine {
    config: EngineConfig,
    store: SnapshotStore,
    cache: TtlCache<Aggregate>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            store: SnapshotStore::new(config.layout),
            cache: TtlCache::new(config.cache_ttl),
            config,
        }
    }

    /// Engine serving `snapshot` right away, without a source.
    pub fn with_snapshot(config: EngineConfig, snapshot: Snapshot) -> Self {
        let engine = Self::new(config);
        engine.store.replace(snapshot);
        engine
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.store.current()
    }

    /// Reload documents from `source`. A successful reload drops every
    /// cached aggregate; a failed one leaves both snapshot and cache alone.
    pub fn refresh(&self, source: &dyn DocumentSource) -> RefreshOutcome {
        let outcome = self.store.refresh(source);
        if outcome.is_replaced() {
            self.invalidate_cache();
        }
        outcome
    }

    pub fn invalidate_cache(&self) {
        self.cache.clear(None);
    }

    /// Corpus-wide totals, served from cache while fresh.
    pub fn dashboard_stats(&self) -> Result<DashboardStats> {
        self.dashboard_stats_with_cancel(&CancelToken::new())
    }

    pub fn dashboard_stats_with_cancel(&self, cancel: &CancelToken) -> Result<DashboardStats> {
        if let Some(Aggregate::Dashboard(stats)) = self.cache.get(DASHBOARD_KEY) {
            return Ok(stats);
        }

        debug!("dashboard cache miss, scanning partitions");
        let snapshot = self.store.current();
        let stats = collect_dashboard(snapshot.partitions(), self.config.workers, cancel)?;
        // Partial totals are served but recomputed on the next request.
        if stats.failed_partitions.is_empty() {
            self.cache_for(&snapshot, DASHBOARD_KEY, Aggregate::Dashboard(stats.clone()));
        }
        Ok(stats)
    }

    pub fn filter_options(&self, partition: &str) -> Result<FilterOptions> {
        self.filter_options_with_cancel(partition, &CancelToken::new())
    }

    /// Distinct month, day and type values of one partition. An unknown
    /// partition, or one whose scan fails, yields empty options.
    pub fn filter_options_with_cancel(&self, partition: &str, cancel: &CancelToken) -> Result<FilterOptions> {
        let key = format!("{FILTER_OPTIONS_PREFIX}{partition}");
        if let Some(Aggregate::FilterOptions(options)) = self.cache.get(&key) {
            return Ok(options);
        }

        let snapshot = self.store.current();
        let Some(part) = snapshot.get(partition) else {
            debug!("filter options requested for unknown partition {partition}");
            return Ok(FilterOptions::default());
        };

        match collect_filter_options(part.as_ref(), cancel) {
            Ok(options) => {
                self.cache_for(&snapshot, &key, Aggregate::FilterOptions(options.clone()));
                Ok(options)
            }
            Err(EngineError::Cancelled) => Err(EngineError::Cancelled),
            Err(err) => {
                warn!("filter options for {partition} unavailable: {err}");
                Ok(FilterOptions::default())
            }
        }
    }

    /// Cache `value` computed from `snapshot`. If a refresh swapped the
    /// snapshot meanwhile the entry is dropped again; a refresh clears the
    /// cache after the swap, so no ordering leaves a stale entry behind.
    fn cache_for(&self, snapshot: &Arc<Snapshot>, key: &str, value: Aggregate) {
        self.cache.set(key, value);
        if !Arc::ptr_eq(snapshot, &self.store.current()) {
            debug!("snapshot replaced while computing {key}, not caching");
            self.cache.clear(Some(key));
        }
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;

use gazette_engine::EngineError;
use gazette_protocol::{
    DaemonRequest, DaemonResponse, QueryMetrics, RefreshReport, SearchRequest, SearchResponse, StatusReport,
};

use crate::state::DaemonState;

/// Answer one request. Failures become `DaemonResponse::Error`.
pub fn handle_request(state: &DaemonState, request: DaemonRequest) -> DaemonResponse {
    match request {
        DaemonRequest::Ping => DaemonResponse::Pong,
        DaemonRequest::Status => DaemonResponse::Status(status(state)),
        DaemonRequest::Search(req) => search(state, &req),
        DaemonRequest::Dashboard => match state.engine.dashboard_stats_with_cancel(&state.cancel_token()) {
            Ok(stats) => DaemonResponse::Dashboard(stats),
            Err(e) => error_response("Dashboard", &e),
        },
        DaemonRequest::FilterOptions(partition) => match state
            .engine
            .filter_options_with_cancel(&partition, &state.cancel_token())
        {
            Ok(options) => DaemonResponse::FilterOptions(options),
            Err(e) => error_response("Filter options", &e),
        },
        DaemonRequest::Refresh => DaemonResponse::Refreshed(RefreshReport::from(&state.refresh())),
    }
}

fn search(state: &DaemonState, req: &SearchRequest) -> DaemonResponse {
    if let Err(e) = req.validate() {
        return DaemonResponse::Error(format!("Invalid search request: {e}"));
    }

    let cancel = state.cancel_token();
    let outcome = if req.timed {
        state
            .engine
            .search_timed(&req.query, req.page, req.limit, &cancel)
            .map(|(result, metrics)| (result, metrics.as_ref().map(QueryMetrics::from)))
    } else {
        state
            .engine
            .search_with_cancel(&req.query, req.page, req.limit, &cancel)
            .map(|result| (result, None))
    };

    match outcome {
        Ok((result, metrics)) => DaemonResponse::SearchResult(Box::new(SearchResponse { result, metrics })),
        Err(e) => error_response("Search", &e),
    }
}

fn status(state: &DaemonState) -> StatusReport {
    let snapshot = state.engine.snapshot();
    StatusReport {
        metadata_path: state
            .config
            .settings
            .metadata_path
            .as_ref()
            .map(|p| p.display().to_string()),
        metadata_url: state.config.settings.metadata_url.clone(),
        socket_path: state.config.socket_path.display().to_string(),
        partitions: snapshot.partition_names(),
        loaded_at: snapshot.loaded_at().map(|t| t.to_rfc3339()),
        cache_ttl_secs: state.engine.config().cache_ttl.as_secs(),
    }
}

fn error_response(what: &str, err: &EngineError) -> DaemonResponse {
    DaemonResponse::Error(format!("{what} failed: {err}"))
}

#[cfg(test)]
#[path = "handler_tests.rs"]
mod tests;

mod cache;
mod http;
mod json;

use std::path::Path;

use gazette_engine::DocumentSource;
use gazette_runtime::{Settings, default_snapshot_path};
use log::{debug, error, warn};

pub use cache::{CachedSource, StaticSource, read_snapshot, write_snapshot_atomic};
pub use http::{DEFAULT_HTTP_TIMEOUT, HttpSource};
pub use json::{JsonDirSource, JsonFileSource, decode_documents};

/// Source for a metadata path: a directory of JSON files or one JSON file.
pub fn json_source(path: &Path, workers: usize) -> Box<dyn DocumentSource> {
    if path.is_dir() {
        Box::new(JsonDirSource::new(path, workers))
    } else {
        Box::new(JsonFileSource::new(path))
    }
}

/// The document source described by `settings`, backed by the snapshot
/// cache at `cache_path` (default location when `None`).
///
/// A local metadata path takes precedence over a metadata URL. With neither
/// the source is empty.
pub fn source_from_settings(settings: &Settings, cache_path: Option<&Path>) -> Box<dyn DocumentSource> {
    let cache_path = cache_path.map(Path::to_path_buf).unwrap_or_else(default_snapshot_path);

    if let Some(path) = settings.metadata_path.as_deref() {
        if settings.metadata_url.is_some() {
            debug!("metadata path {} overrides metadata URL", path.display());
        }
        return Box::new(CachedSource::new(json_source(path, settings.workers), cache_path));
    }

    let Some(url) = settings.metadata_url.as_deref() else {
        warn!("no metadata path or URL configured, serving an empty dataset");
        return Box::new(StaticSource::default());
    };

    match HttpSource::new(url) {
        Ok(source) => Box::new(CachedSource::new(source, cache_path)),
        Err(err) => {
            error!("cannot fetch metadata from {url}: {err}");
            Box::new(StaticSource::default())
        }
    }
}

use std::{
    fs::{self, File},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

use gazette_engine::{Document, DocumentSource, Result};
use log::{info, warn};
use tempfile::NamedTempFile;

use crate::json::decode_documents;

/// Atomically replace the snapshot file at `path` with `documents`.
pub fn write_snapshot_atomic(path: &Path, documents: &[Document]) -> io::Result<()> {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent)?;

    let tmp = NamedTempFile::new_in(parent)?;
    {
        let mut writer = BufWriter::new(tmp.as_file());
        serde_json::to_writer(&mut writer, documents)?;
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;

    tmp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

pub fn read_snapshot(path: &Path) -> Result<Vec<Document>> {
    let bytes = fs::read(path)?;
    decode_documents(&bytes)
}

/// Wraps a primary source with an on-disk copy of its last good result.
///
/// Every successful fetch is written to the cache file. When the primary
/// fails, the cached copy is served instead; only when both fail does the
/// fetch fail, with the primary's error.
pub struct CachedSource<S> {
    primary: S,
    cache_path: PathBuf,
}

impl<S: DocumentSource> CachedSource<S> {
    pub fn new(primary: S, cache_path: impl Into<PathBuf>) -> Self {
        Self {
            primary,
            cache_path: cache_path.into(),
        }
    }

    pub fn cache_path(&self) -> &Path {
        &self.cache_path
    }
}

impl<S: DocumentSource> DocumentSource for CachedSource<S> {
    fn describe(&self) -> String {
        format!("{} (cached at {})", self.primary.describe(), self.cache_path.display())
    }

    fn fetch(&self) -> Result<Vec<Document>> {
        match self.primary.fetch() {
            Ok(documents) => {
                if let Err(e) = write_snapshot_atomic(&self.cache_path, &documents) {
                    warn!("failed to write snapshot cache {}: {e}", self.cache_path.display());
                }
                Ok(documents)
            }
            Err(primary_err) => {
                warn!("{} failed: {primary_err}", self.primary.describe());
                match read_snapshot(&self.cache_path) {
                    Ok(documents) => {
                        info!(
                            "serving {} documents from snapshot cache {}",
                            documents.len(),
                            self.cache_path.display()
                        );
                        Ok(documents)
                    }
                    Err(cache_err) => {
                        warn!("snapshot cache {} unusable: {cache_err}", self.cache_path.display());
                        Err(primary_err)
                    }
                }
            }
        }
    }
}

/// Fixed in-memory document set.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    documents: Vec<Document>,
}

impl StaticSource {
    pub fn new(documents: Vec<Document>) -> Self {
        Self { documents }
    }
}

impl DocumentSource for StaticSource {
    fn describe(&self) -> String {
        format!("{} static documents", self.documents.len())
    }

    fn fetch(&self) -> Result<Vec<Document>> {
        Ok(self.documents.clone())
    }
}

#[cfg(test)]
#[path = "cache_tests.rs"]
mod tests;

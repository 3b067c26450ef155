use std::{
    fs,
    path::{Path, PathBuf},
    thread,
};

use anyhow::Context;
use crossbeam::channel;
use gazette_engine::{Document, DocumentSource, EngineError, Result};
use log::{debug, warn};
use serde::Deserialize;

/// Accepted top-level shapes of a metadata file.
#[derive(Deserialize)]
#[serde(untagged)]
enum Payload {
    List(Vec<Document>),
    Wrapped { metadata: Vec<Document> },
    Single(Document),
}

/// Decode a metadata payload: a document array, an object with a
/// `metadata` array, or a single document object.
pub fn decode_documents(bytes: &[u8]) -> Result<Vec<Document>> {
    let payload: Payload = serde_json::from_slice(bytes).map_err(|e| EngineError::Decode(e.to_string()))?;
    Ok(match payload {
        Payload::List(docs) | Payload::Wrapped { metadata: docs } => docs,
        Payload::Single(doc) => vec![doc],
    })
}

fn load_file(path: &Path) -> Result<Vec<Document>> {
    let bytes = fs::read(path)?;
    decode_documents(&bytes).map_err(|e| EngineError::Decode(format!("{}: {e}", path.display())))
}

/// Every document in one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DocumentSource for JsonFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Vec<Document>> {
        load_file(&self.path)
    }
}

/// Every `*.json` file directly under a directory, loaded concurrently.
///
/// Files that cannot be read or decoded are skipped with a warning; only an
/// unreadable directory fails the fetch.
#[derive(Debug, Clone)]
pub struct JsonDirSource {
    dir: PathBuf,
    workers: usize,
}

impl JsonDirSource {
    pub fn new(dir: impl Into<PathBuf>, workers: usize) -> Self {
        Self {
            dir: dir.into(),
            workers: workers.max(1),
        }
    }

    fn json_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!("error reading entry in {}: {e}", self.dir.display());
                    continue;
                }
            };
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl DocumentSource for JsonDirSource {
    fn describe(&self) -> String {
        format!("{}/*.json", self.dir.display())
    }

    fn fetch(&self) -> Result<Vec<Document>> {
        let files = self.json_files()?;
        debug!("loading {} metadata files from {}", files.len(), self.dir.display());

        let (work_tx, work_rx) = channel::unbounded::<usize>();
        let (done_tx, done_rx) = channel::unbounded::<(usize, Vec<Document>)>();
        for i in 0..files.len() {
            let _ = work_tx.send(i);
        }
        drop(work_tx);

        let workers = self.workers.min(files.len()).max(1);
        thread::scope(|s| {
            for _ in 0..workers {
                let work_rx = work_rx.clone();
                let done_tx = done_tx.clone();
                let files = &files;

                s.spawn(move || {
                    while let Ok(i) = work_rx.recv() {
                        let path = &files[i];
                        match load_file(path).with_context(|| format!("skipping {}", path.display())) {
                            Ok(docs) => {
                                if done_tx.send((i, docs)).is_err() {
                                    return;
                                }
                            }
                            Err(e) => warn!("{e:#}"),
                        }
                    }
                });
            }
        });
        drop(done_tx);

        // File order, so the same directory always yields the same sequence.
        let mut loaded: Vec<(usize, Vec<Document>)> = done_rx.try_iter().collect();
        loaded.sort_by_key(|(i, _)| *i);
        Ok(loaded.into_iter().flat_map(|(_, docs)| docs).collect())
    }
}

#[cfg(test)]
#[path = "json_tests.rs"]
mod tests;

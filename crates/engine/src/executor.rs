//! Partitioned fan-out: count, fetch, merge, sort.

use std::{cmp::Ordering, sync::Arc, thread};

use crossbeam::channel;
use log::{debug, warn};

use crate::{CancelToken, Document, EngineError, FilterNode, Partition, Result, matches};

/// Knobs for one fan-out.
#[derive(Debug, Clone, Copy)]
pub struct ExecOptions {
    /// Upper bound on documents fetched from any one partition.
    pub fetch_cap: usize,
    /// Upper bound on concurrently scanned partitions.
    pub workers: usize,
}

/// Merged output of the count and fetch phases.
#[derive(Debug, Clone, Default)]
pub struct Execution {
    /// Fetched matches, sorted newest first.
    pub documents: Vec<Document>,
    /// Sum of per-partition counts. May exceed `documents.len()` when the
    /// fetch cap truncated a partition.
    pub total_count: usize,
    pub partitions_scanned: Vec<String>,
    pub failed_partitions: Vec<String>,
}

/// Per-partition results with the failed partitions split out.
#[derive(Debug)]
pub(crate) struct Gathered<T> {
    pub(crate) values: Vec<(String, T)>,
    pub(crate) failed: Vec<String>,
}

/// Run `op` over every partition on at most `workers` threads.
///
/// Results come back in partition order. A partition error is logged and
/// recorded in `failed`; cancellation discards everything.
pub(crate) fn gather<T, F>(
    partitions: &[Arc<dyn Partition>],
    workers: usize,
    cancel: &CancelToken,
    op: F,
) -> Result<Gathered<T>>
where
    T: Send,
    F: Fn(&dyn Partition) -> Result<T> + Sync,
{
    let mut slots: Vec<Option<Result<T>>> = (0..partitions.len()).map(|_| None).collect();
    let workers = workers.clamp(1, partitions.len().max(1));

    let (work_tx, work_rx) = channel::unbounded::<usize>();
    let (done_tx, done_rx) = channel::unbounded::<(usize, Result<T>)>();
    for i in 0..partitions.len() {
        let _ = work_tx.send(i);
    }
    drop(work_tx);

    thread::scope(|s| {
        for _ in 0..workers {
            let work_rx = work_rx.clone();
            let done_tx = done_tx.clone();
            let op = &op;

            s.spawn(move || {
                while let Ok(i) = work_rx.recv() {
                    let result = if cancel.is_cancelled() {
                        Err(EngineError::Cancelled)
                    } else {
                        op(&*partitions[i])
                    };
                    if done_tx.send((i, result)).is_err() {
                        return;
                    }
                }
            });
        }
    });
    drop(done_tx);

    for (i, result) in done_rx.try_iter() {
        slots[i] = Some(result);
    }

    if cancel.is_cancelled() {
        debug!("fan-out cancelled, discarding partial results");
        return Err(EngineError::Cancelled);
    }

    let mut gathered = Gathered {
        values: Vec::with_capacity(partitions.len()),
        failed: Vec::new(),
    };

    for (part, slot) in partitions.iter().zip(slots) {
        let name = part.name().to_owned();
        match slot {
            Some(Ok(value)) => gathered.values.push((name, value)),
            Some(Err(EngineError::Cancelled)) => return Err(EngineError::Cancelled),
            Some(Err(e)) => {
                warn!("partition {name} excluded from results: {e}");
                gathered.failed.push(name);
            }
            None => {
                warn!("partition {name} produced no result");
                gathered.failed.push(name);
            }
        }
    }

    Ok(gathered)
}

/// Number of documents in `partition` matching `filter`.
pub fn count_matches(partition: &dyn Partition, filter: &FilterNode, cancel: &CancelToken) -> Result<usize> {
    let mut count = 0usize;
    let mut visited = 0usize;
    let mut cancelled = false;

    partition.scan(&mut |doc| {
        visited += 1;
        if cancel.is_cancelled_sparse(visited) {
            cancelled = true;
            return false;
        }
        if matches(doc, filter) {
            count += 1;
        }
        true
    })?;

    if cancelled {
        return Err(EngineError::Cancelled);
    }
    Ok(count)
}

/// Up to `cap` matching documents, in storage order.
pub fn fetch_matches(
    partition: &dyn Partition,
    filter: &FilterNode,
    cap: usize,
    cancel: &CancelToken,
) -> Result<Vec<Document>> {
    let mut out = Vec::new();
    if cap == 0 {
        return Ok(out);
    }

    let mut visited = 0usize;
    let mut cancelled = false;

    partition.scan(&mut |doc| {
        visited += 1;
        if cancel.is_cancelled_sparse(visited) {
            cancelled = true;
            return false;
        }
        if matches(doc, filter) {
            out.push(doc.clone());
        }
        out.len() < cap
    })?;

    if cancelled {
        return Err(EngineError::Cancelled);
    }
    Ok(out)
}

/// Newest first; equal dates by id ascending; otherwise fetch order.
/// Documents without a date sort last.
pub fn sort_documents(docs: &mut [Document]) {
    docs.sort_by(compare_documents);
}

fn compare_documents(a: &Document, b: &Document) -> Ordering {
    let da = a.document_date.as_deref().unwrap_or("");
    let db = b.document_date.as_deref().unwrap_or("");
    db.cmp(da).then_with(|| a.document_id.cmp(&b.document_id))
}

/// Count, fetch and merge across `partitions`.
pub fn execute(
    partitions: &[Arc<dyn Partition>],
    filter: &FilterNode,
    options: ExecOptions,
    cancel: &CancelToken,
) -> Result<Execution> {
    let partitions_scanned: Vec<String> = partitions.iter().map(|p| p.name().to_owned()).collect();
    if partitions.is_empty() {
        return Ok(Execution::default());
    }

    let counts = gather(partitions, options.workers, cancel, |p| count_matches(p, filter, cancel))?;
    let total_count: usize = counts.values.iter().map(|(_, n)| n).sum();

    let fetched = gather(partitions, options.workers, cancel, |p| {
        fetch_matches(p, filter, options.fetch_cap, cancel)
    })?;

    let mut failed_partitions = counts.failed;
    for name in fetched.failed {
        if !failed_partitions.contains(&name) {
            failed_partitions.push(name);
        }
    }

    let mut documents: Vec<Document> = fetched.values.into_iter().flat_map(|(_, docs)| docs).collect();
    sort_documents(&mut documents);

    debug!(
        "executed over {} partitions: {} counted, {} fetched, {} failed",
        partitions_scanned.len(),
        total_count,
        documents.len(),
        failed_partitions.len()
    );

    Ok(Execution {
        documents,
        total_count,
        partitions_scanned,
        failed_partitions,
    })
}

#[cfg(test)]
#[path = "executor_tests.rs"]
mod tests;

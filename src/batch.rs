//! The pipeline coordinator: bounded-parallelism batch execution.
//!
//! One discoverer task streams candidate paths into a capacity-1 channel;
//! `concurrency` worker tasks take paths off it first-come-first-served and
//! run the document processor. The bounded channel is the backpressure
//! mechanism: discovery blocks on `send` whenever every worker is busy, so
//! it never runs arbitrarily far ahead of processing.
//!
//! ## Error policy
//!
//! All-or-nothing. The first error raised by discovery or by any worker is
//! captured in a shared slot; later errors are logged and dropped. A worker
//! that fails, or that observes an already-captured error, keeps draining
//! the queue without processing, which guarantees the discoverer can never
//! be left blocked on a full channel. Documents in flight on other workers
//! run to completion, but once the error slot is filled the run reports
//! failure and no results are surfaced.
//!
//! The opt-in exception is [`AnalysisConfig::skip_failures`]: per-document
//! errors become WARN logs and the batch keeps going.

use crate::config::AnalysisConfig;
use crate::error::WhiteMeterError;
use crate::pipeline::{discover, render};
use crate::stats::DocumentStats;
use futures::future::join_all;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::sync::{mpsc, Mutex as AsyncMutex};
use tracing::{debug, info, warn};

/// First-error slot shared by every pipeline task.
type ErrorSlot = Arc<Mutex<Option<WhiteMeterError>>>;

/// The work queue receiver, shared by all workers.
type WorkQueue = Arc<AsyncMutex<mpsc::Receiver<PathBuf>>>;

/// Analyse every PDF under `source` and return the per-document records.
///
/// This is the primary entry point for the library. `source` is either a
/// single `.pdf` path or a directory whose direct `.pdf` entries are
/// processed. Records come back in completion order, which is not the
/// discovery order; callers wanting a stable report should sort by name.
///
/// # Errors
/// The first fatal error from discovery or any document, unless
/// `config.skip_failures` is set (then only discovery failures and
/// internal errors remain fatal). An empty result is not an error.
///
/// # Example
/// ```rust,no_run
/// use pdf_whitemeter::{analyze, AnalysisConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let records = analyze("./scans", &AnalysisConfig::default()).await?;
///     for r in &records {
///         println!("{}: {}% white", r.name, r.white_percentage);
///     }
///     Ok(())
/// }
/// ```
pub async fn analyze(
    source: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<Vec<DocumentStats>, WhiteMeterError> {
    let started = Instant::now();
    let source = source.as_ref().to_string();
    let concurrency = config.concurrency.max(1);
    info!("Starting batch analysis of {source} with {concurrency} workers");

    // capacity 1: a bounded hand-off, not a buffer
    let (tx, rx) = mpsc::channel::<PathBuf>(1);
    let queue: WorkQueue = Arc::new(AsyncMutex::new(rx));
    let results: Arc<Mutex<Vec<DocumentStats>>> = Arc::new(Mutex::new(Vec::new()));
    let first_error: ErrorSlot = Arc::new(Mutex::new(None));
    let failed = Arc::new(AtomicUsize::new(0));

    let mut tasks = Vec::with_capacity(concurrency + 1);

    // The discoverer owns the only sender, so the queue closes when the
    // task finishes, on the success path and on the error path alike.
    tasks.push(tokio::spawn({
        let first_error = Arc::clone(&first_error);
        async move {
            if let Err(err) = discover::discover(&source, &tx).await {
                record_first(&first_error, err);
            }
        }
    }));

    for _ in 0..concurrency {
        tasks.push(tokio::spawn(worker_loop(
            Arc::clone(&queue),
            Arc::clone(&results),
            Arc::clone(&first_error),
            Arc::clone(&failed),
            config.clone(),
        )));
    }

    // Wait for every task, success or failure, before judging the run.
    for join_result in join_all(tasks).await {
        if let Err(err) = join_result {
            record_first(
                &first_error,
                WhiteMeterError::Internal(format!("Pipeline task panicked: {err}")),
            );
        }
    }

    if let Some(err) = first_error.lock().unwrap().take() {
        return Err(err);
    }

    let records = std::mem::take(&mut *results.lock().unwrap());
    if let Some(cb) = &config.progress {
        cb.on_batch_complete(records.len(), failed.load(Ordering::SeqCst));
    }
    info!(
        "Analyzed {} documents in {}ms",
        records.len(),
        started.elapsed().as_millis()
    );
    Ok(records)
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    source: impl AsRef<str>,
    config: &AnalysisConfig,
) -> Result<Vec<DocumentStats>, WhiteMeterError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| WhiteMeterError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(analyze(source, config))
}

/// One worker: take paths off the queue until it closes.
async fn worker_loop(
    queue: WorkQueue,
    results: Arc<Mutex<Vec<DocumentStats>>>,
    first_error: ErrorSlot,
    failed: Arc<AtomicUsize>,
    config: AnalysisConfig,
) {
    loop {
        // the queue lock is held only for the take, never while processing
        let next = { queue.lock().await.recv().await };
        let Some(path) = next else { break };

        if first_error.lock().unwrap().is_some() {
            // the run has already failed; keep draining so the discoverer
            // is never left blocked on a full channel
            debug!(
                "Discarding queued document {}: run already failed",
                path.display()
            );
            continue;
        }

        if let Some(cb) = &config.progress {
            cb.on_document_start(&path);
        }

        match render::process_document(&path, &config).await {
            Ok(stats) => {
                debug!(
                    "{}: {} white / {} non-white pixels",
                    stats.name, stats.white_pixels, stats.non_white_pixels
                );
                if let Some(cb) = &config.progress {
                    cb.on_document_complete(&stats);
                }
                results.lock().unwrap().push(stats);
            }
            Err(err) if config.skip_failures => {
                warn!("Skipping {}: {err}", path.display());
                failed.fetch_add(1, Ordering::SeqCst);
                if let Some(cb) = &config.progress {
                    cb.on_document_error(&path, &err.to_string());
                }
            }
            Err(err) => {
                if let Some(cb) = &config.progress {
                    cb.on_document_error(&path, &err.to_string());
                }
                record_first(&first_error, err);
            }
        }
    }
}

/// Capture `err` if the slot is empty; the first captured error is the
/// run's terminal error and is never overwritten.
fn record_first(slot: &ErrorSlot, err: WhiteMeterError) {
    let mut guard = slot.lock().unwrap();
    if guard.is_none() {
        *guard = Some(err);
    } else {
        warn!("Additional failure after run already failed: {err}");
    }
}

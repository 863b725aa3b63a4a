//! Path discovery: resolve the source into a stream of candidate PDFs.
//!
//! The discoverer feeds paths into the coordinator's bounded channel one at
//! a time, so discovery is pipelined with processing rather than phased.
//! A source that names a single `.pdf` file is forwarded as-is; whether it
//! exists is the document processor's problem, checked at open time.

use crate::error::WhiteMeterError;
use std::path::PathBuf;
use tokio::sync::mpsc;
use tracing::{debug, info};

/// File-name suffix that marks a candidate document.
const PDF_EXTENSION: &str = ".pdf";

/// Discover candidate documents under `source` and send each into `queue`.
///
/// `source` is either a path ending in `.pdf` (forwarded unchecked) or a
/// directory, whose direct entries are filtered to non-directory names
/// ending in `.pdf` and queued in file-name order. Subdirectories are never
/// recursed into.
///
/// # Errors
/// Returns [`WhiteMeterError::DiscoveryFailed`] when the directory cannot
/// be listed. Zero matches is not an error.
pub async fn discover(
    source: &str,
    queue: &mpsc::Sender<PathBuf>,
) -> Result<(), WhiteMeterError> {
    if source.ends_with(PDF_EXTENSION) {
        debug!("Queueing single PDF source: {source}");
        let _ = queue.send(PathBuf::from(source)).await;
        return Ok(());
    }

    info!("Reading PDFs from source {source}");

    let mut dir = tokio::fs::read_dir(source)
        .await
        .map_err(|e| discovery_error(source, e))?;

    let mut candidates = Vec::new();
    while let Some(entry) = dir
        .next_entry()
        .await
        .map_err(|e| discovery_error(source, e))?
    {
        let file_type = entry
            .file_type()
            .await
            .map_err(|e| discovery_error(source, e))?;
        if file_type.is_dir() {
            continue;
        }
        if entry.file_name().to_string_lossy().ends_with(PDF_EXTENSION) {
            candidates.push(entry.path());
        }
    }
    // file-name order, so queueing is deterministic across platforms
    candidates.sort();

    for path in candidates {
        debug!("Queueing PDF for processing: {}", path.display());
        if queue.send(path).await.is_err() {
            // every receiver is gone; the run is already shutting down
            break;
        }
    }

    Ok(())
}

fn discovery_error(source: &str, e: std::io::Error) -> WhiteMeterError {
    WhiteMeterError::DiscoveryFailed {
        path: PathBuf::from(source),
        source: e,
    }
}

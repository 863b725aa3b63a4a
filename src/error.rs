//! Error types for the pdf-whitemeter library.
//!
//! A single fatal-error enum, [`WhiteMeterError`], covers every failure mode.
//! The batch runs with all-or-nothing semantics: the first error raised by
//! path discovery or by any document aborts the whole run, so there is no
//! separate non-fatal error class. The one escape hatch is
//! [`crate::config::AnalysisConfig::skip_failures`], which downgrades
//! per-document failures to WARN logs without changing the error type.
//!
//! Every variant that concerns a document carries its path, so the top-level
//! log line is enough to diagnose which file sank the run.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdf-whitemeter library.
#[derive(Debug, Error)]
pub enum WhiteMeterError {
    // ── Discovery errors ──────────────────────────────────────────────────
    /// The source directory could not be listed.
    #[error("Failed to list source directory '{path}': {source}\nCheck the path exists and is a readable directory.")]
    DiscoveryFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Preflight errors ──────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not open or parse the document.
    #[error("PDF '{path}' is corrupt or unreadable: {detail}\nTry repairing with: qpdf --decrypt input.pdf output.pdf")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error while rasterising a specific page.
    #[error("Rasterisation failed for page {page} of '{path}': {detail}")]
    RenderFailed {
        path: PathBuf,
        page: usize,
        detail: String,
    },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write a rendered page image to the dump directory.
    #[error("Failed to write rendered page image '{path}': {detail}")]
    PageDumpFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

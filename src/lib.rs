//! # pdf-whitemeter
//!
//! Measure how white (blank) each page of your PDFs renders.
//!
//! ## Why this crate?
//!
//! Bulk scanning jobs produce the occasional blank or nearly blank page:
//! feeder misfires, separator sheets, backs of single-sided originals.
//! Eyeballing thousands of scans for them does not scale. This crate
//! rasterises every page of every document via pdfium and reports, per
//! document, how many pixels rendered white versus non-white, giving
//! document-quality auditors a fast "how blank is this scan" metric across
//! a whole folder.
//!
//! ## Pipeline Overview
//!
//! ```text
//! source (file or directory)
//!  │
//!  ├─ 1. Discover  list candidate .pdf paths, stream into a bounded queue
//!  ├─ 2. Render    N workers rasterise pages via pdfium (spawn_blocking)
//!  ├─ 3. Classify  count white / non-white pixels per page
//!  └─ 4. Report    per-document records, CSV or JSON
//! ```
//!
//! The run is all-or-nothing: the first error anywhere aborts the batch
//! and nothing is printed. Set
//! [`skip_failures`](config::AnalysisConfig::skip_failures) to log and
//! skip failing documents instead.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdf_whitemeter::{analyze, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AnalysisConfig::builder().concurrency(4).build()?;
//!     let records = analyze("./scans", &config).await?;
//!     for r in &records {
//!         println!("{}: {}% white", r.name, r.white_percentage);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature   | Default | Description |
//! |-----------|---------|-------------|
//! | `cli`     | on      | Enables the `whitemeter` binary (clap + anyhow + tracing-subscriber + indicatif) |
//! | `bundled` | on      | Embed the pdfium shared library in the binary at compile time |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! pdf-whitemeter = { version = "0.1", default-features = false }
//! ```
//!
//! ## Classification rule
//!
//! A pixel counts as white when its red sample, scaled from the 16-bit
//! sample range to 8-bit, equals 255; green and blue are not consulted.
//! See [`pipeline::classify`] for why this red-channel approximation is
//! kept as-is.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod batch;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod progress;
pub mod report;
pub mod stats;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use batch::{analyze, analyze_sync};
pub use config::{AnalysisConfig, AnalysisConfigBuilder};
pub use error::WhiteMeterError;
pub use progress::{BatchProgress, BatchProgressCallback, NoopProgressCallback};
pub use report::{render_csv, CSV_HEADER, NO_RESULTS};
pub use stats::DocumentStats;

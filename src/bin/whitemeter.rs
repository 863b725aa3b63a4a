//! CLI binary for pdf-whitemeter.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and prints the result table.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf_whitemeter::{
    analyze, report, AnalysisConfig, BatchProgress, BatchProgressCallback, DocumentStats,
};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live spinner with per-document log lines.
/// The total is unknown up front (discovery streams paths in), so the bar
/// is a counter rather than a percentage.
struct CliProgressCallback {
    bar: ProgressBar,
    errors: AtomicUsize,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {pos} done  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Analysing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            errors: AtomicUsize::new(0),
        })
    }
}

impl BatchProgressCallback for CliProgressCallback {
    fn on_document_start(&self, path: &Path) {
        self.bar.set_message(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
    }

    fn on_document_complete(&self, stats: &DocumentStats) {
        self.bar.println(format!(
            "  {} {:<40}  {}",
            green("✓"),
            stats.name,
            dim(&format!("{:.1}% white", stats.white_percentage)),
        ));
        self.bar.inc(1);
    }

    fn on_document_error(&self, path: &Path, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);

        // Keep only the first line; the full message goes to the log.
        let msg = error.lines().next().unwrap_or(error);
        let msg = if msg.len() > 80 {
            format!("{}\u{2026}", &msg[..79])
        } else {
            msg.to_string()
        };

        self.bar.println(format!(
            "  {} {:<40}  {}",
            red("✗"),
            path.display(),
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, processed: usize, failed: usize) {
        self.bar.finish_and_clear();

        if failed == 0 {
            eprintln!(
                "{} {} documents analysed",
                green("✔"),
                bold(&processed.to_string())
            );
        } else {
            eprintln!(
                "{} {} documents analysed  ({} skipped)",
                cyan("⚠"),
                bold(&processed.to_string()),
                red(&failed.to_string()),
            );
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Analyse every PDF in the current directory
  whitemeter

  # Analyse a folder of scans with 8 workers
  whitemeter -s ./scans -c 8

  # Analyse a single document
  whitemeter -s report.pdf

  # Keep going past corrupt documents
  whitemeter -s ./scans --skip-failures

  # Machine-readable output
  whitemeter -s ./scans --json > stats.json

  # Dump every rendered page for inspection
  whitemeter -s report.pdf --dump-dir ./pages

OUTPUT:
  One CSV row per document on stdout:
    Name,White Pixels,Non-White Pixels,Percentage White Pixels
  Logs and progress go to stderr, so stdout pipes cleanly.

ENVIRONMENT VARIABLES:
  WHITEMETER_SOURCE        Default for --source
  WHITEMETER_CONCURRENCY   Default for --concurrency
  PDFIUM_LIB_PATH          Path to an existing libpdfium — skips auto-download

SETUP:
  PDFium (~30 MB) is downloaded automatically on first run and cached.
  No manual library setup is required. To use an existing pdfium copy:
  PDFIUM_LIB_PATH=/path/to/libpdfium whitemeter ...
"#;

/// Measure how white (blank) each page of your PDFs renders.
#[derive(Parser, Debug)]
#[command(
    name = "whitemeter",
    version,
    about = "Measure how white (blank) each page of your PDFs renders",
    long_about = "Rasterise every page of one or more PDF documents and report, per document, \
how many pixels rendered white versus non-white. Point it at a folder of scans to find the \
blank ones.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Source: a directory containing PDF files, or a single PDF file.
    #[arg(short, long, env = "WHITEMETER_SOURCE", default_value = "./")]
    source: String,

    /// Number of documents processed concurrently.
    #[arg(short, long, env = "WHITEMETER_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// Log and skip documents that fail instead of aborting the run.
    #[arg(long, env = "WHITEMETER_SKIP_FAILURES")]
    skip_failures: bool,

    /// Write every rendered page into DIR as PNG (debugging aid).
    #[arg(long, value_name = "DIR")]
    dump_dir: Option<PathBuf>,

    /// Maximum rendered page dimension in pixels.
    #[arg(long, default_value_t = 2000)]
    max_pixels: u32,

    /// Output the records as JSON instead of CSV.
    #[arg(long)]
    json: bool,

    /// Disable the progress display.
    #[arg(long)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "WHITEMETER_VERBOSE")]
    verbose: bool,

    /// Suppress everything except errors and the result table.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs while the progress display is
    // active; the spinner provides the feedback that matters.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Ensure the PDFium engine is available ────────────────────────────
    // With `--features bundled` (the default) the pdfium shared library was
    // embedded at compile time and only needs extracting. Without it, the
    // first run downloads the library (~30 MB) into the user cache;
    // subsequent startups are an instant path check.
    #[cfg(feature = "bundled")]
    {
        tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_bundled())
            .context("Failed to extract bundled PDFium engine")?;
    }

    #[cfg(not(feature = "bundled"))]
    if !pdfium_auto::is_pdfium_cached() {
        if !cli.quiet {
            let dl_bar = ProgressBar::new(0);
            dl_bar.set_style(
                ProgressStyle::with_template(
                    "{spinner:.cyan} {prefix:.bold}  \
                     [{bar:42.green/238}] {bytes}/{total_bytes}  ETA {eta_precise}",
                )
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("█▉▊▋▌▍▎▏  ")
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
            );
            dl_bar.set_prefix("PDF engine");
            dl_bar.set_message("Connecting…");
            dl_bar.enable_steady_tick(Duration::from_millis(80));

            let bar = dl_bar.clone();
            tokio::task::block_in_place(|| {
                pdfium_auto::ensure_pdfium_library(Some(&|downloaded, total| {
                    if let Some(t) = total {
                        if bar.length().unwrap_or(0) != t {
                            bar.set_length(t);
                        }
                    }
                    bar.set_position(downloaded);
                }))
            })
            .context("Failed to download PDFium engine")?;

            dl_bar.finish_with_message("ready ✓");
        } else {
            tokio::task::block_in_place(|| pdfium_auto::ensure_pdfium_library(None))
                .context("Failed to download PDFium engine")?;
        }
    }

    // ── Build config ─────────────────────────────────────────────────────
    if let Some(ref dir) = cli.dump_dir {
        tokio::fs::create_dir_all(dir)
            .await
            .with_context(|| format!("Failed to create dump directory {}", dir.display()))?;
    }

    let mut builder = AnalysisConfig::builder()
        .concurrency(cli.concurrency)
        .max_rendered_pixels(cli.max_pixels)
        .skip_failures(cli.skip_failures);
    if let Some(ref dir) = cli.dump_dir {
        builder = builder.dump_dir(dir.clone());
    }
    if show_progress {
        builder = builder.progress(CliProgressCallback::new() as BatchProgress);
    }
    let config = builder.build().context("Invalid configuration")?;

    // ── Run the batch ────────────────────────────────────────────────────
    let mut records = analyze(&cli.source, &config)
        .await
        .context("Analysis failed")?;

    // Completion order is nondeterministic under concurrency; sort for a
    // stable report.
    records.sort_by(|a, b| a.name.cmp(&b.name));

    // ── Print the report ─────────────────────────────────────────────────
    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&records).context("Failed to serialise records")?
        );
    } else if records.is_empty() {
        println!("{}", report::NO_RESULTS);
    } else {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(report::render_csv(&records).as_bytes())
            .context("Failed to write to stdout")?;
    }

    Ok(())
}

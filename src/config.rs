//! Configuration for a batch analysis run.
//!
//! Every knob lives in one immutable [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`] once at startup and handed to the coordinator.
//! Keeping the whole configuration in one value makes it trivial to share
//! across worker tasks and keeps the library free of ambient globals.

use crate::error::WhiteMeterError;
use crate::progress::BatchProgress;
use std::fmt;
use std::path::PathBuf;

/// Configuration for a batch analysis run.
///
/// Built via [`AnalysisConfig::builder()`] or [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use pdf_whitemeter::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .concurrency(8)
///     .skip_failures(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Number of documents processed in parallel. Minimum 1. Default: 4.
    ///
    /// Rendering is CPU-bound, so there is little to gain from going far
    /// beyond the machine's core count. Each worker holds at most one open
    /// document at a time.
    pub concurrency: usize,

    /// Maximum rendered page dimension (width or height) in pixels. Default: 2000.
    ///
    /// A safety cap independent of the page's physical size. An A0 poster
    /// page could otherwise rasterise to tens of thousands of pixels per
    /// edge and exhaust memory; this caps either dimension, scaling the
    /// other proportionally. The white percentage is a ratio, so the cap
    /// does not bias the result beyond resampling at region boundaries.
    pub max_rendered_pixels: u32,

    /// Skip documents that fail instead of aborting the run. Default: false.
    ///
    /// The default policy is all-or-nothing: one bad document fails the
    /// whole batch and no table is printed. Setting this logs the failure
    /// at WARN and leaves the document out of the summary. Discovery
    /// failures stay fatal either way.
    pub skip_failures: bool,

    /// When set, write every rendered page into this directory as
    /// `{name}-{page:03}.png`. A debugging aid for eyeballing what the
    /// classifier actually saw. Default: off.
    pub dump_dir: Option<PathBuf>,

    /// Progress callback invoked from worker tasks. Default: none.
    pub progress: Option<BatchProgress>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            concurrency: 4,
            max_rendered_pixels: 2000,
            skip_failures: false,
            dump_dir: None,
            progress: None,
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("concurrency", &self.concurrency)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("skip_failures", &self.skip_failures)
            .field("dump_dir", &self.dump_dir)
            .field(
                "progress",
                &self.progress.as_ref().map(|_| "<dyn BatchProgressCallback>"),
            )
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn skip_failures(mut self, v: bool) -> Self {
        self.config.skip_failures = v;
        self
    }

    pub fn dump_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.dump_dir = Some(dir.into());
        self
    }

    pub fn progress(mut self, callback: BatchProgress) -> Self {
        self.config.progress = Some(callback);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, WhiteMeterError> {
        let c = &self.config;
        if c.concurrency == 0 {
            return Err(WhiteMeterError::InvalidConfig(
                "Concurrency must be >= 1".into(),
            ));
        }
        if c.max_rendered_pixels < 100 {
            return Err(WhiteMeterError::InvalidConfig(format!(
                "max_rendered_pixels must be >= 100, got {}",
                c.max_rendered_pixels
            )));
        }
        Ok(self.config)
    }
}

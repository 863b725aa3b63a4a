//! The per-document result record.

use serde::{Serialize, Serializer};

/// Pixel statistics for one processed document, accumulated across all of
/// its pages.
///
/// A record is created in a single pass by the document processor and is
/// immutable from then on. `white_pixels + non_white_pixels` always equals
/// the summed area (width × height) of every rendered page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentStats {
    /// Base file name of the document. Used as the display key; not
    /// guaranteed unique across the run.
    pub name: String,

    /// Count of pixels classified as white, over all pages.
    pub white_pixels: u64,

    /// Count of pixels classified as non-white, over all pages.
    pub non_white_pixels: u64,

    /// `100 * white / (white + non_white)`. NaN when the document rendered
    /// zero pixels; serialised as `null` since JSON has no NaN.
    #[serde(serialize_with = "nan_as_null")]
    pub white_percentage: f64,
}

impl DocumentStats {
    /// Build a record from the final counters, deriving the percentage.
    pub fn new(name: impl Into<String>, white_pixels: u64, non_white_pixels: u64) -> Self {
        let total = white_pixels + non_white_pixels;
        Self {
            name: name.into(),
            white_pixels,
            non_white_pixels,
            white_percentage: 100.0 * white_pixels as f64 / total as f64,
        }
    }

    /// Total pixels visited across every page of the document.
    pub fn total_pixels(&self) -> u64 {
        self.white_pixels + self.non_white_pixels
    }
}

fn nan_as_null<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.is_nan() {
        serializer.serialize_none()
    } else {
        serializer.serialize_f64(*value)
    }
}

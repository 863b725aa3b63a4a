//! Final report rendering.
//!
//! Kept as pure string functions so the exact output format is pinned by
//! unit tests without running a pipeline.

use crate::stats::DocumentStats;
use std::fmt::Write as _;

/// Header line of the CSV report.
pub const CSV_HEADER: &str = "Name,White Pixels,Non-White Pixels,Percentage White Pixels";

/// Printed instead of the table when the run completed with zero documents.
pub const NO_RESULTS: &str = "No results to display as no PDFs were processed.";

/// Render the aggregated records as the CSV report: header plus one row per
/// document, each line newline-terminated.
///
/// The percentage uses `f64`'s default text representation, unrounded.
/// Names are emitted verbatim; nothing in the pipeline quotes them.
pub fn render_csv(records: &[DocumentStats]) -> String {
    let mut out = String::with_capacity((records.len() + 1) * 48);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for r in records {
        let _ = writeln!(
            out,
            "{},{},{},{}",
            r.name, r.white_pixels, r.non_white_pixels, r.white_percentage
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_renders_header_only() {
        assert_eq!(render_csv(&[]), format!("{CSV_HEADER}\n"));
    }

    #[test]
    fn one_row_per_record() {
        let records = vec![
            DocumentStats::new("a.pdf", 75, 25),
            DocumentStats::new("b.pdf", 10, 0),
        ];
        let csv = render_csv(&records);
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], CSV_HEADER);
        assert_eq!(lines[1], "a.pdf,75,25,75");
        assert_eq!(lines[2], "b.pdf,10,0,100");
    }

    #[test]
    fn percentage_uses_default_float_display() {
        let records = vec![DocumentStats::new("eighth.pdf", 1, 7)];
        let csv = render_csv(&records);
        assert!(csv.contains("eighth.pdf,1,7,12.5"), "got: {csv}");
    }

    #[test]
    fn zero_pixel_document_renders_nan() {
        let records = vec![DocumentStats::new("empty.pdf", 0, 0)];
        let csv = render_csv(&records);
        assert!(csv.contains("empty.pdf,0,0,NaN"), "got: {csv}");
    }
}

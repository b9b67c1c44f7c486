//! Plain text rendering for scan reports.

use crate::detector::ScanReport;

/// Render the page list of a scan report as a plain text table.
///
/// Page numbers in the first column are 1-indexed and are what a user
/// types to select a page.
pub fn to_text(report: &ScanReport) -> String {
    let mut lines = Vec::with_capacity(report.segments.len() + report.blank_runs.len() + 3);
    lines.push(format!(
        "{:>4}  {:>5}  {:>7}  {:>6}  {}",
        "#", "Page~", "Blocks", "Range", "Status"
    ));

    for segment in &report.segments {
        lines.push(format!(
            "{:>4}  {:>5}  {:>7}  {:>6}  {}",
            segment.index + 1,
            segment.page_estimate,
            segment.len(),
            format!("{}-{}", segment.start, segment.end.saturating_sub(1)),
            segment.classification
        ));
    }

    if !report.blank_runs.is_empty() {
        lines.push(String::new());
        lines.push("Blank runs inside pages with content:".to_string());
        for (i, run) in report.blank_runs.iter().enumerate() {
            lines.push(format!(
                "{:>4}  {} empty paragraphs (elements {}-{}, page #{})",
                i + 1,
                run.len(),
                run.start,
                run.end.saturating_sub(1),
                run.segment + 1
            ));
        }
    }

    lines.join("\n")
}

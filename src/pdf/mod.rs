mod typst;

pub use typst::generate_report_pdf;

use serde::Serialize;

use crate::config::Company;

/// An active filter echoed on the printed page.
#[derive(Debug, Serialize)]
pub struct PrintFilter {
    pub label: String,
    pub value: String,
}

/// One line of the per-currency breakdown.
#[derive(Debug, Serialize)]
pub struct PrintBucketTotal {
    pub bucket: String,
    pub amount: String,
}

/// Complete data for rendering a report's print preview. Cells are
/// pre-formatted strings so one template serves every report,
/// regardless of its column set.
#[derive(Debug, Serialize)]
pub struct PrintReport {
    pub company: Company,
    pub title: String,
    pub generated_date: String,
    pub filters: Vec<PrintFilter>,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub row_count: usize,
    pub grand_total: Option<String>,
    pub breakdown: Vec<PrintBucketTotal>,
}

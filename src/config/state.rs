use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct State {
    #[serde(default)]
    pub fetches: Vec<FetchEntry>,
}

/// One cached collection: which report it feeds, when it was pulled
/// and how many rows arrived.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct FetchEntry {
    pub report: String,
    pub fetched_on: NaiveDate,
    pub rows: usize,
}

impl State {
    /// Record a fetch, replacing any previous entry for the report.
    pub fn record_fetch(&mut self, report: &str, fetched_on: NaiveDate, rows: usize) {
        self.fetches.retain(|entry| entry.report != report);
        self.fetches.push(FetchEntry {
            report: report.to_string(),
            fetched_on,
            rows,
        });
    }
}

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConsoleError {
    #[error("Config directory not found at {0}. Run 'tradectl init' to create it.")]
    ConfigNotFound(PathBuf),

    #[error("Config file not found: {0}")]
    ConfigFileNotFound(PathBuf),

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Unknown report '{0}'. Use 'tradectl reports' to see available reports.")]
    ReportNotFound(String),

    #[error("Report '{report}' has no filter slot '{slot}'. Available: {available}")]
    UnknownFilterSlot {
        report: String,
        slot: String,
        available: String,
    },

    #[error("Invalid filter '{0}'. Expected 'slot=value' (e.g., 'rep=Ahmed')")]
    InvalidFilterExpr(String),

    #[error("Invalid date '{0}'. Expected YYYY-MM-DD.")]
    InvalidDate(String),

    #[error("No API base_url configured. Set [api] base_url in config.toml.")]
    ApiNotConfigured,

    #[error("Request to {url} failed: {reason}")]
    Api { url: String, reason: String },

    #[error("Failed to parse records from {path}: {source}")]
    InputParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No data for report '{0}'. Run 'tradectl fetch {0}' or pass --input <FILE>.")]
    NoData(String),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConsoleError>;

mod api;
mod catalog;
mod config;
mod engine;
mod error;
mod pdf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tabled::{builder::Builder, settings::Style};

use crate::api::ApiClient;
use crate::catalog::{catalog, find_report, ReportDef};
use crate::config::{
    cache_path, config_dir, load_config, load_state, resolve_output_dir, save_state,
    CONFIG_TEMPLATE,
};
use crate::engine::{
    detect_default_range, extract_options, filter_records, records_from_response,
    totals_by_bucket, FilterState, Record,
};
use crate::error::{ConsoleError, Result};
use crate::pdf::{generate_report_pdf, PrintBucketTotal, PrintFilter, PrintReport};

#[derive(Parser)]
#[command(name = "tradectl")]
#[command(version, about = "Reporting console for a small trading company", long_about = None)]
struct Cli {
    /// Path to config directory (default: ~/.tradectl or XDG config)
    #[arg(short = 'C', long, global = true)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize config directory with a template config file
    Init,

    /// Show configuration and cached data status
    Status,

    /// List available reports
    Reports,

    /// Fetch a report's collection from the backend and cache it
    Fetch {
        /// Report name from 'reports'
        report: String,
    },

    /// Show a report's filter options and default date range
    Filters {
        /// Report name from 'reports'
        report: String,

        /// Read records from a JSON file instead of the cache
        #[arg(long)]
        input: Option<PathBuf>,
    },

    /// Run a report: filter, aggregate and render it
    Report {
        /// Report name from 'reports'
        report: String,

        /// Filter in format "slot=value" (can be repeated)
        #[arg(short = 'w', long = "where", value_name = "SLOT=VALUE")]
        filters: Vec<String>,

        /// Keep records dated on or after this day (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Keep records dated on or before this day (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Read records from a JSON file instead of the cache
        #[arg(long)]
        input: Option<PathBuf>,

        /// Number of rows to show (default: all)
        #[arg(short, long)]
        limit: Option<usize>,

        /// Also produce a print-formatted PDF preview
        #[arg(long)]
        pdf: bool,

        /// Open the generated PDF with system default viewer
        #[arg(long)]
        open: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Determine config directory
    let cfg_dir = match cli.config_dir {
        Some(p) => p,
        None => config_dir()?,
    };

    match cli.command {
        Commands::Init => cmd_init(&cfg_dir),
        Commands::Status => cmd_status(&cfg_dir),
        Commands::Reports => cmd_reports(),
        Commands::Fetch { report } => cmd_fetch(&cfg_dir, &report),
        Commands::Filters { report, input } => cmd_filters(&cfg_dir, &report, input),
        Commands::Report {
            report,
            filters,
            from,
            to,
            input,
            limit,
            pdf,
            open,
        } => cmd_report(&cfg_dir, &report, &filters, from, to, input, limit, pdf, open),
    }
}

/// Initialize config directory with a template config file
fn cmd_init(cfg_dir: &Path) -> Result<()> {
    use std::fs;

    if cfg_dir.exists() {
        return Err(ConsoleError::AlreadyInitialized(cfg_dir.to_path_buf()));
    }

    // Create directories
    fs::create_dir_all(cfg_dir)?;
    fs::create_dir_all(cfg_dir.join("data"))?;
    fs::create_dir_all(cfg_dir.join("output"))?;

    // Write template file
    fs::write(cfg_dir.join("config.toml"), CONFIG_TEMPLATE)?;

    println!("Initialized tradectl config at: {}", cfg_dir.display());
    println!();
    println!("Next steps:");
    println!(
        "  1. Set your backend and token:  $EDITOR {}/config.toml",
        cfg_dir.display()
    );
    println!("  2. Pull a collection:           tradectl fetch sales");
    println!();
    println!("Then run your first report:");
    println!("  tradectl report sales --where rep=<name> --from <YYYY-MM-DD>");

    Ok(())
}

/// Show configuration and cached data status
fn cmd_status(cfg_dir: &Path) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ConsoleError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let config = load_config(cfg_dir)?;
    let state = load_state(cfg_dir)?;
    let reports = catalog();

    println!("Console Status");
    println!("{}", "-".repeat(50));
    println!("Config directory: {}", cfg_dir.display());
    println!("Company:          {}", config.company.name);
    println!("API base:         {}", config.api.base_url);
    println!(
        "API token:        {}",
        if config.api.token.is_some() { "set" } else { "not set" }
    );
    println!("Reports:          {}", reports.len());

    if state.fetches.is_empty() {
        println!();
        println!("No cached data. Run 'tradectl fetch <report>' to pull a collection.");
    } else {
        println!();
        println!("Cached data:");
        for entry in &state.fetches {
            println!(
                "  {} - {} rows (fetched {})",
                entry.report, entry.rows, entry.fetched_on
            );
        }
    }

    Ok(())
}

/// List available reports
fn cmd_reports() -> Result<()> {
    let mut builder = Builder::default();
    builder.push_record(["NAME", "TITLE", "SOURCE", "COLUMNS"]);
    for def in catalog() {
        builder.push_record([def.name, def.title, def.endpoint, def.shape.kind()]);
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    Ok(())
}

/// Fetch a report's collection from the backend and cache it
fn cmd_fetch(cfg_dir: &Path, report: &str) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ConsoleError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let def = find_report(report).ok_or_else(|| ConsoleError::ReportNotFound(report.to_string()))?;
    let config = load_config(cfg_dir)?;

    if config.api.base_url.is_empty() {
        return Err(ConsoleError::ApiNotConfigured);
    }

    let client = ApiClient::new(
        &config.api.base_url,
        config.api.token.as_deref(),
        config.api.timeout_secs,
    );
    let records = client.fetch_collection(def.endpoint)?;

    let path = cache_path(cfg_dir, def.name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(&records)
        .map_err(|e| ConsoleError::PdfGeneration(e.to_string()))?;
    std::fs::write(&path, content)?;

    let mut state = load_state(cfg_dir)?;
    state.record_fetch(def.name, Local::now().date_naive(), records.len());
    save_state(cfg_dir, &state)?;

    println!("Fetched {}: {} records", def.name, records.len());
    println!("  Cached: {}", path.display());

    Ok(())
}

/// Show a report's filter options and default date range
fn cmd_filters(cfg_dir: &Path, report: &str, input: Option<PathBuf>) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ConsoleError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let def = find_report(report).ok_or_else(|| ConsoleError::ReportNotFound(report.to_string()))?;
    let records = load_records(cfg_dir, &def, input)?;

    println!("Filters for {} ({} records)", def.title, records.len());

    for slot in &def.slots {
        let options = extract_options(&records, &slot.path, slot.label_path.as_deref());
        println!();
        println!("{} ({} options):", slot.slot, options.len());
        for option in &options {
            let value = option
                .value
                .as_str()
                .map(str::to_string)
                .unwrap_or_else(|| option.value.to_string());
            if option.label == value {
                println!("  {value}");
            } else {
                println!("  {value} - {}", option.label);
            }
        }
    }

    if let Some(date_path) = def.date_path {
        let range = detect_default_range(&records, date_path, Local::now().date_naive());
        println!();
        println!("Default date range: {} .. {}", range.from, range.to);
    }

    Ok(())
}

/// Run a report: filter, aggregate and render it
fn cmd_report(
    cfg_dir: &Path,
    report: &str,
    filter_args: &[String],
    from: Option<String>,
    to: Option<String>,
    input: Option<PathBuf>,
    limit: Option<usize>,
    pdf: bool,
    open: bool,
) -> Result<()> {
    if !cfg_dir.exists() {
        return Err(ConsoleError::ConfigNotFound(cfg_dir.to_path_buf()));
    }

    let def = find_report(report).ok_or_else(|| ConsoleError::ReportNotFound(report.to_string()))?;

    // Parse filter expressions and date bounds at the CLI boundary;
    // the engine itself never validates
    let mut state = FilterState::default();
    for expr in filter_args {
        let (slot, value) = parse_where(&def, expr)?;
        state = state.select(slot, Value::String(value));
    }
    let from_date = from.as_deref().map(parse_cli_date).transpose()?;
    let to_date = to.as_deref().map(parse_cli_date).transpose()?;
    state = state.between(from_date, to_date);

    let records = load_records(cfg_dir, &def, input)?;
    let filtered = filter_records(&records, &state, &def.field_map());

    if filtered.is_empty() {
        println!("No matching records for report '{}'.", def.name);
        return Ok(());
    }

    let result = def.shape.shape(&filtered);

    // Render the table
    let shown = limit.unwrap_or(result.rows.len()).min(result.rows.len());
    let mut builder = Builder::default();
    builder.push_record(result.columns.iter().map(|c| c.label.clone()));
    for record in result.rows.iter().take(shown) {
        builder.push_record(
            result
                .columns
                .iter()
                .map(|column| def.shape.cell(record, column)),
        );
    }

    let mut table = builder.build();
    table.with(Style::rounded());
    println!("{table}");

    println!();
    if shown < result.rows.len() {
        println!("Rows:  {} (showing {})", result.rows.len(), shown);
    } else {
        println!("Rows:  {}", result.rows.len());
    }

    let breakdown = def
        .breakdown_path
        .map(|bucket_path| {
            let amount_path = def.shape.total_path().unwrap_or(bucket_path);
            totals_by_bucket(&result.rows, bucket_path, amount_path)
        })
        .unwrap_or_default();

    if def.shape.total_path().is_some() {
        println!("Total: {}", format_report_amount(result.grand_total));
        for (bucket, amount) in &breakdown {
            println!("  {bucket}: {}", format_report_amount(*amount));
        }
    }

    if pdf {
        let pdf_path = write_pdf(cfg_dir, &def, &result, &state, filter_args, &breakdown)?;
        println!();
        println!("Saved: {}", pdf_path.display());
        if open {
            open_path(&pdf_path)?;
        }
    }

    Ok(())
}

/// Load a report's records from an explicit input file or the cache.
fn load_records(cfg_dir: &Path, def: &ReportDef, input: Option<PathBuf>) -> Result<Vec<Record>> {
    let path = match input {
        Some(path) => path,
        None => {
            let cached = cache_path(cfg_dir, def.name);
            if !cached.exists() {
                return Err(ConsoleError::NoData(def.name.to_string()));
            }
            cached
        }
    };

    let content = std::fs::read_to_string(&path)?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|e| ConsoleError::InputParse { path, source: e })?;
    Ok(records_from_response(value))
}

/// Parse a filter expression like "rep=Ahmed" into (slot, value)
fn parse_where(def: &ReportDef, expr: &str) -> Result<(String, String)> {
    let Some((slot, value)) = expr.split_once('=') else {
        return Err(ConsoleError::InvalidFilterExpr(expr.to_string()));
    };
    let slot = slot.trim();
    let value = value.trim();
    if slot.is_empty() || value.is_empty() {
        return Err(ConsoleError::InvalidFilterExpr(expr.to_string()));
    }

    if def.slot(slot).is_none() {
        return Err(ConsoleError::UnknownFilterSlot {
            report: def.name.to_string(),
            slot: slot.to_string(),
            available: def
                .slots
                .iter()
                .map(|s| s.slot.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        });
    }

    Ok((slot.to_string(), value.to_string()))
}

fn parse_cli_date(text: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|_| ConsoleError::InvalidDate(text.to_string()))
}

/// Build and write the print preview for a shaped report.
fn write_pdf(
    cfg_dir: &Path,
    def: &ReportDef,
    result: &crate::engine::ReportResult,
    state: &FilterState,
    filter_args: &[String],
    breakdown: &[(String, f64)],
) -> Result<PathBuf> {
    let config = load_config(cfg_dir)?;

    let mut filters: Vec<PrintFilter> = filter_args
        .iter()
        .filter_map(|expr| expr.split_once('='))
        .map(|(slot, value)| PrintFilter {
            label: slot.trim().to_string(),
            value: value.trim().to_string(),
        })
        .collect();
    if let Some(from) = state.from {
        filters.push(PrintFilter { label: "From".into(), value: from.to_string() });
    }
    if let Some(to) = state.to {
        filters.push(PrintFilter { label: "To".into(), value: to.to_string() });
    }

    let print_report = PrintReport {
        company: config.company.clone(),
        title: def.title.to_string(),
        generated_date: Local::now().format("%B %d, %Y").to_string(),
        filters,
        columns: result.columns.iter().map(|c| c.label.clone()).collect(),
        rows: result
            .rows
            .iter()
            .map(|record| {
                result
                    .columns
                    .iter()
                    .map(|column| def.shape.cell(record, column))
                    .collect()
            })
            .collect(),
        row_count: result.rows.len(),
        grand_total: def
            .shape
            .total_path()
            .map(|_| format_report_amount(result.grand_total)),
        breakdown: breakdown
            .iter()
            .map(|(bucket, amount)| PrintBucketTotal {
                bucket: bucket.clone(),
                amount: format_report_amount(*amount),
            })
            .collect(),
    };

    let output_dir = resolve_output_dir(&config.pdf.output_dir, cfg_dir);
    std::fs::create_dir_all(&output_dir)?;

    let today = Local::now().format("%Y-%m-%d").to_string();
    let pdf_path = output_dir.join(format!("REPORT-{}-{}.pdf", def.name, today));

    generate_report_pdf(&print_report, &pdf_path)?;

    Ok(pdf_path)
}

fn format_grouped_int(value: i64) -> String {
    let negative = value < 0;
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    let mut grouped: String = out.chars().rev().collect();
    if negative {
        grouped.insert(0, '-');
    }
    grouped
}

/// Format a money amount with two decimal places and thousands separators
fn format_report_amount(value: f64) -> String {
    let rounded = format!("{:.2}", value);
    let parts: Vec<&str> = rounded.split('.').collect();
    let whole = parts[0];
    let frac = parts[1];

    // Group digits in the whole part
    let negative = whole.starts_with('-');
    let digits = if negative { &whole[1..] } else { whole };
    let grouped = format_grouped_int(digits.parse::<i64>().unwrap_or(0));

    if negative {
        format!("-{}.{}", grouped, frac)
    } else {
        format!("{}.{}", grouped, frac)
    }
}

fn open_path(pdf_path: &Path) -> Result<()> {
    // Open with system default viewer
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(pdf_path)
            .spawn()
            .map_err(ConsoleError::Io)?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(pdf_path)
            .spawn()
            .map_err(ConsoleError::Io)?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", pdf_path.to_str().unwrap_or("")])
            .spawn()
            .map_err(ConsoleError::Io)?;
    }
    Ok(())
}

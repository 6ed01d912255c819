use std::path::Path;
use std::process::Command;

use crate::error::{ConsoleError, Result};
use crate::pdf::PrintReport;

/// Embedded Typst template for report previews
/// Uses a placeholder that gets replaced with the actual JSON file path
const REPORT_TEMPLATE: &str = r##"// Report Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  margin: (top: 1in, bottom: 1in, left: 0.8in, right: 0.8in),
)

#set text(font: "Helvetica", size: 9pt)

// Header with company info and report title
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 16pt, weight: "bold")[#data.company.name]
    #v(0.3em)
    #data.company.address \
    #data.company.city, #data.company.country \
    #data.company.email
    #if data.company.phone != none [
      \ #data.company.phone
    ]
  ],
  [
    #text(size: 18pt, weight: "bold")[#upper(data.title)]
    #v(0.5em)
    #text(size: 9pt, fill: gray)[Generated #data.generated_date]
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + gray)
#v(1em)

// Active filters block
#if data.filters.len() > 0 [
  #text(weight: "bold", size: 10pt)[Filters:]
  #v(0.3em)
  #for f in data.filters [
    #f.label: #f.value \
  ]
  #v(1em)
]

// Report table with data-dependent columns
#table(
  columns: data.columns.len(),
  align: (x, y) => if y == 0 { center } else { left },
  stroke: (x, y) => if y == 0 { (bottom: 1pt + black) } else { (bottom: 0.5pt + gray) },
  inset: 6pt,
  fill: (x, y) => if y == 0 { luma(240) } else { none },

  // Header
  ..data.columns.map(c => [*#c*]),

  // Rows
  ..data.rows.map(row => row.map(cell => [#cell])).flatten()
)

#v(1em)
#text(size: 9pt)[#data.row_count rows]

// Summary (right-aligned)
#if data.grand_total != none [
  #v(0.5em)
  #align(right)[
    #table(
      columns: (auto, auto),
      stroke: none,
      align: (right, right),
      inset: 4pt,

      ..data.breakdown.map(b => ([#b.bucket:], [#b.amount])).flatten(),

      table.hline(stroke: 1pt),
      [*Total:*], [*#data.grand_total*],
    )
  ]
]

#if data.company.tax_id != none [
  #v(2em)
  #text(size: 8pt, fill: gray)[Tax ID: #data.company.tax_id]
]
"##;

/// Generate a report preview PDF using Typst CLI
pub fn generate_report_pdf(report: &PrintReport, output_path: &Path) -> Result<()> {
    // Check if typst is available
    let typst_check = Command::new("typst").arg("--version").output();

    if typst_check.is_err() {
        return Err(ConsoleError::TypstNotFound);
    }

    // Create temp directory for template
    let temp_dir = std::env::temp_dir().join("tradectl");
    std::fs::create_dir_all(&temp_dir)?;

    // Serialize report data to JSON
    let json_data =
        serde_json::to_string(report).map_err(|e| ConsoleError::PdfGeneration(e.to_string()))?;

    // Write JSON to temp file
    let json_path = temp_dir.join("report_data.json");
    std::fs::write(&json_path, &json_data)?;

    // Write template with relative JSON path (data file is in the same directory)
    let template_content = REPORT_TEMPLATE.replace("DATA_JSON_PATH", "report_data.json");
    let template_path = temp_dir.join("report.typ");
    std::fs::write(&template_path, &template_content)?;

    // Run typst compile with root set to temp directory
    let output = Command::new("typst")
        .args([
            "compile",
            "--root",
            temp_dir.to_str().unwrap_or("."),
            template_path.to_str().unwrap_or("report.typ"),
            output_path.to_str().unwrap_or("report.pdf"),
        ])
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ConsoleError::PdfGeneration(stderr.to_string()));
    }

    // Clean up temp files
    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    Ok(())
}

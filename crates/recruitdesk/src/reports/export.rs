use std::fmt::Write as _;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::table::{ReportInput, ReportTable};

/// Excel MIME type attached to what is still plain CSV text.
pub const EXCEL_CONTENT_TYPE: &str = "application/vnd.ms-excel";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    Csv,
    Excel,
    /// Printable HTML; the print dialog produces the PDF.
    Pdf,
}

impl ExportFormat {
    pub fn content_type(self) -> String {
        match self {
            Self::Csv => mime::TEXT_CSV.to_string(),
            Self::Excel => EXCEL_CONTENT_TYPE.to_string(),
            Self::Pdf => mime::TEXT_HTML_UTF_8.to_string(),
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv | Self::Excel => "csv",
            Self::Pdf => "html",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(Self::Csv),
            "excel" | "xls" => Ok(Self::Excel),
            "pdf" | "html" | "print" => Ok(Self::Pdf),
            other => Err(format!("unknown export format '{other}' (expected csv, excel or pdf)")),
        }
    }
}

/// Downloadable export: what the browser would have received as a Blob.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportArtifact {
    pub file_name: String,
    pub content_type: String,
    pub body: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("select at least one known report field")]
    NoFields,
    #[error("failed to write delimited output: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush delimited output: {0}")]
    Flush(String),
    #[error("delimited output is not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// `{role}-report-{YYYY-MM-DD}.{ext}`
pub fn report_file_name(input: &ReportInput, format: ExportFormat, generated_on: NaiveDate) -> String {
    format!(
        "{}-report-{}.{}",
        input.role.prefix(),
        generated_on.format("%Y-%m-%d"),
        format.extension()
    )
}

pub fn report_title(input: &ReportInput) -> String {
    format!("{} Performance Report", input.role.label())
}

/// Builds the table for `selected_fields` and renders it in `format`.
pub fn export_report<K: AsRef<str>>(
    selected_fields: &[K],
    input: &ReportInput,
    format: ExportFormat,
    generated_on: NaiveDate,
) -> Result<ExportArtifact, ExportError> {
    let table = ReportTable::build(selected_fields, input);
    if table.is_empty() {
        return Err(ExportError::NoFields);
    }

    let body = match format {
        ExportFormat::Csv => render_csv(&table)?,
        ExportFormat::Excel => render_excel(&table, input, generated_on)?,
        ExportFormat::Pdf => render_printable_html(&table, input, generated_on),
    };

    let artifact = ExportArtifact {
        file_name: report_file_name(input, format, generated_on),
        content_type: format.content_type(),
        body,
    };
    info!(
        file_name = %artifact.file_name,
        columns = table.headers.len(),
        "report exported"
    );
    Ok(artifact)
}

/// Header line and value line, no trailing newline.
pub fn render_csv(table: &ReportTable) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    writer.write_record(table.values())?;
    let bytes = writer
        .into_inner()
        .map_err(|err| ExportError::Flush(err.to_string()))?;
    let text = String::from_utf8(bytes)?;
    Ok(text.trim_end_matches(['\r', '\n']).to_string())
}

/// Title line and a blank line ahead of the CSV rows.
pub fn render_excel(
    table: &ReportTable,
    input: &ReportInput,
    generated_on: NaiveDate,
) -> Result<String, ExportError> {
    let rows = render_csv(table)?;
    Ok(format!(
        "{} - {}\n\n{}",
        report_title(input),
        generated_on.format("%Y-%m-%d"),
        rows
    ))
}

/// Standalone HTML page that opens the print dialog once loaded.
pub fn render_printable_html(
    table: &ReportTable,
    input: &ReportInput,
    generated_on: NaiveDate,
) -> String {
    let title = escape_html(&report_title(input));
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    let _ = writeln!(html, "<title>{title}</title>");
    html.push_str(
        "<style>body{font-family:Arial,sans-serif;margin:24px;}table{border-collapse:collapse;width:100%;}th,td{border:1px solid #ccc;padding:6px 10px;text-align:left;}th{background:#f3f4f6;}</style>\n",
    );
    html.push_str("</head>\n<body onload=\"window.print()\">\n");
    let _ = writeln!(html, "<h1>{title}</h1>");
    let _ = writeln!(
        html,
        "<p>Prepared for {} ({}) &middot; {}</p>",
        escape_html(&input.user.name),
        escape_html(&input.user.user_code),
        escape_html(&input.user.email)
    );
    let _ = writeln!(html, "<p>Generated {}</p>", generated_on.format("%B %d, %Y"));

    html.push_str("<table>\n<thead><tr>");
    for header in &table.headers {
        let _ = write!(html, "<th>{}</th>", escape_html(header));
    }
    html.push_str("</tr></thead>\n<tbody><tr>");
    for cell in &table.cells {
        let _ = write!(html, "<td>{}</td>", escape_html(&cell.text));
    }
    html.push_str("</tr></tbody>\n</table>\n</body>\n</html>\n");

    html
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

//! Single-row performance report export: CSV, Excel-flavoured CSV and a
//! printable HTML page for PDF output.

mod export;
mod fields;
mod router;
mod table;

pub use export::{
    export_report, render_csv, render_excel, render_printable_html, report_file_name,
    report_title, ExportArtifact, ExportError, ExportFormat, EXCEL_CONTENT_TYPE,
};
pub use fields::ReportField;
pub use router::{report_router, ExportRequest, ReportingState, SummaryRequest, SummaryResponse};
pub use table::{ReportCell, ReportIdentity, ReportInput, ReportScore, ReportTable};

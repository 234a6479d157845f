// ==========================================
// 加油站油量报表系统 - 导出层
// ==========================================
// 职责: Totals（+ 明细读数）→ xlsx 报表文件
// ==========================================

pub mod error;
pub mod report_exporter;
pub mod workbook_builder;

pub use error::{ExportError, ExportOutcome};
pub use report_exporter::{export, ExportResult, ExportSink, ReportExporter};
pub use workbook_builder::{DETAIL_SHEET, SUMMARY_SHEET};

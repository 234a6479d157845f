// ==========================================
// 加油站油量报表系统 - 报表导出器
// ==========================================
// 流程: 内存构建工作簿 → 写入同目录临时文件 → 原子替换目标文件
// 红线: 失败时不留下半成品报表
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::totals::Totals;
use crate::exporter::error::{ExportError, ExportOutcome};
use crate::exporter::workbook_builder::WorkbookBuilder;
use crate::i18n::ReportLabels;
use chrono::NaiveDate;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info, instrument};

// ==========================================
// ExportSink - 导出目标
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportSink {
    pub path: PathBuf,
}

impl ExportSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// 按日期命名: `<dir>/<prefix>_<YYYY-MM-DD>.xlsx`
    ///
    /// 同一天再次导出会覆盖当天的文件。
    pub fn dated(dir: impl AsRef<Path>, prefix: &str, date: NaiveDate) -> Self {
        let file_name = format!("{}_{}.xlsx", prefix, date.format("%Y-%m-%d"));
        Self::new(dir.as_ref().join(file_name))
    }
}

/// 导出结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportResult {
    pub path: PathBuf,
    pub summary_rows: usize,
    pub detail_rows: usize,
    pub bytes_written: usize,
}

// ==========================================
// ReportExporter
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ReportExporter {
    labels: ReportLabels,
}

impl ReportExporter {
    pub fn new(labels: ReportLabels) -> Self {
        Self { labels }
    }

    pub fn labels(&self) -> &ReportLabels {
        &self.labels
    }

    /// 导出报表
    ///
    /// # 参数
    /// - totals: 汇总结果
    /// - detail: 明细读数（Some 时额外生成 Detail 表）
    /// - sink: 导出目标
    ///
    /// # 返回
    /// - Ok(ExportResult): 写入路径与行数
    /// - Err(ExportError): 目标文件未被改动
    #[instrument(skip(self, totals, detail), fields(path = %sink.path.display()))]
    pub fn export(
        &self,
        totals: &Totals,
        detail: Option<&[Reading]>,
        sink: &ExportSink,
    ) -> ExportOutcome<ExportResult> {
        info!(stations = totals.stations.len(), "开始导出报表");

        let ext = sink
            .path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase();
        if ext != "xlsx" {
            return Err(ExportError::UnsupportedFormat(ext));
        }

        let built = WorkbookBuilder::new(&self.labels).build(totals, detail)?;
        debug!(bytes = built.bytes.len(), "工作簿构建完成");

        write_atomically(&sink.path, &built.bytes)?;

        let result = ExportResult {
            path: sink.path.clone(),
            summary_rows: built.summary_rows,
            detail_rows: built.detail_rows,
            bytes_written: built.bytes.len(),
        };
        info!(
            summary_rows = result.summary_rows,
            detail_rows = result.detail_rows,
            bytes = result.bytes_written,
            "报表导出完成"
        );
        Ok(result)
    }
}

/// 临时文件写满并落盘后再替换目标
fn write_atomically(path: &Path, bytes: &[u8]) -> ExportOutcome<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    fs::create_dir_all(&dir).map_err(|source| ExportError::DirectoryCreate {
        path: dir.clone(),
        source,
    })?;

    let mut temp = NamedTempFile::new_in(&dir)?;
    temp.write_all(bytes)?;
    temp.as_file().sync_all()?;

    temp.persist(path).map_err(|e| ExportError::Persist {
        path: path.to_path_buf(),
        source: e.error,
    })?;
    Ok(())
}

/// 便捷入口: 默认标签（en）
pub fn export(
    totals: &Totals,
    detail: Option<&[Reading]>,
    sink: &ExportSink,
) -> ExportOutcome<ExportResult> {
    ReportExporter::default().export(totals, detail, sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::price::PriceTable;
    use crate::domain::types::FuelCategory;
    use crate::engine::aggregate;
    use tempfile::TempDir;

    fn sample() -> (Vec<Reading>, Totals) {
        let readings = vec![Reading::new("S1", "P1", FuelCategory::fuel(), 0.0, 10.0)];
        let prices = PriceTable::new().with("S1", FuelCategory::fuel(), 2.0).unwrap();
        let totals = aggregate(&readings, &prices).unwrap();
        (readings, totals)
    }

    #[test]
    fn test_dated_sink_name() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let sink = ExportSink::dated("/tmp/reports", "Gas_Station_Report", date);
        assert_eq!(
            sink.path,
            PathBuf::from("/tmp/reports/Gas_Station_Report_2024-03-09.xlsx")
        );
    }

    #[test]
    fn test_export_creates_directory_and_file() {
        let dir = TempDir::new().unwrap();
        let sink = ExportSink::new(dir.path().join("nested").join("report.xlsx"));
        let (readings, totals) = sample();

        let result = export(&totals, Some(&readings), &sink).unwrap();

        assert!(sink.path.exists());
        assert_eq!(result.detail_rows, 1);
        assert_eq!(
            fs::metadata(&sink.path).unwrap().len() as usize,
            result.bytes_written
        );
    }

    #[test]
    fn test_export_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let sink = ExportSink::new(dir.path().join("report.xlsx"));
        fs::write(&sink.path, b"old").unwrap();
        let (_, totals) = sample();

        export(&totals, None, &sink).unwrap();

        let content = fs::read(&sink.path).unwrap();
        assert_eq!(&content[..2], b"PK");
        // 仅剩目标文件, 无残留临时文件
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_rejects_non_xlsx_target() {
        let dir = TempDir::new().unwrap();
        let sink = ExportSink::new(dir.path().join("report.csv"));
        let (_, totals) = sample();
        let result = export(&totals, None, &sink);
        assert!(matches!(result, Err(ExportError::UnsupportedFormat(_))));
        assert!(!sink.path.exists());
    }
}

// ==========================================
// 加油站油量报表系统 - 报表 API
// ==========================================
// 职责: 串联 导入 → 汇总 → 导出, 供 CLI 与录入界面调用
// 规则: 显式传入的单价覆盖表格中携带的单价
// ==========================================

use crate::api::error::ApiResult;
use crate::api::manual_entry::ManualEntry;
use crate::config::ReportConfig;
use crate::domain::import_report::{ImportOutcome, ImportWarning};
use crate::domain::price::PriceTable;
use crate::domain::reading::Reading;
use crate::domain::totals::Totals;
use crate::domain::types::FuelCategory;
use crate::engine::{render_summary, AggregationEngine};
use crate::exporter::{ExportResult, ExportSink, ReportExporter};
use crate::importer::{ImportSource, ReadingImporter, ReadingImporterImpl, RowSchema};
use chrono::Local;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, instrument, warn};

/// 单次运行选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOptions {
    /// None 时写入默认的按日期命名文件
    pub output: Option<PathBuf>,
    /// 是否附带 Detail 表
    pub include_detail: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            output: None,
            include_detail: true,
        }
    }
}

/// 一次完整运行的结果
#[derive(Debug, Clone, Serialize)]
pub struct ReportRun {
    pub batch_id: Option<String>,
    pub warnings: Vec<ImportWarning>,
    pub reading_count: usize,
    pub totals: Totals,
    pub export: ExportResult,
    pub summary_text: String,
}

// ==========================================
// ReportApi
// ==========================================
pub struct ReportApi {
    config: ReportConfig,
    engine: AggregationEngine,
    exporter: ReportExporter,
}

impl ReportApi {
    pub fn new(config: ReportConfig) -> Self {
        let engine = AggregationEngine::new(config.mode());
        let exporter = ReportExporter::new(config.labels());
        Self {
            config,
            engine,
            exporter,
        }
    }

    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// 单油品表格使用配置中的默认油品
    pub fn single_category_schema(&self) -> RowSchema {
        RowSchema::SingleCategory(self.config.default_category.clone())
    }

    /// 重新导入本系统导出的 Summary 表
    pub fn summary_schema(&self, categories: Vec<FuelCategory>) -> RowSchema {
        RowSchema::Summary {
            categories,
            grand_total_label: self.exporter.labels().grand_total(),
        }
    }

    pub fn import_file(&self, source: &ImportSource, schema: RowSchema) -> ApiResult<ImportOutcome> {
        let importer = ReadingImporterImpl::with_schema(schema, self.config.data_cleaner());
        Ok(importer.import(source)?)
    }

    pub fn aggregate(&self, readings: &[Reading], prices: &PriceTable) -> ApiResult<Totals> {
        Ok(self.engine.aggregate(readings, prices)?)
    }

    /// 导出报表
    ///
    /// # 参数
    /// - output: None 时使用 `<report_dir>/<file_prefix>_<今天>.xlsx`
    pub fn export(
        &self,
        totals: &Totals,
        detail: Option<&[Reading]>,
        output: Option<PathBuf>,
    ) -> ApiResult<ExportResult> {
        let sink = match output {
            Some(path) => ExportSink::new(path),
            None => self.config.default_sink(Local::now().date_naive()),
        };
        Ok(self.exporter.export(totals, detail, &sink)?)
    }

    pub fn summary_text(&self, totals: &Totals) -> String {
        render_summary(totals, self.exporter.labels())
    }

    /// 完整流程（默认导出位置, 附带 Detail 表）
    pub fn run(
        &self,
        source: &ImportSource,
        schema: RowSchema,
        prices: Option<&PriceTable>,
    ) -> ApiResult<ReportRun> {
        self.run_with(source, schema, prices, &RunOptions::default())
    }

    /// 完整流程: 导入 → 合并单价 → 汇总 → 导出
    #[instrument(skip_all, fields(path = %source.path.display()))]
    pub fn run_with(
        &self,
        source: &ImportSource,
        schema: RowSchema,
        prices: Option<&PriceTable>,
        options: &RunOptions,
    ) -> ApiResult<ReportRun> {
        let outcome = self.import_file(source, schema)?;
        if outcome.has_warnings() {
            warn!(count = outcome.warnings.len(), "导入存在告警行, 已跳过");
        }

        let mut table = outcome.prices.clone();
        if let Some(explicit) = prices {
            table.merge_from(explicit);
        }

        let mut run = self.finish_run(&outcome.readings, &table, options)?;
        run.batch_id = Some(outcome.batch_id);
        run.warnings = outcome.warnings;
        Ok(run)
    }

    /// 手工录入流程
    pub fn run_manual(&self, entry: ManualEntry, options: &RunOptions) -> ApiResult<ReportRun> {
        let (readings, prices) = entry.into_inputs()?;
        self.finish_run(&readings, &prices, options)
    }

    fn finish_run(
        &self,
        readings: &[Reading],
        prices: &PriceTable,
        options: &RunOptions,
    ) -> ApiResult<ReportRun> {
        let totals = self.aggregate(readings, prices)?;
        let detail = options.include_detail.then_some(readings);
        let export = self.export(&totals, detail, options.output.clone())?;
        let summary_text = self.summary_text(&totals);

        info!(
            readings = readings.len(),
            path = %export.path.display(),
            "报表生成完成"
        );

        Ok(ReportRun {
            batch_id: None,
            warnings: Vec::new(),
            reading_count: readings.len(),
            totals,
            export,
            summary_text,
        })
    }
}

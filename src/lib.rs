// ==========================================
// 加油站油量报表系统 - 核心库
// ==========================================
// 流程: 表格导入 → 按站点/油品汇总 → 导出 xlsx 报表
// 技术栈: calamine + csv 读取, rust_xlsxwriter 写出
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 读数、单价、汇总结果
pub mod domain;

// 导入层 - 表格文件
pub mod importer;

// 引擎层 - 汇总与摘要
pub mod engine;

// 导出层 - xlsx 报表
pub mod exporter;

// 配置层 - 报表配置与单价文件
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域
pub use domain::{
    CategoryTotals, FuelCategory, GrandTotals, ImportOutcome, ImportWarning, PriceKey,
    PriceTable, Reading, StationTotals, Totals, WarningKind,
};

// 导入 / 汇总 / 导出
pub use engine::{aggregate, render_summary, AggregationEngine, AggregationError, AggregationMode};
pub use exporter::{export, ExportError, ExportResult, ExportSink};
pub use importer::{import, ImportError, ImportSource, RowSchema};

// 配置与 API
pub use api::{ApiError, ApiResult, ManualEntry, ReportApi, ReportRun, RunOptions};
pub use config::{ConfigError, ReportConfig};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "加油站油量报表系统";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}

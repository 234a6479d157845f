// ==========================================
// 加油站油量报表系统 - 配置层
// ==========================================
// 职责: 报表配置（JSON + 环境变量覆写）与单价文件加载
// ==========================================

pub mod price_file;
pub mod report_config;

pub use price_file::{load_price_table, parse_price_table};
pub use report_config::{default_report_dir, ConfigError, ReportConfig};

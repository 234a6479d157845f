// ==========================================
// 加油站油量报表系统 - 领域模型层
// ==========================================
// 职责: 定义读数、单价表、汇总结果、导入结果
// 红线: 不含文件读写逻辑, 不含汇总逻辑
// ==========================================

pub mod import_report;
pub mod price;
pub mod reading;
pub mod totals;
pub mod types;

// 重导出核心类型
pub use import_report::{ImportOutcome, ImportWarning, WarningKind};
pub use price::{PriceError, PriceKey, PriceTable};
pub use reading::Reading;
pub use totals::{CategoryTotals, GrandTotals, StationTotals, Totals};
pub use types::FuelCategory;

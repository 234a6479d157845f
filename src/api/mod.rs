// ==========================================
// 加油站油量报表系统 - API 层
// ==========================================
// 职责: 对 CLI 与录入界面提供统一业务接口
// ==========================================

pub mod error;
pub mod manual_entry;
pub mod report_api;

// 重导出核心类型
pub use error::{ApiError, ApiResult};
pub use manual_entry::{CategoryPriceEntry, ManualEntry, PumpEntry, StationEntry};
pub use report_api::{ReportApi, ReportRun, RunOptions};

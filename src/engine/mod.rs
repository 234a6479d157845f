// ==========================================
// 加油站油量报表系统 - 引擎层
// ==========================================
// 职责: 读数汇总 + 摘要渲染
// 红线: 引擎不读写文件, 不持有跨调用的可变状态
// ==========================================

pub mod aggregator;
pub mod summary;

// 重导出核心引擎
pub use aggregator::{
    aggregate, AggregationEngine, AggregationError, AggregationMode, PricingError,
    ValidationError,
};
pub use summary::render_summary;

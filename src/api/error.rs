// ==========================================
// 加油站油量报表系统 - API 层错误类型
// ==========================================
// 职责: 汇聚各层错误, 对调用方提供统一错误出口
// ==========================================

use crate::config::ConfigError;
use crate::domain::price::PriceError;
use crate::engine::AggregationError;
use crate::exporter::ExportError;
use crate::importer::ImportError;
use thiserror::Error;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("汇总失败: {0}")]
    Aggregation(#[from] AggregationError),

    #[error("导出失败: {0}")]
    Export(#[from] ExportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("单价错误: {0}")]
    Price(#[from] PriceError),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::PricingError;
    use crate::domain::types::FuelCategory;

    #[test]
    fn test_error_messages_keep_cause() {
        let err: ApiError = AggregationError::from(PricingError {
            station_id: "S9".to_string(),
            category: FuelCategory::diesel(),
        })
        .into();
        let message = err.to_string();
        assert!(message.contains("S9"));
        assert!(message.contains("Diesel"));
    }

    #[test]
    fn test_import_error_converts() {
        let err: ApiError = ImportError::SheetNotFound("Feuil9".to_string()).into();
        assert!(matches!(err, ApiError::Import(ImportError::SheetNotFound(_))));
    }
}

// ==========================================
// 加油站油量报表系统 - 导出模块错误类型
// ==========================================
// 说明: 任一错误发生时目标文件保持原状（不存在或旧版本）
// ==========================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("无法创建报表目录 {path}: {source}")]
    DirectoryCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("工作簿生成失败: {0}")]
    Workbook(String),

    #[error("临时文件写入失败: {0}")]
    TempFile(#[from] std::io::Error),

    #[error("报表文件写入失败 {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("导出文件格式不支持: {0}（仅支持 .xlsx）")]
    UnsupportedFormat(String),
}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(err: rust_xlsxwriter::XlsxError) -> Self {
        ExportError::Workbook(err.to_string())
    }
}

/// Result 类型别名
pub type ExportOutcome<T> = Result<T, ExportError>;

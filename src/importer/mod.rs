// ==========================================
// 加油站油量报表系统 - 导入层
// ==========================================
// 职责: 表格文件 → Reading 列表 + 行级告警
// 支持: Excel, CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod reading_importer_impl;
pub mod reading_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{FieldMapper, RowSchema, SUMMARY_PUMP_ID};
pub use file_parser::{
    CsvParser, ExcelParser, ImportSource, RawCell, RawRow, SheetSelector, UniversalFileParser,
};
pub use reading_importer_impl::{import, ReadingImporterImpl};

// 重导出 Trait 接口
pub use reading_importer_trait::{FileParser, ReadingImporter};

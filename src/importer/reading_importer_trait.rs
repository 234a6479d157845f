// ==========================================
// 加油站油量报表系统 - 读数导入 Trait
// ==========================================
// 职责: 定义读数导入接口（不包含实现）
// 流程: 文件解析 → 逐行映射 → 单价归并
// ==========================================

use crate::domain::import_report::ImportOutcome;
use crate::importer::error::ImportResult;
use crate::importer::file_parser::{ImportSource, RawRow};

// ==========================================
// ReadingImporter Trait
// ==========================================
// 用途: 读数导入主接口
// 实现者: ReadingImporterImpl
pub trait ReadingImporter {
    /// 从表格文件导入读数
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 合格读数 + 行级告警（坏行不会中断导入）
    /// - Err: 文件无法打开或不是可识别的表格文件
    fn import(&self, source: &ImportSource) -> ImportResult<ImportOutcome>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口
// 实现者: CsvParser, ExcelParser, UniversalFileParser
pub trait FileParser {
    /// 解析文件为原始行（已跳过表头与全空行, 保留源行号）
    fn parse_to_raw_rows(&self, source: &ImportSource) -> ImportResult<Vec<RawRow>>;
}

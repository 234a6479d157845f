// ==========================================
// 加油站油量报表系统 - 导入结果模型
// ==========================================
// 行级问题 → ImportWarning（跳过该行, 继续处理）
// 整体问题 → ImportError（见 importer::error）
// ==========================================

use crate::domain::price::PriceTable;
use crate::domain::reading::Reading;
use serde::Serialize;
use std::fmt;

/// 行级告警类型
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WarningKind {
    /// 列数不足
    TooFewColumns { found: usize, required: usize },
    /// 必填单元格为空
    MissingCell { column: String },
    /// 数值无法解析
    InvalidNumber { column: String, value: String },
    /// 同一 (站点, 油品) 出现不同单价
    PriceConflict { existing: f64, found: f64 },
    /// 汇总表中 (升数, 营业额) 只填了一半
    IncompleteSummaryPair { category: String },
    /// 汇总表站点行没有任何油品数据
    EmptySummaryRow,
    /// 单元格不是有效的 UTF-8（1-based 列号）
    InvalidEncoding { column: usize },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::TooFewColumns { found, required } => {
                write!(f, "列数不足: 实际 {}，至少需要 {}", found, required)
            }
            WarningKind::MissingCell { column } => write!(f, "必填字段为空: {}", column),
            WarningKind::InvalidNumber { column, value } => {
                write!(f, "无法解析为数值 ({}): '{}'", column, value)
            }
            WarningKind::PriceConflict { existing, found } => {
                write!(f, "单价冲突: 已有 {}，本行 {}", existing, found)
            }
            WarningKind::IncompleteSummaryPair { category } => {
                write!(f, "汇总数据不完整: {} 的升数与营业额须同时填写", category)
            }
            WarningKind::EmptySummaryRow => write!(f, "汇总行没有任何油品数据"),
            WarningKind::InvalidEncoding { column } => {
                write!(f, "第 {} 列不是有效的 UTF-8 文本", column)
            }
        }
    }
}

/// 行级告警（1-based 源文件行号）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportWarning {
    pub row: usize,
    pub kind: WarningKind,
}

impl ImportWarning {
    pub fn new(row: usize, kind: WarningKind) -> Self {
        Self { row, kind }
    }

    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "第 {} 行: {}", self.row, self.kind)
    }
}

// ==========================================
// ImportOutcome - 一次导入的结果
// ==========================================
#[derive(Debug, Clone, Default)]
pub struct ImportOutcome {
    pub batch_id: String,
    pub readings: Vec<Reading>,      // 与源文件行序一致
    pub prices: PriceTable,          // 仅当行格式携带单价时非空
    pub warnings: Vec<ImportWarning>,
    pub total_rows: usize,           // 参与校验的数据行（不含表头和空行）
}

impl ImportOutcome {
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_warning_display_names_row() {
        let w = ImportWarning::new(
            4,
            WarningKind::InvalidNumber {
                column: "final".to_string(),
                value: "abc".to_string(),
            },
        );
        let text = w.message();
        assert!(text.contains('4'));
        assert!(text.contains("abc"));
    }

    #[test]
    fn test_has_warnings() {
        let mut outcome = ImportOutcome::default();
        assert!(!outcome.has_warnings());

        outcome
            .warnings
            .push(ImportWarning::new(3, WarningKind::InvalidEncoding { column: 2 }));
        assert!(outcome.has_warnings());
        assert!(outcome.warnings[0].message().contains("UTF-8"));
    }
}

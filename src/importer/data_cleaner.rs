// ==========================================
// 加油站油量报表系统 - 数据清洗器实现
// ==========================================
// 职责: TRIM / 标识符强制转文本 / 数值解析 / 油品别名归一
// ==========================================

use crate::domain::types::{normalize_id, FuelCategory};
use crate::importer::file_parser::RawCell;
use std::collections::HashMap;

/// 默认油品别名（源表格使用法文标签）
pub const DEFAULT_CATEGORY_ALIASES: &[(&str, &str)] = &[
    ("Essence", FuelCategory::FUEL),
    ("Gasoil", FuelCategory::DIESEL),
];

#[derive(Debug, Clone)]
pub struct DataCleaner {
    // key: 小写别名
    category_aliases: HashMap<String, FuelCategory>,
}

impl Default for DataCleaner {
    fn default() -> Self {
        let aliases = DEFAULT_CATEGORY_ALIASES
            .iter()
            .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()));
        Self::with_aliases(aliases)
    }
}

impl DataCleaner {
    /// 使用自定义别名表（alias → 标准油品名, 别名大小写不敏感）
    pub fn with_aliases<I>(aliases: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            category_aliases: aliases
                .into_iter()
                .map(|(alias, canonical)| {
                    (alias.trim().to_lowercase(), FuelCategory::new(canonical))
                })
                .collect(),
        }
    }

    /// 标识符（站点号 / 油枪号）: 数值与文本统一为 TRIM 后的文本
    ///
    /// # 返回
    /// - None: 空单元格
    pub fn identifier(&self, cell: Option<&RawCell>) -> Option<String> {
        match cell {
            None => None,
            Some(c) if c.is_blank() => None,
            Some(c) => Some(normalize_id(&c.to_string())),
        }
    }

    /// 油品类别（经别名归一, 未知名称原样保留）
    pub fn category(&self, cell: Option<&RawCell>) -> Option<FuelCategory> {
        let text = self.identifier(cell)?;
        match self.category_aliases.get(&text.to_lowercase()) {
            Some(canonical) => Some(canonical.clone()),
            None => Some(FuelCategory::new(text)),
        }
    }

    /// 数值单元格
    ///
    /// # 返回
    /// - Ok(None): 空单元格
    /// - Ok(Some(v)): 有限数值
    /// - Err(原文): 无法解析（含 NaN / inf）
    pub fn number(&self, cell: Option<&RawCell>) -> Result<Option<f64>, String> {
        match cell {
            None | Some(RawCell::Empty) => Ok(None),
            Some(RawCell::Number(n)) if n.is_finite() => Ok(Some(*n)),
            Some(RawCell::Number(n)) => Err(n.to_string()),
            Some(RawCell::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(RawCell::Text(s)) => self.parse_number(s).map(Some).ok_or_else(|| s.clone()),
        }
    }

    /// 解析数值文本
    ///
    /// 兼容十进制逗号（"12,5"）, 前提是文本中没有小数点且只有一个逗号。
    pub fn parse_number(&self, text: &str) -> Option<f64> {
        let trimmed = text.trim();
        let parsed = trimmed.parse::<f64>().ok().or_else(|| {
            if !trimmed.contains('.') && trimmed.matches(',').count() == 1 {
                trimmed.replace(',', ".").parse::<f64>().ok()
            } else {
                None
            }
        })?;
        parsed.is_finite().then_some(parsed)
    }
}

// ==========================================
// 加油站油量报表系统 - 领域类型定义
// ==========================================
// 油品类别为开放集合: 新增油品无需改代码
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 油品类别 (Fuel Category)
// ==========================================
// 比较口径: TRIM 后精确相等
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct FuelCategory(String);

impl FuelCategory {
    pub const FUEL: &'static str = "Fuel";
    pub const DIESEL: &'static str = "Diesel";

    pub fn new(name: impl AsRef<str>) -> Self {
        Self(name.as_ref().trim().to_string())
    }

    /// 汽油
    pub fn fuel() -> Self {
        Self::new(Self::FUEL)
    }

    /// 柴油
    pub fn diesel() -> Self {
        Self::new(Self::DIESEL)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FuelCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for FuelCategory {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for FuelCategory {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<FuelCategory> for String {
    fn from(value: FuelCategory) -> Self {
        value.0
    }
}

/// 标识符标准化（站点号 / 油枪号）
///
/// 数值与文本统一为 TRIM 后的字符串，"3" 与 " 3 " 视为同一标识。
pub fn normalize_id(raw: &str) -> String {
    raw.trim().to_string()
}

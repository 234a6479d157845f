// ==========================================
// 加油站油量报表系统 - 单价表
// ==========================================
// 键: (station_id, category) 复合键
// 红线: 缺失单价不得默认为 0（由汇总引擎报 PricingError）
// ==========================================

use crate::domain::types::{normalize_id, FuelCategory};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

// ==========================================
// PriceKey - 定价复合键
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct PriceKey {
    pub station_id: String,
    pub category: FuelCategory,
}

impl PriceKey {
    pub fn new(station_id: impl AsRef<str>, category: FuelCategory) -> Self {
        Self {
            station_id: normalize_id(station_id.as_ref()),
            category,
        }
    }
}

impl fmt::Display for PriceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.station_id, self.category)
    }
}

/// 单价错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PriceError {
    #[error("单价无效 {key}: {value}（必须为非负有限数）")]
    InvalidPrice { key: PriceKey, value: f64 },
}

// ==========================================
// PriceTable - 每升单价表
// ==========================================
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    prices: HashMap<PriceKey, f64>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入单价，返回被覆盖的旧值
    pub fn insert(
        &mut self,
        station_id: impl AsRef<str>,
        category: FuelCategory,
        price_per_liter: f64,
    ) -> Result<Option<f64>, PriceError> {
        self.insert_key(PriceKey::new(station_id, category), price_per_liter)
    }

    pub fn insert_key(&mut self, key: PriceKey, price_per_liter: f64) -> Result<Option<f64>, PriceError> {
        if !price_per_liter.is_finite() || price_per_liter < 0.0 {
            return Err(PriceError::InvalidPrice {
                key,
                value: price_per_liter,
            });
        }
        Ok(self.prices.insert(key, price_per_liter))
    }

    /// 链式构造（测试与手工录入使用）
    pub fn with(
        mut self,
        station_id: impl AsRef<str>,
        category: FuelCategory,
        price_per_liter: f64,
    ) -> Result<Self, PriceError> {
        self.insert(station_id, category, price_per_liter)?;
        Ok(self)
    }

    pub fn get(&self, key: &PriceKey) -> Option<f64> {
        self.prices.get(key).copied()
    }

    pub fn contains(&self, key: &PriceKey) -> bool {
        self.prices.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&PriceKey, f64)> {
        self.prices.iter().map(|(k, v)| (k, *v))
    }

    /// 合并另一张单价表（other 中的条目优先）
    pub fn merge_from(&mut self, other: &PriceTable) {
        for (key, price) in other.iter() {
            self.prices.insert(key.clone(), price);
        }
    }
}

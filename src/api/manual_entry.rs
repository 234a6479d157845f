// ==========================================
// 加油站油量报表系统 - 手工录入
// ==========================================
// 职责: 录入表单内容（全部为文本）→ Reading 列表 + 单价表
// 规则: 任一字段为空或非数值, 整份录入失败并指明位置
// 规则: 油枪号在同一站点、同一油品内从 1 开始编号
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::price::PriceTable;
use crate::domain::reading::Reading;
use crate::domain::types::FuelCategory;
use crate::importer::data_cleaner::DataCleaner;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 某油品的单价录入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryPriceEntry {
    pub category: FuelCategory,
    pub price: String,
}

/// 单支油枪的读数录入
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PumpEntry {
    pub category: FuelCategory,
    pub initial: String,
    #[serde(rename = "final")]
    pub final_reading: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StationEntry {
    /// 为空时使用 "Station {n}"
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub prices: Vec<CategoryPriceEntry>,
    #[serde(default)]
    pub pumps: Vec<PumpEntry>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ManualEntry {
    pub stations: Vec<StationEntry>,
}

impl StationEntry {
    fn station_id(&self, index: usize) -> String {
        match self.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => format!("Station {}", index + 1),
        }
    }
}

fn parse_field(cleaner: &DataCleaner, text: &str, location: impl FnOnce() -> String) -> ApiResult<f64> {
    if text.trim().is_empty() {
        return Err(ApiError::InvalidInput(format!("{} 未填写", location())));
    }
    cleaner.parse_number(text).ok_or_else(|| {
        ApiError::InvalidInput(format!("{} 不是有效数值: '{}'", location(), text.trim()))
    })
}

impl ManualEntry {
    /// 转换为汇总引擎输入
    ///
    /// # 返回
    /// - Ok((readings, prices)): 读数按录入顺序
    /// - Err(ApiError::InvalidInput): 站点数为 0, 或某字段为空/非数值
    pub fn into_inputs(self) -> ApiResult<(Vec<Reading>, PriceTable)> {
        if self.stations.is_empty() {
            return Err(ApiError::InvalidInput("站点数量至少为 1".to_string()));
        }

        let cleaner = DataCleaner::default();
        let mut readings = Vec::new();
        let mut prices = PriceTable::new();

        for (index, station) in self.stations.iter().enumerate() {
            let station_id = station.station_id(index);

            for entry in &station.prices {
                let price = parse_field(&cleaner, &entry.price, || {
                    format!("{} 的 {} 单价", station_id, entry.category)
                })?;
                prices.insert(&station_id, entry.category.clone(), price)?;
            }

            let mut pump_numbers: HashMap<&FuelCategory, usize> = HashMap::new();
            for pump in &station.pumps {
                let number = pump_numbers.entry(&pump.category).or_insert(0);
                *number += 1;
                let pump_id = number.to_string();

                let initial = parse_field(&cleaner, &pump.initial, || {
                    format!("{} {} 油枪 {} 的起始读数", station_id, pump.category, pump_id)
                })?;
                let final_reading = parse_field(&cleaner, &pump.final_reading, || {
                    format!("{} {} 油枪 {} 的结束读数", station_id, pump.category, pump_id)
                })?;

                readings.push(Reading::new(
                    &station_id,
                    &pump_id,
                    pump.category.clone(),
                    initial,
                    final_reading,
                ));
            }
        }

        Ok((readings, prices))
    }
}

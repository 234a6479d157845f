// ==========================================
// 加油站油量报表系统 - 单价文件
// ==========================================
// 格式: [{"station": "S1", "category": "Fuel", "price": 1.85}, ...]
// 说明: station 可写成数字, 与表格中的数值站点号等价
// ==========================================

use crate::config::report_config::ConfigError;
use crate::domain::price::PriceTable;
use crate::domain::types::FuelCategory;
use crate::importer::file_parser::RawCell;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StationValue {
    Text(String),
    Number(f64),
}

impl StationValue {
    fn into_id(self) -> String {
        match self {
            StationValue::Text(s) => s.trim().to_string(),
            StationValue::Number(n) => RawCell::Number(n).to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    station: StationValue,
    category: String,
    price: f64,
}

/// 解析单价 JSON
pub fn parse_price_table(content: &str) -> Result<PriceTable, ConfigError> {
    let entries: Vec<PriceEntry> =
        serde_json::from_str(content).map_err(|e| ConfigError::Invalid {
            key: "prices".to_string(),
            message: e.to_string(),
        })?;

    let mut table = PriceTable::new();
    for entry in entries {
        let station = entry.station.into_id();
        if station.is_empty() || entry.category.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "prices".to_string(),
                message: "站点号与油品不能为空".to_string(),
            });
        }
        table
            .insert(&station, FuelCategory::new(&entry.category), entry.price)
            .map_err(|e| ConfigError::Invalid {
                key: "prices".to_string(),
                message: e.to_string(),
            })?;
    }
    Ok(table)
}

/// 读取单价文件
pub fn load_price_table(path: &Path) -> Result<PriceTable, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let table = parse_price_table(&content)?;
    debug!(path = %path.display(), entries = table.len(), "单价文件加载完成");
    Ok(table)
}

// ==========================================
// 加油站油量报表系统 - 汇总结果模型
// ==========================================
// 用途: 汇总引擎输出, 导出器唯一输入
// 顺序: 站点按首次出现顺序; 油品按首次出现顺序
// 红线: 不持有源读数引用; 不做任何舍入
// ==========================================

use crate::domain::types::FuelCategory;
use serde::Serialize;

/// 单一油品的累计量
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotals {
    pub category: FuelCategory,
    pub volume: f64,  // 升
    pub revenue: f64, // 营业额 = Σ volume * price
}

impl CategoryTotals {
    pub fn new(category: FuelCategory) -> Self {
        Self {
            category,
            volume: 0.0,
            revenue: 0.0,
        }
    }
}

/// 单站汇总
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StationTotals {
    pub station_id: String,
    pub per_category: Vec<CategoryTotals>,
    pub station_volume: f64,  // 派生: Σ per_category.volume
    pub station_revenue: f64, // 派生: Σ per_category.revenue
}

impl StationTotals {
    pub fn category(&self, category: &FuelCategory) -> Option<&CategoryTotals> {
        self.per_category.iter().find(|c| &c.category == category)
    }
}

/// 总计
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GrandTotals {
    pub per_category: Vec<CategoryTotals>,
    pub total_volume: f64,
    pub total_revenue: f64,
}

impl GrandTotals {
    pub fn category(&self, category: &FuelCategory) -> Option<&CategoryTotals> {
        self.per_category.iter().find(|c| &c.category == category)
    }
}

// ==========================================
// Totals - 三级汇总（站点 / 油品 / 总计）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Totals {
    pub stations: Vec<StationTotals>,
    pub grand: GrandTotals,
}

impl Totals {
    pub fn station(&self, station_id: &str) -> Option<&StationTotals> {
        let station_id = station_id.trim();
        self.stations.iter().find(|s| s.station_id == station_id)
    }

    /// 报表列顺序: 总计中的油品顺序
    pub fn categories(&self) -> Vec<FuelCategory> {
        self.grand
            .per_category
            .iter()
            .map(|c| c.category.clone())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

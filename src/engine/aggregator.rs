// ==========================================
// 加油站油量报表系统 - 汇总引擎
// ==========================================
// 输入: Reading 序列 + PriceTable
// 输出: Totals（站点 × 油品 + 总计）
// ==========================================
// 红线: 无状态引擎, aggregate 是输入的纯函数
// 红线: 派生合计只从已累计的油品格子求和, 不回读源数据
// 红线: 累计过程不做舍入（舍入属于展示层）
// ==========================================

use crate::domain::price::PriceTable;
use crate::domain::reading::Reading;
use crate::domain::totals::{CategoryTotals, GrandTotals, StationTotals, Totals};
use crate::domain::types::FuelCategory;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info, instrument};

// ==========================================
// AggregationMode - 校验模式
// ==========================================

/// 读数倒挂（final < initial）的处理策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// 宽松模式：负油量照常计入
    #[default]
    Permissive,
    /// 严格模式：任一读数倒挂即失败
    Strict,
}

// ==========================================
// 错误类型
// ==========================================

/// 缺少 (站点, 油品) 单价
#[derive(Error, Debug, Clone, PartialEq)]
#[error("缺少单价: 站点 {station_id}, 油品 {category}")]
pub struct PricingError {
    pub station_id: String,
    pub category: FuelCategory,
}

/// 严格模式下读数倒挂
#[derive(Error, Debug, Clone, PartialEq)]
#[error("读数倒挂: 站点 {station_id}, 油枪 {pump_id}, 起始 {initial_reading} > 结束 {final_reading}")]
pub struct ValidationError {
    pub station_id: String,
    pub pump_id: String,
    pub initial_reading: f64,
    pub final_reading: f64,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AggregationError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// ==========================================
// TotalsAccumulator - 有序累加器
// ==========================================
// 站点、油品均按首次出现顺序记录

#[derive(Default)]
struct CategoryCells {
    cells: Vec<CategoryTotals>,
    index: HashMap<FuelCategory, usize>,
}

impl CategoryCells {
    fn add(&mut self, category: &FuelCategory, volume: f64, revenue: f64) {
        let idx = match self.index.get(category) {
            Some(&idx) => idx,
            None => {
                self.cells.push(CategoryTotals::new(category.clone()));
                self.index.insert(category.clone(), self.cells.len() - 1);
                self.cells.len() - 1
            }
        };
        let cell = &mut self.cells[idx];
        cell.volume += volume;
        cell.revenue += revenue;
    }

    fn finish(self) -> (Vec<CategoryTotals>, f64, f64) {
        let volume = self.cells.iter().map(|c| c.volume).sum();
        let revenue = self.cells.iter().map(|c| c.revenue).sum();
        (self.cells, volume, revenue)
    }
}

#[derive(Default)]
struct TotalsAccumulator {
    stations: Vec<(String, CategoryCells)>,
    station_index: HashMap<String, usize>,
    grand: CategoryCells,
}

impl TotalsAccumulator {
    fn add(&mut self, station_id: &str, category: &FuelCategory, volume: f64, revenue: f64) {
        let idx = match self.station_index.get(station_id) {
            Some(&idx) => idx,
            None => {
                self.stations
                    .push((station_id.to_string(), CategoryCells::default()));
                self.station_index
                    .insert(station_id.to_string(), self.stations.len() - 1);
                self.stations.len() - 1
            }
        };
        self.stations[idx].1.add(category, volume, revenue);
        self.grand.add(category, volume, revenue);
    }

    fn add_totals(&mut self, totals: &Totals) {
        for station in &totals.stations {
            for cell in &station.per_category {
                self.add(&station.station_id, &cell.category, cell.volume, cell.revenue);
            }
        }
    }

    fn finish(self) -> Totals {
        let stations = self
            .stations
            .into_iter()
            .map(|(station_id, cells)| {
                let (per_category, station_volume, station_revenue) = cells.finish();
                StationTotals {
                    station_id,
                    per_category,
                    station_volume,
                    station_revenue,
                }
            })
            .collect();

        let (per_category, total_volume, total_revenue) = self.grand.finish();

        Totals {
            stations,
            grand: GrandTotals {
                per_category,
                total_volume,
                total_revenue,
            },
        }
    }
}

// ==========================================
// AggregationEngine - 汇总引擎
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct AggregationEngine {
    mode: AggregationMode,
}

impl AggregationEngine {
    pub fn new(mode: AggregationMode) -> Self {
        Self { mode }
    }

    pub fn strict() -> Self {
        Self::new(AggregationMode::Strict)
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// 汇总读数
    ///
    /// # 参数
    /// - readings: 读数序列（按输入顺序处理）
    /// - prices: (站点, 油品) → 每升单价
    ///
    /// # 返回
    /// - Ok(Totals): 站点按首次出现顺序
    /// - Err(Pricing): 按输入顺序第一条缺价读数的键
    /// - Err(Validation): 严格模式下第一条倒挂读数
    ///
    /// 失败时不返回任何部分结果。
    #[instrument(skip_all, fields(readings = readings.len(), mode = ?self.mode))]
    pub fn aggregate(
        &self,
        readings: &[Reading],
        prices: &PriceTable,
    ) -> Result<Totals, AggregationError> {
        let mut acc = TotalsAccumulator::default();

        for reading in readings {
            if self.mode == AggregationMode::Strict && reading.is_reversed() {
                return Err(ValidationError {
                    station_id: reading.station_id().to_string(),
                    pump_id: reading.pump_id().to_string(),
                    initial_reading: reading.initial_reading(),
                    final_reading: reading.final_reading(),
                }
                .into());
            }

            let price = prices.get(&reading.price_key()).ok_or_else(|| PricingError {
                station_id: reading.station_id().to_string(),
                category: reading.category().clone(),
            })?;

            let volume = reading.volume();
            if volume < 0.0 {
                debug!(
                    station_id = reading.station_id(),
                    pump_id = reading.pump_id(),
                    volume,
                    "负油量计入汇总"
                );
            }
            acc.add(reading.station_id(), reading.category(), volume, volume * price);
        }

        let totals = acc.finish();
        info!(
            stations = totals.stations.len(),
            total_volume = totals.grand.total_volume,
            total_revenue = totals.grand.total_revenue,
            "汇总完成"
        );
        Ok(totals)
    }

    /// 合并两份汇总（a 的站点顺序在前）
    pub fn merge(a: &Totals, b: &Totals) -> Totals {
        let mut acc = TotalsAccumulator::default();
        acc.add_totals(a);
        acc.add_totals(b);
        acc.finish()
    }
}

/// 宽松模式汇总
pub fn aggregate(readings: &[Reading], prices: &PriceTable) -> Result<Totals, AggregationError> {
    AggregationEngine::default().aggregate(readings, prices)
}

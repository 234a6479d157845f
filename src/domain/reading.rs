// ==========================================
// 加油站油量报表系统 - 读数领域模型
// ==========================================
// 红线: Reading 构造后不可变; 油量为派生值, 不冗余存储
// 说明: final >= initial 是校验规则, 不是结构约束
// ==========================================

use crate::domain::price::PriceKey;
use crate::domain::types::{normalize_id, FuelCategory};
use serde::Serialize;

// ==========================================
// Reading - 单枪读数
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reading {
    station_id: String,       // 站点标识（TRIM 后）
    pump_id: String,          // 油枪标识（站内唯一, TRIM 后）
    category: FuelCategory,   // 油品类别
    initial_reading: f64,     // 起始累计读数
    final_reading: f64,       // 结束累计读数
}

impl Reading {
    pub fn new(
        station_id: impl AsRef<str>,
        pump_id: impl AsRef<str>,
        category: FuelCategory,
        initial_reading: f64,
        final_reading: f64,
    ) -> Self {
        Self {
            station_id: normalize_id(station_id.as_ref()),
            pump_id: normalize_id(pump_id.as_ref()),
            category,
            initial_reading,
            final_reading,
        }
    }

    pub fn station_id(&self) -> &str {
        &self.station_id
    }

    pub fn pump_id(&self) -> &str {
        &self.pump_id
    }

    pub fn category(&self) -> &FuelCategory {
        &self.category
    }

    pub fn initial_reading(&self) -> f64 {
        self.initial_reading
    }

    pub fn final_reading(&self) -> f64 {
        self.final_reading
    }

    /// 出油量 = final - initial（可能为负: 表计回绕或录入颠倒）
    pub fn volume(&self) -> f64 {
        self.final_reading - self.initial_reading
    }

    /// 读数倒挂（final < initial）
    pub fn is_reversed(&self) -> bool {
        self.final_reading < self.initial_reading
    }

    /// 定价分组键 (station_id, category)
    pub fn price_key(&self) -> PriceKey {
        PriceKey::new(&self.station_id, self.category.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_is_derived() {
        let r = Reading::new("S1", "P1", FuelCategory::fuel(), 100.0, 150.0);
        assert_eq!(r.volume(), 50.0);
        assert!(!r.is_reversed());
    }

    #[test]
    fn test_ids_trimmed() {
        let r = Reading::new(" 3 ", "\t1", FuelCategory::diesel(), 0.0, 1.0);
        assert_eq!(r.station_id(), "3");
        assert_eq!(r.pump_id(), "1");
        assert_eq!(r.price_key(), PriceKey::new("3", FuelCategory::diesel()));
    }

    #[test]
    fn test_reversed_reading_keeps_negative_volume() {
        let r = Reading::new("S1", "P1", FuelCategory::fuel(), 200.0, 150.0);
        assert!(r.is_reversed());
        assert_eq!(r.volume(), -50.0);
    }
}

// ==========================================
// 加油站油量报表系统 - 字段映射器实现
// ==========================================
// 职责: 原始行 → Reading（按位置取列） + 类型转换
// 规则: 每个坏行恰好产生一条 ImportWarning
// ==========================================

use crate::domain::import_report::{ImportWarning, WarningKind};
use crate::domain::price::PriceKey;
use crate::domain::reading::Reading;
use crate::domain::types::FuelCategory;
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::file_parser::RawRow;

/// 汇总表重新导入时合成读数使用的油枪号
pub const SUMMARY_PUMP_ID: &str = "summary";

// ==========================================
// RowSchema - 行格式
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RowSchema {
    /// station, pump, category, initial, final
    Standard,
    /// station, pump, category, initial, final, price
    Priced,
    /// station, pump, initial, final（隐含单一油品）
    SingleCategory(FuelCategory),
    /// 导出的明细表: station, pump, initial, final, volume, category
    Detail,
    /// 导出的汇总表: station, (volume, revenue) × categories, 末行为总计
    Summary {
        categories: Vec<FuelCategory>,
        grand_total_label: String,
    },
}

/// 位置列布局
struct ColumnLayout {
    station: usize,
    pump: usize,
    category: Option<usize>,
    initial: usize,
    final_reading: usize,
    price: Option<usize>,
    width: usize,
}

const STANDARD_LAYOUT: ColumnLayout = ColumnLayout {
    station: 0,
    pump: 1,
    category: Some(2),
    initial: 3,
    final_reading: 4,
    price: None,
    width: 5,
};

const PRICED_LAYOUT: ColumnLayout = ColumnLayout {
    price: Some(5),
    width: 6,
    ..STANDARD_LAYOUT
};

const SINGLE_CATEGORY_LAYOUT: ColumnLayout = ColumnLayout {
    station: 0,
    pump: 1,
    category: None,
    initial: 2,
    final_reading: 3,
    price: None,
    width: 4,
};

const DETAIL_LAYOUT: ColumnLayout = ColumnLayout {
    station: 0,
    pump: 1,
    category: Some(5),
    initial: 2,
    final_reading: 3,
    price: None,
    width: 6,
};

/// 单行映射结果
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MappedRow {
    pub readings: Vec<Reading>,
    pub prices: Vec<(PriceKey, f64)>,
}

fn missing(row: &RawRow, column: &str) -> ImportWarning {
    ImportWarning::new(
        row.row_number,
        WarningKind::MissingCell {
            column: column.to_string(),
        },
    )
}

// ==========================================
// FieldMapper
// ==========================================
pub struct FieldMapper {
    schema: RowSchema,
    cleaner: DataCleaner,
}

impl FieldMapper {
    pub fn new(schema: RowSchema, cleaner: DataCleaner) -> Self {
        Self { schema, cleaner }
    }

    pub fn schema(&self) -> &RowSchema {
        &self.schema
    }

    /// 映射一行
    ///
    /// # 返回
    /// - Ok(Some(MappedRow)): 合格行
    /// - Ok(None): 静默跳过（汇总表的总计行）
    /// - Err(ImportWarning): 坏行, 调用方记录并跳过
    pub fn map_row(&self, row: &RawRow) -> Result<Option<MappedRow>, ImportWarning> {
        if let Some(column) = row.invalid_encoding {
            return Err(ImportWarning::new(
                row.row_number,
                WarningKind::InvalidEncoding { column },
            ));
        }

        match &self.schema {
            RowSchema::Standard => self.map_positional(row, &STANDARD_LAYOUT, None).map(Some),
            RowSchema::Priced => self.map_positional(row, &PRICED_LAYOUT, None).map(Some),
            RowSchema::SingleCategory(category) => self
                .map_positional(row, &SINGLE_CATEGORY_LAYOUT, Some(category))
                .map(Some),
            RowSchema::Detail => self.map_positional(row, &DETAIL_LAYOUT, None).map(Some),
            RowSchema::Summary {
                categories,
                grand_total_label,
            } => self.map_summary(row, categories, grand_total_label),
        }
    }

    fn map_positional(
        &self,
        row: &RawRow,
        layout: &ColumnLayout,
        implicit_category: Option<&FuelCategory>,
    ) -> Result<MappedRow, ImportWarning> {
        if row.cells.len() < layout.width {
            return Err(ImportWarning::new(
                row.row_number,
                WarningKind::TooFewColumns {
                    found: row.cells.len(),
                    required: layout.width,
                },
            ));
        }

        let station_id = self
            .cleaner
            .identifier(row.cell(layout.station))
            .ok_or_else(|| missing(row, "station"))?;
        let pump_id = self
            .cleaner
            .identifier(row.cell(layout.pump))
            .ok_or_else(|| missing(row, "pump"))?;
        let category = match (layout.category, implicit_category) {
            (Some(col), _) => self
                .cleaner
                .category(row.cell(col))
                .ok_or_else(|| missing(row, "category"))?,
            (None, Some(category)) => category.clone(),
            (None, None) => return Err(missing(row, "category")),
        };

        let initial = self.required_number(row, layout.initial, "initial")?;
        let final_reading = self.required_number(row, layout.final_reading, "final")?;

        let mut mapped = MappedRow::default();
        if let Some(col) = layout.price {
            let price = self.required_number(row, col, "price")?;
            if price < 0.0 {
                return Err(ImportWarning::new(
                    row.row_number,
                    WarningKind::InvalidNumber {
                        column: "price".to_string(),
                        value: price.to_string(),
                    },
                ));
            }
            mapped
                .prices
                .push((PriceKey::new(&station_id, category.clone()), price));
        }

        mapped.readings.push(Reading::new(
            station_id,
            pump_id,
            category,
            initial,
            final_reading,
        ));
        Ok(mapped)
    }

    fn required_number(&self, row: &RawRow, col: usize, column: &str) -> Result<f64, ImportWarning> {
        match self.cleaner.number(row.cell(col)) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(missing(row, column)),
            Err(value) => Err(ImportWarning::new(
                row.row_number,
                WarningKind::InvalidNumber {
                    column: column.to_string(),
                    value,
                },
            )),
        }
    }

    fn map_summary(
        &self,
        row: &RawRow,
        categories: &[FuelCategory],
        grand_total_label: &str,
    ) -> Result<Option<MappedRow>, ImportWarning> {
        let station_id = self
            .cleaner
            .identifier(row.cell(0))
            .ok_or_else(|| missing(row, "station"))?;
        if station_id.to_lowercase() == grand_total_label.trim().to_lowercase() {
            return Ok(None);
        }

        let required = 1 + 2 * categories.len();
        if row.cells.len() < required {
            return Err(ImportWarning::new(
                row.row_number,
                WarningKind::TooFewColumns {
                    found: row.cells.len(),
                    required,
                },
            ));
        }

        let mut mapped = MappedRow::default();
        for (i, category) in categories.iter().enumerate() {
            let volume_col = 1 + 2 * i;
            let revenue_col = volume_col + 1;
            let volume_column = format!("{} volume", category);
            let revenue_column = format!("{} revenue", category);

            let volume = self.optional_number(row, volume_col, &volume_column)?;
            let revenue = self.optional_number(row, revenue_col, &revenue_column)?;

            let (volume, revenue) = match (volume, revenue) {
                (None, None) => continue,
                (Some(v), Some(r)) => (v, r),
                _ => {
                    return Err(ImportWarning::new(
                        row.row_number,
                        WarningKind::IncompleteSummaryPair {
                            category: category.to_string(),
                        },
                    ))
                }
            };

            let price = if volume == 0.0 { 0.0 } else { revenue / volume };
            if !price.is_finite() || price < 0.0 {
                return Err(ImportWarning::new(
                    row.row_number,
                    WarningKind::InvalidNumber {
                        column: revenue_column,
                        value: revenue.to_string(),
                    },
                ));
            }

            mapped
                .prices
                .push((PriceKey::new(&station_id, category.clone()), price));
            mapped.readings.push(Reading::new(
                &station_id,
                SUMMARY_PUMP_ID,
                category.clone(),
                0.0,
                volume,
            ));
        }

        if mapped.readings.is_empty() {
            return Err(ImportWarning::new(
                row.row_number,
                WarningKind::EmptySummaryRow,
            ));
        }
        Ok(Some(mapped))
    }

    fn optional_number(
        &self,
        row: &RawRow,
        col: usize,
        column: &str,
    ) -> Result<Option<f64>, ImportWarning> {
        self.cleaner.number(row.cell(col)).map_err(|value| {
            ImportWarning::new(
                row.row_number,
                WarningKind::InvalidNumber {
                    column: column.to_string(),
                    value,
                },
            )
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::RawCell;

    fn row(row_number: usize, cells: &[&str]) -> RawRow {
        RawRow::new(row_number, cells.iter().map(|c| RawCell::text(c)).collect())
    }

    fn mapper(schema: RowSchema) -> FieldMapper {
        FieldMapper::new(schema, DataCleaner::default())
    }

    #[test]
    fn test_standard_row() {
        let mapped = mapper(RowSchema::Standard)
            .map_row(&row(2, &["S1", "P1", "Essence", "100", "150"]))
            .unwrap()
            .unwrap();

        assert_eq!(mapped.readings.len(), 1);
        let r = &mapped.readings[0];
        assert_eq!(r.category(), &FuelCategory::fuel());
        assert_eq!(r.volume(), 50.0);
        assert!(mapped.prices.is_empty());
    }

    #[test]
    fn test_numeric_ids_equal_text_ids() {
        let cells = vec![
            RawCell::Number(3.0),
            RawCell::Number(1.0),
            RawCell::text("Fuel"),
            RawCell::Number(0.0),
            RawCell::Number(5.0),
        ];
        let mapped = mapper(RowSchema::Standard)
            .map_row(&RawRow::new(2, cells))
            .unwrap()
            .unwrap();
        assert_eq!(mapped.readings[0].station_id(), "3");
        assert_eq!(mapped.readings[0].pump_id(), "1");
    }

    #[test]
    fn test_missing_final_cell() {
        let warning = mapper(RowSchema::Standard)
            .map_row(&row(7, &["S1", "P1", "Fuel", "100", ""]))
            .unwrap_err();
        assert_eq!(warning.row, 7);
        assert_eq!(
            warning.kind,
            WarningKind::MissingCell {
                column: "final".to_string()
            }
        );
    }

    #[test]
    fn test_too_few_columns() {
        let warning = mapper(RowSchema::Standard)
            .map_row(&row(3, &["S1", "P1", "Fuel", "100"]))
            .unwrap_err();
        assert_eq!(
            warning.kind,
            WarningKind::TooFewColumns {
                found: 4,
                required: 5
            }
        );
    }

    #[test]
    fn test_invalid_number_names_value() {
        let warning = mapper(RowSchema::Standard)
            .map_row(&row(4, &["S1", "P1", "Fuel", "1O0", "150"]))
            .unwrap_err();
        assert_eq!(
            warning.kind,
            WarningKind::InvalidNumber {
                column: "initial".to_string(),
                value: "1O0".to_string()
            }
        );
    }

    #[test]
    fn test_priced_row() {
        let mapped = mapper(RowSchema::Priced)
            .map_row(&row(2, &["S1", "P1", "Gasoil", "0", "10", "1.5"]))
            .unwrap()
            .unwrap();
        assert_eq!(
            mapped.prices,
            vec![(PriceKey::new("S1", FuelCategory::diesel()), 1.5)]
        );
    }

    #[test]
    fn test_priced_row_rejects_bad_price() {
        let warning = mapper(RowSchema::Priced)
            .map_row(&row(2, &["S1", "P1", "Fuel", "0", "10", "cheap"]))
            .unwrap_err();
        assert!(matches!(warning.kind, WarningKind::InvalidNumber { .. }));
    }

    #[test]
    fn test_single_category_schema() {
        let mapped = mapper(RowSchema::SingleCategory(FuelCategory::new("LPG")))
            .map_row(&row(2, &["S1", "P1", "0", "10"]))
            .unwrap()
            .unwrap();
        assert_eq!(mapped.readings[0].category(), &FuelCategory::new("LPG"));
    }

    #[test]
    fn test_detail_schema_ignores_volume_column() {
        let mapped = mapper(RowSchema::Detail)
            .map_row(&row(2, &["S1", "P1", "0", "10", "", "Diesel"]))
            .unwrap()
            .unwrap();
        assert_eq!(mapped.readings[0].volume(), 10.0);
        assert_eq!(mapped.readings[0].category(), &FuelCategory::diesel());
    }

    fn summary_schema() -> RowSchema {
        RowSchema::Summary {
            categories: vec![FuelCategory::fuel(), FuelCategory::diesel()],
            grand_total_label: "Grand Total".to_string(),
        }
    }

    #[test]
    fn test_summary_row_synthesizes_readings() {
        let mapped = mapper(summary_schema())
            .map_row(&row(2, &["S1", "10", "20", "5", "5", "15", "25"]))
            .unwrap()
            .unwrap();

        assert_eq!(mapped.readings.len(), 2);
        assert_eq!(mapped.readings[0].pump_id(), SUMMARY_PUMP_ID);
        assert_eq!(mapped.readings[0].volume(), 10.0);
        assert_eq!(mapped.prices[0].1, 2.0);
        assert_eq!(mapped.prices[1].1, 1.0);
    }

    #[test]
    fn test_summary_blank_pair_means_absent_category() {
        let mapped = mapper(summary_schema())
            .map_row(&row(3, &["S2", "20", "60", "", ""]))
            .unwrap()
            .unwrap();
        assert_eq!(mapped.readings.len(), 1);
        assert_eq!(mapped.readings[0].category(), &FuelCategory::fuel());
    }

    #[test]
    fn test_summary_skips_grand_total_row() {
        let result = mapper(summary_schema())
            .map_row(&row(4, &["grand total", "30", "80", "5", "5"]))
            .unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_summary_half_pair_is_warning() {
        let warning = mapper(summary_schema())
            .map_row(&row(2, &["S1", "10", "", "", ""]))
            .unwrap_err();
        assert_eq!(
            warning.kind,
            WarningKind::IncompleteSummaryPair {
                category: "Fuel".to_string()
            }
        );
    }

    #[test]
    fn test_summary_zero_volume_gets_zero_price() {
        let mapped = mapper(summary_schema())
            .map_row(&row(2, &["S1", "0", "0", "", ""]))
            .unwrap()
            .unwrap();
        assert_eq!(mapped.prices[0].1, 0.0);
        assert_eq!(mapped.readings[0].volume(), 0.0);
    }

    #[test]
    fn test_summary_short_row_is_warning() {
        let warning = mapper(summary_schema())
            .map_row(&row(3, &["S3"]))
            .unwrap_err();
        assert_eq!(warning.row, 3);
        assert_eq!(
            warning.kind,
            WarningKind::TooFewColumns {
                found: 1,
                required: 5
            }
        );
    }

    #[test]
    fn test_summary_row_without_values_is_warning() {
        let warning = mapper(summary_schema())
            .map_row(&row(3, &["S3", "", "", "", ""]))
            .unwrap_err();
        assert_eq!(warning.kind, WarningKind::EmptySummaryRow);
    }

    #[test]
    fn test_invalid_encoding_row_is_warning() {
        let raw = row(5, &["S\u{fffd}1", "P1", "Fuel", "0", "10"]).with_invalid_encoding(1);
        let warning = mapper(RowSchema::Standard).map_row(&raw).unwrap_err();
        assert_eq!(warning.row, 5);
        assert_eq!(warning.kind, WarningKind::InvalidEncoding { column: 1 });
    }
}

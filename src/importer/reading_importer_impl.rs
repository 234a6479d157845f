// ==========================================
// 加油站油量报表系统 - 读数导入器实现
// ==========================================
// 流程: 解析 → 逐行映射 → 单价归并 → ImportOutcome
// 红线: 坏行只产生告警, 不中断导入
// ==========================================

use crate::domain::import_report::{ImportOutcome, ImportWarning, WarningKind};
use crate::domain::price::{PriceKey, PriceTable};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{FieldMapper, MappedRow, RowSchema};
use crate::importer::file_parser::{ImportSource, RawRow, UniversalFileParser};
use crate::importer::reading_importer_trait::{FileParser, ReadingImporter};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

// 单价比较容差
const PRICE_EPSILON: f64 = 1e-9;

// ==========================================
// ReadingImporterImpl - 读数导入器实现
// ==========================================
pub struct ReadingImporterImpl {
    file_parser: Box<dyn FileParser>,
    field_mapper: FieldMapper,
}

impl ReadingImporterImpl {
    /// 创建导入器
    ///
    /// # 参数
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器（决定行格式与别名表）
    pub fn new(file_parser: Box<dyn FileParser>, field_mapper: FieldMapper) -> Self {
        Self {
            file_parser,
            field_mapper,
        }
    }

    /// 按扩展名自动选择解析器
    pub fn with_schema(schema: RowSchema, cleaner: DataCleaner) -> Self {
        Self::new(
            Box::new(UniversalFileParser::default()),
            FieldMapper::new(schema, cleaner),
        )
    }

    /// 处理已解析的原始行
    fn process_rows(&self, batch_id: String, raw_rows: Vec<RawRow>) -> ImportOutcome {
        let mut outcome = ImportOutcome {
            batch_id,
            total_rows: raw_rows.len(),
            ..ImportOutcome::default()
        };

        for row in &raw_rows {
            let mapped = match self.field_mapper.map_row(row) {
                Ok(Some(mapped)) => mapped,
                Ok(None) => {
                    debug!(row_number = row.row_number, "跳过总计行");
                    continue;
                }
                Err(warning) => {
                    warn!(row_number = warning.row, reason = %warning.kind, "跳过坏行");
                    outcome.warnings.push(warning);
                    continue;
                }
            };

            if let Err(warning) = merge_prices(&mut outcome.prices, row.row_number, &mapped) {
                warn!(row_number = warning.row, reason = %warning.kind, "单价冲突, 跳过该行");
                outcome.warnings.push(warning);
                continue;
            }

            outcome.readings.extend(mapped.readings);
        }

        outcome
    }
}

/// 将本行单价并入单价表
///
/// 同一 (站点, 油品) 以首次出现的单价为准; 后续不同单价整行剔除。
fn merge_prices(prices: &mut PriceTable, row_number: usize, mapped: &MappedRow) -> Result<(), ImportWarning> {
    for (key, price) in &mapped.prices {
        if let Some(existing) = prices.get(key) {
            if (existing - price).abs() > PRICE_EPSILON {
                return Err(ImportWarning::new(
                    row_number,
                    WarningKind::PriceConflict {
                        existing,
                        found: *price,
                    },
                ));
            }
        }
    }

    for (key, price) in &mapped.prices {
        insert_checked(prices, row_number, key, *price)?;
    }
    Ok(())
}

fn insert_checked(
    prices: &mut PriceTable,
    row_number: usize,
    key: &PriceKey,
    price: f64,
) -> Result<(), ImportWarning> {
    prices.insert_key(key.clone(), price).map(|_| ()).map_err(|_| {
        ImportWarning::new(
            row_number,
            WarningKind::InvalidNumber {
                column: "price".to_string(),
                value: price.to_string(),
            },
        )
    })
}

impl ReadingImporter for ReadingImporterImpl {
    /// 从表格文件导入读数
    ///
    /// # 返回
    /// - Ok(ImportOutcome): 合格读数（保持源行序）+ 告警
    /// - Err: 文件缺失、格式不支持、工作表不存在
    #[instrument(skip(self, source), fields(batch_id, path = %source.path.display()))]
    fn import(&self, source: &ImportSource) -> ImportResult<ImportOutcome> {
        let batch_id = Uuid::new_v4().to_string();
        tracing::Span::current().record("batch_id", batch_id.as_str());
        info!(batch_id = %batch_id, schema = ?self.field_mapper.schema(), "开始导入读数");

        let raw_rows = self.file_parser.parse_to_raw_rows(source)?;
        debug!(rows = raw_rows.len(), "文件解析完成");

        let outcome = self.process_rows(batch_id, raw_rows);

        info!(
            total_rows = outcome.total_rows,
            readings = outcome.readings.len(),
            warnings = outcome.warnings.len(),
            "读数导入完成"
        );
        Ok(outcome)
    }
}

/// 便捷入口: 自动识别文件格式, 使用默认别名表
pub fn import(source: &ImportSource, schema: RowSchema) -> ImportResult<ImportOutcome> {
    ReadingImporterImpl::with_schema(schema, DataCleaner::default()).import(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::FuelCategory;
    use crate::importer::error::ImportError;
    use crate::importer::file_parser::RawCell;

    struct StubParser {
        rows: Vec<RawRow>,
    }

    impl FileParser for StubParser {
        fn parse_to_raw_rows(&self, _source: &ImportSource) -> ImportResult<Vec<RawRow>> {
            Ok(self.rows.clone())
        }
    }

    struct FailingParser;

    impl FileParser for FailingParser {
        fn parse_to_raw_rows(&self, source: &ImportSource) -> ImportResult<Vec<RawRow>> {
            Err(ImportError::FileNotFound(source.path.display().to_string()))
        }
    }

    fn row(row_number: usize, cells: &[&str]) -> RawRow {
        RawRow::new(row_number, cells.iter().map(|c| RawCell::text(c)).collect())
    }

    fn importer(schema: RowSchema, rows: Vec<RawRow>) -> ReadingImporterImpl {
        ReadingImporterImpl::new(
            Box::new(StubParser { rows }),
            FieldMapper::new(schema, DataCleaner::default()),
        )
    }

    #[test]
    fn test_bad_rows_become_warnings() {
        let rows = vec![
            row(2, &["S1", "P1", "Fuel", "100", "150"]),
            row(3, &["S1", "P2", "Fuel", "100", ""]),
            row(4, &["S2", "P1", "Diesel", "0", "20"]),
        ];
        let outcome = importer(RowSchema::Standard, rows)
            .import(&ImportSource::new("memory.csv"))
            .unwrap();

        assert_eq!(outcome.total_rows, 3);
        assert_eq!(outcome.readings.len(), 2);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].row, 3);
        assert_eq!(outcome.readings[1].station_id(), "S2");
        assert!(!outcome.batch_id.is_empty());
    }

    #[test]
    fn test_every_row_is_reading_or_warning() {
        let rows = vec![
            row(2, &["S1", "P1", "Fuel", "0", "1"]),
            row(3, &["S1"]),
            row(4, &["S1", "P1", "Fuel", "x", "1"]),
            row(5, &["", "P1", "Fuel", "0", "1"]),
            row(6, &["S1", "P3", "Fuel", "0", "2"]),
        ];
        let outcome = importer(RowSchema::Standard, rows)
            .import(&ImportSource::new("memory.csv"))
            .unwrap();

        assert_eq!(
            outcome.readings.len() + outcome.warnings.len(),
            outcome.total_rows
        );
    }

    #[test]
    fn test_priced_rows_fill_price_table() {
        let rows = vec![
            row(2, &["S1", "P1", "Fuel", "0", "10", "2.0"]),
            row(3, &["S1", "P2", "Fuel", "0", "5", "2.0"]),
            row(4, &["S1", "P3", "Diesel", "0", "5", "1.5"]),
        ];
        let outcome = importer(RowSchema::Priced, rows)
            .import(&ImportSource::new("memory.csv"))
            .unwrap();

        assert_eq!(outcome.readings.len(), 3);
        assert_eq!(outcome.prices.len(), 2);
        assert_eq!(
            outcome.prices.get(&PriceKey::new("S1", FuelCategory::diesel())),
            Some(1.5)
        );
    }

    #[test]
    fn test_conflicting_price_excludes_row() {
        let rows = vec![
            row(2, &["S1", "P1", "Fuel", "0", "10", "2.0"]),
            row(3, &["S1", "P2", "Fuel", "0", "5", "2.5"]),
        ];
        let outcome = importer(RowSchema::Priced, rows)
            .import(&ImportSource::new("memory.csv"))
            .unwrap();

        assert_eq!(outcome.readings.len(), 1);
        assert_eq!(
            outcome.warnings[0].kind,
            WarningKind::PriceConflict {
                existing: 2.0,
                found: 2.5
            }
        );
        assert_eq!(
            outcome.prices.get(&PriceKey::new("S1", FuelCategory::fuel())),
            Some(2.0)
        );
    }

    #[test]
    fn test_summary_grand_row_not_counted_as_warning() {
        let schema = RowSchema::Summary {
            categories: vec![FuelCategory::fuel()],
            grand_total_label: "Grand Total".to_string(),
        };
        let rows = vec![row(2, &["S1", "10", "20"]), row(3, &["Grand Total", "10", "20"])];
        let outcome = importer(schema, rows)
            .import(&ImportSource::new("memory.xlsx"))
            .unwrap();

        assert_eq!(outcome.readings.len(), 1);
        assert!(outcome.warnings.is_empty());
    }

    #[test]
    fn test_summary_station_only_row_is_warning() {
        let schema = RowSchema::Summary {
            categories: vec![FuelCategory::fuel()],
            grand_total_label: "Grand Total".to_string(),
        };
        let rows = vec![
            row(2, &["S1", "10", "20"]),
            row(3, &["S3"]),
            row(4, &["Grand Total", "10", "20"]),
        ];
        let outcome = importer(schema, rows)
            .import(&ImportSource::new("memory.xlsx"))
            .unwrap();

        assert_eq!(outcome.total_rows, 3);
        assert_eq!(outcome.readings.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert_eq!(outcome.warnings[0].row, 3);
        assert_eq!(
            outcome.warnings[0].kind,
            WarningKind::TooFewColumns {
                found: 1,
                required: 3
            }
        );
    }

    #[test]
    fn test_parser_error_propagates() {
        let importer = ReadingImporterImpl::new(
            Box::new(FailingParser),
            FieldMapper::new(RowSchema::Standard, DataCleaner::default()),
        );
        let result = importer.import(&ImportSource::new("missing.csv"));
        assert!(matches!(result, Err(ImportError::FileNotFound(_))));
    }
}

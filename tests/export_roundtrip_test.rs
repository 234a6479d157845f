// ==========================================
// 报表导出 集成测试
// ==========================================
// 测试目标: 导出 → 重新导入 → 再汇总, 结果与原汇总一致
// ==========================================


use chrono::NaiveDate;
use fuel_station_report::exporter::{ExportSink, ReportExporter, DETAIL_SHEET, SUMMARY_SHEET};
use fuel_station_report::i18n::ReportLabels;
use fuel_station_report::{aggregate, export, import, logging, ImportSource, RowSchema, Totals};
use std::fs;
use tempfile::TempDir;
use test_helpers::{assert_close, price_table, reading, scenario_b};

fn assert_totals_match(actual: &Totals, expected: &Totals) {
    assert_eq!(actual.stations.len(), expected.stations.len());
    for station in &expected.stations {
        let other = actual
            .station(&station.station_id)
            .unwrap_or_else(|| panic!("missing station {}", station.station_id));
        for cell in &station.per_category {
            let other_cell = other.category(&cell.category).unwrap();
            assert!((other_cell.volume - cell.volume).abs() < 1e-6);
            assert!((other_cell.revenue - cell.revenue).abs() < 1e-6);
        }
    }
    assert!((actual.grand.total_volume - expected.grand.total_volume).abs() < 1e-6);
    assert!((actual.grand.total_revenue - expected.grand.total_revenue).abs() < 1e-6);
}

#[test]
fn test_summary_sheet_round_trip() {
    logging::init_test();
    let dir = TempDir::new().unwrap();

    let (readings, prices) = scenario_b();
    let totals = aggregate(&readings, &prices).unwrap();

    let sink = ExportSink::new(dir.path().join("report.xlsx"));
    let result = export(&totals, Some(&readings), &sink).unwrap();
    assert_eq!(result.summary_rows, 3);
    assert_eq!(result.detail_rows, 3);

    let labels = ReportLabels::default();
    let schema = RowSchema::Summary {
        categories: totals.categories(),
        grand_total_label: labels.grand_total(),
    };
    let outcome = import(
        &ImportSource::new(&sink.path).with_sheet(SUMMARY_SHEET),
        schema,
    )
    .unwrap();

    assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
    let reimported = aggregate(&outcome.readings, &outcome.prices).unwrap();
    assert_totals_match(&reimported, &totals);
}

#[test]
fn test_summary_round_trip_with_fractional_values() {
    let dir = TempDir::new().unwrap();
    let readings = vec![
        reading("North", "1", "Fuel", 1234.56, 1301.07),
        reading("North", "2", "Diesel", 10.0, 10.0),
        reading("South", "1", "Fuel", 0.0, 7.333),
    ];
    let prices = price_table(&[
        ("North", "Fuel", 13.47),
        ("North", "Diesel", 11.2),
        ("South", "Fuel", 13.51),
    ]);
    let totals = aggregate(&readings, &prices).unwrap();

    let sink = ExportSink::new(dir.path().join("fractional.xlsx"));
    export(&totals, None, &sink).unwrap();

    let schema = RowSchema::Summary {
        categories: totals.categories(),
        grand_total_label: ReportLabels::default().grand_total(),
    };
    let outcome = import(&ImportSource::new(&sink.path), schema).unwrap();
    let reimported = aggregate(&outcome.readings, &outcome.prices).unwrap();

    assert_totals_match(&reimported, &totals);
}

#[test]
fn test_detail_sheet_round_trip() {
    let dir = TempDir::new().unwrap();
    let (readings, prices) = scenario_b();
    let totals = aggregate(&readings, &prices).unwrap();

    let sink = ExportSink::new(dir.path().join("detail.xlsx"));
    export(&totals, Some(&readings), &sink).unwrap();

    let outcome = import(
        &ImportSource::new(&sink.path).with_sheet(DETAIL_SHEET),
        RowSchema::Detail,
    )
    .unwrap();

    assert_eq!(outcome.readings, readings);
    let reimported = aggregate(&outcome.readings, &prices).unwrap();
    assert_totals_match(&reimported, &totals);
}

#[test]
fn test_localized_summary_round_trip() {
    let dir = TempDir::new().unwrap();
    let (readings, prices) = scenario_b();
    let totals = aggregate(&readings, &prices).unwrap();

    let labels = ReportLabels::new("fr");
    let sink = ExportSink::new(dir.path().join("rapport.xlsx"));
    ReportExporter::new(labels.clone())
        .export(&totals, None, &sink)
        .unwrap();

    let schema = RowSchema::Summary {
        categories: totals.categories(),
        grand_total_label: labels.grand_total(),
    };
    let outcome = import(&ImportSource::new(&sink.path), schema).unwrap();
    assert!(outcome.warnings.is_empty());
    assert_close(
        aggregate(&outcome.readings, &outcome.prices)
            .unwrap()
            .grand
            .total_revenue,
        85.0,
    );
}

#[test]
fn test_dated_export_overwrites_same_day() {
    let dir = TempDir::new().unwrap();
    let (readings, prices) = scenario_b();
    let totals = aggregate(&readings, &prices).unwrap();

    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
    let sink = ExportSink::dated(dir.path(), "Gas_Station_Report", date);

    export(&totals, Some(&readings), &sink).unwrap();
    let second = export(&totals, None, &sink).unwrap();

    assert_eq!(
        second.path.file_name().and_then(|n| n.to_str()),
        Some("Gas_Station_Report_2024-06-01.xlsx")
    );
    assert_eq!(second.detail_rows, 0);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}

#[test]
fn test_failed_export_leaves_no_file() {
    let dir = TempDir::new().unwrap();
    // 目标目录的父路径是普通文件, 无法创建目录
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"x").unwrap();
    let sink = ExportSink::new(blocker.join("report.xlsx"));

    let (readings, prices) = scenario_b();
    let totals = aggregate(&readings, &prices).unwrap();

    assert!(export(&totals, None, &sink).is_err());
    assert!(!sink.path.exists());
}

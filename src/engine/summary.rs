// ==========================================
// 加油站油量报表系统 - 汇总摘要渲染
// ==========================================
// 用途: 录入界面弹窗展示（逐站, 再总计）
// 说明: 两位小数仅用于展示, Totals 本身不舍入
// ==========================================

use crate::domain::totals::{CategoryTotals, Totals};
use crate::i18n::ReportLabels;

fn fmt_amount(value: f64) -> String {
    format!("{:.2}", value)
}

fn category_line(labels: &ReportLabels, cell: &CategoryTotals) -> String {
    labels.text_with(
        "summary.category_line",
        &[
            ("category", cell.category.as_str()),
            ("volume", &fmt_amount(cell.volume)),
            ("revenue", &fmt_amount(cell.revenue)),
        ],
    )
}

fn total_line(labels: &ReportLabels, volume: f64, revenue: f64) -> String {
    labels.text_with(
        "summary.station_total_line",
        &[
            ("volume", &fmt_amount(volume)),
            ("revenue", &fmt_amount(revenue)),
        ],
    )
}

/// 渲染文本摘要
pub fn render_summary(totals: &Totals, labels: &ReportLabels) -> String {
    if totals.is_empty() {
        return labels.text("summary.empty");
    }

    let mut lines = Vec::new();
    for station in &totals.stations {
        lines.push(labels.text_with(
            "summary.station_title",
            &[("station", station.station_id.as_str())],
        ));
        for cell in &station.per_category {
            lines.push(category_line(labels, cell));
        }
        lines.push(total_line(labels, station.station_volume, station.station_revenue));
        lines.push(String::new());
    }

    lines.push(labels.text("summary.grand_title"));
    for cell in &totals.grand.per_category {
        lines.push(category_line(labels, cell));
    }
    lines.push(total_line(
        labels,
        totals.grand.total_volume,
        totals.grand.total_revenue,
    ));

    lines.join("\n")
}

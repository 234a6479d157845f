// ==========================================
// 加油站油量报表系统 - 工作簿构建
// ==========================================
// Summary 表: 站点 | (升数, 营业额) × 油品 | 站点合计升数 | 站点合计营业额
//             末行为总计
// Detail 表:  站点 | 油枪 | 起始读数 | 结束读数 | 升数 | 油品
// 说明: 单元格存原值, 仅通过 "0.00" 格式显示两位小数
// ==========================================

use crate::domain::reading::Reading;
use crate::domain::totals::Totals;
use crate::exporter::error::ExportOutcome;
use crate::i18n::ReportLabels;
use rust_xlsxwriter::{Format, Workbook, Worksheet};

pub const SUMMARY_SHEET: &str = "Summary";
pub const DETAIL_SHEET: &str = "Detail";

const AMOUNT_FORMAT: &str = "0.00";

/// 内存中构建完成的工作簿
pub struct BuiltWorkbook {
    pub bytes: Vec<u8>,
    pub summary_rows: usize,
    pub detail_rows: usize,
}

pub struct WorkbookBuilder<'a> {
    labels: &'a ReportLabels,
    header: Format,
    amount: Format,
    grand_amount: Format,
}

impl<'a> WorkbookBuilder<'a> {
    pub fn new(labels: &'a ReportLabels) -> Self {
        Self {
            labels,
            header: Format::new().set_bold(),
            amount: Format::new().set_num_format(AMOUNT_FORMAT),
            grand_amount: Format::new().set_bold().set_num_format(AMOUNT_FORMAT),
        }
    }

    /// 构建整个工作簿并序列化为 xlsx 字节
    pub fn build(&self, totals: &Totals, detail: Option<&[Reading]>) -> ExportOutcome<BuiltWorkbook> {
        let mut workbook = Workbook::new();

        let sheet = workbook.add_worksheet();
        sheet.set_name(SUMMARY_SHEET)?;
        let summary_rows = self.write_summary(sheet, totals)?;

        let mut detail_rows = 0;
        if let Some(readings) = detail {
            let sheet = workbook.add_worksheet();
            sheet.set_name(DETAIL_SHEET)?;
            detail_rows = self.write_detail(sheet, readings)?;
        }

        let bytes = workbook.save_to_buffer()?;
        Ok(BuiltWorkbook {
            bytes,
            summary_rows,
            detail_rows,
        })
    }

    /// 写 Summary 表, 返回数据行数（含总计行, 不含表头）
    fn write_summary(&self, sheet: &mut Worksheet, totals: &Totals) -> ExportOutcome<usize> {
        let categories = totals.categories();
        let total_volume_col = (1 + 2 * categories.len()) as u16;
        let total_revenue_col = total_volume_col + 1;

        sheet.write_string_with_format(0, 0, self.labels.text("report.station"), &self.header)?;
        for (i, category) in categories.iter().enumerate() {
            let col = (1 + 2 * i) as u16;
            sheet.write_string_with_format(
                0,
                col,
                self.labels.volume_header(category.as_str()),
                &self.header,
            )?;
            sheet.write_string_with_format(
                0,
                col + 1,
                self.labels.revenue_header(category.as_str()),
                &self.header,
            )?;
        }
        sheet.write_string_with_format(
            0,
            total_volume_col,
            self.labels.text("report.total_volume"),
            &self.header,
        )?;
        sheet.write_string_with_format(
            0,
            total_revenue_col,
            self.labels.text("report.total_revenue"),
            &self.header,
        )?;

        let mut row: u32 = 1;
        for station in &totals.stations {
            sheet.write_string(row, 0, &station.station_id)?;
            for (i, category) in categories.iter().enumerate() {
                // 站点无该油品时留空
                if let Some(cell) = station.category(category) {
                    let col = (1 + 2 * i) as u16;
                    sheet.write_number_with_format(row, col, cell.volume, &self.amount)?;
                    sheet.write_number_with_format(row, col + 1, cell.revenue, &self.amount)?;
                }
            }
            sheet.write_number_with_format(row, total_volume_col, station.station_volume, &self.amount)?;
            sheet.write_number_with_format(
                row,
                total_revenue_col,
                station.station_revenue,
                &self.amount,
            )?;
            row += 1;
        }

        let grand = &totals.grand;
        sheet.write_string_with_format(row, 0, self.labels.grand_total(), &self.header)?;
        for (i, category) in categories.iter().enumerate() {
            if let Some(cell) = grand.category(category) {
                let col = (1 + 2 * i) as u16;
                sheet.write_number_with_format(row, col, cell.volume, &self.grand_amount)?;
                sheet.write_number_with_format(row, col + 1, cell.revenue, &self.grand_amount)?;
            }
        }
        sheet.write_number_with_format(row, total_volume_col, grand.total_volume, &self.grand_amount)?;
        sheet.write_number_with_format(
            row,
            total_revenue_col,
            grand.total_revenue,
            &self.grand_amount,
        )?;

        sheet.set_column_width(0, 16)?;
        Ok(totals.stations.len() + 1)
    }

    /// 写 Detail 表, 行序与输入一致
    fn write_detail(&self, sheet: &mut Worksheet, readings: &[Reading]) -> ExportOutcome<usize> {
        let headers = [
            "report.station",
            "report.pump",
            "report.initial",
            "report.final",
            "report.liters",
            "report.category",
        ];
        for (col, key) in headers.iter().enumerate() {
            sheet.write_string_with_format(0, col as u16, self.labels.text(key), &self.header)?;
        }

        for (idx, reading) in readings.iter().enumerate() {
            let row = (idx + 1) as u32;
            sheet.write_string(row, 0, reading.station_id())?;
            sheet.write_string(row, 1, reading.pump_id())?;
            sheet.write_number_with_format(row, 2, reading.initial_reading(), &self.amount)?;
            sheet.write_number_with_format(row, 3, reading.final_reading(), &self.amount)?;
            sheet.write_number_with_format(row, 4, reading.volume(), &self.amount)?;
            sheet.write_string(row, 5, reading.category().as_str())?;
        }

        Ok(readings.len())
    }
}

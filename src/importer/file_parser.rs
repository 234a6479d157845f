// ==========================================
// 加油站油量报表系统 - 文件解析器实现
// ==========================================
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 约定: 第 1 行恒为表头, 直接跳过, 不做校验
// 约定: 全空行静默跳过
// 约定: 行号为源文件 1-based 行号
// 约定: CSV 中非 UTF-8 的行照常返回并带编码标记, 由映射层记为告警
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use crate::importer::reading_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

// ==========================================
// 原始单元格 / 原始行
// ==========================================

/// 原始单元格（保留源类型: 数值 or 文本）
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Number(f64),
}

impl RawCell {
    pub fn text(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(trimmed.to_string())
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Text(s) => s.trim().is_empty(),
            RawCell::Number(_) => false,
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RawCell::Empty => Ok(()),
            RawCell::Text(s) => write!(f, "{}", s),
            // 整数值不带小数部分: 3.0 → "3"
            RawCell::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => write!(f, "{:.0}", n),
            RawCell::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&Data> for RawCell {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty => RawCell::Empty,
            Data::Int(i) => RawCell::Number(*i as f64),
            Data::Float(f) => RawCell::Number(*f),
            Data::String(s) => RawCell::text(s),
            other => RawCell::text(&other.to_string()),
        }
    }
}

/// 原始数据行
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    pub row_number: usize,
    pub cells: Vec<RawCell>,
    /// 第一个非 UTF-8 单元格的列号（1-based）
    pub invalid_encoding: Option<usize>,
}

impl RawRow {
    pub fn new(row_number: usize, cells: Vec<RawCell>) -> Self {
        Self {
            row_number,
            cells,
            invalid_encoding: None,
        }
    }

    pub fn with_invalid_encoding(mut self, column: usize) -> Self {
        self.invalid_encoding = Some(column);
        self
    }

    pub fn cell(&self, idx: usize) -> Option<&RawCell> {
        self.cells.get(idx)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(RawCell::is_blank)
    }
}

// ==========================================
// 导入源
// ==========================================

/// 工作表选择
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SheetSelector {
    #[default]
    First,
    Named(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSource {
    pub path: PathBuf,
    pub sheet: SheetSelector,
}

impl ImportSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            sheet: SheetSelector::First,
        }
    }

    pub fn with_sheet(mut self, sheet: impl Into<String>) -> Self {
        self.sheet = SheetSelector::Named(sheet.into());
        self
    }

    fn extension(&self) -> String {
        self.path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_lowercase()
    }
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser {
    delimiter: u8,
}

impl CsvParser {
    pub fn new(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for CsvParser {
    fn default() -> Self {
        Self::new(b',')
    }
}

impl FileParser for CsvParser {
    fn parse_to_raw_rows(&self, source: &ImportSource) -> ImportResult<Vec<RawRow>> {
        let path = source.path.as_path();
        ensure_exists(path)?;

        let ext = source.extension();
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let file = File::open(path)?;
        let mut reader = ReaderBuilder::new()
            .has_headers(false) // 表头按行号跳过
            .flexible(true) // 允许行长度不一致
            .delimiter(self.delimiter)
            .from_reader(file);

        let mut rows = Vec::new();
        // 按字节读取, 单行编码错误不中断整个文件
        for (idx, result) in reader.byte_records().enumerate() {
            let record = result?;
            // csv 会跳过物理空行, 行号取记录起始行
            let row_number = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 1);
            if row_number <= 1 {
                continue;
            }

            let mut invalid_column = None;
            let cells = record
                .iter()
                .enumerate()
                .map(|(col, field)| match std::str::from_utf8(field) {
                    Ok(text) => RawCell::text(text),
                    Err(_) => {
                        invalid_column.get_or_insert(col + 1);
                        RawCell::text(&String::from_utf8_lossy(field))
                    }
                })
                .collect();

            let mut row = RawRow::new(row_number, cells);
            if let Some(column) = invalid_column {
                debug!(row = row_number, column, "CSV 行包含非 UTF-8 字节");
                row = row.with_invalid_encoding(column);
            }
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), path = %path.display(), "CSV 解析完成");
        Ok(rows)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_to_raw_rows(&self, source: &ImportSource) -> ImportResult<Vec<RawRow>> {
        let path = source.path.as_path();
        ensure_exists(path)?;

        let ext = source.extension();
        if !matches!(ext.as_str(), "xlsx" | "xlsm" | "xls" | "ods") {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut workbook = open_workbook_auto(path)?;

        let sheet_names = workbook.sheet_names();
        let sheet_name = match &source.sheet {
            SheetSelector::First => sheet_names
                .first()
                .cloned()
                .ok_or_else(|| ImportError::EmptyWorkbook(path.display().to_string()))?,
            SheetSelector::Named(name) => {
                if !sheet_names.iter().any(|s| s == name) {
                    return Err(ImportError::SheetNotFound(name.clone()));
                }
                name.clone()
            }
        };

        let range = workbook.worksheet_range(&sheet_name)?;

        // range 从第一个非空单元格开始, 需还原绝对行列号
        let (start_row, start_col) = match range.start() {
            Some(start) => start,
            None => return Ok(Vec::new()),
        };

        let mut rows = Vec::new();
        for (offset, data_row) in range.rows().enumerate() {
            let row_number = start_row as usize + offset + 1;
            if row_number == 1 {
                continue;
            }

            let mut cells = vec![RawCell::Empty; start_col as usize];
            cells.extend(data_row.iter().map(RawCell::from));

            let row = RawRow::new(row_number, cells);
            if row.is_blank() {
                continue;
            }
            rows.push(row);
        }

        debug!(rows = rows.len(), sheet = %sheet_name, "Excel 解析完成");
        Ok(rows)
    }
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
#[derive(Default)]
pub struct UniversalFileParser {
    csv: CsvParser,
}

impl UniversalFileParser {
    pub fn with_csv_delimiter(delimiter: u8) -> Self {
        Self {
            csv: CsvParser::new(delimiter),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_to_raw_rows(&self, source: &ImportSource) -> ImportResult<Vec<RawRow>> {
        match source.extension().as_str() {
            "csv" => self.csv.parse_to_raw_rows(source),
            "xlsx" | "xlsm" | "xls" | "ods" => ExcelParser.parse_to_raw_rows(source),
            other => {
                ensure_exists(&source.path)?;
                Err(ImportError::UnsupportedFormat(other.to_string()))
            }
        }
    }
}

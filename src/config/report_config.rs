// ==========================================
// 加油站油量报表系统 - 报表配置
// ==========================================
// 来源优先级: 环境变量 > JSON 配置文件 > 默认值
// 环境变量:
// - FUEL_REPORT_DIR     报表输出目录
// - FUEL_REPORT_STRICT  严格模式（1/true/yes/y/on）
// - FUEL_REPORT_LOCALE  报表语言（en / fr / zh-CN）
// ==========================================

use crate::domain::types::FuelCategory;
use crate::engine::aggregator::AggregationMode;
use crate::exporter::report_exporter::ExportSink;
use crate::i18n::{self, ReportLabels};
use crate::importer::data_cleaner::{DataCleaner, DEFAULT_CATEGORY_ALIASES};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

pub const ENV_REPORT_DIR: &str = "FUEL_REPORT_DIR";
pub const ENV_STRICT: &str = "FUEL_REPORT_STRICT";
pub const ENV_LOCALE: &str = "FUEL_REPORT_LOCALE";

pub const DEFAULT_FILE_PREFIX: &str = "Gas_Station_Report";
pub const REPORT_DIR_NAME: &str = "GasReports";

/// 配置错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败 {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("配置文件格式错误 {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("配置项无效 {key}: {message}")]
    Invalid { key: String, message: String },
}

pub(crate) fn is_true(v: &str) -> bool {
    matches!(
        v.trim().to_lowercase().as_str(),
        "1" | "true" | "yes" | "y" | "on"
    )
}

/// 默认报表目录: 用户文档目录/GasReports, 取不到时为 ./GasReports
pub fn default_report_dir() -> PathBuf {
    match dirs::document_dir() {
        Some(documents) => documents.join(REPORT_DIR_NAME),
        None => PathBuf::from(".").join(REPORT_DIR_NAME),
    }
}

fn default_aliases() -> BTreeMap<String, String> {
    DEFAULT_CATEGORY_ALIASES
        .iter()
        .map(|(alias, canonical)| (alias.to_string(), canonical.to_string()))
        .collect()
}

// ==========================================
// ReportConfig
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// None 时使用 default_report_dir()
    pub report_dir: Option<PathBuf>,
    pub file_prefix: String,
    pub strict: bool,
    pub locale: String,
    /// 单油品表格（无油品列）使用的油品
    pub default_category: FuelCategory,
    /// 别名 → 标准油品名（大小写不敏感）
    pub category_aliases: BTreeMap<String, String>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            report_dir: None,
            file_prefix: DEFAULT_FILE_PREFIX.to_string(),
            strict: false,
            locale: i18n::DEFAULT_LOCALE.to_string(),
            default_category: FuelCategory::fuel(),
            category_aliases: default_aliases(),
        }
    }
}

impl ReportConfig {
    /// 加载配置（文件可选）并应用环境变量覆写
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides_from(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_json(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "配置文件加载完成");
        Ok(config)
    }

    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }

    /// 应用覆写（lookup 通常为环境变量读取, 测试中可注入）
    pub fn apply_overrides_from<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_REPORT_DIR) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                self.report_dir = Some(PathBuf::from(trimmed));
            }
        }

        if let Some(strict) = lookup(ENV_STRICT) {
            self.strict = is_true(&strict);
        }

        if let Some(locale) = lookup(ENV_LOCALE) {
            let trimmed = locale.trim();
            if !i18n::is_supported(trimmed) {
                return Err(ConfigError::Invalid {
                    key: ENV_LOCALE.to_string(),
                    message: format!(
                        "不支持的语言 '{}'（可选: {}）",
                        trimmed,
                        i18n::SUPPORTED_LOCALES.join(", ")
                    ),
                });
            }
            self.locale = trimmed.to_string();
        }

        if !i18n::is_supported(&self.locale) {
            warn!(locale = %self.locale, "不支持的报表语言, 回退到 en");
            self.locale = i18n::DEFAULT_LOCALE.to_string();
        }
        Ok(())
    }

    pub fn report_dir(&self) -> PathBuf {
        self.report_dir.clone().unwrap_or_else(default_report_dir)
    }

    pub fn mode(&self) -> AggregationMode {
        if self.strict {
            AggregationMode::Strict
        } else {
            AggregationMode::Permissive
        }
    }

    pub fn labels(&self) -> ReportLabels {
        ReportLabels::new(&self.locale)
    }

    /// 默认导出目标: `<report_dir>/<file_prefix>_<YYYY-MM-DD>.xlsx`
    pub fn default_sink(&self, date: NaiveDate) -> ExportSink {
        ExportSink::dated(self.report_dir(), &self.file_prefix, date)
    }

    pub fn data_cleaner(&self) -> DataCleaner {
        DataCleaner::with_aliases(
            self.category_aliases
                .iter()
                .map(|(alias, canonical)| (alias.clone(), canonical.clone())),
        )
    }
}

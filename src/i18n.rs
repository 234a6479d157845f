// ==========================================
// 国际化 (i18n) 模块
// ==========================================
// 使用 rust-i18n 库
// 支持英文（默认）、法文、中文
// ==========================================
// 注意: rust_i18n::i18n! 宏已在 lib.rs 中初始化
// 报表标签按显式 locale 取值, 不依赖全局 locale
// ==========================================

/// 支持的语言
pub const SUPPORTED_LOCALES: &[&str] = &["en", "fr", "zh-CN"];

/// 默认语言
pub const DEFAULT_LOCALE: &str = "en";

pub fn is_supported(locale: &str) -> bool {
    SUPPORTED_LOCALES.contains(&locale)
}

/// 翻译消息（无参数）
pub fn t(locale: &str, key: &str) -> String {
    rust_i18n::t!(key, locale = locale).to_string()
}

/// 翻译消息（带参数, 占位符格式 %{name}）
///
/// # 示例
/// ```no_run
/// use fuel_station_report::i18n::t_with_args;
/// let header = t_with_args("fr", "report.volume_header", &[("category", "Gasoil")]);
/// ```
pub fn t_with_args(locale: &str, key: &str, args: &[(&str, &str)]) -> String {
    let mut result = t(locale, key);
    for (k, v) in args {
        let placeholder = format!("%{{{}}}", k);
        result = result.replace(&placeholder, v);
    }
    result
}

// ==========================================
// ReportLabels - 报表标签
// ==========================================
// 供导出器（表头）与摘要渲染共用
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLabels {
    locale: String,
}

impl ReportLabels {
    pub fn new(locale: &str) -> Self {
        let locale = if is_supported(locale) {
            locale
        } else {
            DEFAULT_LOCALE
        };
        Self {
            locale: locale.to_string(),
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn text(&self, key: &str) -> String {
        t(&self.locale, key)
    }

    pub fn text_with(&self, key: &str, args: &[(&str, &str)]) -> String {
        t_with_args(&self.locale, key, args)
    }

    pub fn volume_header(&self, category: &str) -> String {
        self.text_with("report.volume_header", &[("category", category)])
    }

    pub fn revenue_header(&self, category: &str) -> String {
        self.text_with("report.revenue_header", &[("category", category)])
    }

    /// 汇总表末行标签（重新导入汇总表时据此跳过）
    pub fn grand_total(&self) -> String {
        self.text("report.grand_total")
    }
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::new(DEFAULT_LOCALE)
    }
}

// ==========================================
// 加油站油量报表系统 - 命令行入口
// ==========================================
// 用法:
//   fuel-station-report <readings-file> [--prices <prices.json>] [--out <path.xlsx>]
//                       [--config <config.json>] [--sheet <name>]
//                       [--schema standard|priced|single|detail]
//                       [--category <name>] [--strict] [--no-detail]
// ==========================================

use anyhow::{anyhow, bail, Context, Result};
use fuel_station_report::api::{ReportApi, RunOptions};
use fuel_station_report::config::{load_price_table, ReportConfig};
use fuel_station_report::importer::{ImportSource, RowSchema};
use fuel_station_report::{logging, FuelCategory, APP_NAME, VERSION};
use std::path::PathBuf;

const USAGE: &str = "用法: fuel-station-report <readings-file> [--prices <prices.json>] [--out <path.xlsx>] \
[--config <config.json>] [--sheet <name>] [--schema standard|priced|single|detail] \
[--category <name>] [--strict] [--no-detail]";

#[derive(Debug, Default)]
struct CliArgs {
    input: Option<PathBuf>,
    prices: Option<PathBuf>,
    out: Option<PathBuf>,
    config: Option<PathBuf>,
    sheet: Option<String>,
    schema: Option<String>,
    category: Option<String>,
    strict: bool,
    no_detail: bool,
}

fn parse_args<I>(args: I) -> Result<CliArgs>
where
    I: IntoIterator<Item = String>,
{
    let mut parsed = CliArgs::default();
    let mut iter = args.into_iter();

    while let Some(arg) = iter.next() {
        let mut value = |flag: &str| {
            iter.next()
                .ok_or_else(|| anyhow!("参数 {} 缺少取值\n{}", flag, USAGE))
        };
        match arg.as_str() {
            "--prices" => parsed.prices = Some(PathBuf::from(value("--prices")?)),
            "--out" => parsed.out = Some(PathBuf::from(value("--out")?)),
            "--config" => parsed.config = Some(PathBuf::from(value("--config")?)),
            "--sheet" => parsed.sheet = Some(value("--sheet")?),
            "--schema" => parsed.schema = Some(value("--schema")?),
            "--category" => parsed.category = Some(value("--category")?),
            "--strict" => parsed.strict = true,
            "--no-detail" => parsed.no_detail = true,
            flag if flag.starts_with("--") => bail!("未知参数: {}\n{}", flag, USAGE),
            _ if parsed.input.is_none() => parsed.input = Some(PathBuf::from(&arg)),
            _ => bail!("多余的参数: {}\n{}", arg, USAGE),
        }
    }

    Ok(parsed)
}

fn schema_for(args: &CliArgs, api: &ReportApi) -> Result<RowSchema> {
    let schema = match args.schema.as_deref().unwrap_or("standard") {
        "standard" => RowSchema::Standard,
        "priced" => RowSchema::Priced,
        "detail" => RowSchema::Detail,
        "single" => match &args.category {
            Some(category) => RowSchema::SingleCategory(FuelCategory::new(category)),
            None => api.single_category_schema(),
        },
        other => bail!("未知行格式: {}（可选: standard, priced, single, detail）", other),
    };
    Ok(schema)
}

fn main() -> Result<()> {
    logging::init();

    let args = parse_args(std::env::args().skip(1))?;
    let input = args
        .input
        .clone()
        .ok_or_else(|| anyhow!("缺少读数文件\n{}", USAGE))?;

    tracing::info!(version = VERSION, "{}", APP_NAME);

    let mut config = ReportConfig::load(args.config.as_deref()).context("加载配置失败")?;
    if args.strict {
        config.strict = true;
    }
    let api = ReportApi::new(config);

    let prices = match &args.prices {
        Some(path) => Some(
            load_price_table(path)
                .with_context(|| format!("加载单价文件失败: {}", path.display()))?,
        ),
        None => None,
    };

    let mut source = ImportSource::new(&input);
    if let Some(sheet) = &args.sheet {
        source = source.with_sheet(sheet.clone());
    }
    let schema = schema_for(&args, &api)?;
    let options = RunOptions {
        output: args.out.clone(),
        include_detail: !args.no_detail,
    };

    let run = api
        .run_with(&source, schema, prices.as_ref(), &options)
        .with_context(|| format!("生成报表失败: {}", input.display()))?;

    for warning in &run.warnings {
        eprintln!("警告: {}", warning);
    }
    println!("{}", run.summary_text);
    println!();
    println!("报表已保存: {}", run.export.path.display());

    Ok(())
}

/**
* filename : main
* author : HAMA
* date: 2025. 5. 8.
* description:
**/

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};

use xIndicator::config::Config;
use xIndicator::market_data::{build_context, CsvPriceLoader, MarketSnapshot};
use xIndicator::utils::logging;
use xIndicator::{IndicatorCategory, IndicatorEngine, IndicatorResult};

const USAGE: &str = "usage: xIndicator <prices.csv> [snapshot.json] [--category technical|fundamental|chip] [--name INDICATOR]";

struct Args {
    prices: PathBuf,
    snapshot: Option<PathBuf>,
    category: Option<IndicatorCategory>,
    name: Option<String>,
}

fn parse_args(args: &[String]) -> Result<Args, anyhow::Error> {
    let mut positional = Vec::new();
    let mut category = None;
    let mut name = None;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--category" => {
                let value = iter.next().ok_or_else(|| anyhow!("--category requires a value\n{}", USAGE))?;
                category = Some(value.parse::<IndicatorCategory>()?);
            }
            "--name" => {
                let value = iter.next().ok_or_else(|| anyhow!("--name requires a value\n{}", USAGE))?;
                name = Some(value.clone());
            }
            _ => positional.push(PathBuf::from(arg)),
        }
    }

    let mut positional = positional.into_iter();
    let prices = positional.next().ok_or_else(|| anyhow!(USAGE))?;

    Ok(Args {
        prices,
        snapshot: positional.next(),
        category,
        name,
    })
}

fn stock_code_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown")
        .to_string()
}

fn main() -> Result<(), anyhow::Error> {
    // 설정 로드
    let config = Config::load()?;

    // 로깅 초기화
    logging::init(&config.logging.level)?;
    log::info!("xIndicator {} 시작", xIndicator::VERSION);

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args = parse_args(&args)?;

    let engine = IndicatorEngine::from_config(&config.engine)?;

    let prices = CsvPriceLoader::default()
        .load(&args.prices)
        .with_context(|| format!("failed to load prices from {}", args.prices.display()))?;
    let snapshot = match &args.snapshot {
        Some(path) => Some(
            MarketSnapshot::load(path).with_context(|| format!("failed to load snapshot from {}", path.display()))?,
        ),
        None => None,
    };
    let context = build_context(&stock_code_of(&args.prices), prices, snapshot)?;

    logging::log_analysis_start(&context.stock_code, context.price_count(), engine.len());

    let results: Vec<IndicatorResult> = match (&args.name, args.category) {
        (Some(name), _) => engine.calculate_by_name(&context, name).into_iter().collect(),
        (None, Some(category)) => engine.calculate_by_category(&context, category),
        (None, None) => engine.calculate_all(&context),
    };

    logging::log_analysis_end(&context.stock_code, results.len());

    println!("{}", serde_json::to_string_pretty(&results)?);

    Ok(())
}

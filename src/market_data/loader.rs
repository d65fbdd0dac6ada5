use std::fs;
use std::path::Path;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::IndicatorError;
use crate::models::{ChipData, DailyPrice, FundamentalData, IndicatorContext, InsiderTradingSummary};

/// 일봉 CSV 파일 로더.
///
/// 헤더: `date,open,high,low,close,volume[,turnover,transactions]`
pub struct CsvPriceLoader {
    delimiter: u8,
}

impl CsvPriceLoader {
    pub fn new(delimiter: char) -> Self {
        Self { delimiter: delimiter as u8 }
    }

    pub fn load(&self, path: &Path) -> Result<Vec<DailyPrice>, IndicatorError> {
        let rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| IndicatorError::IoError(e.into()))?;

        self.read(rdr)
    }

    pub fn load_str(&self, data: &str) -> Result<Vec<DailyPrice>, IndicatorError> {
        let rdr = csv::ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());

        self.read(rdr)
    }

    fn read<R: std::io::Read>(&self, mut rdr: csv::Reader<R>) -> Result<Vec<DailyPrice>, IndicatorError> {
        let mut result = Vec::new();
        for (line, rec) in rdr.deserialize().enumerate() {
            let row: CsvRow = rec.map_err(|e| IndicatorError::ParseError(e.to_string()))?;
            let price = row
                .into_price()
                .map_err(|e| IndicatorError::ParseError(format!("row {}: {}", line + 1, e)))?;
            result.push(price);
        }
        Ok(result)
    }
}

impl Default for CsvPriceLoader {
    fn default() -> Self {
        Self::new(',')
    }
}

#[derive(Deserialize)]
struct CsvRow {
    date: String,
    open: String,
    high: String,
    low: String,
    close: String,
    volume: String,
    #[serde(default)]
    turnover: Option<String>,
    #[serde(default)]
    transactions: Option<String>,
}

impl CsvRow {
    fn into_price(self) -> Result<DailyPrice, String> {
        let date = NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .map_err(|e| format!("invalid date '{}': {}", self.date, e))?;

        let mut price = DailyPrice::new(
            date,
            parse_decimal("open", &self.open)?,
            parse_decimal("high", &self.high)?,
            parse_decimal("low", &self.low)?,
            parse_decimal("close", &self.close)?,
            parse_integer("volume", &self.volume)?,
        );

        if let Some(turnover) = self.turnover.filter(|s| !s.is_empty()) {
            price = price.with_turnover(parse_decimal("turnover", &turnover)?);
        }
        if let Some(transactions) = self.transactions.filter(|s| !s.is_empty()) {
            price = price.with_transactions(parse_integer("transactions", &transactions)?);
        }

        Ok(price)
    }
}

// 천 단위 구분자(,) 제거 후 파싱
fn parse_decimal(field: &str, raw: &str) -> Result<Decimal, String> {
    Decimal::from_str(&raw.replace(',', "")).map_err(|e| format!("invalid {} '{}': {}", field, raw, e))
}

fn parse_integer(field: &str, raw: &str) -> Result<i64, String> {
    raw.replace(',', "").parse::<i64>().map_err(|e| format!("invalid {} '{}': {}", field, raw, e))
}

/// 기본적/수급/내부자 데이터 JSON 스냅샷
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketSnapshot {
    #[serde(default)]
    pub stock_code: Option<String>,
    #[serde(default)]
    pub fundamental: Option<FundamentalData>,
    #[serde(default)]
    pub chip: Option<ChipData>,
    #[serde(default)]
    pub insider: Option<InsiderTradingSummary>,
}

impl MarketSnapshot {
    pub fn from_json(json: &str) -> Result<Self, IndicatorError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, IndicatorError> {
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }
}

/// 가격 시계열과 스냅샷으로 컨텍스트 생성 후 날짜 순서 검증
pub fn build_context(
    stock_code: &str,
    prices: Vec<DailyPrice>,
    snapshot: Option<MarketSnapshot>,
) -> Result<IndicatorContext, IndicatorError> {
    let mut context = IndicatorContext::new(stock_code, prices);

    if let Some(snapshot) = snapshot {
        if let Some(code) = snapshot.stock_code.filter(|c| !c.is_empty()) {
            context.stock_code = code;
        }
        context.fundamental = snapshot.fundamental;
        context.chip = snapshot.chip;
        context.insider = snapshot.insider;
    }

    context.validate()?;
    Ok(context)
}

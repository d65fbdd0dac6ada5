/**
* filename : context
* author : HAMA
* date: 2025. 5. 11.
* description: 지표 계산에 사용되는 불변 시장 스냅샷
**/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::IndicatorError;
use super::chip::{ChipData, InsiderTradingSummary};
use super::fundamental::FundamentalData;
use super::market_data::DailyPrice;

/// 분석 요청 1건에 대한 시장 데이터 스냅샷.
///
/// 생성 후에는 변경하지 않으며, 모든 계산기가 참조로 공유한다.
/// `prices`는 날짜 오름차순이어야 하고 마지막 원소가 최신 거래일이다.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndicatorContext {
  pub stock_code: String,
  #[serde(default)]
  pub prices: Vec<DailyPrice>,
  #[serde(default)]
  pub fundamental: Option<FundamentalData>,
  #[serde(default)]
  pub chip: Option<ChipData>,
  #[serde(default)]
  pub insider: Option<InsiderTradingSummary>,
}

impl IndicatorContext {
  pub fn new(stock_code: impl Into<String>, prices: Vec<DailyPrice>) -> Self {
    IndicatorContext {
      stock_code: stock_code.into(),
      prices,
      fundamental: None,
      chip: None,
      insider: None,
    }
  }

  pub fn with_fundamental(mut self, fundamental: FundamentalData) -> Self {
    self.fundamental = Some(fundamental);
    self
  }

  pub fn with_chip(mut self, chip: ChipData) -> Self {
    self.chip = Some(chip);
    self
  }

  pub fn with_insider(mut self, insider: InsiderTradingSummary) -> Self {
    self.insider = Some(insider);
    self
  }

  pub fn price_count(&self) -> usize {
    self.prices.len()
  }

  pub fn closes(&self) -> Vec<Decimal> {
    self.prices.iter().map(|p| p.close).collect()
  }

  pub fn volumes(&self) -> Vec<i64> {
    self.prices.iter().map(|p| p.volume).collect()
  }

  pub fn latest(&self) -> Option<&DailyPrice> {
    self.prices.last()
  }

  pub fn latest_close(&self) -> Option<Decimal> {
    self.latest().map(|p| p.close)
  }

  /// 가격 시계열이 날짜 오름차순인지 확인 (같은 날짜 중복도 거부)
  pub fn validate(&self) -> Result<(), IndicatorError> {
    for pair in self.prices.windows(2) {
      if pair[1].date <= pair[0].date {
        return Err(IndicatorError::InvalidContext(format!(
          "{}: prices not in ascending date order at {} -> {}",
          self.stock_code, pair[0].date, pair[1].date
        )));
      }
    }

    Ok(())
  }
}

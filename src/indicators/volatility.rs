/**
* filename : volatility
* author : HAMA
* date: 2025. 5. 12.
* description: 볼린저 밴드 (20일, 2σ)
**/

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::error::IndicatorError;
use crate::models::IndicatorContext;
use crate::signals::{BandClassifier, Direction, IndicatorCategory, IndicatorResult};
use crate::utils::math::{average, population_std_dev};
use super::IndicatorCalculator;
use super::utils::has_prices;

const PERIOD: usize = 20;
const NUM_STD: Decimal = dec!(2);

#[derive(Debug, Clone, Copy)]
pub struct BollingerBands {
  pub upper: Decimal,
  pub middle: Decimal,
  pub lower: Decimal,
  pub std_dev: Decimal,
  pub bandwidth: Decimal,
  pub percent_b: Decimal,
  pub close: Decimal,
}

impl BollingerBands {
  /// 마지막 20개 종가로 밴드 계산 (모집단 표준편차)
  pub fn from_closes(closes: &[Decimal]) -> Option<Self> {
    if closes.len() < PERIOD {
      return None;
    }

    let window = &closes[closes.len() - PERIOD..];
    let middle = average(window)?;
    let std_dev = population_std_dev(window)?.abs();
    let close = window[PERIOD - 1];

    let upper = middle + NUM_STD * std_dev;
    let lower = middle - NUM_STD * std_dev;

    let bandwidth = if middle.is_zero() {
      Decimal::ZERO
    } else {
      (upper - lower) / middle * Decimal::ONE_HUNDRED
    };

    let percent_b = if upper == lower {
      dec!(50)
    } else {
      (close - lower) / (upper - lower) * Decimal::ONE_HUNDRED
    };

    Some(BollingerBands { upper, middle, lower, std_dev, bandwidth, percent_b, close })
  }
}

pub struct BollingerBandsCalculator {
  bands: BandClassifier<BollingerBands>,
}

impl BollingerBandsCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<BollingerBands>::builder()
      .band(|b| b.close >= b.upper, "Touching upper band", Direction::Bearish, 25)
      .band(|b| b.close <= b.lower, "Touching lower band", Direction::Bullish, 75)
      .band(|b| b.percent_b > dec!(90), "Near upper band", Direction::Bearish, 35)
      .band(|b| b.percent_b < dec!(10), "Near lower band", Direction::Bullish, 65)
      .band(|b| b.bandwidth < dec!(5), "Band squeeze, breakout pending", Direction::Neutral, 50)
      .band(|b| b.percent_b > dec!(50), "Upper half of band", Direction::Bullish, 60)
      .otherwise("Lower half of band", Direction::Bearish, 40);

    BollingerBandsCalculator { bands }
  }
}

impl Default for BollingerBandsCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for BollingerBandsCalculator {
  fn name(&self) -> &str {
    "BollingerBands"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Technical
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_prices(context, PERIOD)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let bb = BollingerBands::from_closes(&context.closes())
      .ok_or_else(|| IndicatorError::CalculationError("Bollinger bands could not be computed".to_string()))?;

    let verdict = self.bands.classify(&bb);
    let reason = format!(
      "Close {:.2} within bands {:.2} / {:.2} / {:.2} (%B {:.2}, bandwidth {:.2}%)",
      bb.close, bb.lower, bb.middle, bb.upper, bb.percent_b, bb.bandwidth
    );

    Ok(IndicatorResult::new(self.name(), self.category(), bb.middle, verdict, reason)
      .with_sub_value("UpperBand", bb.upper)
      .with_sub_value("MiddleBand", bb.middle)
      .with_sub_value("LowerBand", bb.lower)
      .with_sub_value("Bandwidth", bb.bandwidth)
      .with_sub_value("PercentB", bb.percent_b)
      .with_sub_value("StdDev", bb.std_dev))
  }
}

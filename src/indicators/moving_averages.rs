/**
* filename : moving_averages
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use rust_decimal::Decimal;
use crate::error::IndicatorError;
use crate::models::IndicatorContext;
use crate::signals::{BandClassifier, Direction, IndicatorCategory, IndicatorResult};
use crate::utils::math::trailing_average;
use super::IndicatorCalculator;
use super::utils::has_prices;

const MIN_DAYS: usize = 20;
const LONG_PERIOD: usize = 60;

struct LongAlignment {
  close: Decimal,
  ma5: Decimal,
  ma20: Decimal,
  ma60: Decimal,
}

struct ShortAlignment {
  close: Decimal,
  ma5: Decimal,
  ma20: Decimal,
}

/// 이동평균 배열 (MA5 / MA20 / MA60)
pub struct MovingAverageCalculator {
  long_bands: BandClassifier<LongAlignment>,
  short_bands: BandClassifier<ShortAlignment>,
}

impl MovingAverageCalculator {
  pub fn new() -> Self {
    let long_bands = BandClassifier::<LongAlignment>::builder()
      .band(|a| a.close > a.ma5 && a.ma5 > a.ma20 && a.ma20 > a.ma60,
            "Bullish alignment", Direction::StrongBullish, 90)
      .band(|a| a.close < a.ma5 && a.ma5 < a.ma20 && a.ma20 < a.ma60,
            "Bearish alignment", Direction::StrongBearish, 10)
      .band(|a| a.close > a.ma5 && a.close > a.ma20 && a.close > a.ma60,
            "Price above all moving averages", Direction::Bullish, 70)
      .band(|a| a.close < a.ma5 && a.close < a.ma20 && a.close < a.ma60,
            "Price below all moving averages", Direction::Bearish, 30)
      .band(|a| a.close > a.ma20, "Holding above MA20", Direction::Neutral, 55)
      .otherwise("Mixed moving averages", Direction::Neutral, 50);

    // MA60이 없으면 MA5/MA20 두 개로만 판단
    let short_bands = BandClassifier::<ShortAlignment>::builder()
      .band(|a| a.close > a.ma5 && a.ma5 > a.ma20, "Short-term uptrend", Direction::Bullish, 70)
      .band(|a| a.close < a.ma5 && a.ma5 < a.ma20, "Short-term downtrend", Direction::Bearish, 30)
      .band(|a| a.close > a.ma20, "Holding above MA20", Direction::Neutral, 55)
      .otherwise("Mixed moving averages", Direction::Neutral, 50);

    MovingAverageCalculator { long_bands, short_bands }
  }
}

impl Default for MovingAverageCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for MovingAverageCalculator {
  fn name(&self) -> &str {
    "MA"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Technical
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_prices(context, MIN_DAYS)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let closes = context.closes();
    let insufficient = || IndicatorError::InsufficientData(format!("MA requires {} days", MIN_DAYS));

    let close = context.latest_close().ok_or_else(insufficient)?;
    let ma5 = trailing_average(&closes, 5).ok_or_else(insufficient)?;
    let ma20 = trailing_average(&closes, 20).ok_or_else(insufficient)?;
    let ma60 = trailing_average(&closes, LONG_PERIOD);

    let (verdict, reason) = match ma60 {
      Some(ma60) => {
        let verdict = self.long_bands.classify(&LongAlignment { close, ma5, ma20, ma60 });
        let reason = format!(
          "Close {:.2} vs MA5 {:.2}, MA20 {:.2}, MA60 {:.2}",
          close, ma5, ma20, ma60
        );
        (verdict, reason)
      }
      None => {
        let verdict = self.short_bands.classify(&ShortAlignment { close, ma5, ma20 });
        let reason = format!(
          "Close {:.2} vs MA5 {:.2}, MA20 {:.2} (MA60 needs {} days, have {})",
          close, ma5, ma20, LONG_PERIOD, closes.len()
        );
        (verdict, reason)
      }
    };

    Ok(IndicatorResult::new(self.name(), self.category(), ma20, verdict, reason)
      .with_sub_value("MA5", ma5)
      .with_sub_value("MA20", ma20)
      .with_optional_sub_value("MA60", ma60)
      .with_sub_value("Close", close))
  }
}

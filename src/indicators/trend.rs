/**
* filename : trend
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use rust_decimal::Decimal;
use crate::error::IndicatorError;
use crate::models::IndicatorContext;
use crate::signals::{BandClassifier, Direction, IndicatorCategory, IndicatorResult, Verdict};
use super::IndicatorCalculator;
use super::utils::{ema_series, has_prices};

const FAST_PERIOD: usize = 12;
const SLOW_PERIOD: usize = 26;
const SIGNAL_PERIOD: usize = 9;

#[derive(Debug, Clone, Copy)]
pub struct MacdState {
  pub fast_ema: Decimal,
  pub slow_ema: Decimal,
  pub macd: Decimal,
  pub signal: Decimal,
  pub histogram: Decimal,
  pub prev_macd: Decimal,
  pub prev_signal: Decimal,
}

impl MacdState {
  fn golden_cross(&self) -> bool {
    self.prev_macd <= self.prev_signal && self.macd > self.signal
  }

  fn death_cross(&self) -> bool {
    self.prev_macd >= self.prev_signal && self.macd < self.signal
  }
}

/// MACD (12, 26, 9)
pub struct MacdCalculator {
  bands: BandClassifier<MacdState>,
}

impl MacdCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<MacdState>::builder()
      .band(|s| s.golden_cross(), "MACD golden cross", Direction::StrongBullish, 85)
      .band(|s| s.death_cross(), "MACD death cross", Direction::StrongBearish, 15)
      .band(|s| s.macd > Decimal::ZERO && s.histogram > Decimal::ZERO,
            "MACD above zero and rising", Direction::Bullish, 70)
      .band(|s| s.macd > Decimal::ZERO, "MACD above zero, momentum fading", Direction::Neutral, 55)
      .band(|s| s.histogram > Decimal::ZERO, "MACD below zero, momentum recovering", Direction::Neutral, 45)
      .otherwise("MACD below zero and falling", Direction::Bearish, 30);

    MacdCalculator { bands }
  }

  /// 최소 일수 = 느린 EMA + 시그널 기간
  pub fn min_days() -> usize {
    SLOW_PERIOD + SIGNAL_PERIOD
  }

  // 전체 EMA 경로를 다시 계산한다. EMA 점화식은 인과적이므로
  // 계열의 마지막 두 점은 data[..N-1], data[..N-2]로 다시 계산한 값과 같다.
  pub fn compute(closes: &[Decimal]) -> Option<MacdState> {
    let fast = ema_series(closes, FAST_PERIOD);
    let slow = ema_series(closes, SLOW_PERIOD);
    if slow.is_empty() {
      return None;
    }

    // 공통 꼬리 기준으로 정렬
    let offset = SLOW_PERIOD - FAST_PERIOD;
    let macd_line: Vec<Decimal> = slow
      .iter()
      .enumerate()
      .map(|(i, s)| fast[i + offset] - *s)
      .collect();

    let signal_line = ema_series(&macd_line, SIGNAL_PERIOD);
    if signal_line.len() < 2 {
      return None;
    }

    let macd = macd_line[macd_line.len() - 1];
    let prev_macd = macd_line[macd_line.len() - 2];
    let signal = signal_line[signal_line.len() - 1];
    let prev_signal = signal_line[signal_line.len() - 2];

    Some(MacdState {
      fast_ema: fast[fast.len() - 1],
      slow_ema: slow[slow.len() - 1],
      macd,
      signal,
      histogram: macd - signal,
      prev_macd,
      prev_signal,
    })
  }

  pub fn classify(&self, state: &MacdState) -> Verdict {
    self.bands.classify(state)
  }
}

impl Default for MacdCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for MacdCalculator {
  fn name(&self) -> &str {
    "MACD"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Technical
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_prices(context, Self::min_days())
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let state = Self::compute(&context.closes())
      .ok_or_else(|| IndicatorError::InsufficientData(format!("MACD requires {} days", Self::min_days())))?;

    let verdict = self.classify(&state);
    let reason = format!(
      "MACD {:.4} vs signal {:.4} (histogram {:.4}; previous MACD {:.4} / signal {:.4})",
      state.macd, state.signal, state.histogram, state.prev_macd, state.prev_signal
    );

    // DIF는 MACD와 동일 (명명 호환)
    Ok(IndicatorResult::new(self.name(), self.category(), state.macd, verdict, reason)
      .with_sub_value("MACD", state.macd)
      .with_sub_value("DIF", state.macd)
      .with_sub_value("Signal", state.signal)
      .with_sub_value("Histogram", state.histogram)
      .with_sub_value("EMA12", state.fast_ema)
      .with_sub_value("EMA26", state.slow_ema))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::DailyPrice;
  use chrono::{Duration, NaiveDate};
  use rust_decimal_macros::dec;

  fn context(closes: &[Decimal]) -> IndicatorContext {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let prices = closes
      .iter()
      .enumerate()
      .map(|(i, c)| DailyPrice::new(start + Duration::days(i as i64), *c, *c, *c, *c, 1_000))
      .collect();
    IndicatorContext::new("2330", prices)
  }

  fn state(macd: Decimal, signal: Decimal, prev_macd: Decimal, prev_signal: Decimal) -> MacdState {
    MacdState {
      fast_ema: Decimal::ZERO,
      slow_ema: Decimal::ZERO,
      macd,
      signal,
      histogram: macd - signal,
      prev_macd,
      prev_signal,
    }
  }

  #[test]
  fn test_macd_requires_35_days() {
    let calc = MacdCalculator::new();
    let closes: Vec<Decimal> = (0..34).map(Decimal::from).collect();
    assert!(!calc.can_calculate(&context(&closes)));
    assert!(MacdCalculator::compute(&closes).is_none());

    let closes: Vec<Decimal> = (0..35).map(Decimal::from).collect();
    assert!(calc.can_calculate(&context(&closes)));
    assert!(MacdCalculator::compute(&closes).is_some());
  }

  #[test]
  fn test_macd_histogram_identity() {
    let closes: Vec<Decimal> = (0..60).map(|i| Decimal::from(100 + (i * 7) % 13)).collect();
    let result = MacdCalculator::new().calculate(&context(&closes)).unwrap();

    let macd = result.sub_value("MACD").unwrap();
    let signal = result.sub_value("Signal").unwrap();
    let histogram = result.sub_value("Histogram").unwrap();
    assert!((histogram - (macd - signal)).abs() < dec!(0.0000001));
    assert_eq!(result.sub_value("DIF"), Some(macd));
    assert_eq!(result.value, macd);
  }

  #[test]
  fn test_macd_uptrend_positive() {
    let closes: Vec<Decimal> = (0..60i64).map(|i| Decimal::from(100 + i * i)).collect();
    let result = MacdCalculator::new().calculate(&context(&closes)).unwrap();

    assert!(result.value > Decimal::ZERO);
    assert_eq!(result.direction, Direction::Bullish);
    assert_eq!(result.score, 70);
  }

  #[test]
  fn test_macd_downtrend_negative() {
    let closes: Vec<Decimal> = (0..60i64).map(|i| Decimal::from(5000 - i * i)).collect();
    let result = MacdCalculator::new().calculate(&context(&closes)).unwrap();

    assert!(result.value < Decimal::ZERO);
    assert_eq!(result.direction, Direction::Bearish);
  }

  #[test]
  fn test_macd_crossovers() {
    let calc = MacdCalculator::new();

    let golden = calc.classify(&state(dec!(1.2), dec!(1.0), dec!(0.8), dec!(0.9)));
    assert_eq!(golden.direction, Direction::StrongBullish);
    assert_eq!(golden.score, 85);

    let death = calc.classify(&state(dec!(-0.5), dec!(-0.2), dec!(0.1), dec!(0.0)));
    assert_eq!(death.direction, Direction::StrongBearish);
    assert_eq!(death.score, 15);
  }

  #[test]
  fn test_macd_sign_classification() {
    let calc = MacdCalculator::new();

    assert_eq!(calc.classify(&state(dec!(2), dec!(1), dec!(1.5), dec!(0.9))).score, 70);
    assert_eq!(calc.classify(&state(dec!(1), dec!(2), dec!(1.1), dec!(2.1))).score, 55);
    assert_eq!(calc.classify(&state(dec!(-1), dec!(-2), dec!(-1.1), dec!(-2.1))).score, 45);
    assert_eq!(calc.classify(&state(dec!(-2), dec!(-1), dec!(-1.9), dec!(-0.9))).score, 30);
  }
}

/**
* filename : oscillators
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::error::IndicatorError;
use crate::models::IndicatorContext;
use crate::signals::{BandClassifier, Direction, IndicatorCategory, IndicatorResult};
use crate::utils::math::clamp;
use super::IndicatorCalculator;
use super::utils::{has_prices, highest, lowest};

const RSI_PERIOD: usize = 14;

/// RSI (Wilder 평활, 14일)
pub struct RsiCalculator {
  bands: BandClassifier<Decimal>,
}

impl RsiCalculator {
  pub fn new() -> Self {
    // RSI가 높을수록 과열 경고로 취급
    let bands = BandClassifier::<Decimal>::builder()
      .band(|rsi| *rsi >= dec!(80), "Extremely overbought", Direction::StrongBearish, 15)
      .band(|rsi| *rsi >= dec!(70), "Overbought", Direction::Bearish, 30)
      .band(|rsi| *rsi <= dec!(20), "Extremely oversold", Direction::StrongBullish, 85)
      .band(|rsi| *rsi <= dec!(30), "Oversold", Direction::Bullish, 70)
      .band(|rsi| *rsi >= dec!(50), "Bullish momentum", Direction::Bullish, 60)
      .otherwise("Bearish momentum", Direction::Bearish, 40);

    RsiCalculator { bands }
  }

  /// (RSI, 평균 상승폭, 평균 하락폭)
  pub fn compute(closes: &[Decimal]) -> Option<(Decimal, Decimal, Decimal)> {
    if closes.len() <= RSI_PERIOD {
      return None;
    }

    let period = Decimal::from(RSI_PERIOD);
    let changes: Vec<Decimal> = closes.windows(2).map(|w| w[1] - w[0]).collect();

    let gain = |c: &Decimal| if *c > Decimal::ZERO { *c } else { Decimal::ZERO };
    let loss = |c: &Decimal| if *c < Decimal::ZERO { -*c } else { Decimal::ZERO };

    // 초기 평균 (단순평균)
    let mut avg_gain = changes[..RSI_PERIOD].iter().map(gain).sum::<Decimal>() / period;
    let mut avg_loss = changes[..RSI_PERIOD].iter().map(loss).sum::<Decimal>() / period;

    // Wilder 스무딩
    for change in &changes[RSI_PERIOD..] {
      avg_gain = (avg_gain * (period - Decimal::ONE) + gain(change)) / period;
      avg_loss = (avg_loss * (period - Decimal::ONE) + loss(change)) / period;
    }

    let rsi = if avg_loss.is_zero() {
      Decimal::ONE_HUNDRED
    } else {
      let rs = avg_gain / avg_loss;
      Decimal::ONE_HUNDRED - Decimal::ONE_HUNDRED / (Decimal::ONE + rs)
    };

    Some((rsi, avg_gain, avg_loss))
  }
}

impl Default for RsiCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for RsiCalculator {
  fn name(&self) -> &str {
    "RSI"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Technical
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_prices(context, RSI_PERIOD + 1)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let (rsi, avg_gain, avg_loss) = Self::compute(&context.closes())
      .ok_or_else(|| IndicatorError::InsufficientData(format!("RSI requires more than {} days", RSI_PERIOD)))?;

    let verdict = self.bands.classify(&rsi);
    let reason = format!(
      "RSI({}) at {:.2} (avg gain {:.4}, avg loss {:.4})",
      RSI_PERIOD, rsi, avg_gain, avg_loss
    );

    Ok(IndicatorResult::new(self.name(), self.category(), rsi, verdict, reason)
      .with_sub_value("RSI", rsi)
      .with_sub_value("AvgGain", avg_gain)
      .with_sub_value("AvgLoss", avg_loss))
  }
}

const KD_PERIOD: usize = 9;
const KD_MIN_DAYS: usize = 15;

struct KdState {
  k: Decimal,
  d: Decimal,
  prev_k: Decimal,
  prev_d: Decimal,
}

impl KdState {
  fn golden_cross(&self) -> bool {
    self.prev_k <= self.prev_d && self.k > self.d
  }

  fn death_cross(&self) -> bool {
    self.prev_k >= self.prev_d && self.k < self.d
  }
}

/// KD 스토캐스틱 (9, 3, 3)
pub struct KdCalculator {
  bands: BandClassifier<KdState>,
}

impl KdCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<KdState>::builder()
      .band(|s| s.golden_cross() && s.k < dec!(50), "Golden cross in low zone", Direction::StrongBullish, 90)
      .band(|s| s.golden_cross(), "Golden cross", Direction::Bullish, 65)
      .band(|s| s.death_cross() && s.k > dec!(50), "Death cross in high zone", Direction::StrongBearish, 10)
      .band(|s| s.death_cross(), "Death cross", Direction::Bearish, 35)
      .band(|s| s.k > dec!(80) && s.d > dec!(80), "Overbought", Direction::Bearish, 25)
      .band(|s| s.k < dec!(20) && s.d < dec!(20), "Oversold", Direction::Bullish, 75)
      .band(|s| s.k > s.d, "K above D", Direction::Bullish, 60)
      .otherwise("K below D", Direction::Bearish, 40);

    KdCalculator { bands }
  }

  /// RSV 계열. 9일 최고/최저 범위가 0이면 50
  pub fn rsv_series(context: &IndicatorContext) -> Vec<Decimal> {
    let prices = &context.prices;
    if prices.len() < KD_PERIOD {
      return Vec::new();
    }

    prices
      .windows(KD_PERIOD)
      .map(|window| {
        let highs: Vec<Decimal> = window.iter().map(|p| p.high).collect();
        let lows: Vec<Decimal> = window.iter().map(|p| p.low).collect();
        let close = window[KD_PERIOD - 1].close;

        match (highest(&highs), lowest(&lows)) {
          (Some(high), Some(low)) if high > low => {
            clamp((close - low) / (high - low) * Decimal::ONE_HUNDRED, Decimal::ZERO, Decimal::ONE_HUNDRED)
          }
          _ => dec!(50),
        }
      })
      .collect()
  }

  /// 매번 처음부터 K/D 경로를 다시 계산한다. (K, D, 직전 K, 직전 D)
  fn smooth(rsv: &[Decimal]) -> Option<KdState> {
    if rsv.len() < 2 {
      return None;
    }

    let mut k = dec!(50);
    let mut d = dec!(50);
    let mut prev_k = k;
    let mut prev_d = d;

    for value in rsv {
      prev_k = k;
      prev_d = d;
      // K = 2/3 K + 1/3 RSV, D = 2/3 D + 1/3 K
      k = (dec!(2) * k + *value) / dec!(3);
      d = (dec!(2) * d + k) / dec!(3);
    }

    Some(KdState { k, d, prev_k, prev_d })
  }
}

impl Default for KdCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for KdCalculator {
  fn name(&self) -> &str {
    "KD"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Technical
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_prices(context, KD_MIN_DAYS)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let rsv = Self::rsv_series(context);
    let state = Self::smooth(&rsv)
      .ok_or_else(|| IndicatorError::InsufficientData(format!("KD requires {} days", KD_MIN_DAYS)))?;
    let latest_rsv = rsv.last().copied().unwrap_or(dec!(50));

    let verdict = self.bands.classify(&state);
    let reason = format!(
      "K {:.2} / D {:.2} (previous K {:.2} / D {:.2}), RSV {:.2}",
      state.k, state.d, state.prev_k, state.prev_d, latest_rsv
    );

    Ok(IndicatorResult::new(self.name(), self.category(), state.k, verdict, reason)
      .with_sub_value("K", state.k)
      .with_sub_value("D", state.d)
      .with_sub_value("RSV", latest_rsv))
  }
}

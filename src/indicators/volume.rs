/**
* filename : volume
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::error::IndicatorError;
use crate::models::IndicatorContext;
use crate::signals::{BandClassifier, Direction, IndicatorCategory, IndicatorResult};
use crate::utils::math::trailing_average;
use super::IndicatorCalculator;
use super::utils::has_prices;

const MIN_DAYS: usize = 20;

struct VolumeSnapshot {
  volume_ratio: Decimal,
  today_vs_avg20: Decimal,
}

/// 거래량 비율 (5일 평균 / 20일 평균)
pub struct VolumeRatioCalculator {
  bands: BandClassifier<VolumeSnapshot>,
}

impl VolumeRatioCalculator {
  pub fn new() -> Self {
    // 가격 맥락 없이는 폭증 거래량의 방향을 알 수 없음
    let bands = BandClassifier::<VolumeSnapshot>::builder()
      .band(|v| v.today_vs_avg20 > dec!(2.0), "Extreme volume spike", Direction::Neutral, 50)
      .band(|v| v.volume_ratio > dec!(1.5), "Volume expanding strongly", Direction::Bullish, 65)
      .band(|v| v.volume_ratio > dec!(1.2), "Volume expanding", Direction::Bullish, 60)
      .band(|v| v.volume_ratio < dec!(0.5), "Volume drying up", Direction::Bearish, 35)
      .band(|v| v.volume_ratio < dec!(0.8), "Volume contracting", Direction::Neutral, 45)
      .otherwise("Normal volume", Direction::Neutral, 50);

    VolumeRatioCalculator { bands }
  }
}

impl Default for VolumeRatioCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for VolumeRatioCalculator {
  fn name(&self) -> &str {
    "VolumeRatio"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Technical
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_prices(context, MIN_DAYS)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let volumes: Vec<Decimal> = context.volumes().into_iter().map(Decimal::from).collect();
    let insufficient = || IndicatorError::InsufficientData(format!("VolumeRatio requires {} days", MIN_DAYS));

    let avg5 = trailing_average(&volumes, 5).ok_or_else(insufficient)?;
    let avg20 = trailing_average(&volumes, 20).ok_or_else(insufficient)?;
    let today = volumes.last().copied().ok_or_else(insufficient)?;

    let (volume_ratio, today_vs_avg20) = if avg20.is_zero() {
      (Decimal::ONE, Decimal::ONE)
    } else {
      (avg5 / avg20, today / avg20)
    };

    let verdict = self.bands.classify(&VolumeSnapshot { volume_ratio, today_vs_avg20 });
    let reason = format!(
      "5-day avg volume {:.0} vs 20-day avg {:.0} (ratio {:.2}); today {} is {:.2}x the 20-day avg",
      avg5, avg20, volume_ratio, today, today_vs_avg20
    );

    Ok(IndicatorResult::new(self.name(), self.category(), volume_ratio, verdict, reason)
      .with_sub_value("AvgVolume5", avg5)
      .with_sub_value("AvgVolume20", avg20)
      .with_sub_value("TodayVolume", today)
      .with_sub_value("VolumeRatio", volume_ratio)
      .with_sub_value("TodayVsAvg20", today_vs_avg20))
  }
}

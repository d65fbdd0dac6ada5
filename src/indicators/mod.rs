/**
* filename : mod
* author : HAMA
* date: 2025. 5. 11.
* description:
**/
pub mod moving_averages;
pub mod oscillators;
pub mod trend;
pub mod volatility;
pub mod volume;
pub mod chip;
pub mod fundamental;
pub mod utils;

pub use moving_averages::*;
pub use oscillators::*;
pub use trend::*;
pub use volatility::*;
pub use volume::*;
pub use chip::*;
pub use fundamental::*;

use crate::error::IndicatorError;
use crate::models::IndicatorContext;
use crate::signals::{IndicatorCategory, IndicatorResult};

pub trait IndicatorCalculator: Send + Sync {
  // 고유 식별자 (결과의 name과 동일)
  fn name(&self) -> &str;

  fn category(&self) -> IndicatorCategory;

  // 계산에 필요한 데이터가 있는지 확인 (부작용 없음, 패닉 없음)
  fn can_calculate(&self, context: &IndicatorContext) -> bool;

  // can_calculate가 true일 때만 호출된다. 컨텍스트를 변경하지 않는다.
  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError>;
}

/// 기본 계산기 목록 (등록 순서 고정)
pub fn default_calculators() -> Vec<Box<dyn IndicatorCalculator>> {
  vec![
    Box::new(MovingAverageCalculator::new()),
    Box::new(RsiCalculator::new()),
    Box::new(MacdCalculator::new()),
    Box::new(KdCalculator::new()),
    Box::new(BollingerBandsCalculator::new()),
    Box::new(VolumeRatioCalculator::new()),
    Box::new(MarginTradingCalculator::new()),
    Box::new(ForeignHoldingCalculator::new()),
    Box::new(DirectorPledgeCalculator::new()),
    Box::new(PeRatioCalculator::new()),
    Box::new(PbRatioCalculator::new()),
    Box::new(DividendYieldCalculator::new()),
    Box::new(EpsCalculator::new()),
    Box::new(RevenueGrowthCalculator::new()),
    Box::new(InsiderTradingCalculator::new()),
  ]
}

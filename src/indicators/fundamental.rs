/**
* filename : fundamental
* author : HAMA
* date: 2025. 5. 12.
* description: 기본적 분석 지표 (PER, PBR, 배당수익률, EPS, 매출 성장률)
**/

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::error::IndicatorError;
use crate::models::{FundamentalData, IndicatorContext};
use crate::signals::{BandClassifier, Direction, IndicatorCategory, IndicatorResult};
use crate::utils::math::ratio_pct;
use super::IndicatorCalculator;

fn fundamental_of(context: &IndicatorContext) -> Result<&FundamentalData, IndicatorError> {
  context
    .fundamental
    .as_ref()
    .ok_or_else(|| IndicatorError::MissingData("fundamental data".to_string()))
}

fn has_field(context: &IndicatorContext, field: fn(&FundamentalData) -> Option<Decimal>) -> bool {
  context.fundamental.as_ref().and_then(field).is_some()
}

/// 주가수익비율
pub struct PeRatioCalculator {
  bands: BandClassifier<Decimal>,
}

impl PeRatioCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<Decimal>::builder()
      .band(|pe| *pe <= Decimal::ZERO, "Negative earnings", Direction::Bearish, 30)
      .band(|pe| *pe < dec!(10), "Deeply undervalued", Direction::StrongBullish, 80)
      .band(|pe| *pe < dec!(15), "Undervalued", Direction::Bullish, 70)
      .band(|pe| *pe < dec!(20), "Fairly valued", Direction::Neutral, 55)
      .band(|pe| *pe < dec!(30), "Slightly expensive", Direction::Neutral, 45)
      .band(|pe| *pe < dec!(50), "Overvalued", Direction::Bearish, 30)
      .otherwise("Severely overvalued", Direction::StrongBearish, 15);

    PeRatioCalculator { bands }
  }

  /// 1 미만의 PER은 잘못 매핑된 필드로 보고 종가/EPS로 다시 계산
  pub fn effective_ratio(raw: Decimal, eps: Option<Decimal>, close: Option<Decimal>) -> (Decimal, bool) {
    if raw < Decimal::ONE {
      if let (Some(eps), Some(close)) = (eps, close) {
        if eps > Decimal::ZERO {
          return (close / eps, true);
        }
      }
    }
    (raw, false)
  }
}

impl Default for PeRatioCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for PeRatioCalculator {
  fn name(&self) -> &str {
    "PERatio"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Fundamental
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_field(context, |f| f.pe_ratio)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let fundamental = fundamental_of(context)?;
    let raw = fundamental.pe_ratio.ok_or_else(|| IndicatorError::MissingData("P/E ratio".to_string()))?;
    let (pe, recomputed) = Self::effective_ratio(raw, fundamental.eps, context.latest_close());

    let verdict = self.bands.classify(&pe);
    let reason = if recomputed {
      format!("P/E {:.2} recomputed from close and EPS (reported value {})", pe, raw)
    } else {
      format!("P/E ratio {:.2}", pe)
    };

    Ok(IndicatorResult::new(self.name(), self.category(), pe, verdict, reason)
      .with_sub_value("PERatio", pe)
      .with_sub_value("ReportedPERatio", raw)
      .with_optional_sub_value("EPS", fundamental.eps))
  }
}

/// 주가순자산비율
pub struct PbRatioCalculator {
  bands: BandClassifier<Decimal>,
}

impl PbRatioCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<Decimal>::builder()
      .band(|pb| *pb < Decimal::ONE, "Trading below book value", Direction::StrongBullish, 80)
      .band(|pb| *pb < dec!(1.5), "Near book value", Direction::Bullish, 70)
      .band(|pb| *pb < dec!(3), "Reasonable price to book", Direction::Neutral, 55)
      .band(|pb| *pb < dec!(5), "High price to book", Direction::Bearish, 40)
      .otherwise("Very high price to book", Direction::StrongBearish, 20);

    PbRatioCalculator { bands }
  }

  /// 10 초과이면서 종가의 20% 이상인 값은 주당순자산으로 보고 종가/값으로 다시 계산
  pub fn effective_ratio(raw: Decimal, close: Option<Decimal>) -> (Decimal, bool) {
    if let Some(close) = close.filter(|c| *c > Decimal::ZERO) {
      if raw > dec!(10) && raw >= close * dec!(0.2) {
        return (close / raw, true);
      }
    }
    (raw, false)
  }
}

impl Default for PbRatioCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for PbRatioCalculator {
  fn name(&self) -> &str {
    "PBRatio"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Fundamental
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_field(context, |f| f.pb_ratio)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let fundamental = fundamental_of(context)?;
    let raw = fundamental.pb_ratio.ok_or_else(|| IndicatorError::MissingData("P/B ratio".to_string()))?;
    let (pb, recomputed) = Self::effective_ratio(raw, context.latest_close());

    let verdict = self.bands.classify(&pb);
    let reason = if recomputed {
      format!("P/B {:.2} recomputed from close and book value per share {}", pb, raw)
    } else {
      format!("P/B ratio {:.2}", pb)
    };

    Ok(IndicatorResult::new(self.name(), self.category(), pb, verdict, reason)
      .with_sub_value("PBRatio", pb)
      .with_sub_value("ReportedPBRatio", raw)
      .with_optional_sub_value("BookValuePerShare", if recomputed { Some(raw) } else { None }))
  }
}

/// 배당수익률 (%)
pub struct DividendYieldCalculator {
  bands: BandClassifier<Decimal>,
}

impl DividendYieldCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<Decimal>::builder()
      .band(|y| *y >= dec!(7), "Very high dividend yield", Direction::StrongBullish, 85)
      .band(|y| *y >= dec!(5), "High dividend yield", Direction::Bullish, 75)
      .band(|y| *y >= dec!(3), "Attractive dividend yield", Direction::Bullish, 65)
      .band(|y| *y >= Decimal::ONE, "Average dividend yield", Direction::Neutral, 50)
      .band(|y| *y > Decimal::ZERO, "Low dividend yield", Direction::Bearish, 40)
      .otherwise("No dividend", Direction::Bearish, 35);

    DividendYieldCalculator { bands }
  }

  /// 20 이상인데 종가 대비 20% 미만이면 주당 현금배당으로 보고 수익률로 환산
  pub fn effective_yield(raw: Decimal, close: Option<Decimal>) -> (Decimal, bool) {
    if raw >= dec!(20) {
      if let Some(implied) = close.filter(|c| *c > Decimal::ZERO).and_then(|c| ratio_pct(raw, c)) {
        if implied < dec!(20) {
          return (implied, true);
        }
      }
    }
    (raw, false)
  }
}

impl Default for DividendYieldCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for DividendYieldCalculator {
  fn name(&self) -> &str {
    "DividendYield"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Fundamental
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_field(context, |f| f.dividend_yield)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let fundamental = fundamental_of(context)?;
    let raw = fundamental
      .dividend_yield
      .ok_or_else(|| IndicatorError::MissingData("dividend yield".to_string()))?;
    let (dividend_yield, recomputed) = Self::effective_yield(raw, context.latest_close());

    let verdict = self.bands.classify(&dividend_yield);
    let reason = if recomputed {
      format!("Dividend yield {:.2}% from cash dividend {} per share", dividend_yield, raw)
    } else {
      format!("Dividend yield {:.2}%", dividend_yield)
    };

    Ok(IndicatorResult::new(self.name(), self.category(), dividend_yield, verdict, reason)
      .with_sub_value("DividendYield", dividend_yield)
      .with_optional_sub_value("CashDividend", if recomputed { Some(raw) } else { None }))
  }
}

/// 주당순이익
pub struct EpsCalculator {
  bands: BandClassifier<Decimal>,
}

impl EpsCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<Decimal>::builder()
      .band(|e| *e > dec!(5), "Strong earnings", Direction::StrongBullish, 80)
      .band(|e| *e > dec!(2), "Solid earnings", Direction::Bullish, 70)
      .band(|e| *e > Decimal::ZERO, "Modest earnings", Direction::Neutral, 55)
      .band(|e| e.is_zero(), "Break-even", Direction::Neutral, 45)
      .otherwise("Loss-making", Direction::Bearish, 25);

    EpsCalculator { bands }
  }
}

impl Default for EpsCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for EpsCalculator {
  fn name(&self) -> &str {
    "EPS"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Fundamental
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_field(context, |f| f.eps)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let fundamental = fundamental_of(context)?;
    let eps = fundamental.eps.ok_or_else(|| IndicatorError::MissingData("EPS".to_string()))?;

    let verdict = self.bands.classify(&eps);
    let mut reason = match &fundamental.period {
      Some(period) => format!("EPS {:.2} for {}", eps, period),
      None => format!("EPS {:.2}", eps),
    };
    if let Some(income) = fundamental.operating_income {
      reason.push_str(&format!(", operating income {}", income));
    }
    if let Some(income) = fundamental.net_income {
      reason.push_str(&format!(", net income {}", income));
    }

    Ok(IndicatorResult::new(self.name(), self.category(), eps, verdict, reason)
      .with_sub_value("EPS", eps)
      .with_optional_sub_value("OperatingIncome", fundamental.operating_income)
      .with_optional_sub_value("NetIncome", fundamental.net_income))
  }
}

/// 월매출 전년 동월 대비 성장률
pub struct RevenueGrowthCalculator {
  bands: BandClassifier<Decimal>,
}

impl RevenueGrowthCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<Decimal>::builder()
      .band(|g| *g > dec!(30), "Revenue surging", Direction::StrongBullish, 85)
      .band(|g| *g > dec!(10), "Strong revenue growth", Direction::Bullish, 70)
      .band(|g| *g > Decimal::ZERO, "Modest revenue growth", Direction::Neutral, 55)
      .band(|g| *g > dec!(-10), "Revenue declining", Direction::Bearish, 40)
      .otherwise("Revenue contracting sharply", Direction::StrongBearish, 20);

    RevenueGrowthCalculator { bands }
  }
}

impl Default for RevenueGrowthCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for RevenueGrowthCalculator {
  fn name(&self) -> &str {
    "RevenueGrowth"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Fundamental
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    has_field(context, |f| f.revenue_yoy)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let fundamental = fundamental_of(context)?;
    let yoy = fundamental
      .revenue_yoy
      .ok_or_else(|| IndicatorError::MissingData("revenue YoY growth".to_string()))?;

    let verdict = self.bands.classify(&yoy);
    let mut reason = format!("Monthly revenue {:+.2}% YoY", yoy);
    if let Some(mom) = fundamental.revenue_mom {
      reason.push_str(&format!(", {:+.2}% MoM", mom));
    }
    if let Some(revenue) = fundamental.monthly_revenue {
      reason.push_str(&format!(" (revenue {})", revenue));
    }

    Ok(IndicatorResult::new(self.name(), self.category(), yoy, verdict, reason)
      .with_sub_value("RevenueYoY", yoy)
      .with_optional_sub_value("RevenueMoM", fundamental.revenue_mom)
      .with_optional_sub_value("MonthlyRevenue", fundamental.monthly_revenue))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::DailyPrice;
  use chrono::NaiveDate;
  use rstest::rstest;

  fn context(close: Option<Decimal>, fundamental: FundamentalData) -> IndicatorContext {
    let prices = match close {
      Some(c) => vec![DailyPrice::new(NaiveDate::from_ymd_opt(2025, 5, 2).unwrap(), c, c, c, c, 1_000)],
      None => vec![],
    };
    IndicatorContext::new("2330", prices).with_fundamental(fundamental)
  }

  #[rstest]
  #[case(dec!(-3), Direction::Bearish, 30)]
  #[case(dec!(8), Direction::StrongBullish, 80)]
  #[case(dec!(12), Direction::Bullish, 70)]
  #[case(dec!(18), Direction::Neutral, 55)]
  #[case(dec!(25), Direction::Neutral, 45)]
  #[case(dec!(40), Direction::Bearish, 30)]
  #[case(dec!(80), Direction::StrongBearish, 15)]
  fn test_pe_bands(#[case] pe: Decimal, #[case] direction: Direction, #[case] score: u8) {
    let ctx = context(Some(dec!(100)), FundamentalData { pe_ratio: Some(pe), ..Default::default() });
    let result = PeRatioCalculator::new().calculate(&ctx).unwrap();
    assert_eq!(result.direction, direction);
    assert_eq!(result.score, score);
  }

  #[test]
  fn test_pe_recomputed_from_eps() {
    let ctx = context(
      Some(dec!(100)),
      FundamentalData { pe_ratio: Some(dec!(0.5)), eps: Some(dec!(8)), ..Default::default() },
    );
    let result = PeRatioCalculator::new().calculate(&ctx).unwrap();

    assert_eq!(result.value, dec!(12.5));
    assert_eq!(result.sub_value("ReportedPERatio"), Some(dec!(0.5)));
    assert_eq!(result.score, 70);
  }

  #[test]
  fn test_pe_small_value_without_eps_kept() {
    assert_eq!(PeRatioCalculator::effective_ratio(dec!(0.5), None, Some(dec!(100))), (dec!(0.5), false));
    assert_eq!(PeRatioCalculator::effective_ratio(dec!(0.5), Some(dec!(-2)), Some(dec!(100))), (dec!(0.5), false));
  }

  #[rstest]
  #[case(dec!(0.8), Direction::StrongBullish, 80)]
  #[case(dec!(1.2), Direction::Bullish, 70)]
  #[case(dec!(2.5), Direction::Neutral, 55)]
  #[case(dec!(4), Direction::Bearish, 40)]
  #[case(dec!(7), Direction::StrongBearish, 20)]
  fn test_pb_bands(#[case] pb: Decimal, #[case] direction: Direction, #[case] score: u8) {
    let ctx = context(Some(dec!(100)), FundamentalData { pb_ratio: Some(pb), ..Default::default() });
    let result = PbRatioCalculator::new().calculate(&ctx).unwrap();
    assert_eq!(result.direction, direction);
    assert_eq!(result.score, score);
  }

  #[test]
  fn test_pb_book_value_reinterpreted() {
    // 50은 종가 100의 20% 이상 -> 주당순자산으로 간주
    assert_eq!(PbRatioCalculator::effective_ratio(dec!(50), Some(dec!(100))), (dec!(2), true));
    // 12는 종가 1000의 20% 미만 -> 원래 값 유지
    assert_eq!(PbRatioCalculator::effective_ratio(dec!(12), Some(dec!(1000))), (dec!(12), false));
    assert_eq!(PbRatioCalculator::effective_ratio(dec!(50), None), (dec!(50), false));

    let ctx = context(Some(dec!(100)), FundamentalData { pb_ratio: Some(dec!(50)), ..Default::default() });
    let result = PbRatioCalculator::new().calculate(&ctx).unwrap();
    assert_eq!(result.sub_value("BookValuePerShare"), Some(dec!(50)));
    assert_eq!(result.score, 55);
  }

  #[rstest]
  #[case(dec!(8), Direction::StrongBullish, 85)]
  #[case(dec!(5.5), Direction::Bullish, 75)]
  #[case(dec!(3), Direction::Bullish, 65)]
  #[case(dec!(1.5), Direction::Neutral, 50)]
  #[case(dec!(0.4), Direction::Bearish, 40)]
  #[case(dec!(0), Direction::Bearish, 35)]
  fn test_dividend_yield_bands(#[case] y: Decimal, #[case] direction: Direction, #[case] score: u8) {
    let ctx = context(Some(dec!(100)), FundamentalData { dividend_yield: Some(y), ..Default::default() });
    let result = DividendYieldCalculator::new().calculate(&ctx).unwrap();
    assert_eq!(result.direction, direction);
    assert_eq!(result.score, score);
  }

  #[test]
  fn test_dividend_cash_amount_reinterpreted() {
    assert_eq!(DividendYieldCalculator::effective_yield(dec!(25), Some(dec!(500))), (dec!(5), true));
    assert_eq!(DividendYieldCalculator::effective_yield(dec!(25), Some(dec!(100))), (dec!(25), false));

    let ctx = context(Some(dec!(500)), FundamentalData { dividend_yield: Some(dec!(25)), ..Default::default() });
    let result = DividendYieldCalculator::new().calculate(&ctx).unwrap();
    assert_eq!(result.value, dec!(5));
    assert_eq!(result.sub_value("CashDividend"), Some(dec!(25)));
    assert_eq!(result.score, 75);
  }

  #[rstest]
  #[case(dec!(6.1), Direction::StrongBullish, 80)]
  #[case(dec!(3), Direction::Bullish, 70)]
  #[case(dec!(0.5), Direction::Neutral, 55)]
  #[case(dec!(0), Direction::Neutral, 45)]
  #[case(dec!(-1.2), Direction::Bearish, 25)]
  fn test_eps_bands(#[case] eps: Decimal, #[case] direction: Direction, #[case] score: u8) {
    let ctx = context(None, FundamentalData { eps: Some(eps), ..Default::default() });
    let result = EpsCalculator::new().calculate(&ctx).unwrap();
    assert_eq!(result.direction, direction);
    assert_eq!(result.score, score);
  }

  #[test]
  fn test_eps_echoes_income_and_period() {
    let ctx = context(None, FundamentalData {
      eps: Some(dec!(9.56)),
      net_income: Some(dec!(247800)),
      period: Some("2025Q1".to_string()),
      ..Default::default()
    });
    let result = EpsCalculator::new().calculate(&ctx).unwrap();

    assert!(result.reason.contains("2025Q1"));
    assert_eq!(result.sub_value("NetIncome"), Some(dec!(247800)));
    assert_eq!(result.sub_value("OperatingIncome"), None);
  }

  #[rstest]
  #[case(dec!(45), Direction::StrongBullish, 85)]
  #[case(dec!(15), Direction::Bullish, 70)]
  #[case(dec!(3), Direction::Neutral, 55)]
  #[case(dec!(-5), Direction::Bearish, 40)]
  #[case(dec!(-10), Direction::StrongBearish, 20)]
  fn test_revenue_growth_bands(#[case] yoy: Decimal, #[case] direction: Direction, #[case] score: u8) {
    let ctx = context(None, FundamentalData { revenue_yoy: Some(yoy), ..Default::default() });
    let result = RevenueGrowthCalculator::new().calculate(&ctx).unwrap();
    assert_eq!(result.direction, direction);
    assert_eq!(result.score, score);
  }

  #[test]
  fn test_fundamental_requires_fields() {
    let empty = context(Some(dec!(100)), FundamentalData::default());
    assert!(!PeRatioCalculator::new().can_calculate(&empty));
    assert!(!PbRatioCalculator::new().can_calculate(&empty));
    assert!(!DividendYieldCalculator::new().can_calculate(&empty));
    assert!(!EpsCalculator::new().can_calculate(&empty));
    assert!(!RevenueGrowthCalculator::new().can_calculate(&empty));

    let bare = IndicatorContext::new("2330", vec![]);
    assert!(!EpsCalculator::new().can_calculate(&bare));
  }
}

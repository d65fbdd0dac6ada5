//! 수학 관련 유틸리티
//!
//! 평균, 표준편차, 비율 등 Decimal 기반 계산 함수 제공

use rust_decimal::prelude::*;
use statrs::statistics::Statistics;

/// 값을 범위 내로 제한
pub fn clamp<T: PartialOrd>(value: T, min_value: T, max_value: T) -> T {
  if value < min_value {
    min_value
  } else if value > max_value {
    max_value
  } else {
    value
  }
}

/// 평균 계산
pub fn average(values: &[Decimal]) -> Option<Decimal> {
  if values.is_empty() {
    return None;
  }

  Some(values.iter().sum::<Decimal>() / Decimal::from(values.len()))
}

/// 마지막 n개 값의 평균
pub fn trailing_average(values: &[Decimal], n: usize) -> Option<Decimal> {
  if n == 0 || values.len() < n {
    return None;
  }

  average(&values[values.len() - n..])
}

/// 모집단 표준편차 (N으로 나눔). 통계 계산은 f64로 수행 후 Decimal로 변환
pub fn population_std_dev(values: &[Decimal]) -> Option<Decimal> {
  if values.is_empty() {
    return None;
  }

  let data: Vec<f64> = values.iter().map(|v| v.to_f64()).collect::<Option<Vec<f64>>>()?;
  let std_dev = data.iter().population_std_dev();
  if !std_dev.is_finite() {
    return None;
  }

  Decimal::from_f64(std_dev)
}

/// numerator / denominator * 100. 분모가 0이면 None
pub fn ratio_pct(numerator: Decimal, denominator: Decimal) -> Option<Decimal> {
  if denominator.is_zero() {
    return None;
  }

  Some(numerator / denominator * Decimal::ONE_HUNDRED)
}

/// 이전 값 대비 변화율 (%)
pub fn percent_change(current: Decimal, previous: Decimal) -> Option<Decimal> {
  ratio_pct(current - previous, previous)
}

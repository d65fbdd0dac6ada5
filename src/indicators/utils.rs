/**
* filename : utils
* author : HAMA
* date: 2025. 5. 11.
* description: 시계열 계산 공통 함수
**/

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::models::IndicatorContext;

// 지수이동평균 계열. 처음 period개 값의 단순평균으로 시작한다.
// 반환 길이 = values.len() - period + 1 (데이터 부족 시 빈 벡터)
pub fn ema_series(values: &[Decimal], period: usize) -> Vec<Decimal> {
  if period == 0 || values.len() < period {
    return Vec::new();
  }

  let multiplier = dec!(2) / Decimal::from(period + 1);
  let seed = values[..period].iter().sum::<Decimal>() / Decimal::from(period);

  let mut result = Vec::with_capacity(values.len() - period + 1);
  result.push(seed);

  let mut prev = seed;
  for value in &values[period..] {
    let ema = (*value - prev) * multiplier + prev;
    result.push(ema);
    prev = ema;
  }

  result
}

pub fn highest(values: &[Decimal]) -> Option<Decimal> {
  values.iter().copied().max()
}

pub fn lowest(values: &[Decimal]) -> Option<Decimal> {
  values.iter().copied().min()
}

// 가격 데이터가 n일 이상 있는지 확인
pub fn has_prices(context: &IndicatorContext, n: usize) -> bool {
  context.price_count() >= n
}

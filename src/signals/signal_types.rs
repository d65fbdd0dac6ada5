/**
* filename : signal_types
* author : HAMA
* date: 2025. 5. 11.
* description:
**/

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use crate::error::IndicatorError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IndicatorCategory {
  Technical,    // 기술적 지표
  Fundamental,  // 기본적 지표
  Chip,         // 수급 지표
}

impl fmt::Display for IndicatorCategory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      IndicatorCategory::Technical => "Technical",
      IndicatorCategory::Fundamental => "Fundamental",
      IndicatorCategory::Chip => "Chip",
    };
    f.write_str(s)
  }
}

impl FromStr for IndicatorCategory {
  type Err = IndicatorError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "technical" => Ok(IndicatorCategory::Technical),
      "fundamental" => Ok(IndicatorCategory::Fundamental),
      "chip" => Ok(IndicatorCategory::Chip),
      other => Err(IndicatorError::ParseError(format!("Unknown indicator category: {}", other))),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
  StrongBullish,   // 강한 매수 신호
  Bullish,         // 매수 신호
  Neutral,         // 중립
  Bearish,         // 매도 신호
  StrongBearish,   // 강한 매도 신호
}

impl Direction {
  pub fn is_bullish(&self) -> bool {
    matches!(self, Direction::Bullish | Direction::StrongBullish)
  }

  pub fn is_bearish(&self) -> bool {
    matches!(self, Direction::Bearish | Direction::StrongBearish)
  }
}

impl fmt::Display for Direction {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      Direction::StrongBullish => "StrongBullish",
      Direction::Bullish => "Bullish",
      Direction::Neutral => "Neutral",
      Direction::Bearish => "Bearish",
      Direction::StrongBearish => "StrongBearish",
    };
    f.write_str(s)
  }
}

/// 신호 문구, 방향, 점수(0~100)의 묶음
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Verdict {
  pub signal: &'static str,
  pub direction: Direction,
  pub score: u8,
}

impl Verdict {
  pub const fn new(signal: &'static str, direction: Direction, score: u8) -> Self {
    Verdict { signal, direction, score }
  }
}

/// 모든 계산기가 반환하는 공통 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorResult {
  pub name: String,
  pub category: IndicatorCategory,
  pub value: Decimal,
  pub sub_values: HashMap<String, Decimal>,
  pub signal: String,
  pub direction: Direction,
  pub score: u8,  // 0(매우 불리) ~ 100(매우 유리)
  pub reason: String,
}

impl IndicatorResult {
  pub fn new(
    name: &str,
    category: IndicatorCategory,
    value: Decimal,
    verdict: Verdict,
    reason: String,
  ) -> Self {
    IndicatorResult {
      name: name.to_string(),
      category,
      value,
      sub_values: HashMap::new(),
      signal: verdict.signal.to_string(),
      direction: verdict.direction,
      score: verdict.score,
      reason,
    }
  }

  pub fn with_sub_value(mut self, key: &str, value: Decimal) -> Self {
    self.sub_values.insert(key.to_string(), value);
    self
  }

  pub fn with_optional_sub_value(self, key: &str, value: Option<Decimal>) -> Self {
    match value {
      Some(v) => self.with_sub_value(key, v),
      None => self,
    }
  }

  pub fn sub_value(&self, key: &str) -> Option<Decimal> {
    self.sub_values.get(key).copied()
  }

  /// 결과 불변식 확인: 점수 범위, 신호/설명 문구 존재
  pub fn validate(&self) -> Result<(), IndicatorError> {
    if self.score > 100 {
      return Err(IndicatorError::InvalidResult(format!("{}: score {} out of range", self.name, self.score)));
    }
    if self.signal.trim().is_empty() {
      return Err(IndicatorError::InvalidResult(format!("{}: empty signal", self.name)));
    }
    if self.reason.trim().is_empty() {
      return Err(IndicatorError::InvalidResult(format!("{}: empty reason", self.name)));
    }

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  const BULL: Verdict = Verdict::new("Above average", Direction::Bullish, 70);

  #[test]
  fn test_result_builder() {
    let result = IndicatorResult::new("MA", IndicatorCategory::Technical, dec!(10.5), BULL, "close above MA20".to_string())
      .with_sub_value("MA5", dec!(18))
      .with_optional_sub_value("MA60", None);

    assert_eq!(result.sub_value("MA5"), Some(dec!(18)));
    assert!(result.sub_value("MA60").is_none());
    assert_eq!(result.direction, Direction::Bullish);
    assert!(result.validate().is_ok());
  }

  #[test]
  fn test_result_validation() {
    let mut result = IndicatorResult::new("RSI", IndicatorCategory::Technical, dec!(50), BULL, "ok".to_string());
    result.score = 101;
    assert!(result.validate().is_err());

    let empty_reason = IndicatorResult::new("RSI", IndicatorCategory::Technical, dec!(50), BULL, "  ".to_string());
    assert!(empty_reason.validate().is_err());
  }

  #[test]
  fn test_category_parse() {
    assert_eq!("chip".parse::<IndicatorCategory>().unwrap(), IndicatorCategory::Chip);
    assert_eq!(" Technical ".parse::<IndicatorCategory>().unwrap(), IndicatorCategory::Technical);
    assert!("macro".parse::<IndicatorCategory>().is_err());
    assert_eq!(IndicatorCategory::Fundamental.to_string(), "Fundamental");
  }

  #[test]
  fn test_direction_helpers() {
    assert!(Direction::StrongBullish.is_bullish());
    assert!(Direction::Bearish.is_bearish());
    assert!(!Direction::Neutral.is_bullish() && !Direction::Neutral.is_bearish());
  }
}

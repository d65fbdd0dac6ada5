/**
* filename : engine
* author : HAMA
* date: 2025. 5. 13.
* description: 등록된 지표 계산기를 실행하고 결과를 수집하는 엔진
**/

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use crate::config::EngineConfig;
use crate::error::IndicatorError;
use crate::indicators::{default_calculators, IndicatorCalculator};
use crate::models::IndicatorContext;
use crate::signals::{IndicatorCategory, IndicatorResult};
use crate::utils::logging;

/// 지표 엔진.
///
/// 계산기를 등록 순서대로 보관하며, 호출 간에 상태를 갖지 않는다.
/// 계산기 하나의 실패(에러, 잘못된 결과, 패닉)는 로그만 남기고 해당 결과를 제외한다.
pub struct IndicatorEngine {
  calculators: Vec<Box<dyn IndicatorCalculator>>,
}

impl IndicatorEngine {
  pub fn new(calculators: Vec<Box<dyn IndicatorCalculator>>) -> Result<Self, IndicatorError> {
    let mut seen = HashSet::new();

    for calculator in &calculators {
      let name = calculator.name().to_string();
      if !seen.insert(name.clone()) {
        return Err(IndicatorError::DuplicateIndicator(format!("Indicator '{}' already registered", name)));
      }
    }

    Ok(IndicatorEngine { calculators })
  }

  /// 기본 15개 지표
  pub fn with_defaults() -> Self {
    IndicatorEngine { calculators: default_calculators() }
  }

  /// 설정에서 활성화된 지표만 등록 (기본 등록 순서 유지)
  pub fn from_config(config: &EngineConfig) -> Result<Self, IndicatorError> {
    let enabled = match &config.enabled {
      Some(enabled) => enabled,
      None => return Ok(Self::with_defaults()),
    };

    let defaults = default_calculators();
    for name in enabled {
      if !defaults.iter().any(|c| c.name() == name) {
        return Err(IndicatorError::ConfigError(format!("Unknown indicator '{}'", name)));
      }
    }

    let calculators = defaults
      .into_iter()
      .filter(|c| enabled.iter().any(|name| name == c.name()))
      .collect();

    Self::new(calculators)
  }

  pub fn names(&self) -> Vec<&str> {
    self.calculators.iter().map(|c| c.name()).collect()
  }

  pub fn len(&self) -> usize {
    self.calculators.len()
  }

  pub fn is_empty(&self) -> bool {
    self.calculators.is_empty()
  }

  /// 계산 가능한 모든 지표 계산
  pub fn calculate_all(&self, context: &IndicatorContext) -> Vec<IndicatorResult> {
    self.run(context, |_| true)
  }

  /// 특정 카테고리 지표만 계산
  pub fn calculate_by_category(&self, context: &IndicatorContext, category: IndicatorCategory) -> Vec<IndicatorResult> {
    self.run(context, |c| c.category() == category)
  }

  /// 이름으로 단일 지표 계산. 미등록, 계산 불가, 실패 모두 None
  pub fn calculate_by_name(&self, context: &IndicatorContext, name: &str) -> Option<IndicatorResult> {
    match self.calculators.iter().find(|c| c.name() == name) {
      Some(calculator) => self.evaluate(calculator.as_ref(), context),
      None => {
        log::debug!("{}: indicator '{}' not registered", context.stock_code, name);
        None
      }
    }
  }

  fn run<F>(&self, context: &IndicatorContext, include: F) -> Vec<IndicatorResult>
  where
    F: Fn(&dyn IndicatorCalculator) -> bool,
  {
    let mut results = Vec::new();
    let mut selected = 0;

    for calculator in &self.calculators {
      if !include(calculator.as_ref()) {
        continue;
      }
      selected += 1;
      if let Some(result) = self.evaluate(calculator.as_ref(), context) {
        results.push(result);
      }
    }

    log::debug!(
      "{}: {} of {} indicators produced results ({} price days)",
      context.stock_code, results.len(), selected, context.price_count()
    );

    results
  }

  // 계산기 하나를 격리 실행
  fn evaluate(&self, calculator: &dyn IndicatorCalculator, context: &IndicatorContext) -> Option<IndicatorResult> {
    let name = calculator.name();

    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
      if calculator.can_calculate(context) {
        Some(calculator.calculate(context))
      } else {
        None
      }
    }));

    match outcome {
      Ok(None) => {
        log::debug!("{}: {} skipped, required data not available", context.stock_code, name);
        None
      }
      Ok(Some(Ok(result))) => {
        if result.name != name {
          log::warn!(
            "{}: {} returned a result named '{}', discarding",
            context.stock_code, name, result.name
          );
          return None;
        }
        if let Err(e) = result.validate() {
          log::warn!("{}: {} produced an invalid result: {}", context.stock_code, name, e);
          return None;
        }
        Some(result)
      }
      Ok(Some(Err(e))) => {
        log::warn!("{}: {} calculation failed: {}", context.stock_code, name, e);
        None
      }
      Err(payload) => {
        let err = IndicatorError::CalculationError(format!("{} panicked: {}", name, panic_message(payload.as_ref())));
        logging::log_error(&context.stock_code, &err);
        None
      }
    }
  }
}

impl Default for IndicatorEngine {
  fn default() -> Self {
    Self::with_defaults()
  }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
  if let Some(s) = payload.downcast_ref::<&str>() {
    s.to_string()
  } else if let Some(s) = payload.downcast_ref::<String>() {
    s.clone()
  } else {
    "unknown panic".to_string()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::DailyPrice;
  use crate::signals::{Direction, Verdict};
  use chrono::{Duration, NaiveDate};
  use rust_decimal::Decimal;
  use std::sync::Arc;
  use std::thread;

  // 테스트용 계산기
  enum Behavior {
    Ok,
    Fail,
    Panic,
    BadScore,
    WrongName,
    Unavailable,
  }

  struct TestCalculator {
    name: &'static str,
    category: IndicatorCategory,
    behavior: Behavior,
  }

  impl TestCalculator {
    fn boxed(name: &'static str, category: IndicatorCategory, behavior: Behavior) -> Box<dyn IndicatorCalculator> {
      Box::new(TestCalculator { name, category, behavior })
    }
  }

  impl IndicatorCalculator for TestCalculator {
    fn name(&self) -> &str {
      self.name
    }

    fn category(&self) -> IndicatorCategory {
      self.category
    }

    fn can_calculate(&self, _context: &IndicatorContext) -> bool {
      !matches!(self.behavior, Behavior::Unavailable)
    }

    fn calculate(&self, _context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
      let verdict = Verdict::new("Test", Direction::Neutral, 50);
      let result = IndicatorResult::new(self.name, self.category, Decimal::ONE, verdict, "test result".to_string());

      match self.behavior {
        Behavior::Ok | Behavior::Unavailable => Ok(result),
        Behavior::Fail => Err(IndicatorError::CalculationError("boom".to_string())),
        Behavior::Panic => panic!("calculator exploded"),
        Behavior::BadScore => Ok(IndicatorResult { score: 150, ..result }),
        Behavior::WrongName => Ok(IndicatorResult { name: "Other".to_string(), ..result }),
      }
    }
  }

  fn context(days: usize) -> IndicatorContext {
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let prices = (0..days)
      .map(|i| {
        let c = Decimal::from(100 + (i % 7) as i64);
        DailyPrice::new(start + Duration::days(i as i64), c, c + Decimal::ONE, c - Decimal::ONE, c, 1_000 + i as i64)
      })
      .collect();
    IndicatorContext::new("2330", prices)
  }

  #[test]
  fn test_duplicate_registration_rejected() {
    let result = IndicatorEngine::new(vec![
      TestCalculator::boxed("A", IndicatorCategory::Technical, Behavior::Ok),
      TestCalculator::boxed("A", IndicatorCategory::Chip, Behavior::Ok),
    ]);
    assert!(matches!(result, Err(IndicatorError::DuplicateIndicator(_))));
  }

  #[test]
  fn test_failures_are_isolated() {
    let engine = IndicatorEngine::new(vec![
      TestCalculator::boxed("First", IndicatorCategory::Technical, Behavior::Ok),
      TestCalculator::boxed("Failing", IndicatorCategory::Technical, Behavior::Fail),
      TestCalculator::boxed("Panicking", IndicatorCategory::Technical, Behavior::Panic),
      TestCalculator::boxed("BadScore", IndicatorCategory::Chip, Behavior::BadScore),
      TestCalculator::boxed("Renamed", IndicatorCategory::Chip, Behavior::WrongName),
      TestCalculator::boxed("Unavailable", IndicatorCategory::Chip, Behavior::Unavailable),
      TestCalculator::boxed("Last", IndicatorCategory::Fundamental, Behavior::Ok),
    ]).unwrap();

    let results = engine.calculate_all(&context(1));
    let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["First", "Last"]);
  }

  #[test]
  fn test_by_name_and_category() {
    let engine = IndicatorEngine::new(vec![
      TestCalculator::boxed("Tech", IndicatorCategory::Technical, Behavior::Ok),
      TestCalculator::boxed("Chip", IndicatorCategory::Chip, Behavior::Ok),
      TestCalculator::boxed("Broken", IndicatorCategory::Chip, Behavior::Panic),
    ]).unwrap();
    let ctx = context(1);

    assert_eq!(engine.calculate_by_name(&ctx, "Chip").map(|r| r.name), Some("Chip".to_string()));
    assert!(engine.calculate_by_name(&ctx, "Broken").is_none());
    assert!(engine.calculate_by_name(&ctx, "Missing").is_none());

    let chip = engine.calculate_by_category(&ctx, IndicatorCategory::Chip);
    assert_eq!(chip.len(), 1);
    assert!(engine.calculate_by_category(&ctx, IndicatorCategory::Fundamental).is_empty());
  }

  #[test]
  fn test_from_config() {
    let engine = IndicatorEngine::from_config(&EngineConfig {
      enabled: Some(vec!["RSI".to_string(), "MA".to_string(), "EPS".to_string()]),
    }).unwrap();
    // 기본 등록 순서 유지
    assert_eq!(engine.names(), vec!["MA", "RSI", "EPS"]);

    let unknown = IndicatorEngine::from_config(&EngineConfig {
      enabled: Some(vec!["MA".to_string(), "Ichimoku".to_string()]),
    });
    assert!(matches!(unknown, Err(IndicatorError::ConfigError(_))));

    let all = IndicatorEngine::from_config(&EngineConfig::default()).unwrap();
    assert_eq!(all.len(), 15);
  }

  #[test]
  fn test_defaults_on_short_history() {
    let engine = IndicatorEngine::with_defaults();
    assert!(engine.calculate_all(&context(5)).is_empty());
  }

  #[test]
  fn test_shared_across_threads() {
    let engine = Arc::new(IndicatorEngine::with_defaults());
    let expected = engine.calculate_all(&context(80)).len();
    assert!(expected > 0);

    let handles: Vec<_> = (0..4)
      .map(|_| {
        let engine = Arc::clone(&engine);
        thread::spawn(move || engine.calculate_all(&context(80)))
      })
      .collect();

    for handle in handles {
      let results = handle.join().unwrap();
      assert_eq!(results.len(), expected);
    }
  }
}

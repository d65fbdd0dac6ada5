//! 엔진 통합 테스트
//!
//! 기본 지표 전체를 엔진으로 실행하여 결과 계약 확인

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use xIndicator::config::EngineConfig;
use xIndicator::models::{ChipData, DailyPrice, FundamentalData, IndicatorContext, InsiderTradingSummary};
use xIndicator::{Direction, IndicatorCategory, IndicatorEngine};

fn prices(days: usize) -> Vec<DailyPrice> {
  let start = NaiveDate::from_ymd_opt(2025, 1, 2).unwrap();
  (0..days)
    .map(|i| {
      // 완만한 상승 + 주기적 흔들림
      let close = Decimal::from(500 + i as i64 * 2 + ((i * 7) % 5) as i64);
      DailyPrice::new(
        start + Duration::days(i as i64),
        close - Decimal::ONE,
        close + dec!(3),
        close - dec!(3),
        close,
        20_000 + ((i * 13) % 9) as i64 * 1_000,
      )
    })
    .collect()
}

fn full_context(days: usize) -> IndicatorContext {
  IndicatorContext::new("2330", prices(days))
    .with_fundamental(FundamentalData {
      pe_ratio: Some(dec!(18.2)),
      pb_ratio: Some(dec!(4.1)),
      dividend_yield: Some(dec!(2.3)),
      monthly_revenue: Some(dec!(263708000)),
      revenue_yoy: Some(dec!(48.1)),
      revenue_mom: Some(dec!(-8.3)),
      eps: Some(dec!(13.94)),
      operating_income: None,
      net_income: Some(dec!(361564000)),
      period: Some("2025Q1".to_string()),
    })
    .with_chip(ChipData {
      margin_balance: Some(25_000),
      margin_previous_balance: Some(24_000),
      margin_limit: Some(100_000),
      short_balance: Some(500),
      foreign_holding_percentage: Some(dec!(72.6)),
      foreign_upper_limit: Some(dec!(100)),
      director_pledge_ratio: Some(Decimal::ZERO),
      ..Default::default()
    })
    .with_insider(InsiderTradingSummary {
      purchase_count: 3,
      sale_count: 1,
      net_buying_shares: 12_000,
      net_buying_value: Some(dec!(2400000)),
    })
}

#[test]
fn test_all_indicators_on_full_context() {
  let engine = IndicatorEngine::with_defaults();
  let results = engine.calculate_all(&full_context(80));

  let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, engine.names());
  assert_eq!(results.len(), 15);

  for result in &results {
    assert!(result.score <= 100, "{} score {}", result.name, result.score);
    assert!(!result.signal.is_empty(), "{} has empty signal", result.name);
    assert!(!result.reason.is_empty(), "{} has empty reason", result.name);
  }
}

#[test]
fn test_short_history_yields_nothing() {
  let engine = IndicatorEngine::with_defaults();
  let context = IndicatorContext::new("2330", prices(5));
  assert!(engine.calculate_all(&context).is_empty());
}

#[test]
fn test_technical_only_without_other_data() {
  let engine = IndicatorEngine::with_defaults();
  let context = IndicatorContext::new("2330", prices(60));
  let results = engine.calculate_all(&context);

  assert_eq!(results.len(), 6);
  assert!(results.iter().all(|r| r.category == IndicatorCategory::Technical));
}

#[test]
fn test_calculate_by_category() {
  let engine = IndicatorEngine::with_defaults();
  let context = full_context(80);

  let fundamental = engine.calculate_by_category(&context, IndicatorCategory::Fundamental);
  let names: Vec<&str> = fundamental.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, vec!["PERatio", "PBRatio", "DividendYield", "EPS", "RevenueGrowth"]);

  let chip = engine.calculate_by_category(&context, IndicatorCategory::Chip);
  assert_eq!(chip.len(), 4);
  assert!(chip.iter().any(|r| r.name == "InsiderTrading"));
}

#[test]
fn test_calculate_by_name() {
  let engine = IndicatorEngine::with_defaults();
  let context = full_context(40);

  let rsi = engine.calculate_by_name(&context, "RSI").unwrap();
  assert_eq!(rsi.name, "RSI");
  assert!(rsi.sub_value("RSI").is_some());

  assert!(engine.calculate_by_name(&context, "Nonexistent").is_none());

  // 등록되어 있지만 데이터 부족
  let short = IndicatorContext::new("2330", prices(10));
  assert!(engine.calculate_by_name(&short, "MA").is_none());
}

#[test]
fn test_director_pledge_through_engine() {
  let engine = IndicatorEngine::with_defaults();

  let zero = IndicatorContext::new("2330", vec![]).with_chip(ChipData {
    director_pledge_ratio: Some(Decimal::ZERO),
    ..Default::default()
  });
  let result = engine.calculate_by_name(&zero, "DirectorPledge").unwrap();
  assert!(result.direction.is_bullish());
  assert!(result.score >= 70);
  assert!(result.signal.to_lowercase().contains("zero pledge"));

  let heavy = IndicatorContext::new("2330", vec![]).with_chip(ChipData {
    director_pledge_ratio: Some(dec!(60)),
    ..Default::default()
  });
  let result = engine.calculate_by_name(&heavy, "DirectorPledge").unwrap();
  assert_eq!(result.direction, Direction::StrongBearish);
  assert!(result.score <= 15);
}

#[test]
fn test_engine_from_config_subset() {
  let engine = IndicatorEngine::from_config(&EngineConfig {
    enabled: Some(vec!["KD".to_string(), "DirectorPledge".to_string()]),
  })
  .unwrap();

  let results = engine.calculate_all(&full_context(30));
  let names: Vec<&str> = results.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, vec!["KD", "DirectorPledge"]);
}

#[test]
fn test_results_serialize_to_json() {
  let engine = IndicatorEngine::with_defaults();
  let results = engine.calculate_by_category(&full_context(30), IndicatorCategory::Chip);

  let json = serde_json::to_string(&results).unwrap();
  assert!(json.contains("\"DirectorPledge\""));
  assert!(json.contains("\"PledgeRatio\""));
}

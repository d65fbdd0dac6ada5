//! 로깅 유틸리티
//!
//! 로그 초기화 및 유틸리티 함수 제공

use env_logger::Builder;
use log::LevelFilter;
use std::env;

use crate::error::IndicatorError;

/// 레벨 문자열 파싱 (알 수 없는 값은 info)
pub fn parse_level(level: &str) -> LevelFilter {
    match level.to_lowercase().as_str() {
        "off" => LevelFilter::Off,
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" => LevelFilter::Warn,
        "error" => LevelFilter::Error,
        _ => LevelFilter::Info,
    }
}

/// 로깅 시스템 초기화. RUST_LOG 환경변수가 설정 파일의 레벨보다 우선한다.
pub fn init(default_level: &str) -> Result<(), IndicatorError> {
    let mut builder = Builder::from_default_env();

    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| default_level.to_string());

    builder
      .filter_level(parse_level(&log_level))
      .format_timestamp_millis()
      .try_init()
      .map_err(|e| IndicatorError::ConfigError(format!("Failed to initialize logger: {}", e)))?;

    log::info!("로깅 시스템 초기화 완료: 레벨 = {}", log_level);

    Ok(())
}

/// 분석 시작 로그
pub fn log_analysis_start(stock_code: &str, price_count: usize, calculator_count: usize) {
    log::info!("지표 분석 시작: {} - 가격 데이터: {}일 - 계산기: {}개",
               stock_code, price_count, calculator_count);
}

/// 분석 종료 로그
pub fn log_analysis_end(stock_code: &str, result_count: usize) {
    log::info!("지표 분석 종료: {} - 결과: {}개", stock_code, result_count);
}

/// 오류 로그
pub fn log_error(context: &str, error: &IndicatorError) {
    log::error!("오류 발생 - {}: {}", context, error);
}

//! 공통 유틸리티
//!
//! 로깅 초기화와 Decimal 계산 함수 제공

pub mod logging;
pub mod math;

//! 주식 지표 분석 라이브러리
//!
//! 기술적/기본적/수급 지표를 계산하고 점수화된 신호를 생성합니다.

pub mod config;
pub mod core;
pub mod error;
pub mod indicators;
pub mod market_data;
pub mod models;
pub mod signals;
pub mod utils;

// 핵심 타입 재노출
pub use crate::error::IndicatorError;
pub use crate::core::IndicatorEngine;
pub use crate::indicators::IndicatorCalculator;
pub use crate::models::{ChipData, DailyPrice, FundamentalData, IndicatorContext, InsiderTradingSummary};
pub use crate::signals::{Direction, IndicatorCategory, IndicatorResult};

/// 버전 정보
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// 결과 타입 별칭
pub type Result<T> = std::result::Result<T, IndicatorError>;

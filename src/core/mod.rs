//! 지표 엔진

pub mod engine;

pub use engine::IndicatorEngine;

//! 시장 데이터 로더 (CSV 일봉, JSON 스냅샷)

pub mod loader;

pub use loader::{build_context, CsvPriceLoader, MarketSnapshot};

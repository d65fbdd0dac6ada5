pub mod chip;
pub mod context;
pub mod fundamental;
pub mod market_data;

pub use chip::{ChipData, DirectorHolding, InsiderTradingSummary};
pub use context::IndicatorContext;
pub use fundamental::FundamentalData;
pub use market_data::DailyPrice;

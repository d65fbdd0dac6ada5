use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 일봉 데이터 (거래일 1일)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub open: Decimal,
    pub high: Decimal,
    pub low: Decimal,
    pub close: Decimal,
    pub volume: i64,
    #[serde(default)]
    pub turnover: Option<Decimal>,
    #[serde(default)]
    pub transactions: Option<i64>,
}

impl DailyPrice {
    pub fn new(
        date: NaiveDate,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: i64,
    ) -> Self {
        DailyPrice {
            date,
            open,
            high,
            low,
            close,
            volume,
            turnover: None,
            transactions: None,
        }
    }

    pub fn with_turnover(mut self, turnover: Decimal) -> Self {
        self.turnover = Some(turnover);
        self
    }

    pub fn with_transactions(mut self, transactions: i64) -> Self {
        self.transactions = Some(transactions);
        self
    }
}

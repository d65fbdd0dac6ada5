use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// 이사/감사 보유 및 질권 설정 현황
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DirectorHolding {
    pub title: String,
    pub name: String,
    pub shares_held: i64,
    pub shares_pledged: i64,
    /// 공시 원문 그대로의 질권 비율 (예: "12.5%")
    #[serde(default)]
    pub pledge_ratio_text: String,
}

impl DirectorHolding {
    /// 질권 비율 텍스트를 숫자로 변환. 텍스트가 비어 있으면 주식 수로 계산한다.
    pub fn pledge_ratio(&self) -> Option<Decimal> {
        let text = self.pledge_ratio_text.trim().trim_end_matches('%').trim();
        if !text.is_empty() {
            return Decimal::from_str(text).ok();
        }

        if self.shares_held > 0 {
            Some(Decimal::from(self.shares_pledged) / Decimal::from(self.shares_held) * Decimal::ONE_HUNDRED)
        } else {
            None
        }
    }
}

/// 수급(주주 구성/신용거래) 데이터
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChipData {
    // 융자 (신용매수)
    pub margin_balance: Option<i64>,
    pub margin_previous_balance: Option<i64>,
    pub margin_limit: Option<i64>,

    // 융권 (신용매도)
    pub short_balance: Option<i64>,
    pub short_previous_balance: Option<i64>,
    pub offset_volume: Option<i64>,

    // 외국인 보유
    pub foreign_holding_percentage: Option<Decimal>,
    pub foreign_holding_shares: Option<i64>,
    pub foreign_upper_limit: Option<Decimal>,

    // 이사/감사
    #[serde(default)]
    pub directors: Vec<DirectorHolding>,
    pub total_director_shares: Option<i64>,
    pub total_director_pledged: Option<i64>,
    pub director_pledge_ratio: Option<Decimal>,

    #[serde(default)]
    pub major_shareholders: Vec<String>,
    #[serde(default)]
    pub day_trading_suspended: bool,
}

impl ChipData {
    /// 이사 전체 질권 비율 (%). 공시된 비율을 우선 사용하고, 없으면 합계에서 계산한다.
    pub fn pledge_ratio(&self) -> Option<Decimal> {
        if let Some(ratio) = self.director_pledge_ratio {
            return Some(ratio);
        }

        match (self.total_director_shares, self.total_director_pledged) {
            (Some(shares), Some(pledged)) if shares > 0 => {
                Some(Decimal::from(pledged) / Decimal::from(shares) * Decimal::ONE_HUNDRED)
            }
            _ => None,
        }
    }
}

/// 내부자 거래 요약 (미국 시장 전용)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsiderTradingSummary {
    pub purchase_count: u32,
    pub sale_count: u32,
    pub net_buying_shares: i64,
    pub net_buying_value: Option<Decimal>,
}

impl InsiderTradingSummary {
    pub fn transaction_count(&self) -> u64 {
        u64::from(self.purchase_count) + u64::from(self.sale_count)
    }
}

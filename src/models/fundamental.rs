use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 기본적 분석 데이터. 모든 필드가 선택적이며, 값의 존재 여부로 계산 가능한 지표가 결정된다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FundamentalData {
    pub pe_ratio: Option<Decimal>,
    pub pb_ratio: Option<Decimal>,
    /// 배당수익률 (%)
    pub dividend_yield: Option<Decimal>,
    pub monthly_revenue: Option<Decimal>,
    /// 전년 동월 대비 매출 증가율 (%)
    pub revenue_yoy: Option<Decimal>,
    /// 전월 대비 매출 증가율 (%)
    pub revenue_mom: Option<Decimal>,
    pub eps: Option<Decimal>,
    pub operating_income: Option<Decimal>,
    pub net_income: Option<Decimal>,
    /// 회계 기간 라벨 (예: "2025Q1")
    pub period: Option<String>,
}

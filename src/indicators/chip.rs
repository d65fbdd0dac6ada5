/**
* filename : chip
* author : HAMA
* date: 2025. 5. 12.
* description: 수급 지표 (신용거래, 외국인 보유, 이사 질권, 내부자 거래)
**/

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use crate::error::IndicatorError;
use crate::models::IndicatorContext;
use crate::signals::{BandClassifier, Direction, IndicatorCategory, IndicatorResult};
use crate::utils::math::{percent_change, ratio_pct};
use super::IndicatorCalculator;

fn missing(what: &str) -> IndicatorError {
  IndicatorError::MissingData(what.to_string())
}

struct MarginSnapshot {
  utilization: Option<Decimal>,
  short_margin_ratio: Option<Decimal>,
  change_pct: Option<Decimal>,
}

/// 신용거래 (융자/융권) 잔고
pub struct MarginTradingCalculator {
  bands: BandClassifier<MarginSnapshot>,
}

impl MarginTradingCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<MarginSnapshot>::builder()
      .band(|m| m.short_margin_ratio.map_or(false, |r| r >= dec!(30)),
            "High short-to-margin ratio, squeeze potential", Direction::Bullish, 65)
      .band(|m| m.utilization.map_or(false, |u| u >= dec!(60)),
            "Margin utilization overheated", Direction::StrongBearish, 20)
      .band(|m| m.utilization.map_or(false, |u| u >= dec!(40)),
            "Margin utilization elevated", Direction::Bearish, 35)
      .band(|m| m.change_pct.map_or(false, |c| c >= dec!(5)),
            "Margin balance surging", Direction::Bearish, 40)
      .band(|m| m.change_pct.map_or(false, |c| c <= dec!(-5)),
            "Margin balance unwinding", Direction::Bullish, 60)
      .otherwise("Margin balance stable", Direction::Neutral, 50);

    MarginTradingCalculator { bands }
  }
}

impl Default for MarginTradingCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for MarginTradingCalculator {
  fn name(&self) -> &str {
    "MarginTrading"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Chip
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    context.chip.as_ref().and_then(|c| c.margin_balance).map_or(false, |b| b > 0)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let chip = context.chip.as_ref().ok_or_else(|| missing("chip data"))?;
    let balance = chip.margin_balance.filter(|b| *b > 0).ok_or_else(|| missing("margin balance"))?;
    let balance = Decimal::from(balance);

    let utilization = chip.margin_limit
      .filter(|l| *l > 0)
      .and_then(|l| ratio_pct(balance, Decimal::from(l)));
    let short_margin_ratio = chip.short_balance.and_then(|s| ratio_pct(Decimal::from(s), balance));
    let change_pct = chip.margin_previous_balance
      .filter(|p| *p > 0)
      .and_then(|p| percent_change(balance, Decimal::from(p)));

    let snapshot = MarginSnapshot { utilization, short_margin_ratio, change_pct };
    let verdict = self.bands.classify(&snapshot);

    let mut reason = format!("Margin balance {}", balance);
    if let Some(u) = utilization {
      reason.push_str(&format!(", utilization {:.2}%", u));
    }
    if let Some(r) = short_margin_ratio {
      reason.push_str(&format!(", short/margin {:.2}%", r));
    }
    if let Some(c) = change_pct {
      reason.push_str(&format!(", change {:+.2}% vs previous day", c));
    }
    if chip.day_trading_suspended {
      reason.push_str(", day trading suspended");
    }

    Ok(IndicatorResult::new(self.name(), self.category(), utilization.unwrap_or(balance), verdict, reason)
      .with_sub_value("MarginBalance", balance)
      .with_optional_sub_value("MarginUtilization", utilization)
      .with_optional_sub_value("ShortMarginRatio", short_margin_ratio)
      .with_optional_sub_value("MarginChangePercent", change_pct)
      .with_optional_sub_value("ShortBalance", chip.short_balance.map(Decimal::from))
      .with_optional_sub_value("OffsetVolume", chip.offset_volume.map(Decimal::from)))
  }
}

struct ForeignSnapshot {
  percentage: Decimal,
  near_limit_ratio: Option<Decimal>,
}

/// 외국인 보유 비율
pub struct ForeignHoldingCalculator {
  bands: BandClassifier<ForeignSnapshot>,
}

impl ForeignHoldingCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<ForeignSnapshot>::builder()
      .band(|f| f.near_limit_ratio.map_or(false, |r| r >= dec!(95)),
            "Foreign holding near upper limit", Direction::Neutral, 50)
      .band(|f| f.percentage >= dec!(50), "Foreign investors dominant", Direction::StrongBullish, 80)
      .band(|f| f.percentage >= dec!(30), "High foreign holding", Direction::Bullish, 70)
      .band(|f| f.percentage >= dec!(15), "Moderate foreign holding", Direction::Bullish, 60)
      .band(|f| f.percentage >= dec!(5), "Low foreign holding", Direction::Neutral, 50)
      .otherwise("Minimal foreign interest", Direction::Bearish, 40);

    ForeignHoldingCalculator { bands }
  }
}

impl Default for ForeignHoldingCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for ForeignHoldingCalculator {
  fn name(&self) -> &str {
    "ForeignHolding"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Chip
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    context.chip.as_ref().map_or(false, |c| c.foreign_holding_percentage.is_some())
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let chip = context.chip.as_ref().ok_or_else(|| missing("chip data"))?;
    let percentage = chip.foreign_holding_percentage.ok_or_else(|| missing("foreign holding percentage"))?;
    let near_limit_ratio = chip.foreign_upper_limit
      .filter(|l| *l > Decimal::ZERO)
      .and_then(|l| ratio_pct(percentage, l));

    let verdict = self.bands.classify(&ForeignSnapshot { percentage, near_limit_ratio });
    let reason = match (chip.foreign_upper_limit, near_limit_ratio) {
      (Some(limit), Some(ratio)) => format!(
        "Foreign investors hold {:.2}% (upper limit {:.2}%, {:.1}% of limit used)",
        percentage, limit, ratio
      ),
      _ => format!("Foreign investors hold {:.2}%", percentage),
    };

    Ok(IndicatorResult::new(self.name(), self.category(), percentage, verdict, reason)
      .with_sub_value("HoldingPercentage", percentage)
      .with_optional_sub_value("UpperLimit", chip.foreign_upper_limit)
      .with_optional_sub_value("NearLimitRatio", near_limit_ratio)
      .with_optional_sub_value("HoldingShares", chip.foreign_holding_shares.map(Decimal::from)))
  }
}

/// 이사/감사 주식 질권 비율
pub struct DirectorPledgeCalculator {
  bands: BandClassifier<Decimal>,
}

impl DirectorPledgeCalculator {
  pub fn new() -> Self {
    let bands = BandClassifier::<Decimal>::builder()
      .band(|r| *r > dec!(50), "Severe director share pledging", Direction::StrongBearish, 10)
      .band(|r| *r > dec!(30), "High director share pledging", Direction::Bearish, 25)
      .band(|r| *r > dec!(15), "Moderate director share pledging", Direction::Neutral, 45)
      .band(|r| *r > dec!(5), "Low director share pledging", Direction::Neutral, 55)
      .band(|r| r.is_zero(), "Zero pledge by directors", Direction::Bullish, 75)
      .otherwise("Minimal director share pledging", Direction::Bullish, 70);

    DirectorPledgeCalculator { bands }
  }
}

impl Default for DirectorPledgeCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for DirectorPledgeCalculator {
  fn name(&self) -> &str {
    "DirectorPledge"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Chip
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    context.chip.as_ref().map_or(false, |c| c.pledge_ratio().is_some())
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let chip = context.chip.as_ref().ok_or_else(|| missing("chip data"))?;
    let ratio = chip.pledge_ratio().ok_or_else(|| missing("director pledge ratio"))?;

    let verdict = self.bands.classify(&ratio);

    // 질권 비율이 가장 높은 이사
    let top_pledger = chip.directors
      .iter()
      .filter_map(|d| d.pledge_ratio().map(|r| (d, r)))
      .filter(|(_, r)| *r > Decimal::ZERO)
      .max_by(|a, b| a.1.cmp(&b.1));

    let mut reason = format!("Directors and supervisors have pledged {:.2}% of their holdings", ratio);
    if let Some((director, r)) = top_pledger {
      reason.push_str(&format!("; highest: {} {} at {:.2}%", director.title, director.name, r));
    }

    Ok(IndicatorResult::new(self.name(), self.category(), ratio, verdict, reason)
      .with_sub_value("PledgeRatio", ratio)
      .with_optional_sub_value("TotalShares", chip.total_director_shares.map(Decimal::from))
      .with_optional_sub_value("TotalPledged", chip.total_director_pledged.map(Decimal::from)))
  }
}

struct InsiderSnapshot {
  net_shares: i64,
  buy_ratio: Decimal,
}

/// 내부자 거래 (미국 시장)
pub struct InsiderTradingCalculator {
  bands: BandClassifier<InsiderSnapshot>,
}

impl InsiderTradingCalculator {
  pub fn new() -> Self {
    // 내부자 매도는 정보가치가 낮아 약하게 반영
    let bands = BandClassifier::<InsiderSnapshot>::builder()
      .band(|s| s.net_shares > 0 && s.buy_ratio >= dec!(70), "Strong insider buying", Direction::StrongBullish, 85)
      .band(|s| s.net_shares > 0, "Net insider buying", Direction::Bullish, 65)
      .band(|s| s.net_shares == 0, "Balanced insider activity", Direction::Neutral, 50)
      .band(|s| s.buy_ratio <= dec!(30), "Heavy insider selling", Direction::Bearish, 35)
      .otherwise("Net insider selling", Direction::Neutral, 45);

    InsiderTradingCalculator { bands }
  }
}

impl Default for InsiderTradingCalculator {
  fn default() -> Self {
    Self::new()
  }
}

impl IndicatorCalculator for InsiderTradingCalculator {
  fn name(&self) -> &str {
    "InsiderTrading"
  }

  fn category(&self) -> IndicatorCategory {
    IndicatorCategory::Chip
  }

  fn can_calculate(&self, context: &IndicatorContext) -> bool {
    context.insider.as_ref().map_or(false, |i| i.transaction_count() > 0)
  }

  fn calculate(&self, context: &IndicatorContext) -> Result<IndicatorResult, IndicatorError> {
    let insider = context.insider.as_ref().ok_or_else(|| missing("insider trading summary"))?;
    let purchases = Decimal::from(insider.purchase_count);
    let total = Decimal::from(insider.transaction_count());
    let buy_ratio = ratio_pct(purchases, total).ok_or_else(|| missing("insider transactions"))?;

    let verdict = self.bands.classify(&InsiderSnapshot {
      net_shares: insider.net_buying_shares,
      buy_ratio,
    });

    let mut reason = format!(
      "{} insider purchases vs {} sales ({:.1}% buys), net {} shares",
      insider.purchase_count, insider.sale_count, buy_ratio, insider.net_buying_shares
    );
    if let Some(value) = insider.net_buying_value {
      reason.push_str(&format!(" (net value {:.0})", value));
    }

    Ok(IndicatorResult::new(self.name(), self.category(), Decimal::from(insider.net_buying_shares), verdict, reason)
      .with_sub_value("PurchaseCount", purchases)
      .with_sub_value("SaleCount", Decimal::from(insider.sale_count))
      .with_sub_value("BuyRatio", buy_ratio)
      .with_sub_value("NetBuyingShares", Decimal::from(insider.net_buying_shares))
      .with_optional_sub_value("NetBuyingValue", insider.net_buying_value))
  }
}

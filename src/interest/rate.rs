use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::decimal::Rate;
use crate::types::RateUnit;

/// days assumed in a month when converting day and week rates
pub const DAYS_PER_MONTH: Decimal = dec!(30);

/// monthly-equivalent percent for a rate stated per `unit`
///
/// day x30, week x30/7, month unchanged, quarter /3, year /12.
pub fn monthly_equivalent_rate(rate: Rate, unit: RateUnit) -> Rate {
    let p = rate.as_percent();
    let monthly = match unit {
        RateUnit::Day => p.saturating_mul(DAYS_PER_MONTH),
        RateUnit::Week => p.saturating_mul(DAYS_PER_MONTH / dec!(7)),
        RateUnit::Month => p,
        RateUnit::Quarter => p / dec!(3),
        RateUnit::Year => p / dec!(12),
    };
    Rate::from_percent(monthly)
}

/// overflow-aware variant used by the accrual engine
pub(crate) fn checked_monthly_equivalent(rate: Rate, unit: RateUnit) -> Option<Decimal> {
    let p = rate.as_percent();
    match unit {
        RateUnit::Day => p.checked_mul(DAYS_PER_MONTH),
        RateUnit::Week => p.checked_mul(DAYS_PER_MONTH / dec!(7)),
        RateUnit::Month => Some(p),
        RateUnit::Quarter => p.checked_div(dec!(3)),
        RateUnit::Year => p.checked_div(dec!(12)),
    }
}

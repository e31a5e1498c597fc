use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::interest::period::{duration_days, elapsed_periods};
use crate::interest::rate::{checked_monthly_equivalent, DAYS_PER_MONTH};
use crate::types::{LenderKind, RateUnit};

/// inputs to a single interest estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    /// amount still owed (original amount minus prepayment)
    pub principal: Money,
    pub rate: Rate,
    pub rate_unit: RateUnit,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    pub lender_kind: LenderKind,
}

/// which formula produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CalculationMethod {
    /// inputs did not allow an estimate
    NotAccrued,
    /// bank lender, day/week rate: monthly equivalent x days / 30
    BankDayCount { unit: RateUnit },
    /// non-bank lender, day/week rate: rate x days (or days / 7)
    SimpleDayCount { unit: RateUnit },
    /// month/quarter/year rate: rate x elapsed periods
    Periodic { unit: RateUnit },
}

impl CalculationMethod {
    pub fn label(&self) -> String {
        match self {
            CalculationMethod::NotAccrued => String::new(),
            CalculationMethod::BankDayCount { unit } => format!(
                "bank daily interest: {} rate as monthly equivalent x days / 30",
                unit.as_str().to_lowercase()
            ),
            CalculationMethod::SimpleDayCount { unit: RateUnit::Week } => {
                "simple interest per week: rate x days / 7".to_string()
            }
            CalculationMethod::SimpleDayCount { .. } => {
                "simple interest per day: rate x days".to_string()
            }
            CalculationMethod::Periodic { unit } => format!(
                "simple interest per {}: rate x elapsed {}s",
                unit.as_str().to_lowercase(),
                unit.as_str().to_lowercase()
            ),
        }
    }
}

/// interest estimate for a set of loan terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccrualResult {
    /// whole units, never negative
    pub interest: Money,
    /// principal + interest
    pub total: Money,
    pub duration_days: i64,
    /// multiplier applied to the rate (days, weeks or elapsed periods)
    pub periods: Decimal,
    pub method: CalculationMethod,
    pub calculation_method_label: String,
}

impl AccrualResult {
    /// zero-interest result for inputs that cannot accrue
    pub fn not_accrued(principal: Money) -> Self {
        Self {
            interest: Money::ZERO,
            total: principal,
            duration_days: 0,
            periods: Decimal::ZERO,
            method: CalculationMethod::NotAccrued,
            calculation_method_label: String::new(),
        }
    }

    pub fn is_accrued(&self) -> bool {
        self.method != CalculationMethod::NotAccrued
    }
}

/// estimate accrued interest and total repayment
///
/// Never fails: incomplete input and arithmetic overflow both produce a
/// zero-interest result so that live form estimates keep rendering.
pub fn accrue(terms: &LoanTerms) -> AccrualResult {
    match try_accrue(terms) {
        Ok(result) => result,
        Err(err @ LoanError::CalculationError { .. }) => {
            warn!("interest estimate degraded to zero: {}", err);
            AccrualResult::not_accrued(terms.principal)
        }
        Err(err) => {
            debug!("no interest estimate: {}", err);
            AccrualResult::not_accrued(terms.principal)
        }
    }
}

/// strict variant of [`accrue`] reporting why no interest was computed
pub fn try_accrue(terms: &LoanTerms) -> Result<AccrualResult> {
    if !terms.principal.is_positive() {
        return Err(LoanError::InvalidAmount {
            amount: terms.principal,
        });
    }
    if !terms.rate.is_positive() {
        return Err(LoanError::InvalidInterestRate { rate: terms.rate });
    }
    if terms.due_date <= terms.start_date {
        return Err(LoanError::DueBeforeStart);
    }

    let days = duration_days(terms.start_date, terms.due_date);
    let principal = terms.principal.as_decimal();
    let day_count = Decimal::from(days);

    let (raw_interest, periods, method) = if terms.rate_unit.is_day_based() {
        if terms.lender_kind == LenderKind::Bank {
            let monthly = checked_monthly_equivalent(terms.rate, terms.rate_unit)
                .ok_or_else(|| overflow("monthly-equivalent rate"))?;
            let months = day_count / DAYS_PER_MONTH;
            let interest = checked_product(principal, monthly / Decimal::ONE_HUNDRED, months)?;
            (
                interest,
                months,
                CalculationMethod::BankDayCount {
                    unit: terms.rate_unit,
                },
            )
        } else {
            let multiplier = match terms.rate_unit {
                RateUnit::Week => day_count / Decimal::from(7),
                _ => day_count,
            };
            let interest = checked_product(principal, terms.rate.as_fraction(), multiplier)?;
            (
                interest,
                multiplier,
                CalculationMethod::SimpleDayCount {
                    unit: terms.rate_unit,
                },
            )
        }
    } else {
        let periods = elapsed_periods(terms.start_date, terms.due_date, terms.rate_unit);
        let interest = checked_product(principal, terms.rate.as_fraction(), periods)?;
        (
            interest,
            periods,
            CalculationMethod::Periodic {
                unit: terms.rate_unit,
            },
        )
    };

    let interest = Money::from_decimal(raw_interest).round_whole().max(Money::ZERO);
    let total = terms
        .principal
        .checked_add(interest)
        .ok_or_else(|| overflow("total repayment"))?;

    Ok(AccrualResult {
        interest,
        total,
        duration_days: days,
        periods,
        method,
        calculation_method_label: method.label(),
    })
}

fn checked_product(principal: Decimal, rate: Decimal, multiplier: Decimal) -> Result<Decimal> {
    principal
        .checked_mul(rate)
        .and_then(|v| v.checked_mul(multiplier))
        .ok_or_else(|| overflow("interest amount"))
}

fn overflow(what: &str) -> LoanError {
    LoanError::CalculationError {
        message: format!("{} overflowed", what),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn terms(
        principal: i64,
        rate: Decimal,
        unit: RateUnit,
        start: NaiveDate,
        due: NaiveDate,
        lender: LenderKind,
    ) -> LoanTerms {
        LoanTerms {
            principal: Money::from_major(principal),
            rate: Rate::from_percent(rate),
            rate_unit: unit,
            start_date: start,
            due_date: due,
            lender_kind: lender,
        }
    }

    const LENDERS: [LenderKind; 4] = [
        LenderKind::Bank,
        LenderKind::Individual,
        LenderKind::Credit,
        LenderKind::Other,
    ];

    #[test]
    fn test_non_positive_principal_never_accrues() {
        for unit in RateUnit::ALL {
            for lender in LENDERS {
                for principal in [0, -5_000] {
                    let t = terms(principal, dec!(12), unit, date(2024, 1, 1), date(2025, 1, 1), lender);
                    let result = accrue(&t);
                    assert_eq!(result.interest, Money::ZERO);
                    assert_eq!(result.total, Money::from_major(principal));
                    assert_eq!(result.calculation_method_label, "");
                }
            }
        }
    }

    #[test]
    fn test_due_not_after_start_never_accrues() {
        for unit in RateUnit::ALL {
            for due in [date(2024, 6, 1), date(2024, 5, 1)] {
                let t = terms(1_000_000, dec!(50), unit, date(2024, 6, 1), due, LenderKind::Bank);
                let result = accrue(&t);
                assert_eq!(result.interest, Money::ZERO);
                assert_eq!(result.total, Money::from_major(1_000_000));
            }
        }
    }

    #[test]
    fn test_zero_rate_never_accrues() {
        let t = terms(1_000_000, dec!(0), RateUnit::Month, date(2024, 1, 1), date(2024, 6, 1), LenderKind::Individual);
        assert!(!accrue(&t).is_accrued());
        assert!(matches!(try_accrue(&t), Err(LoanError::InvalidInterestRate { .. })));
    }

    #[test]
    fn test_one_year_individual() {
        let t = terms(100_000_000, dec!(12), RateUnit::Year, date(2024, 1, 1), date(2025, 1, 1), LenderKind::Individual);
        let result = accrue(&t);
        assert_eq!(result.periods, dec!(1));
        assert_eq!(result.interest, Money::from_major(12_000_000));
        assert_eq!(result.total, Money::from_major(112_000_000));
        assert_eq!(result.method, CalculationMethod::Periodic { unit: RateUnit::Year });
    }

    #[test]
    fn test_three_months_individual() {
        let t = terms(10_000_000, dec!(2), RateUnit::Month, date(2024, 1, 1), date(2024, 4, 1), LenderKind::Individual);
        let result = accrue(&t);
        assert_eq!(result.periods, dec!(3));
        assert_eq!(result.interest, Money::from_major(600_000));
        assert_eq!(result.total, Money::from_major(10_600_000));
    }

    #[test]
    fn test_daily_rate_bank_thirty_days() {
        let t = terms(50_000_000, dec!(0.05), RateUnit::Day, date(2024, 1, 1), date(2024, 1, 31), LenderKind::Bank);
        let result = accrue(&t);
        assert_eq!(result.duration_days, 30);
        assert_eq!(result.interest, Money::from_major(750_000));
        assert_eq!(result.method, CalculationMethod::BankDayCount { unit: RateUnit::Day });
    }

    #[test]
    fn test_daily_rate_individual_thirty_days() {
        let t = terms(50_000_000, dec!(0.05), RateUnit::Day, date(2024, 1, 1), date(2024, 1, 31), LenderKind::Individual);
        let result = accrue(&t);
        assert_eq!(result.interest, Money::from_major(750_000));
        assert_eq!(result.periods, dec!(30));
        assert_eq!(result.method, CalculationMethod::SimpleDayCount { unit: RateUnit::Day });
    }

    #[test]
    fn test_bank_and_simple_day_formulas_agree_off_thirty_days() {
        // monthly-equivalent x days/30 reduces to rate x days, so only the label differs
        for unit in [RateUnit::Day, RateUnit::Week] {
            let bank = accrue(&terms(50_000_000, dec!(0.05), unit, date(2024, 1, 1), date(2024, 2, 15), LenderKind::Bank));
            let other = accrue(&terms(50_000_000, dec!(0.05), unit, date(2024, 1, 1), date(2024, 2, 15), LenderKind::Other));
            assert_eq!(bank.duration_days, 45);
            assert_eq!(bank.interest, other.interest);
            assert_ne!(bank.calculation_method_label, other.calculation_method_label);
        }
        let bank = accrue(&terms(50_000_000, dec!(0.05), RateUnit::Day, date(2024, 1, 1), date(2024, 2, 15), LenderKind::Bank));
        assert_eq!(bank.interest, Money::from_major(1_125_000));
    }

    #[test]
    fn test_weekly_rate_simple() {
        let t = terms(7_000_000, dec!(1), RateUnit::Week, date(2024, 3, 1), date(2024, 3, 15), LenderKind::Credit);
        let result = accrue(&t);
        assert_eq!(result.periods, dec!(2));
        assert_eq!(result.interest, Money::from_major(140_000));
    }

    #[test]
    fn test_bank_monthly_rate_uses_periods() {
        // bank lenders only switch formula for day/week rates
        let bank = accrue(&terms(10_000_000, dec!(2), RateUnit::Month, date(2024, 1, 1), date(2024, 4, 1), LenderKind::Bank));
        assert_eq!(bank.interest, Money::from_major(600_000));
        assert_eq!(bank.method, CalculationMethod::Periodic { unit: RateUnit::Month });
    }

    #[test]
    fn test_interest_rounds_half_up() {
        // 1_000 x 0.05% x 1 day = 0.5
        let t = terms(1_000, dec!(0.05), RateUnit::Day, date(2024, 1, 1), date(2024, 1, 2), LenderKind::Individual);
        assert_eq!(accrue(&t).interest, Money::from_major(1));
    }

    #[test]
    fn test_overflow_degrades_to_zero() {
        let t = LoanTerms {
            principal: Money::from_decimal(Decimal::MAX),
            rate: Rate::from_percent(Decimal::MAX),
            rate_unit: RateUnit::Day,
            start_date: date(2024, 1, 1),
            due_date: date(2024, 12, 31),
            lender_kind: LenderKind::Bank,
        };
        let result = accrue(&t);
        assert_eq!(result.interest, Money::ZERO);
        assert_eq!(result.total, t.principal);
        assert!(matches!(try_accrue(&t), Err(LoanError::CalculationError { .. })));
    }

    #[test]
    fn test_idempotent() {
        let t = terms(25_000_000, dec!(1.2), RateUnit::Quarter, date(2024, 2, 10), date(2025, 8, 3), LenderKind::Other);
        assert_eq!(accrue(&t), accrue(&t));
    }

    #[test]
    fn test_interest_monotonic_in_due_date() {
        let start = date(2024, 1, 31);
        for unit in RateUnit::ALL {
            for lender in LENDERS {
                let mut previous = Money::ZERO;
                for offset in 1..=760 {
                    let due = start + chrono::Duration::days(offset);
                    let result = accrue(&terms(37_500_000, dec!(1.3), unit, start, due, lender));
                    assert!(result.interest >= previous, "{:?}/{:?} decreased at {}", unit, lender, due);
                    assert_eq!(result.total, Money::from_major(37_500_000) + result.interest);
                    previous = result.interest;
                }
            }
        }
    }
}

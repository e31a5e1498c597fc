use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::errors::{FieldError, LoanError, Result};
use crate::interest::{accrue, AccrualResult, LoanTerms};
use crate::loan::{Loan, NewLoan};
use crate::types::{LenderKind, LoanStatus, RateUnit};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// editable loan form
///
/// Dates are kept as the raw text the user typed so that a half-entered
/// date is representable; everything else is already typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanFormState {
    pub description: String,
    pub lender: String,
    pub amount: Money,
    pub prepayment_amount: Money,
    pub interest_rate: Rate,
    pub interest_rate_type: RateUnit,
    pub start_date: String,
    pub due_date: String,
    /// shown when editing; stored loans derive their own status
    pub status: LoanStatus,
}

/// a single edit to the form
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LoanFormAction {
    SetDescription(String),
    SetLender(String),
    SetAmount(Money),
    SetPrepayment(Money),
    SetInterestRate(Rate),
    SetRateUnit(RateUnit),
    SetStartDate(String),
    SetDueDate(String),
}

/// apply one action, producing the next form state
pub fn reduce(state: LoanFormState, action: LoanFormAction) -> LoanFormState {
    let mut next = state;
    match action {
        LoanFormAction::SetDescription(v) => next.description = v,
        LoanFormAction::SetLender(v) => next.lender = v,
        LoanFormAction::SetAmount(v) => next.amount = v,
        LoanFormAction::SetPrepayment(v) => next.prepayment_amount = v,
        LoanFormAction::SetInterestRate(v) => next.interest_rate = v,
        LoanFormAction::SetRateUnit(v) => next.interest_rate_type = v,
        LoanFormAction::SetStartDate(v) => next.start_date = v,
        LoanFormAction::SetDueDate(v) => next.due_date = v,
    }
    next
}

impl LoanFormState {
    /// blank form for a new loan
    pub fn new(config: &LoanConfig) -> Self {
        Self {
            description: String::new(),
            lender: String::new(),
            amount: Money::ZERO,
            prepayment_amount: Money::ZERO,
            interest_rate: Rate::ZERO,
            interest_rate_type: config.default_rate_unit,
            start_date: String::new(),
            due_date: String::new(),
            status: config.default_status,
        }
    }

    /// form pre-filled for editing an existing loan
    pub fn from_loan(loan: &Loan) -> Self {
        Self {
            description: loan.description.clone(),
            lender: loan.lender.clone(),
            amount: loan.amount,
            prepayment_amount: loan.prepayment_amount,
            interest_rate: loan.interest_rate,
            interest_rate_type: loan.interest_rate_type,
            start_date: loan.start_date.format(DATE_FORMAT).to_string(),
            due_date: loan.due_date.format(DATE_FORMAT).to_string(),
            status: loan.status,
        }
    }

    pub fn apply(self, action: LoanFormAction) -> Self {
        reduce(self, action)
    }

    pub fn principal(&self) -> Money {
        self.amount.saturating_sub(self.prepayment_amount)
    }

    /// terms for the live estimate, if both dates parse
    pub fn terms(&self) -> Option<LoanTerms> {
        let start_date = parse_form_date(&self.start_date).ok()?;
        let due_date = parse_form_date(&self.due_date).ok()?;
        Some(LoanTerms {
            principal: self.principal(),
            rate: self.interest_rate,
            rate_unit: self.interest_rate_type,
            start_date,
            due_date,
            lender_kind: LenderKind::from_lender(&self.lender),
        })
    }

    /// live interest estimate for the current field values
    pub fn estimate(&self) -> AccrualResult {
        match self.terms() {
            Some(terms) => accrue(&terms),
            None => AccrualResult::not_accrued(self.principal()),
        }
    }

    /// check every field against the configured limits
    pub fn validate(&self, config: &LoanConfig) -> Result<NewLoan> {
        let limits = &config.limits;
        let mut errors = Vec::new();

        if self.description.trim().is_empty() {
            errors.push(FieldError::new("description", "is required"));
        }
        if self.lender.trim().is_empty() {
            errors.push(FieldError::new("lender", "is required"));
        }

        if self.amount < limits.min_amount {
            errors.push(FieldError::new(
                "amount",
                format!("must be at least {}", limits.min_amount),
            ));
        } else if self.amount > limits.max_amount {
            errors.push(FieldError::new(
                "amount",
                format!("must not exceed {}", limits.max_amount),
            ));
        }

        if self.prepayment_amount.is_negative() {
            errors.push(FieldError::new("prepayment_amount", "cannot be negative"));
        } else if self.prepayment_amount > limits.max_prepayment {
            errors.push(FieldError::new(
                "prepayment_amount",
                format!("must not exceed {}", limits.max_prepayment),
            ));
        }

        if self.interest_rate.as_percent() < Decimal::ZERO {
            errors.push(FieldError::new("interest_rate", "cannot be negative"));
        } else if self.interest_rate > limits.max_interest_rate {
            errors.push(FieldError::new(
                "interest_rate",
                format!("must not exceed {}", limits.max_interest_rate),
            ));
        }

        let start_date = check_date("start_date", &self.start_date, &mut errors);
        let due_date = check_date("due_date", &self.due_date, &mut errors);
        if let (Some(start), Some(due)) = (start_date, due_date) {
            if due <= start {
                errors.push(FieldError::new("due_date", "must be after start date"));
            }
        }

        match (start_date, due_date) {
            (Some(start_date), Some(due_date)) if errors.is_empty() => Ok(NewLoan {
                description: self.description.trim().to_string(),
                lender: self.lender.trim().to_string(),
                amount: self.amount,
                prepayment_amount: self.prepayment_amount,
                interest_rate: self.interest_rate,
                interest_rate_type: self.interest_rate_type,
                start_date,
                due_date,
            }),
            _ => Err(LoanError::Validation { errors }),
        }
    }
}

fn check_date(field: &str, value: &str, errors: &mut Vec<FieldError>) -> Option<NaiveDate> {
    if value.trim().is_empty() {
        errors.push(FieldError::new(field, "is required"));
        return None;
    }
    match parse_form_date(value) {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new(field, "is not a valid date"));
            None
        }
    }
}

/// parse `YYYY-MM-DD` or an RFC 3339 timestamp (taken as its UTC date)
pub fn parse_form_date(value: &str) -> Result<NaiveDate> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, DATE_FORMAT) {
        return Ok(date);
    }
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc).date_naive())
        .map_err(|e| LoanError::InvalidDate {
            message: format!("{value:?}: {e}"),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};
    use rust_decimal_macros::dec;

    fn filled_form() -> LoanFormState {
        let config = LoanConfig::default();
        [
            LoanFormAction::SetDescription("car".into()),
            LoanFormAction::SetLender("individual".into()),
            LoanFormAction::SetAmount(Money::from_major(10_000_000)),
            LoanFormAction::SetInterestRate(Rate::from_percentage(2)),
            LoanFormAction::SetRateUnit(RateUnit::Month),
            LoanFormAction::SetStartDate("2024-01-01".into()),
            LoanFormAction::SetDueDate("2024-04-01".into()),
        ]
        .into_iter()
        .fold(LoanFormState::new(&config), reduce)
    }

    #[test]
    fn test_new_form_uses_config_defaults() {
        let mut config = LoanConfig::default();
        config.default_rate_unit = RateUnit::Quarter;
        let form = LoanFormState::new(&config);
        assert_eq!(form.interest_rate_type, RateUnit::Quarter);
        assert_eq!(form.status, LoanStatus::Active);
        assert!(form.start_date.is_empty());
    }

    #[test]
    fn test_reduce_is_pure() {
        let before = filled_form();
        let after = reduce(before.clone(), LoanFormAction::SetLender("bank".into()));
        assert_eq!(before.lender, "individual");
        assert_eq!(after.lender, "bank");
        assert_eq!(after.amount, before.amount);
    }

    #[test]
    fn test_estimate_three_months() {
        let estimate = filled_form().estimate();
        assert_eq!(estimate.interest, Money::from_major(600_000));
        assert_eq!(estimate.total, Money::from_major(10_600_000));
        assert!(!estimate.calculation_method_label.is_empty());
    }

    #[test]
    fn test_estimate_without_dates_is_empty() {
        let form = filled_form().apply(LoanFormAction::SetDueDate(String::new()));
        let estimate = form.estimate();
        assert_eq!(estimate.interest, Money::ZERO);
        assert_eq!(estimate.total, Money::from_major(10_000_000));
        assert!(estimate.calculation_method_label.is_empty());

        let form = filled_form().apply(LoanFormAction::SetStartDate("2024-13-40".into()));
        assert!(!form.estimate().is_accrued());
    }

    #[test]
    fn test_estimate_reacts_to_prepayment() {
        let form = filled_form().apply(LoanFormAction::SetPrepayment(Money::from_major(4_000_000)));
        // 6m x 2% x 3 months
        assert_eq!(form.estimate().interest, Money::from_major(360_000));
    }

    #[test]
    fn test_estimate_survives_overflowing_principal() {
        let form = filled_form()
            .apply(LoanFormAction::SetAmount(Money::from_decimal(Decimal::MAX)))
            .apply(LoanFormAction::SetPrepayment(Money::from_major(-1)));

        let estimate = form.estimate();
        assert_eq!(estimate.interest, Money::ZERO);
        assert_eq!(estimate.total, Money::from_decimal(Decimal::MAX));
        assert!(form.validate(&LoanConfig::default()).is_err());
    }

    #[test]
    fn test_parse_form_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        assert_eq!(parse_form_date("2024-03-15").unwrap(), expected);
        assert_eq!(parse_form_date(" 2024-03-15 ").unwrap(), expected);
        assert_eq!(parse_form_date("2024-03-15T10:30:00Z").unwrap(), expected);
        assert_eq!(parse_form_date("2024-03-15T01:00:00+07:00").unwrap(), NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert!(matches!(parse_form_date("15/03/2024"), Err(LoanError::InvalidDate { .. })));
    }

    #[test]
    fn test_validate_collects_all_errors() {
        let config = LoanConfig::default();
        let form = LoanFormState::new(&config)
            .apply(LoanFormAction::SetAmount(Money::from_major(500)))
            .apply(LoanFormAction::SetInterestRate(Rate::from_percent(dec!(150))))
            .apply(LoanFormAction::SetStartDate("2024-05-01".into()))
            .apply(LoanFormAction::SetDueDate("2024-04-01".into()));

        let err = form.validate(&config).unwrap_err();
        let LoanError::Validation { errors } = err else {
            panic!("expected validation error");
        };
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["description", "lender", "amount", "interest_rate", "due_date"]);
    }

    #[test]
    fn test_validate_rejects_missing_and_bad_dates() {
        let config = LoanConfig::default();
        let form = filled_form()
            .apply(LoanFormAction::SetStartDate(String::new()))
            .apply(LoanFormAction::SetDueDate("soon".into()));

        let LoanError::Validation { errors } = form.validate(&config).unwrap_err() else {
            panic!("expected validation error");
        };
        assert_eq!(errors[0], FieldError::new("start_date", "is required"));
        assert_eq!(errors[1], FieldError::new("due_date", "is not a valid date"));
    }

    #[test]
    fn test_validate_and_originate() {
        let config = LoanConfig::default();
        let new_loan = filled_form().validate(&config).unwrap();
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        ));
        let loan = Loan::originate(new_loan, &time).unwrap();

        assert_eq!(loan.accrual(), filled_form().estimate());

        let edit_form = LoanFormState::from_loan(&loan);
        assert_eq!(edit_form.start_date, "2024-01-01");
        assert_eq!(edit_form.estimate(), loan.accrual());
    }
}

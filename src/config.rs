use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{LoanError, Result};
use crate::types::{LoanStatus, RateUnit};

/// loan form and portfolio configuration
///
/// Every field is required when deserializing; `Default` is the single
/// place default values come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoanConfig {
    pub default_rate_unit: RateUnit,
    pub default_status: LoanStatus,
    pub limits: LoanLimits,
    /// look-ahead for loans coming due
    pub upcoming_window_days: u32,
}

/// form validation limits
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoanLimits {
    pub min_amount: Money,
    pub max_amount: Money,
    pub max_prepayment: Money,
    pub max_interest_rate: Rate,
}

impl Default for LoanLimits {
    fn default() -> Self {
        Self {
            min_amount: Money::from_major(1_000),
            max_amount: Money::from_major(10_000_000_000),
            max_prepayment: Money::from_major(10_000_000_000),
            max_interest_rate: Rate::from_percent(dec!(100)),
        }
    }
}

impl Default for LoanConfig {
    fn default() -> Self {
        Self {
            default_rate_unit: RateUnit::Year,
            default_status: LoanStatus::Active,
            limits: LoanLimits::default(),
            upcoming_window_days: 7,
        }
    }
}

impl LoanConfig {
    /// parse and validate a json configuration
    pub fn from_json(json: &str) -> Result<Self> {
        let config: LoanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// reject limits that could never accept a loan
    pub fn validate(&self) -> Result<()> {
        let limits = &self.limits;
        if limits.min_amount.is_negative() {
            return Err(invalid("min_amount cannot be negative"));
        }
        if limits.max_amount < limits.min_amount {
            return Err(invalid("max_amount is below min_amount"));
        }
        if limits.max_prepayment.is_negative() {
            return Err(invalid("max_prepayment cannot be negative"));
        }
        if !limits.max_interest_rate.is_positive() {
            return Err(invalid("max_interest_rate must be positive"));
        }
        if self.default_status == LoanStatus::Paid {
            return Err(invalid("new loans cannot default to PAID"));
        }
        Ok(())
    }
}

fn invalid(message: &str) -> LoanError {
    LoanError::InvalidConfiguration {
        message: message.to_string(),
    }
}

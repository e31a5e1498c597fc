use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::LoanError;

/// unique identifier for a loan
pub type LoanId = Uuid;

/// unique identifier for a loan payment
pub type PaymentId = Uuid;

/// period an interest rate is stated over
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum RateUnit {
    #[serde(alias = "day")]
    Day,
    #[serde(alias = "week")]
    Week,
    #[serde(alias = "month")]
    Month,
    #[serde(alias = "quarter")]
    Quarter,
    #[default]
    #[serde(alias = "year")]
    Year,
}

impl RateUnit {
    pub const ALL: [RateUnit; 5] = [
        RateUnit::Day,
        RateUnit::Week,
        RateUnit::Month,
        RateUnit::Quarter,
        RateUnit::Year,
    ];

    /// day and week rates accrue per elapsed day
    pub fn is_day_based(&self) -> bool {
        matches!(self, RateUnit::Day | RateUnit::Week)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RateUnit::Day => "DAY",
            RateUnit::Week => "WEEK",
            RateUnit::Month => "MONTH",
            RateUnit::Quarter => "QUARTER",
            RateUnit::Year => "YEAR",
        }
    }
}

impl fmt::Display for RateUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RateUnit {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RateUnit::ALL
            .into_iter()
            .find(|unit| unit.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| LoanError::InvalidRateUnit {
                value: s.to_string(),
            })
    }
}

/// who lent the money; selects the accrual branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LenderKind {
    Bank,
    #[default]
    Individual,
    Credit,
    Other,
}

impl LenderKind {
    /// classify a free-text lender field; unknown names are `Other`
    pub fn from_lender(lender: &str) -> Self {
        match lender.trim().to_ascii_lowercase().as_str() {
            "bank" => LenderKind::Bank,
            "individual" => LenderKind::Individual,
            "credit" => LenderKind::Credit,
            _ => LenderKind::Other,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LenderKind::Bank => "bank",
            LenderKind::Individual => "individual",
            LenderKind::Credit => "credit",
            LenderKind::Other => "other",
        }
    }
}

impl fmt::Display for LenderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// loan status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanStatus {
    /// still being repaid, due date not passed
    #[default]
    #[serde(alias = "active")]
    Active,
    /// fully repaid
    #[serde(alias = "paid")]
    Paid,
    /// due date passed with money still owed
    #[serde(alias = "overdue")]
    Overdue,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Active => "ACTIVE",
            LoanStatus::Paid => "PAID",
            LoanStatus::Overdue => "OVERDUE",
        }
    }
}

impl fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LoanStatus {
    type Err = LoanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(LoanStatus::Active),
            "PAID" => Ok(LoanStatus::Paid),
            "OVERDUE" => Ok(LoanStatus::Overdue),
            _ => Err(LoanError::InvalidStatus {
                value: s.to_string(),
            }),
        }
    }
}

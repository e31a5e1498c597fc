use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::loan::Loan;
use crate::types::{LoanId, LoanStatus, RateUnit};

/// one line of the loan list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRow {
    pub id: LoanId,
    pub description: String,
    pub lender: String,
    pub amount: Money,
    pub remaining_amount: Money,
    pub interest_rate: Rate,
    pub interest_rate_type: RateUnit,
    pub interest: Money,
    pub total: Money,
    pub calculation_method_label: String,
    pub status: LoanStatus,
    pub due_date: NaiveDate,
    pub days_remaining: i64,
}

impl LoanRow {
    /// row as of `today`; interest comes from the same accrual as the form
    pub fn from_loan(loan: &Loan, today: NaiveDate) -> Self {
        let accrual = loan.accrual();
        Self {
            id: loan.id,
            description: loan.description.clone(),
            lender: loan.lender.clone(),
            amount: loan.amount,
            remaining_amount: loan.remaining_amount(),
            interest_rate: loan.interest_rate,
            interest_rate_type: loan.interest_rate_type,
            interest: accrual.interest,
            total: accrual.total,
            calculation_method_label: accrual.calculation_method_label,
            status: loan.status,
            due_date: loan.due_date,
            days_remaining: loan.days_remaining(today),
        }
    }

    /// rate with its unit, e.g. "2% / MONTH"
    pub fn rate_display(&self) -> String {
        format!("{} / {}", self.interest_rate, self.interest_rate_type)
    }
}

pub fn loan_rows(loans: &[Loan], today: NaiveDate) -> Vec<LoanRow> {
    loans.iter().map(|loan| LoanRow::from_loan(loan, today)).collect()
}

use chrono::NaiveDate;
use hourglass_rs::SafeTimeProvider;
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::{Money, Rate};
use crate::errors::{FieldError, LoanError, Result};
use crate::events::{Event, EventStore};
use crate::interest::{accrue, AccrualResult, LoanTerms};
use crate::types::{LenderKind, LoanId, LoanStatus, PaymentId, RateUnit};

/// fields needed to create or edit a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLoan {
    pub description: String,
    pub lender: String,
    pub amount: Money,
    pub prepayment_amount: Money,
    pub interest_rate: Rate,
    pub interest_rate_type: RateUnit,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
}

impl NewLoan {
    /// invariants every stored loan must satisfy
    pub fn check(&self) -> Result<()> {
        if !self.amount.is_positive() {
            return Err(LoanError::InvalidAmount { amount: self.amount });
        }
        if self.prepayment_amount.is_negative() {
            return Err(LoanError::InvalidAmount {
                amount: self.prepayment_amount,
            });
        }
        if self.interest_rate.as_percent() < Decimal::ZERO {
            return Err(LoanError::InvalidInterestRate {
                rate: self.interest_rate,
            });
        }
        if self.due_date <= self.start_date {
            return Err(LoanError::DueBeforeStart);
        }
        Ok(())
    }
}

/// a repayment against a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPayment {
    pub id: PaymentId,
    pub amount: Money,
    pub payment_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl LoanPayment {
    pub fn new(amount: Money, payment_date: NaiveDate, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            amount,
            payment_date,
            description,
        }
    }
}

/// a status transition observed while evaluating a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusChange {
    pub loan_id: LoanId,
    pub old_status: LoanStatus,
    pub new_status: LoanStatus,
    pub description: String,
    pub amount: Money,
    pub due_date: NaiveDate,
}

/// stored loan record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Loan {
    pub id: LoanId,
    pub description: String,
    /// free text; "bank", "individual", "credit", "other" or a custom name
    pub lender: String,
    pub amount: Money,
    #[serde(default)]
    pub prepayment_amount: Money,
    pub interest_rate: Rate,
    #[serde(default)]
    pub interest_rate_type: RateUnit,
    pub start_date: NaiveDate,
    pub due_date: NaiveDate,
    #[serde(default)]
    pub status: LoanStatus,
    #[serde(default)]
    pub payments: Vec<LoanPayment>,
    #[serde(skip)]
    pub events: EventStore,
}

impl Loan {
    pub fn builder() -> LoanBuilder {
        LoanBuilder::new()
    }

    /// create a loan and settle its initial status against `time_provider`
    pub fn originate(new: NewLoan, time_provider: &SafeTimeProvider) -> Result<Self> {
        new.check()?;
        let now = time_provider.now();

        let mut loan = Self {
            id: Uuid::new_v4(),
            description: new.description,
            lender: new.lender,
            amount: new.amount,
            prepayment_amount: new.prepayment_amount,
            interest_rate: new.interest_rate,
            interest_rate_type: new.interest_rate_type,
            start_date: new.start_date,
            due_date: new.due_date,
            status: LoanStatus::Active,
            payments: Vec::new(),
            events: EventStore::new(),
        };

        loan.events.emit(Event::LoanCreated {
            loan_id: loan.id,
            amount: loan.amount,
            lender: loan.lender.clone(),
            due_date: loan.due_date,
            timestamp: now,
        });
        loan.status = loan.evaluate_status(now.date_naive());

        Ok(loan)
    }

    /// replace editable fields, keeping id and payments
    pub fn apply_edit(&mut self, edit: NewLoan, today: NaiveDate) -> Result<Option<StatusChange>> {
        edit.check()?;
        self.description = edit.description;
        self.lender = edit.lender;
        self.amount = edit.amount;
        self.prepayment_amount = edit.prepayment_amount;
        self.interest_rate = edit.interest_rate;
        self.interest_rate_type = edit.interest_rate_type;
        self.start_date = edit.start_date;
        self.due_date = edit.due_date;
        Ok(self.refresh_status(today))
    }

    pub fn lender_kind(&self) -> LenderKind {
        LenderKind::from_lender(&self.lender)
    }

    /// principal still owed at origination: amount minus prepayment, floored at zero
    pub fn principal(&self) -> Money {
        self.amount.saturating_sub(self.prepayment_amount)
    }

    pub fn terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal(),
            rate: self.interest_rate,
            rate_unit: self.interest_rate_type,
            start_date: self.start_date,
            due_date: self.due_date,
            lender_kind: self.lender_kind(),
        }
    }

    /// interest estimate shared by the form and the list view
    pub fn accrual(&self) -> AccrualResult {
        accrue(&self.terms())
    }

    pub fn total_paid(&self) -> Money {
        self.payments.iter().map(|p| p.amount).sum()
    }

    pub fn remaining_amount(&self) -> Money {
        self.amount.saturating_sub(self.total_paid())
    }

    pub fn is_paid(&self) -> bool {
        self.status == LoanStatus::Paid
    }

    /// whole days until the due date; zero once paid or past due
    pub fn days_remaining(&self, today: NaiveDate) -> i64 {
        if self.is_paid() {
            return 0;
        }
        (self.due_date - today).num_days().max(0)
    }

    pub fn days_remaining_now(&self, time_provider: &SafeTimeProvider) -> i64 {
        self.days_remaining(time_provider.now().date_naive())
    }

    /// status implied by payments and the due date
    pub fn evaluate_status(&self, today: NaiveDate) -> LoanStatus {
        if self.total_paid() >= self.amount {
            LoanStatus::Paid
        } else if today > self.due_date {
            LoanStatus::Overdue
        } else {
            LoanStatus::Active
        }
    }

    /// apply `evaluate_status`, returning the change if the status moved
    pub fn refresh_status(&mut self, today: NaiveDate) -> Option<StatusChange> {
        let new_status = self.evaluate_status(today);
        if new_status == self.status {
            return None;
        }

        let old_status = self.status;
        self.status = new_status;
        debug!("loan {} status {} -> {}", self.id, old_status, new_status);

        self.events.emit(Event::StatusChanged {
            loan_id: self.id,
            old_status,
            new_status,
            as_of: today,
        });

        Some(StatusChange {
            loan_id: self.id,
            old_status,
            new_status,
            description: self.description.clone(),
            amount: self.amount,
            due_date: self.due_date,
        })
    }

    pub fn refresh_status_now(&mut self, time_provider: &SafeTimeProvider) -> Option<StatusChange> {
        self.refresh_status(time_provider.now().date_naive())
    }

    /// record a repayment; the total paid may not exceed the loan amount
    pub fn record_payment(&mut self, payment: LoanPayment, today: NaiveDate) -> Result<Option<StatusChange>> {
        if !payment.amount.is_positive() {
            return Err(LoanError::InvalidPaymentAmount {
                amount: payment.amount,
            });
        }
        if self.is_paid() {
            return Err(LoanError::LoanAlreadyPaid { id: self.id });
        }

        let remaining = self.remaining_amount();
        if payment.amount > remaining {
            return Err(LoanError::PaymentExceedsRemaining {
                remaining,
                requested: payment.amount,
            });
        }

        self.events.emit(Event::PaymentRecorded {
            loan_id: self.id,
            payment_id: payment.id,
            amount: payment.amount,
            remaining: remaining - payment.amount,
            payment_date: payment.payment_date,
        });
        self.payments.push(payment);

        Ok(self.refresh_status(today))
    }

    /// undo a recorded payment and re-evaluate the status
    pub fn remove_payment(&mut self, payment_id: PaymentId, today: NaiveDate) -> Result<Option<StatusChange>> {
        let index = self
            .payments
            .iter()
            .position(|p| p.id == payment_id)
            .ok_or(LoanError::PaymentNotFound { id: payment_id })?;
        let payment = self.payments.remove(index);

        self.events.emit(Event::PaymentRemoved {
            loan_id: self.id,
            payment_id,
            amount: payment.amount,
            remaining: self.remaining_amount(),
        });

        Ok(self.refresh_status(today))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// builder for loans
pub struct LoanBuilder {
    description: Option<String>,
    lender: Option<String>,
    amount: Option<Money>,
    prepayment_amount: Money,
    interest_rate: Rate,
    interest_rate_type: RateUnit,
    start_date: Option<NaiveDate>,
    due_date: Option<NaiveDate>,
}

impl Default for LoanBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl LoanBuilder {
    pub fn new() -> Self {
        Self {
            description: None,
            lender: None,
            amount: None,
            prepayment_amount: Money::ZERO,
            interest_rate: Rate::ZERO,
            interest_rate_type: RateUnit::default(),
            start_date: None,
            due_date: None,
        }
    }

    pub fn description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    pub fn lender(mut self, lender: &str) -> Self {
        self.lender = Some(lender.to_string());
        self
    }

    pub fn amount(mut self, amount: Money) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn prepayment(mut self, amount: Money) -> Self {
        self.prepayment_amount = amount;
        self
    }

    pub fn rate(mut self, rate: Rate, unit: RateUnit) -> Self {
        self.interest_rate = rate;
        self.interest_rate_type = unit;
        self
    }

    pub fn start_date(mut self, date: NaiveDate) -> Self {
        self.start_date = Some(date);
        self
    }

    pub fn due_date(mut self, date: NaiveDate) -> Self {
        self.due_date = Some(date);
        self
    }

    /// collect the fields, reporting every missing one
    pub fn into_new_loan(self) -> Result<NewLoan> {
        let mut errors = Vec::new();
        if self.description.is_none() {
            errors.push(FieldError::new("description", "is required"));
        }
        if self.lender.is_none() {
            errors.push(FieldError::new("lender", "is required"));
        }
        if self.amount.is_none() {
            errors.push(FieldError::new("amount", "is required"));
        }
        if self.start_date.is_none() {
            errors.push(FieldError::new("start_date", "is required"));
        }
        if self.due_date.is_none() {
            errors.push(FieldError::new("due_date", "is required"));
        }

        match (self.description, self.lender, self.amount, self.start_date, self.due_date) {
            (Some(description), Some(lender), Some(amount), Some(start_date), Some(due_date)) => {
                Ok(NewLoan {
                    description,
                    lender,
                    amount,
                    prepayment_amount: self.prepayment_amount,
                    interest_rate: self.interest_rate,
                    interest_rate_type: self.interest_rate_type,
                    start_date,
                    due_date,
                })
            }
            _ => Err(LoanError::Validation { errors }),
        }
    }

    pub fn build(self, time_provider: &SafeTimeProvider) -> Result<Loan> {
        Loan::originate(self.into_new_loan()?, time_provider)
    }
}

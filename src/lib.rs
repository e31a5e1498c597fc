pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod form;
pub mod interest;
pub mod loan;
pub mod portfolio;
pub mod types;
pub mod views;

// re-export key types
pub use config::{LoanConfig, LoanLimits};
pub use decimal::{Money, Rate};
pub use errors::{FieldError, LoanError, Result};
pub use events::{Event, EventStore};
pub use form::{parse_form_date, reduce, LoanFormAction, LoanFormState};
pub use interest::{
    accrue, elapsed_periods, monthly_equivalent_rate, try_accrue, AccrualResult,
    CalculationMethod, LoanTerms,
};
pub use loan::{Loan, LoanBuilder, LoanPayment, NewLoan, StatusChange};
pub use portfolio::{
    sweep_statuses, upcoming_loans, upcoming_loans_with, LoanStatistics, StatusBucket, StatusSweep,
};
pub use types::{LenderKind, LoanId, LoanStatus, PaymentId, RateUnit};
pub use views::{loan_rows, LoanRow};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;

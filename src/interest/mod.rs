pub mod accrual;
pub mod period;
pub mod rate;

pub use accrual::{accrue, try_accrue, AccrualResult, CalculationMethod, LoanTerms};
pub use period::{days_in_year, duration_days, elapsed_periods, is_leap_year};
pub use rate::monthly_equivalent_rate;

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use log::debug;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::LoanConfig;
use crate::decimal::{Money, Rate};
use crate::loan::{Loan, StatusChange};
use crate::types::LoanStatus;

/// outcome of re-evaluating a batch of loans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatusSweep {
    pub total: usize,
    pub paid: usize,
    pub overdue: usize,
    pub active: usize,
    pub updated: usize,
    pub changes: Vec<StatusChange>,
}

/// re-evaluate every unpaid loan against `today`
pub fn sweep_statuses(loans: &mut [Loan], today: NaiveDate) -> StatusSweep {
    let mut sweep = StatusSweep {
        total: loans.len(),
        ..StatusSweep::default()
    };

    for loan in loans.iter_mut() {
        if !loan.is_paid() {
            if let Some(change) = loan.refresh_status(today) {
                sweep.changes.push(change);
            }
        }

        match loan.status {
            LoanStatus::Paid => sweep.paid += 1,
            LoanStatus::Overdue => sweep.overdue += 1,
            LoanStatus::Active => sweep.active += 1,
        }
    }

    sweep.updated = sweep.changes.len();
    debug!(
        "status sweep on {}: {} loans, {} updated",
        today, sweep.total, sweep.updated
    );
    sweep
}

/// active loans due between `today` and `today + days`, soonest first
pub fn upcoming_loans(loans: &[Loan], today: NaiveDate, days: u32) -> Vec<&Loan> {
    let horizon = today + Duration::days(i64::from(days));
    let mut upcoming: Vec<&Loan> = loans
        .iter()
        .filter(|loan| loan.status == LoanStatus::Active)
        .filter(|loan| loan.due_date >= today && loan.due_date <= horizon)
        .collect();
    upcoming.sort_by_key(|loan| loan.due_date);
    upcoming
}

/// `upcoming_loans` over the configured look-ahead window
pub fn upcoming_loans_with<'a>(loans: &'a [Loan], today: NaiveDate, config: &LoanConfig) -> Vec<&'a Loan> {
    upcoming_loans(loans, today, config.upcoming_window_days)
}

/// count and amounts for one status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusBucket {
    pub count: usize,
    pub amount: Money,
    pub remaining: Money,
}

impl StatusBucket {
    fn add(&mut self, loan: &Loan) {
        self.count += 1;
        self.amount += loan.amount;
        self.remaining += loan.remaining_amount();
    }
}

/// dashboard figures for a set of loans
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanStatistics {
    pub total_loans: usize,
    pub total_amount: Money,
    pub total_remaining: Money,
    pub total_paid: Money,
    pub active: StatusBucket,
    pub paid: StatusBucket,
    pub overdue: StatusBucket,
    /// plain mean of the stated rates, whatever their unit
    pub average_interest_rate: Rate,
    pub estimated_interest: Money,
    /// loan amount grouped by start month, keyed `YYYY-MM`
    pub amount_by_month: BTreeMap<String, Money>,
}

impl LoanStatistics {
    pub fn compute(loans: &[Loan]) -> Self {
        let mut stats = LoanStatistics {
            total_loans: loans.len(),
            ..LoanStatistics::default()
        };
        let mut rate_sum = Decimal::ZERO;

        for loan in loans {
            stats.total_amount += loan.amount;
            stats.total_remaining += loan.remaining_amount();
            stats.total_paid += loan.total_paid();
            stats.estimated_interest += loan.accrual().interest;
            rate_sum += loan.interest_rate.as_percent();

            match loan.status {
                LoanStatus::Active => stats.active.add(loan),
                LoanStatus::Paid => stats.paid.add(loan),
                LoanStatus::Overdue => stats.overdue.add(loan),
            }

            *stats
                .amount_by_month
                .entry(loan.start_date.format("%Y-%m").to_string())
                .or_default() += loan.amount;
        }

        if !loans.is_empty() {
            stats.average_interest_rate = Rate::from_percent(rate_sum / Decimal::from(loans.len()));
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::LoanPayment;
    use crate::types::RateUnit;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::{SafeTimeProvider, TimeSource};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn loan(description: &str, amount: i64, rate: u32, start: NaiveDate, due: NaiveDate) -> Loan {
        let time = SafeTimeProvider::new(TimeSource::Test(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
        ));
        Loan::builder()
            .description(description)
            .lender("individual")
            .amount(Money::from_major(amount))
            .rate(Rate::from_percentage(rate), RateUnit::Month)
            .start_date(start)
            .due_date(due)
            .build(&time)
            .unwrap()
    }

    fn portfolio() -> Vec<Loan> {
        let mut paid = loan("phone", 3_000_000, 1, date(2024, 1, 1), date(2024, 3, 1));
        paid.record_payment(LoanPayment::new(Money::from_major(3_000_000), date(2024, 1, 20), None), date(2024, 1, 20))
            .unwrap();

        vec![
            loan("car", 10_000_000, 2, date(2024, 1, 1), date(2024, 4, 1)),
            loan("rent", 5_000_000, 3, date(2024, 1, 15), date(2024, 2, 15)),
            paid,
            loan("laptop", 2_000_000, 2, date(2024, 2, 1), date(2024, 2, 10)),
        ]
    }

    #[test]
    fn test_sweep_marks_past_due_overdue() {
        let mut loans = portfolio();
        let sweep = sweep_statuses(&mut loans, date(2024, 2, 20));

        assert_eq!(sweep.total, 4);
        assert_eq!(sweep.paid, 1);
        assert_eq!(sweep.overdue, 2);
        assert_eq!(sweep.active, 1);
        assert_eq!(sweep.updated, 2);
        assert!(sweep.changes.iter().all(|c| c.new_status == LoanStatus::Overdue));

        let again = sweep_statuses(&mut loans, date(2024, 2, 20));
        assert_eq!(again.updated, 0);
    }

    #[test]
    fn test_upcoming_window_sorted() {
        let loans = portfolio();
        let upcoming = upcoming_loans(&loans, date(2024, 2, 8), 7);
        let names: Vec<_> = upcoming.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(names, vec!["laptop", "rent"]);

        let upcoming = upcoming_loans(&loans, date(2024, 2, 8), 1);
        assert!(upcoming.is_empty());
    }

    #[test]
    fn test_upcoming_window_from_config() {
        let loans = portfolio();
        let config = LoanConfig::default();
        let names: Vec<_> = upcoming_loans_with(&loans, date(2024, 2, 8), &config)
            .iter()
            .map(|l| l.description.as_str())
            .collect();
        assert_eq!(names, vec!["laptop", "rent"]);

        let config = LoanConfig {
            upcoming_window_days: 60,
            ..LoanConfig::default()
        };
        let upcoming = upcoming_loans_with(&loans, date(2024, 2, 8), &config);
        assert_eq!(upcoming.len(), 3);
        assert_eq!(upcoming[2].description, "car");
    }

    #[test]
    fn test_statistics() {
        let mut loans = portfolio();
        sweep_statuses(&mut loans, date(2024, 2, 20));
        let stats = LoanStatistics::compute(&loans);

        assert_eq!(stats.total_loans, 4);
        assert_eq!(stats.total_amount, Money::from_major(20_000_000));
        assert_eq!(stats.total_paid, Money::from_major(3_000_000));
        assert_eq!(stats.total_remaining, Money::from_major(17_000_000));
        assert_eq!(stats.paid.count, 1);
        assert_eq!(stats.paid.remaining, Money::ZERO);
        assert_eq!(stats.overdue.amount, Money::from_major(7_000_000));
        assert_eq!(stats.active.count, 1);
        assert_eq!(stats.average_interest_rate, Rate::from_percentage(2));
        assert_eq!(stats.amount_by_month["2024-01"], Money::from_major(18_000_000));
        assert_eq!(stats.amount_by_month["2024-02"], Money::from_major(2_000_000));

        let expected: Money = loans.iter().map(|l| l.accrual().interest).sum();
        assert_eq!(stats.estimated_interest, expected);
    }

    #[test]
    fn test_statistics_empty() {
        let stats = LoanStatistics::compute(&[]);
        assert_eq!(stats.total_loans, 0);
        assert_eq!(stats.average_interest_rate, Rate::ZERO);
    }
}

/// status sweep - advance time and watch loans fall due
use loan_accrual_rs::{
    loan_rows, sweep_statuses, upcoming_loans_with, Loan, LoanConfig, LoanPayment,
    LoanStatistics, Money, Rate, RateUnit, SafeTimeProvider, TimeSource,
};
use chrono::{Duration, TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== status sweep example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()
    ));
    let controller = time.test_control().unwrap();
    let today = time.now().date_naive();

    let mut loans = vec![
        Loan::builder()
            .description("tuition")
            .lender("individual")
            .amount(Money::from_major(8_000_000))
            .rate(Rate::from_percentage(1), RateUnit::Month)
            .start_date(today)
            .due_date(today + Duration::days(5))
            .build(&time)?,
        Loan::builder()
            .description("shop stock")
            .lender("credit")
            .amount(Money::from_major(30_000_000))
            .rate(Rate::from_percentage(3), RateUnit::Quarter)
            .start_date(today)
            .due_date(today + Duration::days(120))
            .build(&time)?,
        Loan::builder()
            .description("phone")
            .lender("bank")
            .amount(Money::from_major(6_000_000))
            .rate(Rate::from_percent("0.04".parse()?), RateUnit::Day)
            .start_date(today)
            .due_date(today + Duration::days(45))
            .build(&time)?,
    ];

    let config = LoanConfig::default();
    for loan in upcoming_loans_with(&loans, today, &config) {
        println!("due soon: {} on {}", loan.description, loan.due_date);
    }

    // pay off the phone, then jump past the tuition due date
    loans[2].record_payment(LoanPayment::new(Money::from_major(6_000_000), today, None), today)?;
    controller.advance(Duration::days(10));
    let today = time.now().date_naive();

    let sweep = sweep_statuses(&mut loans, today);
    println!(
        "\nsweep on {}: {} paid, {} overdue, {} active, {} updated",
        today, sweep.paid, sweep.overdue, sweep.active, sweep.updated
    );

    println!();
    for row in loan_rows(&loans, today) {
        println!(
            "{:<12} {:>12} {:>10} {:<8} {:>4} days",
            row.description,
            row.total,
            row.rate_display(),
            row.status,
            row.days_remaining
        );
    }

    let stats = LoanStatistics::compute(&loans);
    println!("\n{}", serde_json::to_string_pretty(&stats)?);

    Ok(())
}

/// quick start - estimate interest on a loan without storing anything
use loan_accrual_rs::chrono::NaiveDate;
use loan_accrual_rs::{accrue, LenderKind, LoanTerms, Money, Rate, RateUnit};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 10,000,000 borrowed from a friend at 2% a month for one quarter
    let terms = LoanTerms {
        principal: Money::from_major(10_000_000),
        rate: Rate::from_percentage(2),
        rate_unit: RateUnit::Month,
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("bad start date")?,
        due_date: NaiveDate::from_ymd_opt(2024, 4, 1).ok_or("bad due date")?,
        lender_kind: LenderKind::Individual,
    };

    let result = accrue(&terms);
    println!("interest: {}", result.interest);
    println!("total:    {}", result.total);
    println!("method:   {}", result.calculation_method_label);

    // same terms at a daily bank rate
    let bank = LoanTerms {
        rate: Rate::from_percent("0.05".parse()?),
        rate_unit: RateUnit::Day,
        lender_kind: LenderKind::Bank,
        ..terms
    };
    let result = accrue(&bank);
    println!("\nbank daily: {} over {} days", result.interest, result.duration_days);

    println!("\n{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}

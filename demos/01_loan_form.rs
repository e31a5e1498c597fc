/// loan form - drive the form reducer and save the result
use loan_accrual_rs::{
    reduce, Loan, LoanConfig, LoanError, LoanFormAction, LoanFormState, Money, Rate, RateUnit,
    SafeTimeProvider, TimeSource,
};
use chrono::{TimeZone, Utc};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== loan form example ===\n");

    let config = LoanConfig::default();
    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    ));

    let actions = vec![
        LoanFormAction::SetDescription("new motorbike".into()),
        LoanFormAction::SetLender("bank".into()),
        LoanFormAction::SetAmount(Money::from_major(45_000_000)),
        LoanFormAction::SetPrepayment(Money::from_major(5_000_000)),
        LoanFormAction::SetInterestRate(Rate::from_percentage(11)),
        LoanFormAction::SetRateUnit(RateUnit::Year),
        LoanFormAction::SetStartDate("2024-01-01".into()),
        LoanFormAction::SetDueDate("2025-07-01".into()),
    ];

    // estimate updates after every keystroke
    let mut form = LoanFormState::new(&config);
    for action in actions {
        form = reduce(form, action);
        let estimate = form.estimate();
        println!("interest {:>12}  total {:>12}", estimate.interest, estimate.total);
    }

    // an invalid edit reports every bad field at once
    let broken = form.clone().apply(LoanFormAction::SetDueDate("2023-12-01".into()));
    if let Err(LoanError::Validation { errors }) = broken.validate(&config) {
        for error in errors {
            println!("rejected {}: {}", error.field, error.message);
        }
    }

    let loan = Loan::originate(form.validate(&config)?, &time)?;
    println!("\nsaved loan {} ({})", loan.id, loan.status);
    println!("{}", loan.to_json_pretty()?);

    Ok(())
}

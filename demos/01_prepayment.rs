/// prepayment - how a one-time extra payment shortens the schedule
use chrono::{NaiveDate, TimeZone, Utc};
use loan_calculator_rs::render::{comparison_table, schedule_table};
use loan_calculator_rs::{calculate_loan, compare_prepayment, DisplayConfig, LoanParameters, TermUnit};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== prepayment example ===\n");

    let start = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let prepay_on = NaiveDate::from_ymd_opt(2024, 6, 4).ok_or("bad date")?;

    let params = LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months)
        .with_prepayment(20_000.0, prepay_on);
    params.validate_at(start, &Default::default())?;

    let display = DisplayConfig::default();
    let result = calculate_loan(&params, start);
    println!("{}", schedule_table(&result.schedule, &display));

    if let Some(comparison) = compare_prepayment(&params, start) {
        println!("\n{}", comparison_table(&comparison, &display));
    }

    Ok(())
}

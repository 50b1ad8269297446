/// history - record calculations with a controlled clock and export csv
use chrono::{Duration, TimeZone, Utc};
use loan_calculator_rs::render::history_table;
use loan_calculator_rs::{
    CalculatorConfig, HistoryStore, LoanCalculator, LoanParameters, MemoryStorage,
    SafeTimeProvider, TermUnit, TimeSource,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("=== history example ===\n");

    let time = SafeTimeProvider::new(TimeSource::Test(
        Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap(),
    ));
    let config = CalculatorConfig::us_dollar();
    let store = HistoryStore::new(MemoryStorage::new()).with_date_format(&config.display.date_format);
    let mut calculator = LoanCalculator::new(store, time, config);

    calculator.calculate(LoanParameters::new(25_000.0, 8.5, 3, TermUnit::Years))?;
    calculator.time_provider().test_control().expect("test clock").advance(Duration::days(7));
    let second = calculator.calculate(LoanParameters::new(12_000.0, 10.0, 18, TermUnit::Months))?;

    println!("{}", history_table(&calculator.history()?, &calculator.config().display));

    calculator.delete(second.id)?;
    println!("\nafter delete:\n{}", calculator.export_csv()?);

    Ok(())
}

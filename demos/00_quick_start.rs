/// quick start - compute a loan and print the headline figures
use loan_calculator_rs::chrono::Utc;
use loan_calculator_rs::{calculate_loan, LoanParameters, TermUnit};

fn main() {
    let params = LoanParameters::new(100_000.0, 12.0, 1, TermUnit::Years);
    let result = calculate_loan(&params, Utc::now());

    println!("monthly payment: {:.2}", result.periodic_payment);
    println!("total interest:  {:.2}", result.total_interest);
    println!("payoff date:     {}", result.payoff_date.format("%Y-%m-%d"));
    println!("payments:        {}", result.schedule.len());
}

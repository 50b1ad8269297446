//! text rendering of results and history for terminals and exports

use chrono::{DateTime, Utc};
use std::fmt::Write;
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use crate::config::{DigitGrouping, DisplayConfig};
use crate::decimal::Money;
use crate::payments::PrepaymentComparison;
use crate::types::{AmortizationEntry, CalculationResult, HistoryRecord};

const FALLBACK_DATE_FORMAT: &str = "%Y-%m-%d";

/// currency text such as `₹12,34,567.89`
pub fn format_currency(amount: f64, display: &DisplayConfig) -> String {
    let money = Money::from_f64(amount);
    let (int, frac) = money.split_digits();
    let grouped = group_digits(&int, display.grouping);
    let sign = if money.is_negative() { "-" } else { "" };
    format!("{sign}{}{grouped}.{frac}", display.currency_symbol)
}

fn group_digits(digits: &str, grouping: DigitGrouping) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let width = match grouping {
        DigitGrouping::Indian => 2,
        DigitGrouping::Western => 3,
    };

    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(width);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// format with a chrono pattern, falling back to iso dates on a bad pattern
pub fn format_date(date: DateTime<Utc>, pattern: &str) -> String {
    let mut out = String::new();
    match write!(out, "{}", date.format(pattern)) {
        Ok(()) => out,
        Err(_) => date.format(FALLBACK_DATE_FORMAT).to_string(),
    }
}

/// headline figures of a calculation
pub fn summary_table(result: &CalculationResult, display: &DisplayConfig) -> String {
    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    builder.push_record(["Monthly Payment".to_string(), format_currency(result.periodic_payment, display)]);
    builder.push_record(["Total Interest".to_string(), format_currency(result.total_interest, display)]);
    builder.push_record(["Payoff Date".to_string(), format_date(result.payoff_date, &display.date_format)]);
    builder.push_record(["Payments".to_string(), result.periods().to_string()]);

    if let Some(adjusted) = result.adjusted_total_interest {
        builder.push_record([
            "Adjusted Interest (with Prepayment)".to_string(),
            format_currency(adjusted, display),
        ]);
        builder.push_record([
            "Save".to_string(),
            format_currency(result.total_interest - adjusted, display),
        ]);
    }

    let mut table = Table::from(builder);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct ScheduleRow {
    #[tabled(rename = "#")]
    index: u32,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Payment")]
    payment: String,
    #[tabled(rename = "Principal")]
    principal: String,
    #[tabled(rename = "Interest")]
    interest: String,
    #[tabled(rename = "Prepayment")]
    prepayment: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// one row per period; `-` where no prepayment was made
pub fn schedule_table(schedule: &[AmortizationEntry], display: &DisplayConfig) -> String {
    let rows = schedule.iter().map(|e| ScheduleRow {
        index: e.index,
        date: format_date(e.date, &display.date_format),
        payment: format_currency(e.payment, display),
        principal: format_currency(e.principal_component, display),
        interest: format_currency(e.interest_component, display),
        prepayment: e
            .prepayment_component
            .map(|p| format_currency(p, display))
            .unwrap_or_else(|| "-".to_string()),
        balance: format_currency(e.remaining_balance, display),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Amount")]
    amount: String,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Term")]
    term: String,
    #[tabled(rename = "Prepayment")]
    prepayment: String,
    #[tabled(rename = "Total Interest")]
    total_interest: String,
}

pub fn history_table(records: &[HistoryRecord], display: &DisplayConfig) -> String {
    if records.is_empty() {
        return "(no calculations saved)".to_string();
    }

    let rows = records.iter().map(|r| HistoryRow {
        id: r.id.to_string(),
        date: format_date(r.recorded_at, &display.date_format),
        amount: format_currency(r.parameters.principal, display),
        rate: format!("{}%", Money::from_f64(r.parameters.annual_rate_percent)),
        term: format!("{} {}", r.parameters.term, r.parameters.term_unit),
        prepayment: r
            .parameters
            .prepayment
            .map(|p| format_currency(p.amount, display))
            .unwrap_or_else(|| "-".to_string()),
        total_interest: format_currency(r.result.total_interest, display),
    });

    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// with/without prepayment side by side
pub fn comparison_table(comparison: &PrepaymentComparison, display: &DisplayConfig) -> String {
    let mut builder = Builder::default();
    builder.push_record(["", "Without Prepayment", "With Prepayment"]);
    builder.push_record([
        "Total Interest".to_string(),
        format_currency(comparison.baseline_interest, display),
        format_currency(comparison.adjusted_interest, display),
    ]);
    builder.push_record([
        "Payments".to_string(),
        comparison.baseline_periods.to_string(),
        comparison.adjusted_periods.to_string(),
    ]);
    builder.push_record([
        "Payoff Date".to_string(),
        format_date(comparison.baseline_payoff_date, &display.date_format),
        format_date(comparison.adjusted_payoff_date, &display.date_format),
    ]);

    let mut table = Table::from(builder);
    table.with(Style::rounded());
    format!(
        "{table}\nInterest saved: {} ({} fewer payments)",
        format_currency(comparison.interest_saved, display),
        comparison.periods_saved
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculatorConfig;
    use crate::payments::{calculate_loan, compare_prepayment};
    use crate::types::{LoanParameters, TermUnit};
    use chrono::{NaiveDate, TimeZone};

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_indian_grouping() {
        let display = CalculatorConfig::indian_rupee().display;
        assert_eq!(format_currency(1_234_567.891, &display), "₹12,34,567.89");
        assert_eq!(format_currency(100_000.0, &display), "₹1,00,000.00");
        assert_eq!(format_currency(999.5, &display), "₹999.50");
        assert_eq!(format_currency(0.0, &display), "₹0.00");
    }

    #[test]
    fn test_western_grouping() {
        let display = CalculatorConfig::us_dollar().display;
        assert_eq!(format_currency(1_234_567.891, &display), "$1,234,567.89");
        assert_eq!(format_currency(-8884.878, &display), "-$8,884.88");
        assert_eq!(format_currency(100.0, &display), "$100.00");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date(start(), "%d/%m/%Y"), "01/01/2024");
        assert_eq!(format_date(start(), "%Q"), "2024-01-01");
    }

    #[test]
    fn test_summary_mentions_savings_only_with_prepayment() {
        let display = DisplayConfig::default();
        let plain = calculate_loan(&LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months), start());
        let text = summary_table(&plain, &display);
        assert!(text.contains("₹8,884.88"));
        assert!(!text.contains("Adjusted Interest"));

        let params = LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months)
            .with_prepayment(20_000.0, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
        let text = summary_table(&calculate_loan(&params, start()), &display);
        assert!(text.contains("Adjusted Interest (with Prepayment)"));
        assert!(text.contains("₹0.00"));
    }

    #[test]
    fn test_schedule_table_rows() {
        let display = DisplayConfig::default();
        let params = LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months)
            .with_prepayment(20_000.0, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
        let result = calculate_loan(&params, start());

        let text = schedule_table(&result.schedule, &display);
        assert!(text.contains("Prepayment"));
        assert!(text.contains("₹20,000.00"));
        assert!(text.contains("01/06/2024"));
        assert!(text.contains(" - "));
    }

    #[test]
    fn test_history_table() {
        let display = DisplayConfig::default();
        assert_eq!(history_table(&[], &display), "(no calculations saved)");

        let params = LoanParameters::new(5_000.0, 9.5, 2, TermUnit::Years);
        let record = HistoryRecord::new(start(), params.clone(), calculate_loan(&params, start()));
        let text = history_table(std::slice::from_ref(&record), &display);
        assert!(text.contains(&record.id.to_string()));
        assert!(text.contains("9.50%"));
        assert!(text.contains("2 years"));
    }

    #[test]
    fn test_comparison_table() {
        let params = LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months)
            .with_prepayment(20_000.0, NaiveDate::from_ymd_opt(2024, 6, 4).unwrap());
        let comparison = compare_prepayment(&params, start()).unwrap();

        let text = comparison_table(&comparison, &DisplayConfig::default());
        assert!(text.contains("Without Prepayment"));
        assert!(text.contains("Interest saved: ₹"));
    }
}

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::LoanParameters;

use super::amortization::calculate_loan;

/// length of the block used to place a prepayment, in milliseconds (30 days)
pub const PREPAYMENT_BLOCK_MS: i64 = 30 * 24 * 60 * 60 * 1000;

/// period that receives a prepayment made on `date`
///
/// The elapsed time between `start_date` and midnight UTC of `date` is
/// divided into whole 30-day blocks, offset by one. This approximates
/// calendar months, so a date late in a long schedule can land a period
/// or two away from the entry whose calendar date it matches. Returns
/// `None` when the date falls before the first period.
pub fn prepayment_period(start_date: DateTime<Utc>, date: NaiveDate) -> Option<u32> {
    let at = date.and_time(NaiveTime::MIN).and_utc();
    let elapsed_ms = (at - start_date).num_milliseconds();
    let period = elapsed_ms.div_euclid(PREPAYMENT_BLOCK_MS) + 1;

    if period < 1 {
        return None;
    }
    u32::try_from(period).ok()
}

/// interest and term with and without the prepayment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrepaymentComparison {
    pub baseline_interest: f64,
    pub adjusted_interest: f64,
    pub interest_saved: f64,
    pub baseline_periods: u32,
    pub adjusted_periods: u32,
    pub periods_saved: u32,
    pub baseline_payoff_date: DateTime<Utc>,
    pub adjusted_payoff_date: DateTime<Utc>,
    /// period the prepayment was applied to, if it fell inside the schedule
    pub applied_period: Option<u32>,
}

/// run the schedule twice to measure what the prepayment saves
///
/// Returns `None` when the loan has no prepayment.
pub fn compare_prepayment(
    parameters: &LoanParameters,
    start_date: DateTime<Utc>,
) -> Option<PrepaymentComparison> {
    parameters.prepayment?;

    let baseline_parameters = LoanParameters {
        prepayment: None,
        ..parameters.clone()
    };

    let baseline = calculate_loan(&baseline_parameters, start_date);
    let adjusted = calculate_loan(parameters, start_date);

    let baseline_periods = baseline.schedule.len() as u32;
    let adjusted_periods = adjusted.schedule.len() as u32;
    let applied_period = adjusted
        .schedule
        .iter()
        .find(|e| e.prepayment_component.is_some())
        .map(|e| e.index);

    Some(PrepaymentComparison {
        baseline_interest: baseline.total_interest,
        adjusted_interest: adjusted.total_interest,
        interest_saved: baseline.total_interest - adjusted.total_interest,
        baseline_periods,
        adjusted_periods,
        periods_saved: baseline_periods.saturating_sub(adjusted_periods),
        baseline_payoff_date: baseline.payoff_date,
        adjusted_payoff_date: adjusted.payoff_date,
        applied_period,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TermUnit;
    use chrono::TimeZone;

    fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_period_uses_thirty_day_blocks() {
        assert_eq!(prepayment_period(start(), date(2024, 1, 1)), Some(1));
        assert_eq!(prepayment_period(start(), date(2024, 1, 30)), Some(1));
        assert_eq!(prepayment_period(start(), date(2024, 1, 31)), Some(2));
        assert_eq!(prepayment_period(start(), date(2024, 6, 4)), Some(6));
    }

    #[test]
    fn test_period_drifts_from_calendar_months() {
        // 366 days: twelve 30-day blocks plus six, so period 13 rather than 12
        assert_eq!(prepayment_period(start(), date(2025, 1, 1)), Some(13));
    }

    #[test]
    fn test_start_time_of_day_counts() {
        let afternoon = Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap();
        // midnight on day 30 is still short of a full block from 15:00 on day 0
        assert_eq!(prepayment_period(afternoon, date(2024, 1, 31)), Some(1));
    }

    #[test]
    fn test_past_dates_have_no_period() {
        assert_eq!(prepayment_period(start(), date(2023, 12, 31)), None);
        let afternoon = Utc.with_ymd_and_hms(2024, 1, 1, 15, 0, 0).unwrap();
        assert_eq!(prepayment_period(afternoon, date(2024, 1, 1)), None);
    }

    #[test]
    fn test_comparison_reports_savings() {
        let params = LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months)
            .with_prepayment(20_000.0, date(2024, 6, 4));

        let comparison = compare_prepayment(&params, start()).unwrap();

        assert_eq!(comparison.baseline_periods, 12);
        assert!(comparison.adjusted_periods < 12);
        assert_eq!(
            comparison.periods_saved,
            comparison.baseline_periods - comparison.adjusted_periods
        );
        assert!(comparison.interest_saved > 0.0);
        assert!(comparison.adjusted_payoff_date < comparison.baseline_payoff_date);
        assert_eq!(comparison.applied_period, Some(6));
    }

    #[test]
    fn test_comparison_without_prepayment() {
        let params = LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months);
        assert!(compare_prepayment(&params, start()).is_none());
    }

    #[test]
    fn test_comparison_with_unreachable_prepayment() {
        let params = LoanParameters::new(100_000.0, 12.0, 12, TermUnit::Months)
            .with_prepayment(20_000.0, date(2030, 1, 1));

        let comparison = compare_prepayment(&params, start()).unwrap();
        assert_eq!(comparison.interest_saved, 0.0);
        assert_eq!(comparison.periods_saved, 0);
        assert!(comparison.applied_period.is_none());
    }
}

use chrono::{DateTime, Months, Utc};
use tracing::{debug, warn};

use crate::types::{AmortizationEntry, CalculationResult, LoanParameters, Prepayment};

use super::prepayment::prepayment_period;

/// level payment for a fixed-rate loan
///
/// `payment = P * r * (1 + r)^n / ((1 + r)^n - 1)`, with the zero-rate case
/// reduced to `P / n`. No rounding is applied.
pub fn compute_payment(principal: f64, periodic_rate: f64, num_periods: u32) -> f64 {
    if num_periods == 0 {
        return principal;
    }

    if periodic_rate == 0.0 {
        return principal / f64::from(num_periods);
    }

    let compound = (1.0 + periodic_rate).powf(f64::from(num_periods));
    principal * (periodic_rate * compound) / (compound - 1.0)
}

/// simulate the schedule period by period
///
/// Stops at `num_periods` or as soon as the balance reaches zero, whichever
/// comes first. A prepayment lands on the period given by
/// [`prepayment_period`]; if that period is never reached it is not applied.
pub fn build_schedule(
    principal: f64,
    periodic_rate: f64,
    payment: f64,
    num_periods: u32,
    start_date: DateTime<Utc>,
    prepayment: Option<&Prepayment>,
) -> Vec<AmortizationEntry> {
    let prepayment_at = prepayment.and_then(|p| prepayment_period(start_date, p.date).map(|period| (period, p.amount)));

    let mut schedule = Vec::new();
    let mut balance = principal;

    for index in 1..=num_periods {
        let interest_component = balance * periodic_rate;
        let mut principal_component = payment - interest_component;
        let mut prepayment_component = None;

        if let Some((period, amount)) = prepayment_at {
            if period == index {
                balance -= amount;
                prepayment_component = Some(amount);
            }
        }

        // final payment shrinks to whatever is left
        if balance < principal_component {
            principal_component = balance;
        }

        balance -= principal_component;

        schedule.push(AmortizationEntry {
            index,
            date: add_months(start_date, index - 1),
            payment,
            principal_component,
            interest_component,
            prepayment_component,
            remaining_balance: balance,
        });

        if balance <= 0.0 {
            break;
        }
    }

    if let (Some(p), Some(last)) = (prepayment, schedule.last()) {
        let applied = schedule.iter().any(|e| e.prepayment_component.is_some());
        if !applied {
            warn!(
                amount = p.amount,
                date = %p.date,
                last_period = last.index,
                "prepayment falls outside the schedule and was not applied"
            );
        }
    }

    schedule
}

/// compute payment, schedule and totals for a loan starting at `start_date`
///
/// `adjusted_total_interest` is reported whenever a prepayment is supplied
/// and is the interest of this same run; see
/// [`compare_prepayment`](super::prepayment::compare_prepayment) for a
/// with/without comparison.
pub fn calculate_loan(parameters: &LoanParameters, start_date: DateTime<Utc>) -> CalculationResult {
    let num_periods = parameters.total_months();
    let periodic_rate = parameters.periodic_rate();
    let periodic_payment = compute_payment(parameters.principal, periodic_rate, num_periods);

    let schedule = build_schedule(
        parameters.principal,
        periodic_rate,
        periodic_payment,
        num_periods,
        start_date,
        parameters.prepayment.as_ref(),
    );

    let total_interest: f64 = schedule.iter().map(|e| e.interest_component).sum();

    let payoff_date = schedule
        .last()
        .map(|e| e.date)
        .unwrap_or_else(|| add_months(start_date, num_periods));

    let adjusted_total_interest = parameters.prepayment.as_ref().map(|_| total_interest);

    debug!(
        principal = parameters.principal,
        num_periods,
        periodic_payment,
        total_interest,
        periods = schedule.len(),
        "loan calculated"
    );

    CalculationResult {
        periodic_payment,
        total_interest,
        payoff_date,
        adjusted_total_interest,
        schedule,
    }
}

/// add calendar months, clamping to the end of shorter months
pub(crate) fn add_months(date: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    date.checked_add_months(Months::new(months))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

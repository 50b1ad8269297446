use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// unique identifier for a history record
pub type RecordId = Uuid;

/// unit the loan term is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TermUnit {
    #[default]
    Months,
    Years,
}

impl TermUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermUnit::Months => "months",
            TermUnit::Years => "years",
        }
    }
}

impl fmt::Display for TermUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TermUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "months" | "m" => Ok(TermUnit::Months),
            "year" | "years" | "y" => Ok(TermUnit::Years),
            other => Err(format!("unknown term unit: {other}")),
        }
    }
}

/// single one-time extra principal payment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Prepayment {
    pub amount: f64,
    pub date: NaiveDate,
}

/// loan inputs as submitted by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanParameters {
    pub principal: f64,
    /// nominal annual rate as a percentage, e.g. 12.0 for 12%
    pub annual_rate_percent: f64,
    pub term: u32,
    pub term_unit: TermUnit,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment: Option<Prepayment>,
}

impl LoanParameters {
    pub fn new(principal: f64, annual_rate_percent: f64, term: u32, term_unit: TermUnit) -> Self {
        Self {
            principal,
            annual_rate_percent,
            term,
            term_unit,
            prepayment: None,
        }
    }

    pub fn with_prepayment(mut self, amount: f64, date: NaiveDate) -> Self {
        self.prepayment = Some(Prepayment { amount, date });
        self
    }

    /// term normalized to months
    pub fn total_months(&self) -> u32 {
        match self.term_unit {
            TermUnit::Months => self.term,
            TermUnit::Years => self.term.saturating_mul(12),
        }
    }

    /// monthly rate as a fraction; payments are always monthly
    pub fn periodic_rate(&self) -> f64 {
        self.annual_rate_percent / 100.0 / 12.0
    }
}

/// one period of an amortization schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub index: u32,
    pub date: DateTime<Utc>,
    pub payment: f64,
    pub principal_component: f64,
    pub interest_component: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prepayment_component: Option<f64>,
    pub remaining_balance: f64,
}

/// outcome of a single loan calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationResult {
    pub periodic_payment: f64,
    pub total_interest: f64,
    pub payoff_date: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted_total_interest: Option<f64>,
    pub schedule: Vec<AmortizationEntry>,
}

impl CalculationResult {
    pub fn periods(&self) -> usize {
        self.schedule.len()
    }

    /// everything paid over the schedule, prepayment included
    pub fn total_paid(&self) -> f64 {
        self.schedule
            .iter()
            .map(|e| {
                e.principal_component + e.interest_component + e.prepayment_component.unwrap_or(0.0)
            })
            .sum()
    }

    pub fn final_balance(&self) -> Option<f64> {
        self.schedule.last().map(|e| e.remaining_balance)
    }
}

/// persisted calculation: inputs plus result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: RecordId,
    pub recorded_at: DateTime<Utc>,
    pub parameters: LoanParameters,
    pub result: CalculationResult,
}

impl HistoryRecord {
    pub fn new(
        recorded_at: DateTime<Utc>,
        parameters: LoanParameters,
        result: CalculationResult,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            parameters,
            result,
        }
    }
}

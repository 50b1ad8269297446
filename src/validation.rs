use chrono::{DateTime, Utc};

use crate::config::ValidationLimits;
use crate::errors::{CalculatorError, FieldError, Result};
use crate::payments::{compute_payment, prepayment_period};
use crate::types::LoanParameters;

impl LoanParameters {
    /// check field invariants, reporting every failure at once
    pub fn validate(&self) -> Result<()> {
        into_result(self.field_errors(&ValidationLimits::default()))
    }

    /// as [`validate`](Self::validate), with configured limits and a check
    /// that the prepayment lands inside the schedule starting at `start_date`
    pub fn validate_at(&self, start_date: DateTime<Utc>, limits: &ValidationLimits) -> Result<()> {
        let mut errors = self.field_errors(limits);

        if let Some(prepayment) = &self.prepayment {
            let months = self.total_months();
            match prepayment_period(start_date, prepayment.date) {
                None => errors.push(FieldError::new(
                    "prepayment_date",
                    "Prepayment date must not be before the first payment",
                )),
                Some(period) if months >= 1 && period > months => errors.push(FieldError::new(
                    "prepayment_date",
                    format!("Prepayment date falls after the last of {months} payments"),
                )),
                Some(_) => {}
            }
        }

        into_result(errors)
    }

    fn field_errors(&self, limits: &ValidationLimits) -> Vec<FieldError> {
        let mut errors = Vec::new();

        if !self.principal.is_finite() || self.principal <= 0.0 {
            errors.push(FieldError::new("principal", "Loan amount must be greater than 0"));
        } else if let Some(max) = limits.max_principal {
            if self.principal > max {
                errors.push(FieldError::new("principal", format!("Loan amount must not exceed {max}")));
            }
        }

        if !self.annual_rate_percent.is_finite() || self.annual_rate_percent <= 0.0 {
            errors.push(FieldError::new("annual_rate_percent", "Interest rate must be greater than 0"));
        } else if let Some(max) = limits.max_annual_rate_percent {
            if self.annual_rate_percent > max {
                errors.push(FieldError::new(
                    "annual_rate_percent",
                    format!("Interest rate must not exceed {max}%"),
                ));
            }
        }

        if self.term < 1 {
            errors.push(FieldError::new(
                "term",
                format!("Loan term must be at least 1 {}", self.term_unit),
            ));
        } else if let Some(max) = limits.max_term_months {
            if self.total_months() > max {
                errors.push(FieldError::new("term", format!("Loan term must not exceed {max} months")));
            }
        }

        if let Some(prepayment) = &self.prepayment {
            if !prepayment.amount.is_finite() || prepayment.amount <= 0.0 {
                errors.push(FieldError::new("prepayment_amount", "Prepayment amount must be greater than 0"));
            }
        }

        // only meaningful once amount, rate and term are individually sane
        if errors.iter().all(|e| e.field == "prepayment_amount") {
            let payment = compute_payment(self.principal, self.periodic_rate(), self.total_months());
            if !payment.is_finite() {
                errors.push(FieldError::new(
                    "term",
                    "Loan amount, rate and term give a monthly payment too large to compute",
                ));
            }
        }

        errors
    }
}

fn into_result(errors: Vec<FieldError>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(CalculatorError::InvalidParameters { errors })
    }
}

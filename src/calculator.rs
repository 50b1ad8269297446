use hourglass_rs::SafeTimeProvider;
use tracing::debug;

use crate::config::CalculatorConfig;
use crate::errors::{CalculatorError, Result};
use crate::history::HistoryRepository;
use crate::payments::{calculate_loan, compare_prepayment, PrepaymentComparison};
use crate::types::{HistoryRecord, LoanParameters, RecordId};

/// validates input, runs the engine at the provider's current time and
/// records each calculation in the repository
pub struct LoanCalculator<R: HistoryRepository> {
    repository: R,
    time_provider: SafeTimeProvider,
    config: CalculatorConfig,
}

impl<R: HistoryRepository> LoanCalculator<R> {
    pub fn new(repository: R, time_provider: SafeTimeProvider, config: CalculatorConfig) -> Self {
        Self {
            repository,
            time_provider,
            config,
        }
    }

    pub fn config(&self) -> &CalculatorConfig {
        &self.config
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    pub fn time_provider(&self) -> &SafeTimeProvider {
        &self.time_provider
    }

    /// validate and compute without saving
    pub fn preview(&self, parameters: LoanParameters) -> Result<HistoryRecord> {
        let now = self.time_provider.now();
        parameters.validate_at(now, &self.config.limits)?;

        let result = calculate_loan(&parameters, now);
        Ok(HistoryRecord::new(now, parameters, result))
    }

    /// validate, compute and append to history
    pub fn calculate(&mut self, parameters: LoanParameters) -> Result<HistoryRecord> {
        let record = self.preview(parameters)?;
        self.repository.append(record.clone())?;
        debug!(id = %record.id, "calculation recorded");
        Ok(record)
    }

    /// savings of the prepayment against the same loan without it
    pub fn compare(&self, parameters: &LoanParameters) -> Result<Option<PrepaymentComparison>> {
        let now = self.time_provider.now();
        parameters.validate_at(now, &self.config.limits)?;
        Ok(compare_prepayment(parameters, now))
    }

    pub fn history(&self) -> Result<Vec<HistoryRecord>> {
        self.repository.list()
    }

    pub fn delete(&mut self, id: RecordId) -> Result<()> {
        if self.repository.delete_by_id(id)? {
            Ok(())
        } else {
            Err(CalculatorError::RecordNotFound { id })
        }
    }

    pub fn clear_history(&mut self) -> Result<()> {
        self.repository.clear()
    }

    pub fn export_csv(&self) -> Result<String> {
        self.repository.export_csv()
    }
}

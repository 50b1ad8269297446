pub mod calculator;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod history;
pub mod payments;
pub mod render;
pub mod types;
pub mod validation;

// re-export key types
pub use calculator::LoanCalculator;
pub use config::{CalculatorConfig, DigitGrouping, DisplayConfig, HistoryConfig, ValidationLimits};
pub use decimal::Money;
pub use errors::{CalculatorError, FieldError, Result};
pub use history::{
    FileStorage, HistoryRepository, HistoryStore, KeyValueStorage, MemoryStorage,
};
pub use payments::{
    build_schedule, calculate_loan, compare_prepayment, compute_payment, prepayment_period,
    PrepaymentComparison,
};
pub use types::{
    AmortizationEntry, CalculationResult, HistoryRecord, LoanParameters, Prepayment, RecordId,
    TermUnit,
};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use uuid::Uuid;

pub mod amortization;
pub mod prepayment;

pub use amortization::{build_schedule, calculate_loan, compute_payment};
pub use prepayment::{compare_prepayment, prepayment_period, PrepaymentComparison, PREPAYMENT_BLOCK_MS};

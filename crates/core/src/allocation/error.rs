//! Allocation error types.

use thiserror::Error;

/// Errors raised by the payment allocator.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AllocationError {
    /// At least one sale must be selected.
    #[error("No sales selected for allocation")]
    NoSales,

    /// The paid amount must be positive.
    #[error("Paid amount must be greater than zero")]
    NonPositiveAmount,
}

impl AllocationError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoSales => "NO_SALES_SELECTED",
            Self::NonPositiveAmount => "NON_POSITIVE_PAYMENT",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        400
    }
}

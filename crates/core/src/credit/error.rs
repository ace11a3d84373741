//! Credit policy error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the credit policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CreditError {
    /// The new debt would push the open balance past the credit limit.
    #[error("Credit limit exceeded: only {available} available")]
    LimitExceeded {
        /// Credit still available under the limit.
        available: Decimal,
    },

    /// Inactive customers cannot take on new debt.
    #[error("Customer is inactive")]
    CustomerInactive,
}

impl CreditError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::LimitExceeded { .. } => "CREDIT_LIMIT_EXCEEDED",
            Self::CustomerInactive => "CUSTOMER_INACTIVE",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::LimitExceeded { .. } => 422,
            Self::CustomerInactive => 400,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CreditError::LimitExceeded {
                available: dec!(50.00)
            }
            .error_code(),
            "CREDIT_LIMIT_EXCEEDED"
        );
        assert_eq!(CreditError::CustomerInactive.error_code(), "CUSTOMER_INACTIVE");
    }

    #[test]
    fn test_error_display() {
        let err = CreditError::LimitExceeded {
            available: dec!(120.50),
        };
        assert_eq!(err.to_string(), "Credit limit exceeded: only 120.50 available");
    }
}

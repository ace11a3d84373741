//! Payment error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors for registering payments.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaymentError {
    /// Payment value must be positive.
    #[error("Payment value must be greater than zero")]
    NonPositiveValue,

    /// Payment exceeds the outstanding balance.
    #[error("Payment of {value} exceeds the balance due of {balance_due}")]
    Overpayment {
        /// Attempted payment value.
        value: Decimal,
        /// Outstanding balance at the time of payment.
        balance_due: Decimal,
    },

    /// Cash tendered is less than the payment value.
    #[error("Cash tendered {tendered} is less than the payment value {value}")]
    InsufficientTender {
        /// Cash handed over.
        tendered: Decimal,
        /// Payment value to cover.
        value: Decimal,
    },

    /// The sale is already fully paid.
    #[error("Sale is already paid")]
    SaleAlreadyPaid,
}

impl PaymentError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NonPositiveValue => "NON_POSITIVE_PAYMENT",
            Self::Overpayment { .. } => "OVERPAYMENT",
            Self::InsufficientTender { .. } => "INSUFFICIENT_TENDER",
            Self::SaleAlreadyPaid => "SALE_ALREADY_PAID",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NonPositiveValue | Self::InsufficientTender { .. } => 400,
            Self::Overpayment { .. } => 422,
            Self::SaleAlreadyPaid => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(PaymentError::NonPositiveValue.error_code(), "NON_POSITIVE_PAYMENT");
        assert_eq!(
            PaymentError::Overpayment {
                value: dec!(60.00),
                balance_due: dec!(50.00)
            }
            .error_code(),
            "OVERPAYMENT"
        );
    }

    #[test]
    fn test_error_display() {
        let err = PaymentError::InsufficientTender {
            tendered: dec!(10.00),
            value: dec!(15.00),
        };
        assert_eq!(
            err.to_string(),
            "Cash tendered 10.00 is less than the payment value 15.00"
        );
    }
}

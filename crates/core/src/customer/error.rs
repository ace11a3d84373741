//! Customer error types.

use thiserror::Error;

/// Errors for customer registration and lifecycle operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomerError {
    /// Name must have at least 2 characters after trimming.
    #[error("Customer name must have at least 2 characters")]
    NameTooShort,

    /// CPF failed the checksum validation.
    #[error("Invalid CPF: {0}")]
    InvalidCpf(String),

    /// Credit limit cannot be negative.
    #[error("Credit limit cannot be negative")]
    NegativeCreditLimit,

    /// Cannot deactivate a customer with open sales.
    #[error("Cannot deactivate customer: {open_sales} open sale(s) outstanding")]
    HasOpenSales {
        /// Number of open sales blocking deactivation.
        open_sales: u64,
    },

    /// Cannot delete a customer that has sale history.
    #[error("Cannot delete customer: {total_sales} sale(s) on record")]
    HasSaleHistory {
        /// Number of sales on record.
        total_sales: u64,
    },
}

impl CustomerError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NameTooShort => "NAME_TOO_SHORT",
            Self::InvalidCpf(_) => "INVALID_CPF",
            Self::NegativeCreditLimit => "NEGATIVE_CREDIT_LIMIT",
            Self::HasOpenSales { .. } => "CUSTOMER_HAS_OPEN_SALES",
            Self::HasSaleHistory { .. } => "CUSTOMER_HAS_SALE_HISTORY",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NameTooShort | Self::InvalidCpf(_) | Self::NegativeCreditLimit => 400,
            Self::HasOpenSales { .. } | Self::HasSaleHistory { .. } => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(CustomerError::NameTooShort.error_code(), "NAME_TOO_SHORT");
        assert_eq!(
            CustomerError::InvalidCpf("123".to_string()).error_code(),
            "INVALID_CPF"
        );
        assert_eq!(
            CustomerError::HasOpenSales { open_sales: 2 }.error_code(),
            "CUSTOMER_HAS_OPEN_SALES"
        );
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(CustomerError::NameTooShort.http_status_code(), 400);
        assert_eq!(
            CustomerError::HasSaleHistory { total_sales: 5 }.http_status_code(),
            409
        );
    }

    #[test]
    fn test_error_display() {
        let err = CustomerError::HasOpenSales { open_sales: 3 };
        assert_eq!(
            err.to_string(),
            "Cannot deactivate customer: 3 open sale(s) outstanding"
        );
    }
}

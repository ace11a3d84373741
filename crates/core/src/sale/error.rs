//! Sale error types.

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors for sale creation, editing, and deletion.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SaleError {
    /// A sale needs at least one line item.
    #[error("Sale must have at least one item")]
    NoItems,

    /// Item description must be 2 to 255 characters.
    #[error("Item description must be 2 to 255 characters")]
    InvalidDescription,

    /// Quantity must be positive.
    #[error("Item quantity must be greater than zero")]
    NonPositiveQuantity,

    /// Quantity exceeds the configured maximum.
    #[error("Item quantity exceeds the maximum of {max}")]
    QuantityTooLarge {
        /// Configured maximum quantity.
        max: Decimal,
    },

    /// Unit price must be positive.
    #[error("Item unit price must be greater than zero")]
    NonPositiveUnitPrice,

    /// Unit price exceeds the configured maximum.
    #[error("Item unit price exceeds the maximum of {max}")]
    UnitPriceTooLarge {
        /// Configured maximum unit price.
        max: Decimal,
    },

    /// Caller-supplied subtotal disagrees with quantity × unit price.
    #[error("Item subtotal {expected} does not match computed {computed}")]
    SubtotalMismatch {
        /// Subtotal the caller supplied.
        expected: Decimal,
        /// Subtotal computed from quantity and unit price.
        computed: Decimal,
    },

    /// Sale total is below the configured minimum.
    #[error("Sale total must be at least {minimum}")]
    BelowMinimum {
        /// Configured minimum sale value.
        minimum: Decimal,
    },

    /// Due date cannot precede the sale date.
    #[error("Due date cannot be before the sale date")]
    DueDateBeforeSaleDate,

    /// Paid sales are immutable.
    #[error("Cannot modify a paid sale")]
    AlreadyPaid,

    /// Remainder sales are system-generated and immutable.
    #[error("Cannot modify a system-generated remainder sale")]
    RemainderImmutable,

    /// Sales with payments cannot be edited or deleted.
    #[error("Cannot modify a sale with {payments} payment(s) registered")]
    HasPayments {
        /// Number of payments on the sale.
        payments: u64,
    },
}

impl SaleError {
    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoItems => "SALE_NO_ITEMS",
            Self::InvalidDescription => "INVALID_DESCRIPTION",
            Self::NonPositiveQuantity => "NON_POSITIVE_QUANTITY",
            Self::QuantityTooLarge { .. } => "QUANTITY_TOO_LARGE",
            Self::NonPositiveUnitPrice => "NON_POSITIVE_UNIT_PRICE",
            Self::UnitPriceTooLarge { .. } => "UNIT_PRICE_TOO_LARGE",
            Self::SubtotalMismatch { .. } => "SUBTOTAL_MISMATCH",
            Self::BelowMinimum { .. } => "SALE_BELOW_MINIMUM",
            Self::DueDateBeforeSaleDate => "DUE_DATE_BEFORE_SALE_DATE",
            Self::AlreadyPaid => "SALE_ALREADY_PAID",
            Self::RemainderImmutable => "REMAINDER_IMMUTABLE",
            Self::HasPayments { .. } => "SALE_HAS_PAYMENTS",
        }
    }

    /// Returns the HTTP status code for this error.
    #[must_use]
    pub fn http_status_code(&self) -> u16 {
        match self {
            Self::NoItems
            | Self::InvalidDescription
            | Self::NonPositiveQuantity
            | Self::QuantityTooLarge { .. }
            | Self::NonPositiveUnitPrice
            | Self::UnitPriceTooLarge { .. }
            | Self::SubtotalMismatch { .. }
            | Self::BelowMinimum { .. }
            | Self::DueDateBeforeSaleDate => 400,

            Self::AlreadyPaid | Self::RemainderImmutable | Self::HasPayments { .. } => 409,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_error_codes() {
        assert_eq!(SaleError::NoItems.error_code(), "SALE_NO_ITEMS");
        assert_eq!(
            SaleError::BelowMinimum {
                minimum: dec!(0.01)
            }
            .error_code(),
            "SALE_BELOW_MINIMUM"
        );
        assert_eq!(SaleError::RemainderImmutable.error_code(), "REMAINDER_IMMUTABLE");
    }

    #[test]
    fn test_http_status_codes() {
        assert_eq!(SaleError::NoItems.http_status_code(), 400);
        assert_eq!(SaleError::AlreadyPaid.http_status_code(), 409);
        assert_eq!(
            SaleError::HasPayments { payments: 1 }.http_status_code(),
            409
        );
    }
}

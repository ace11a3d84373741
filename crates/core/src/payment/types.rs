//! Payment domain types.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fiado_shared::types::{PaymentId, SaleId};

/// How a payment was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    /// Physical cash; carries tendered amount and change.
    Cash,
    /// Debit or credit card.
    Card,
    /// Pix instant transfer.
    Pix,
}

impl PaymentMethod {
    /// True when this method involves tendered cash and change.
    #[must_use]
    pub fn is_cash(&self) -> bool {
        matches!(self, Self::Cash)
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Pix => write!(f, "pix"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "pix" => Ok(Self::Pix),
            _ => Err(format!("Unknown payment method: {s}")),
        }
    }
}

/// A registered payment against one sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier.
    pub id: PaymentId,
    /// The sale this payment settles (fully or partially).
    pub sale_id: SaleId,
    /// Amount applied to the sale's balance.
    pub value: Decimal,
    /// Payment method.
    pub method: PaymentMethod,
    /// Cash handed over; only for cash payments.
    pub tendered: Option<Decimal>,
    /// Change returned; only for cash payments.
    pub change: Option<Decimal>,
    /// Date the payment was made.
    pub payment_date: NaiveDate,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// A validated payment ready to persist.
///
/// Produced by [`validate_payment`](super::validate_payment); the repository
/// turns it into a [`Payment`] row inside the write transaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaymentPlan {
    /// Amount applied to the balance.
    pub value: Decimal,
    /// Cash tendered, when paying in cash.
    pub tendered: Option<Decimal>,
    /// Change due back, when paying in cash.
    pub change: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_method_roundtrip() {
        for method in [PaymentMethod::Cash, PaymentMethod::Card, PaymentMethod::Pix] {
            assert_eq!(
                PaymentMethod::from_str(&method.to_string()).unwrap(),
                method
            );
        }
        assert!(PaymentMethod::from_str("check").is_err());
    }

    #[test]
    fn test_only_cash_is_cash() {
        assert!(PaymentMethod::Cash.is_cash());
        assert!(!PaymentMethod::Card.is_cash());
        assert!(!PaymentMethod::Pix.is_cash());
    }
}

//! Customer domain types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use fiado_shared::types::CustomerId;

/// A customer buying on store credit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique identifier.
    pub id: CustomerId,
    /// Full name.
    pub name: String,
    /// Brazilian tax id, digits only. Unique when present.
    pub cpf: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Maximum open balance this customer may carry.
    pub credit_limit: Decimal,
    /// Inactive customers cannot make new purchases.
    pub active: bool,
    /// Free-form notes.
    pub notes: Option<String>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Input for creating or updating a customer.
#[derive(Debug, Clone, Deserialize)]
pub struct CustomerInput {
    /// Full name.
    pub name: String,
    /// Brazilian tax id, formatted or bare.
    pub cpf: Option<String>,
    /// Contact phone.
    pub phone: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Credit limit; `None` means use the configured default.
    pub credit_limit: Option<Decimal>,
    /// Free-form notes.
    pub notes: Option<String>,
}

/// Snapshot of a customer's credit position.
///
/// Computed by the repository from the customer's open sales and consumed
/// by the pure credit policy. All amounts are at 2 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CreditStanding {
    /// The customer's credit limit.
    pub credit_limit: Decimal,
    /// Sum of the totals of all open sales. An open sale consumes its full
    /// total; partial payments free credit only when the sale settles.
    pub open_balance: Decimal,
    /// Portion of the open balance past due beyond the delinquency threshold.
    pub overdue_balance: Decimal,
}

impl CreditStanding {
    /// Credit still available, never negative.
    #[must_use]
    pub fn available_credit(&self) -> Decimal {
        (self.credit_limit - self.open_balance).max(Decimal::ZERO)
    }

    /// True when any open sale is past due beyond the threshold.
    #[must_use]
    pub fn is_delinquent(&self) -> bool {
        self.overdue_balance > Decimal::ZERO
    }
}

impl Customer {
    /// True when the customer may make a new purchase on credit.
    #[must_use]
    pub fn can_purchase(&self, standing: &CreditStanding) -> bool {
        self.active && standing.available_credit() > Decimal::ZERO && !standing.is_delinquent()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fiado_shared::types::CustomerId;
    use rust_decimal_macros::dec;

    fn customer(active: bool) -> Customer {
        Customer {
            id: CustomerId::new(),
            name: "Maria Silva".to_string(),
            cpf: None,
            phone: None,
            address: None,
            credit_limit: dec!(500.00),
            active,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_available_credit_never_negative() {
        let standing = CreditStanding {
            credit_limit: dec!(500.00),
            open_balance: dec!(620.00),
            overdue_balance: Decimal::ZERO,
        };
        assert_eq!(standing.available_credit(), Decimal::ZERO);
    }

    #[test]
    fn test_can_purchase_requires_active() {
        let standing = CreditStanding {
            credit_limit: dec!(500.00),
            open_balance: dec!(100.00),
            overdue_balance: Decimal::ZERO,
        };
        assert!(customer(true).can_purchase(&standing));
        assert!(!customer(false).can_purchase(&standing));
    }

    #[test]
    fn test_can_purchase_blocked_by_delinquency() {
        let standing = CreditStanding {
            credit_limit: dec!(500.00),
            open_balance: dec!(100.00),
            overdue_balance: dec!(40.00),
        };
        assert!(standing.is_delinquent());
        assert!(!customer(true).can_purchase(&standing));
    }

    #[test]
    fn test_can_purchase_blocked_at_limit() {
        let standing = CreditStanding {
            credit_limit: dec!(500.00),
            open_balance: dec!(500.00),
            overdue_balance: Decimal::ZERO,
        };
        assert!(!customer(true).can_purchase(&standing));
    }
}
